//! Leading numeric prefix parsing
//!
//! Typed accessors read the number at the start of a resolved value and
//! ignore whatever follows it, so `"8080 # http"` reads as `8080`. Leading
//! whitespace and a single sign are accepted. A value without any digit at
//! the start has no numeric prefix.

/// Skip C `isspace` characters
fn skip_space(s: &str) -> &str {
    s.trim_start_matches([' ', '\t', '\n', '\r', '\x0b', '\x0c'])
}

/// Split an optional sign off the front
fn split_sign(s: &str) -> (bool, &str) {
    match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    }
}

/// Length of the run of ASCII digits at the start of `s`
fn digit_run(s: &str) -> usize {
    s.bytes().take_while(u8::is_ascii_digit).count()
}

/// Parse a base-10 integer prefix, saturating at the `i128` bounds
pub fn parse_integer_prefix(s: &str) -> Option<i128> {
    let (negative, rest) = split_sign(skip_space(s));
    let len = digit_run(rest);
    if len == 0 {
        return None;
    }

    let mut value: i128 = 0;
    for digit in rest[..len].bytes().map(|b| i128::from(b - b'0')) {
        value = if negative {
            value.saturating_mul(10).saturating_sub(digit)
        } else {
            value.saturating_mul(10).saturating_add(digit)
        };
    }
    Some(value)
}

/// Parse an integer prefix into `T`, saturating at `T`'s bounds
pub fn parse_integer_as<T>(s: &str) -> Option<T>
where
    T: TryFrom<i128> + Bounded,
{
    let value = parse_integer_prefix(s)?;
    Some(T::try_from(value).unwrap_or(if value < 0 { T::MIN } else { T::MAX }))
}

/// Integer types with known bounds
pub trait Bounded: Sized {
    const MIN: Self;
    const MAX: Self;
}

macro_rules! impl_bounded {
    ($($t:ty),*) => {
        $(impl Bounded for $t {
            const MIN: Self = <$t>::MIN;
            const MAX: Self = <$t>::MAX;
        })*
    };
}

impl_bounded!(i32, i64, i128);

/// Length of a special float word (`inf`, `infinity`, `nan`) at the start of `s`
fn special_float_len(s: &str) -> Option<usize> {
    let lower: String = s.chars().take(8).collect::<String>().to_ascii_lowercase();
    if lower.starts_with("infinity") {
        Some(8)
    } else if lower.starts_with("inf") || lower.starts_with("nan") {
        Some(3)
    } else {
        None
    }
}

/// Length of a decimal float literal at the start of `s` (sign excluded)
fn decimal_float_len(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    let int_len = digit_run(s);
    let mut end = int_len;
    let mut frac_len = 0;

    if bytes.get(end) == Some(&b'.') {
        frac_len = digit_run(&s[end + 1..]);
        end += 1 + frac_len;
    }
    if int_len == 0 && frac_len == 0 {
        return None;
    }

    // The exponent only counts if digits follow it
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let (_, exp) = split_sign(&s[end + 1..]);
        let exp_digits = digit_run(exp);
        if exp_digits > 0 {
            let sign_len = s.len() - (end + 1) - exp.len();
            end += 1 + sign_len + exp_digits;
        }
    }
    Some(end)
}

/// Parse a floating point prefix
pub fn parse_float_prefix(s: &str) -> Option<f64> {
    let start = skip_space(s);
    let (negative, rest) = split_sign(start);
    let len = special_float_len(rest).or_else(|| decimal_float_len(rest))?;
    let magnitude: f64 = rest[..len].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}
