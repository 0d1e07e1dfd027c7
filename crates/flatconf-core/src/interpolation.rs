//! Variable interpolation
//!
//! Expands references to other keys inside a value:
//! - `$name` - bare reference, the name is the longest run of identifier characters
//! - `${name}` - braced reference, lets identifier characters follow the reference
//! - `\$name` - escaped, copied literally (the backslash is kept)
//!
//! A single pass ([`expand_once`]) is driven by an explicit state machine.
//! Substituted text is the *raw* value of the referenced key, so references
//! it carries are only expanded by a further pass. [`resolve`] applies a
//! fixed number of passes.
//!
//! # Transition table
//!
//! | state              | input               | next               | action                 |
//! |--------------------|---------------------|--------------------|------------------------|
//! | `Literal`          | `\`                 | `Escape`           | emit                   |
//! | `Literal`          | `$`                 | `Dollar`           | skip                   |
//! | `Literal`          | other               | `Literal`          | emit                   |
//! | `Escape`           | any                 | `Literal`          | emit                   |
//! | `Dollar`           | `{`                 | `Identifier(brace)`| skip                   |
//! | `Dollar`           | identifier char     | `Identifier(bare)` | collect                |
//! | `Dollar`           | other               | `Literal`          | substitute, rescan     |
//! | `Identifier(_)`    | identifier char     | unchanged          | collect                |
//! | `Identifier(brace)`| `}`                 | `Literal`          | substitute             |
//! | `Identifier(_)`    | other               | `Literal`          | substitute, rescan     |
//! | any                | end of input        | `Literal`          | substitute if pending  |

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

/// Starts a reference
pub const REFERENCE_MARKER: char = '$';

/// Escapes the following character
pub const ESCAPE_MARKER: char = '\\';

/// Opens a braced reference right after `$`
pub const BRACE_OPEN: char = '{';

/// Closes a braced reference
pub const BRACE_CLOSE: char = '}';

/// Read-only key lookup used while expanding references
pub trait Lookup {
    /// Get the raw value stored for `key`
    fn lookup(&self, key: &str) -> Option<&str>;
}

impl<L: Lookup + ?Sized> Lookup for &L {
    fn lookup(&self, key: &str) -> Option<&str> {
        (**self).lookup(key)
    }
}

impl Lookup for BTreeMap<String, String> {
    fn lookup(&self, key: &str) -> Option<&str> {
        self.get(key).map(String::as_str)
    }
}

impl<S: BuildHasher> Lookup for HashMap<String, String, S> {
    fn lookup(&self, key: &str) -> Option<&str> {
        self.get(key).map(String::as_str)
    }
}

/// Check if a character may appear in an identifier (ASCII letter, digit or `_`)
pub fn is_identifier_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

/// Scanner state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Copying characters verbatim
    Literal,
    /// A `\` was copied, the next character is copied without interpretation
    Escape,
    /// A `$` was seen, a `{` here switches to brace mode
    Dollar,
    /// Collecting a reference name
    Identifier {
        /// Whether the reference was opened with `${`
        braced: bool,
    },
}

/// What the scanner does with the current input character
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Copy the character to the output
    Emit,
    /// Consume the character without output
    Skip,
    /// Append the character to the pending reference name
    Collect,
    /// Substitute the pending reference and consume the character
    Substitute,
    /// Substitute the pending reference, then feed the character again
    SubstituteAndRescan,
}

/// One row of the transition table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub next: State,
    pub action: Action,
}

impl Transition {
    const fn new(next: State, action: Action) -> Self {
        Self { next, action }
    }
}

/// Compute the transition for `input` in `state`; `None` is end of input
pub fn transition(state: State, input: Option<char>) -> Transition {
    use Action::*;

    let Some(ch) = input else {
        return match state {
            State::Dollar | State::Identifier { .. } => Transition::new(State::Literal, Substitute),
            State::Literal | State::Escape => Transition::new(State::Literal, Skip),
        };
    };

    match state {
        State::Literal => match ch {
            ESCAPE_MARKER => Transition::new(State::Escape, Emit),
            REFERENCE_MARKER => Transition::new(State::Dollar, Skip),
            _ => Transition::new(State::Literal, Emit),
        },
        State::Escape => Transition::new(State::Literal, Emit),
        State::Dollar => match ch {
            BRACE_OPEN => Transition::new(State::Identifier { braced: true }, Skip),
            c if is_identifier_char(c) => {
                Transition::new(State::Identifier { braced: false }, Collect)
            }
            _ => Transition::new(State::Literal, SubstituteAndRescan),
        },
        State::Identifier { braced } => match ch {
            c if is_identifier_char(c) => Transition::new(state, Collect),
            BRACE_CLOSE if braced => Transition::new(State::Literal, Substitute),
            _ => Transition::new(State::Literal, SubstituteAndRescan),
        },
    }
}

/// Single-pass scanner over one input string
struct Scanner<'l, L: ?Sized> {
    lookup: &'l L,
    state: State,
    identifier: String,
    output: String,
}

impl<'l, L: Lookup + ?Sized> Scanner<'l, L> {
    fn new(lookup: &'l L, capacity: usize) -> Self {
        Self {
            lookup,
            state: State::Literal,
            identifier: String::new(),
            output: String::with_capacity(capacity),
        }
    }

    fn feed(&mut self, input: Option<char>) {
        loop {
            let Transition { next, action } = transition(self.state, input);
            self.state = next;
            match action {
                Action::Emit => self.output.extend(input),
                Action::Skip => {}
                Action::Collect => self.identifier.extend(input),
                Action::Substitute => self.substitute(),
                Action::SubstituteAndRescan => {
                    self.substitute();
                    continue;
                }
            }
            return;
        }
    }

    /// Replace the pending reference with its raw value; unknown names vanish
    fn substitute(&mut self) {
        if !self.identifier.is_empty() {
            if let Some(value) = self.lookup.lookup(&self.identifier) {
                self.output.push_str(value);
            }
        }
        self.identifier.clear();
    }

    fn finish(mut self) -> String {
        self.feed(None);
        self.output
    }
}

/// Expand every reference in `input` once
///
/// Substituted values are not scanned again within the same pass.
pub fn expand_once<L: Lookup + ?Sized>(input: &str, lookup: &L) -> String {
    let mut scanner = Scanner::new(lookup, input.len());
    for ch in input.chars() {
        scanner.feed(Some(ch));
    }
    scanner.finish()
}

/// Expand `raw` with up to `recursion_level` passes
///
/// When `raw` holds no `$` at all it is returned untouched without any pass.
/// Otherwise exactly `recursion_level` passes run, whether or not an earlier
/// pass already left nothing to expand. References still present after the
/// last pass stay in the output literally.
pub fn resolve<L: Lookup + ?Sized>(raw: &str, lookup: &L, recursion_level: usize) -> String {
    let mut current = raw.to_string();
    if !raw.contains(REFERENCE_MARKER) {
        return current;
    }

    for pass in 1..=recursion_level {
        log::trace!("Interpolation pass {}/{}: {}", pass, recursion_level, current);
        current = expand_once(&current, lookup);
    }

    if recursion_level > 0 && current.contains(REFERENCE_MARKER) {
        log::debug!(
            "Recursion level {} exhausted with '$' still present in: {}",
            recursion_level,
            current
        );
    }

    current
}
