//! Main Store type for flatconf
//!
//! The Store holds raw `key = value` entries and resolves interpolations
//! only when a value is read. Nothing is cached: every read recomputes the
//! resolved value from the current raw entries.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::{Error, Result};
use crate::interpolation::{self, Lookup};
use crate::line;
use crate::numeric;
use crate::source;

/// Recursion level used when none is configured
pub const DEFAULT_RECURSION_LEVEL: usize = 3;

/// Separates list elements
pub const LIST_SEPARATOR: char = ',';

/// Options fixed when a Store is constructed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreOptions {
    /// Number of interpolation passes applied to a value holding a `$`
    pub recursion_level: usize,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            recursion_level: DEFAULT_RECURSION_LEVEL,
        }
    }
}

impl StoreOptions {
    /// Options with the given recursion level
    pub fn with_recursion_level(recursion_level: usize) -> Self {
        Self { recursion_level }
    }
}

/// Flat key-value configuration store
///
/// Keys are kept in lexicographic order. The Store is deliberately not
/// `Clone`; use [`Store::duplicate`] to get an independent copy.
///
/// # Example
///
/// ```rust
/// use flatconf_core::Store;
///
/// let mut store = Store::from_text("host = db.local\nurl = tcp://$host:${port}0\n", Default::default());
/// store.append("port = 543");
///
/// assert_eq!(store.get("url").as_deref(), Some("tcp://db.local:5430"));
/// assert_eq!(store.get_int("port", 0), 543);
/// assert_eq!(store.dump(), "host = db.local\nport = 543\nurl = tcp://$host:${port}0\n");
/// ```
#[derive(Debug, Default)]
pub struct Store {
    /// Raw (unresolved) values by key
    entries: BTreeMap<String, String>,
    /// Construction options
    options: StoreOptions,
}

impl Store {
    /// Create an empty Store with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty Store with custom options
    pub fn with_options(options: StoreOptions) -> Self {
        Self {
            entries: BTreeMap::new(),
            options,
        }
    }

    /// Create an empty Store with the given recursion level
    pub fn with_recursion_level(recursion_level: usize) -> Self {
        Self::with_options(StoreOptions::with_recursion_level(recursion_level))
    }

    /// Build a Store from raw lines
    ///
    /// Blank lines and `#` comments are skipped, every other line is
    /// ingested in order so later duplicates win.
    pub fn from_lines<I, S>(lines: I, options: StoreOptions) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut store = Self::with_options(options);
        store.extend(lines);
        store
    }

    /// Build a Store from a whole configuration text
    pub fn from_text(text: &str, options: StoreOptions) -> Self {
        Self::from_lines(text.lines(), options)
    }

    /// Load a Store from a configuration file
    pub fn from_file(path: impl AsRef<Path>, options: StoreOptions) -> Result<Self> {
        let mut store = Self::with_options(options);
        store.read_from_file(path)?;
        Ok(store)
    }

    /// Load a configuration file on top of the current entries
    pub fn read_from_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let lines = source::read_lines(path)?;
        self.extend(lines);
        log::debug!(
            "Store holds {} entries after loading {}",
            self.len(),
            path.display()
        );
        Ok(())
    }

    /// Ingest one raw `key = value` line
    ///
    /// Lines without `=` or with an empty key are dropped. Comment lines
    /// are not recognised here, only by batch loading.
    pub fn append(&mut self, line: impl AsRef<str>) -> &mut Self {
        if let Some((key, value)) = line::parse_entry(line.as_ref()) {
            self.entries.insert(key.to_string(), value.to_string());
        }
        self
    }

    /// Make an independent copy with the same options
    pub fn duplicate(&self) -> Self {
        Self {
            entries: self.entries.clone(),
            options: self.options,
        }
    }

    /// The recursion level fixed at construction
    pub fn recursion_level(&self) -> usize {
        self.options.recursion_level
    }

    /// The options fixed at construction
    pub fn options(&self) -> StoreOptions {
        self.options
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether the Store has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check whether a key exists
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Keys in lexicographic order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Raw entries in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Get the raw (unresolved) value of a key
    pub fn raw(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Resolve an arbitrary string against this Store
    pub fn resolve(&self, text: &str) -> String {
        interpolation::resolve(text, self, self.options.recursion_level)
    }

    /// Get the resolved value of a key
    pub fn get(&self, key: &str) -> Option<String> {
        self.raw(key).map(|raw| self.resolve(raw))
    }

    /// Get a value as `i32`, or `default` if absent or not numeric
    pub fn get_int(&self, key: &str, default: i32) -> i32 {
        self.get_integer(key).unwrap_or(default)
    }

    /// Get a value as `i64`, or `default` if absent or not numeric
    pub fn get_long(&self, key: &str, default: i64) -> i64 {
        self.get_integer(key).unwrap_or(default)
    }

    /// Get a value as `i128`, or `default` if absent or not numeric
    pub fn get_long_long(&self, key: &str, default: i128) -> i128 {
        self.get_integer(key).unwrap_or(default)
    }

    /// Get a value as `f64`, or `default` if absent or not numeric
    pub fn get_double(&self, key: &str, default: f64) -> f64 {
        self.get(key)
            .and_then(|v| numeric::parse_float_prefix(&v))
            .unwrap_or(default)
    }

    /// Get a resolved string, or `default` if absent
    pub fn get_string(&self, key: &str, default: Option<&str>) -> Option<String> {
        self.get(key).or_else(|| default.map(str::to_string))
    }

    /// Get a value split on commas, trimmed, with empty elements removed
    pub fn get_list(&self, key: &str) -> Option<Vec<String>> {
        self.get(key).map(|v| split_list(&v))
    }

    fn get_integer<T>(&self, key: &str) -> Option<T>
    where
        T: TryFrom<i128> + numeric::Bounded,
    {
        self.get(key).and_then(|v| numeric::parse_integer_as(&v))
    }

    /// Serialize the raw entries back to configuration text
    ///
    /// Entries are written in key order as `key = value`, without resolving,
    /// so loading the dump again yields the same resolved values.
    pub fn dump(&self) -> String {
        self.to_string()
    }

    /// Export entries as a map, resolved or raw
    pub fn to_map(&self, resolve: bool) -> BTreeMap<String, String> {
        self.entries
            .iter()
            .map(|(k, v)| {
                let value = if resolve { self.resolve(v) } else { v.clone() };
                (k.clone(), value)
            })
            .collect()
    }

    /// Export entries as a pretty-printed JSON object
    pub fn to_json(&self, resolve: bool) -> Result<String> {
        serde_json::to_string_pretty(&self.to_map(resolve))
            .map_err(|e| Error::serialize(e.to_string()))
    }
}

/// Split a list value on commas
///
/// Elements are trimmed and empty ones are dropped; order and duplicates
/// are kept.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(LIST_SEPARATOR)
        .map(line::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

impl Lookup for Store {
    fn lookup(&self, key: &str) -> Option<&str> {
        self.raw(key)
    }
}

impl<S: AsRef<str>> Extend<S> for Store {
    /// Batch-load lines, skipping blanks and comments
    fn extend<I: IntoIterator<Item = S>>(&mut self, lines: I) {
        for line in lines {
            let line = line.as_ref();
            if line::is_eligible(line) {
                self.append(line);
            }
        }
    }
}

impl<S: AsRef<str>> FromIterator<S> for Store {
    fn from_iter<I: IntoIterator<Item = S>>(lines: I) -> Self {
        Self::from_lines(lines, StoreOptions::default())
    }
}

impl fmt::Display for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in &self.entries {
            writeln!(f, "{} = {}", key, value)?;
        }
        Ok(())
    }
}

impl Serialize for Store {
    /// Serializes the raw entries as a map
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
