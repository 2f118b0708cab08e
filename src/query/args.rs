//! Raw request parameters
//!
//! A query is constructed from a flat string-keyed mapping. The aggregate
//! keys (`function`, `operator`, `fields`, `groupby`) are interpreted by
//! normalization; every other key passes through untouched, in insertion
//! order, and becomes an ordinary filter.

/// A single request parameter value
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    /// Single string value
    Str(String),
    /// List of string values
    List(Vec<String>),
    /// Boolean flag
    Flag(bool),
}

impl ArgValue {
    /// String form, if this is a `Str`
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ArgValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// List form, if this is a `List`
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            ArgValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Flag form, if this is a `Flag`
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            ArgValue::Flag(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<&str> for ArgValue {
    fn from(v: &str) -> Self {
        ArgValue::Str(v.to_string())
    }
}

impl From<String> for ArgValue {
    fn from(v: String) -> Self {
        ArgValue::Str(v)
    }
}

impl From<bool> for ArgValue {
    fn from(v: bool) -> Self {
        ArgValue::Flag(v)
    }
}

impl From<Vec<String>> for ArgValue {
    fn from(v: Vec<String>) -> Self {
        ArgValue::List(v)
    }
}

impl From<Vec<&str>> for ArgValue {
    fn from(v: Vec<&str>) -> Self {
        ArgValue::List(v.into_iter().map(String::from).collect())
    }
}

/// Insertion-ordered request-parameter mapping
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QueryArgs {
    entries: Vec<(String, ArgValue)>,
}

impl QueryArgs {
    /// Create an empty mapping
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    #[must_use]
    pub fn set(mut self, key: impl Into<String>, value: impl Into<ArgValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or replace a value, keeping the key's original position
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ArgValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Remove a key, returning its value
    pub fn remove(&mut self, key: &str) -> Option<ArgValue> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(index).1)
    }

    /// Look up a value
    pub fn get(&self, key: &str) -> Option<&ArgValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Look up a string value
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(ArgValue::as_str)
    }

    /// Look up a list value
    pub fn get_list(&self, key: &str) -> Option<&[String]> {
        self.get(key).and_then(ArgValue::as_list)
    }

    /// Look up a flag value
    pub fn get_flag(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(ArgValue::as_flag)
    }

    /// Check if a key is present
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Iterate entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ArgValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the mapping is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
