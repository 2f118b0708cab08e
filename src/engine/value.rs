//! Value type - scalars returned by the engine

/// A single value returned from query execution
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// NULL value
    #[default]
    Null,
    /// Integer value
    Int(i64),
    /// Floating point value
    Float(f64),
    /// Text value (drivers hand numeric results back as text for exact
    /// types such as DECIMAL)
    Str(String),
}

impl Value {
    /// Check if this value is NULL
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Convert to i64, returns None if NULL or not convertible.
    ///
    /// Text values parse leniently: an integer parse first, then a float
    /// parse truncated toward zero, matching how numeric text comes back
    /// from the wire.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            Value::Float(f) => Some(*f as i64),
            Value::Str(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().map(|f| f as i64))
            }
            Value::Null => None,
        }
    }

    /// Convert to f64, returns None if NULL or not convertible
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            Value::Str(s) => s.trim().parse().ok(),
            Value::Null => None,
        }
    }

    /// Convert to string reference, returns None if not a text value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_int() {
        assert_eq!(Value::Int(42).as_int(), Some(42));
        assert_eq!(Value::Float(12.9).as_int(), Some(12));
        assert_eq!(Value::Str("60".to_string()).as_int(), Some(60));
        assert_eq!(Value::Str("12.50".to_string()).as_int(), Some(12));
        assert_eq!(Value::Str(" 7 ".to_string()).as_int(), Some(7));
        assert_eq!(Value::Str("abc".to_string()).as_int(), None);
        assert_eq!(Value::Null.as_int(), None);
    }

    #[test]
    fn test_as_float() {
        assert_eq!(Value::Int(3).as_float(), Some(3.0));
        assert_eq!(Value::Float(2.5).as_float(), Some(2.5));
        assert_eq!(Value::Str("12.50".to_string()).as_float(), Some(12.5));
        assert_eq!(Value::Null.as_float(), None);
    }

    #[test]
    fn test_as_str_and_null() {
        assert_eq!(Value::Str("x".to_string()).as_str(), Some("x"));
        assert_eq!(Value::Int(1).as_str(), None);
        assert!(Value::Null.is_null());
        assert!(!Value::Int(0).is_null());
        assert!(Value::default().is_null());
    }
}
