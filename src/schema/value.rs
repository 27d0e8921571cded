use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A dynamically-typed story variable value.
///
/// Conditions compare these loosely: `Int` and `Float` compare
/// numerically, everything else only against its own type. Cross-type
/// pairs are unequal and unordered, so an ordering comparator over a
/// mismatched pair simply fails to match rather than erroring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl Value {
    /// Numeric view of the value, for promotion in comparisons.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(n) => Some(*n as f64),
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Loose equality: numeric types compare by value, other types only
    /// against themselves.
    pub fn loose_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            _ => match (self.as_f64(), other.as_f64()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
        }
    }

    /// Loose ordering: defined for numeric pairs and string pairs only.
    pub fn loose_cmp(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Self::String(a), Self::String(b)) => Some(a.cmp(b)),
            _ => match (self.as_f64(), other.as_f64()) {
                (Some(a), Some(b)) => a.partial_cmp(&b),
                _ => None,
            },
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(v as i64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loose_eq_same_type() {
        assert!(Value::Bool(true).loose_eq(&Value::Bool(true)));
        assert!(!Value::Bool(true).loose_eq(&Value::Bool(false)));
        assert!(Value::from("ryan").loose_eq(&Value::from("ryan")));
        assert!(!Value::from("ryan").loose_eq(&Value::from("lily")));
    }

    #[test]
    fn loose_eq_numeric_promotion() {
        assert!(Value::Int(3).loose_eq(&Value::Float(3.0)));
        assert!(Value::Float(2.5).loose_eq(&Value::Float(2.5)));
        assert!(!Value::Int(3).loose_eq(&Value::Float(3.5)));
    }

    #[test]
    fn loose_eq_cross_type_is_false() {
        assert!(!Value::from("3").loose_eq(&Value::Int(3)));
        assert!(!Value::Bool(true).loose_eq(&Value::Int(1)));
        assert!(!Value::Bool(false).loose_eq(&Value::from("")));
    }

    #[test]
    fn loose_cmp_numeric() {
        assert_eq!(
            Value::Int(5).loose_cmp(&Value::Float(2.5)),
            Some(Ordering::Greater)
        );
        assert_eq!(
            Value::Float(1.0).loose_cmp(&Value::Int(1)),
            Some(Ordering::Equal)
        );
    }

    #[test]
    fn loose_cmp_strings() {
        assert_eq!(
            Value::from("abc").loose_cmp(&Value::from("abd")),
            Some(Ordering::Less)
        );
    }

    #[test]
    fn loose_cmp_cross_type_is_none() {
        assert_eq!(Value::from("5").loose_cmp(&Value::Int(5)), None);
        assert_eq!(Value::Bool(true).loose_cmp(&Value::Bool(false)), None);
    }

    #[test]
    fn from_impls() {
        assert_eq!(Value::from(true), Value::Bool(true));
        assert_eq!(Value::from(7), Value::Int(7));
        assert_eq!(Value::from(7i64), Value::Int(7));
        assert_eq!(Value::from(0.5), Value::Float(0.5));
        assert_eq!(Value::from("x"), Value::String("x".to_string()));
    }
}
