//! Condition trees gating choices and branches.
//!
//! Authored conditions arrive as a permissive shape — a node may carry a
//! variable, any number of comparator keys, and `and`/`or` sub-lists all
//! at once. That shape is decoded exactly once at story-load time into the
//! strict tagged tree evaluated per frame, the same raw-to-runtime split
//! used for data files elsewhere in the crate.

use serde::Deserialize;
use thiserror::Error;

use crate::schema::value::Value;

#[derive(Debug, Error)]
pub enum ConditionError {
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

/// A single comparison against one story variable.
///
/// `Unset` is the decoded form of a leaf that names a variable but carries
/// neither a comparator key nor a plain `value`: it matches exactly when
/// the variable has never been written.
#[derive(Debug, Clone, PartialEq)]
pub enum Comparator {
    Equals(Value),
    NotEquals(Value),
    GreaterThan(Value),
    LessThan(Value),
    In(Vec<Value>),
    NotIn(Vec<Value>),
    Unset,
}

/// A leaf test: one variable, one comparator.
#[derive(Debug, Clone, PartialEq)]
pub struct Leaf {
    pub variable: String,
    pub test: Comparator,
}

impl Leaf {
    pub fn new(variable: impl Into<String>, test: Comparator) -> Self {
        Self {
            variable: variable.into(),
            test,
        }
    }
}

/// A decoded condition tree.
///
/// `All`/`Any` nodes may carry an `own` leaf sibling to their sub-terms:
/// for `All` it must hold in addition to every term, for `Any` it counts
/// as one more alternative. A leaf with no variable — or any shape the
/// decoder does not recognize — becomes `Always` (vacuously true).
///
/// Deserializes from the permissive [`RawCondition`] shape, so conditions
/// embedded in story data decode the same way `parse_ron` does.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawCondition")]
pub enum Condition {
    Always,
    Leaf(Leaf),
    All {
        terms: Vec<Condition>,
        own: Option<Leaf>,
    },
    Any {
        terms: Vec<Condition>,
        own: Option<Leaf>,
    },
}

impl Condition {
    pub fn var_equals(variable: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Leaf(Leaf::new(variable, Comparator::Equals(value.into())))
    }

    pub fn var_not_equals(variable: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Leaf(Leaf::new(variable, Comparator::NotEquals(value.into())))
    }

    pub fn var_greater_than(variable: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Leaf(Leaf::new(variable, Comparator::GreaterThan(value.into())))
    }

    pub fn var_less_than(variable: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Leaf(Leaf::new(variable, Comparator::LessThan(value.into())))
    }

    pub fn var_in(variable: impl Into<String>, values: Vec<Value>) -> Self {
        Self::Leaf(Leaf::new(variable, Comparator::In(values)))
    }

    pub fn var_not_in(variable: impl Into<String>, values: Vec<Value>) -> Self {
        Self::Leaf(Leaf::new(variable, Comparator::NotIn(values)))
    }

    pub fn all(terms: Vec<Condition>) -> Self {
        Self::All { terms, own: None }
    }

    pub fn any(terms: Vec<Condition>) -> Self {
        Self::Any { terms, own: None }
    }

    /// `all` with an own-leaf sibling that must also hold.
    pub fn all_with(terms: Vec<Condition>, own: Leaf) -> Self {
        Self::All {
            terms,
            own: Some(own),
        }
    }

    /// `any` with an own-leaf sibling counted as one more alternative.
    pub fn any_with(terms: Vec<Condition>, own: Leaf) -> Self {
        Self::Any {
            terms,
            own: Some(own),
        }
    }

    /// Parse a condition from its RON data shape.
    pub fn parse_ron(input: &str) -> Result<Condition, ConditionError> {
        let options = ron::Options::default()
            .with_default_extension(ron::extensions::Extensions::IMPLICIT_SOME);
        let raw: RawCondition = options.from_str(input)?;
        Ok(Self::from_raw(raw))
    }

    /// Decode the permissive authored shape into the strict tree.
    pub fn from_raw(raw: RawCondition) -> Condition {
        let RawCondition {
            variable,
            equals,
            not_equals,
            greater_than,
            less_than,
            is_in,
            not_in,
            value,
            and,
            or,
        } = raw;

        let own = |variable: Option<String>| -> Option<Leaf> {
            let variable = variable?;
            let test = decode_comparator(
                equals, not_equals, greater_than, less_than, is_in, not_in, value,
            );
            Some(Leaf { variable, test })
        };

        if let Some(and_terms) = and {
            let mut terms: Vec<Condition> =
                and_terms.into_iter().map(Condition::from_raw).collect();
            // A node carrying both lists splits: the `or` list plus the own
            // comparator become one more conjunct.
            if let Some(or_terms) = or {
                if let Some(leaf) = own(variable) {
                    terms.push(Condition::Any {
                        terms: or_terms.into_iter().map(Condition::from_raw).collect(),
                        own: Some(leaf),
                    });
                }
                return Condition::All { terms, own: None };
            }
            return Condition::All {
                terms,
                own: own(variable),
            };
        }

        if let Some(or_terms) = or {
            return Condition::Any {
                terms: or_terms.into_iter().map(Condition::from_raw).collect(),
                own: own(variable),
            };
        }

        match own(variable) {
            Some(leaf) => Condition::Leaf(leaf),
            None => Condition::Always,
        }
    }
}

impl From<RawCondition> for Condition {
    fn from(raw: RawCondition) -> Self {
        Condition::from_raw(raw)
    }
}

/// Comparator keys are honored in a fixed priority order; a leaf carrying
/// several keeps only the first. A leaf with none falls back to plain
/// `value` equality, and to `Unset` when `value` is absent too.
fn decode_comparator(
    equals: Option<Value>,
    not_equals: Option<Value>,
    greater_than: Option<Value>,
    less_than: Option<Value>,
    is_in: Option<Vec<Value>>,
    not_in: Option<Vec<Value>>,
    value: Option<Value>,
) -> Comparator {
    if let Some(v) = equals {
        Comparator::Equals(v)
    } else if let Some(v) = not_equals {
        Comparator::NotEquals(v)
    } else if let Some(v) = greater_than {
        Comparator::GreaterThan(v)
    } else if let Some(v) = less_than {
        Comparator::LessThan(v)
    } else if let Some(vs) = is_in {
        Comparator::In(vs)
    } else if let Some(vs) = not_in {
        Comparator::NotIn(vs)
    } else if let Some(v) = value {
        Comparator::Equals(v)
    } else {
        Comparator::Unset
    }
}

/// The authored condition shape before decoding. Every key is optional;
/// unknown keys are ignored rather than rejected.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawCondition {
    pub variable: Option<String>,
    pub equals: Option<Value>,
    pub not_equals: Option<Value>,
    pub greater_than: Option<Value>,
    pub less_than: Option<Value>,
    #[serde(rename = "in")]
    pub is_in: Option<Vec<Value>>,
    pub not_in: Option<Vec<Value>>,
    pub value: Option<Value>,
    pub and: Option<Vec<RawCondition>>,
    pub or: Option<Vec<RawCondition>>,
}
