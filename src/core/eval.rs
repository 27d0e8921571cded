//! Condition evaluation against the variable store.
//!
//! Deterministic and side-effect-free: the same condition and store always
//! produce the same answer, and nothing is written.

use std::cmp::Ordering;

use crate::core::variables::VariableStore;
use crate::schema::condition::{Comparator, Condition, Leaf};

/// Evaluate an optional condition. Absence means always true.
pub fn evaluate(condition: Option<&Condition>, vars: &VariableStore) -> bool {
    condition.map_or(true, |c| eval_node(c, vars))
}

fn eval_node(condition: &Condition, vars: &VariableStore) -> bool {
    match condition {
        Condition::Always => true,
        Condition::Leaf(leaf) => eval_leaf(leaf, vars),
        Condition::All { terms, own } => {
            terms.iter().all(|t| eval_node(t, vars))
                && own.as_ref().map_or(true, |l| eval_leaf(l, vars))
        }
        Condition::Any { terms, own } => {
            terms.iter().any(|t| eval_node(t, vars))
                || own.as_ref().map_or(false, |l| eval_leaf(l, vars))
        }
    }
}

fn eval_leaf(leaf: &Leaf, vars: &VariableStore) -> bool {
    let actual = vars.get(&leaf.variable);
    match &leaf.test {
        Comparator::Equals(expected) => actual.map_or(false, |a| a.loose_eq(expected)),
        Comparator::NotEquals(expected) => actual.map_or(true, |a| !a.loose_eq(expected)),
        Comparator::GreaterThan(expected) => {
            actual.and_then(|a| a.loose_cmp(expected)) == Some(Ordering::Greater)
        }
        Comparator::LessThan(expected) => {
            actual.and_then(|a| a.loose_cmp(expected)) == Some(Ordering::Less)
        }
        Comparator::In(values) => {
            actual.map_or(false, |a| values.iter().any(|v| a.loose_eq(v)))
        }
        Comparator::NotIn(values) => {
            actual.map_or(true, |a| !values.iter().any(|v| a.loose_eq(v)))
        }
        Comparator::Unset => actual.is_none(),
    }
}
