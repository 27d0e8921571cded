//! Session-scoped story state driving conditions and branching.

use rustc_hash::FxHashMap;

use crate::schema::value::Value;

/// Key-value store of story variables. Writes overwrite unconditionally —
/// no type checking between the old and new value — and there is no
/// deletion; the store lives for the whole session.
#[derive(Debug, Clone, Default)]
pub struct VariableStore {
    values: FxHashMap<String, Value>,
}

impl VariableStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Read with a caller-supplied default for absent names.
    pub fn get_or<'a>(&'a self, name: &str, default: &'a Value) -> &'a Value {
        self.values.get(name).unwrap_or(default)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }
}
