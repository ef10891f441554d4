//! Raw caller bindings and the validated bound value set

use crate::core::value::Value;
use std::collections::HashMap;

/// Values supplied by the caller, keyed by parameter name.
///
/// Every name is checked against the command's registry at construction, so
/// a misspelled parameter is an error rather than being silently ignored.
#[derive(Debug, Clone, Default)]
#[must_use]
pub struct Bindings {
    values: Vec<(String, Value)>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a value, replacing any earlier binding of the same name
    pub fn set(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Bind a value only when present
    pub fn set_opt<V: Into<Value>>(mut self, name: impl Into<String>, value: Option<V>) -> Self {
        if let Some(value) = value {
            self.insert(name, value);
        }
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        match self.values.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.values.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(|(n, _)| n.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Validated values, one slot per registry entry in declaration order.
///
/// A slot is `None` when the parameter is optional, unbound, and has no
/// default.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundValues {
    slots: Vec<(String, Option<Value>)>,
    index: HashMap<String, usize>,
}

impl BoundValues {
    pub(crate) fn from_slots(slots: Vec<(String, Option<Value>)>) -> Self {
        let index = slots
            .iter()
            .enumerate()
            .map(|(i, (name, _))| (name.clone(), i))
            .collect();
        Self { slots, index }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.index
            .get(name)
            .and_then(|&i| self.slots[i].1.as_ref())
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_replaces_earlier_binding() {
        let bindings = Bindings::new().set("dbtype", 1).set("dbtype", 2);
        assert_eq!(bindings.get("dbtype"), Some(&Value::Integer(2)));
        assert_eq!(bindings.names().count(), 1);
    }

    #[test]
    fn test_set_opt_skips_none() {
        let bindings = Bindings::new()
            .set_opt("dbtype", None::<i64>)
            .set_opt("v", Some(3));
        assert!(bindings.get("dbtype").is_none());
        assert_eq!(bindings.get("v"), Some(&Value::Integer(3)));
    }

    #[test]
    fn test_bound_values_lookup() {
        let bound = BoundValues::from_slots(vec![
            ("input".to_string(), Some(Value::from("a.fasta"))),
            ("threads".to_string(), None),
        ]);
        assert_eq!(bound.get("input"), Some(&Value::from("a.fasta")));
        assert!(bound.get("threads").is_none());
        assert!(bound.get("missing").is_none());
        assert_eq!(bound.len(), 2);
    }
}
