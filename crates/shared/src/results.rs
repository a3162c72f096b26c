use std::collections::{btree_map, BTreeMap};

use serde_json::Value;

use crate::domain::AgentKind;

/// Latest decoded payload per agent kind. A newer result for a kind replaces the older one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultsTable {
    entries: BTreeMap<AgentKind, Value>,
}

impl ResultsTable {
    pub fn get(&self, kind: AgentKind) -> Option<&Value> {
        self.entries.get(&kind)
    }

    pub fn insert(&mut self, kind: AgentKind, payload: Value) -> Option<Value> {
        self.entries.insert(kind, payload)
    }

    /// Drops every entry and keeps exactly `results`.
    pub fn replace_all(&mut self, results: impl IntoIterator<Item = (AgentKind, Value)>) {
        self.entries = results.into_iter().collect();
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn kinds(&self) -> impl Iterator<Item = AgentKind> + '_ {
        self.entries.keys().copied()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, AgentKind, Value> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a ResultsTable {
    type Item = (&'a AgentKind, &'a Value);
    type IntoIter = btree_map::Iter<'a, AgentKind, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
