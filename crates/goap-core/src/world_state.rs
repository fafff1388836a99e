//! World state representation for GOAP planning
//!
//! A [`WorldState`] maps fact names to values. The same type describes the
//! agent's current knowledge, an action's preconditions, an action's effects,
//! and a goal's desired state. Keys are unique: setting a key that already
//! exists replaces its value.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Name of a fact about the world, e.g. `"has_axe"`.
pub type WorldStateKey = String;

/// A single fact value. The planner only ever compares values for equality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WorldValue {
    Bool(bool),
    Int(i64),
    Float(f32),
    /// Symbolic identifier or enum tag
    Ident(String),
}

impl fmt::Display for WorldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorldValue::Bool(v) => write!(f, "{}", v),
            WorldValue::Int(v) => write!(f, "{}", v),
            WorldValue::Float(v) => write!(f, "{}", v),
            WorldValue::Ident(v) => write!(f, "{}", v),
        }
    }
}

impl From<bool> for WorldValue {
    fn from(v: bool) -> Self {
        WorldValue::Bool(v)
    }
}

impl From<i64> for WorldValue {
    fn from(v: i64) -> Self {
        WorldValue::Int(v)
    }
}

impl From<i32> for WorldValue {
    fn from(v: i32) -> Self {
        WorldValue::Int(v as i64)
    }
}

impl From<f32> for WorldValue {
    fn from(v: f32) -> Self {
        WorldValue::Float(v)
    }
}

impl From<&str> for WorldValue {
    fn from(v: &str) -> Self {
        WorldValue::Ident(v.to_string())
    }
}

impl From<String> for WorldValue {
    fn from(v: String) -> Self {
        WorldValue::Ident(v)
    }
}

/// Set of facts describing a world state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorldState {
    facts: HashMap<WorldStateKey, WorldValue>,
}

impl WorldState {
    pub fn new() -> Self {
        Self {
            facts: HashMap::new(),
        }
    }

    /// Create a WorldState with a single bool fact
    pub fn from_bool(key: &str, val: bool) -> Self {
        let mut ws = Self::new();
        ws.set_bool(key, val);
        ws
    }

    /// Builder form of [`WorldState::set`]
    pub fn with(mut self, key: impl Into<WorldStateKey>, val: impl Into<WorldValue>) -> Self {
        self.set(key, val);
        self
    }

    /// Insert or replace the value for `key`. Returns the replaced value, if any.
    pub fn set(
        &mut self,
        key: impl Into<WorldStateKey>,
        val: impl Into<WorldValue>,
    ) -> Option<WorldValue> {
        self.facts.insert(key.into(), val.into())
    }

    pub fn get(&self, key: &str) -> Option<&WorldValue> {
        self.facts.get(key)
    }

    /// Remove the entry for `key`, returning its value if it was present.
    pub fn remove(&mut self, key: &str) -> Option<WorldValue> {
        self.facts.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.facts.contains_key(key)
    }

    pub fn set_bool(&mut self, key: &str, val: bool) {
        self.facts.insert(key.to_string(), WorldValue::Bool(val));
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.facts.get(key) {
            Some(WorldValue::Bool(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn set_float(&mut self, key: &str, val: f32) {
        self.facts.insert(key.to_string(), WorldValue::Float(val));
    }

    pub fn get_float(&self, key: &str) -> Option<f32> {
        match self.facts.get(key) {
            Some(WorldValue::Float(v)) => Some(*v),
            _ => None,
        }
    }

    /// Check if all facts in `required` are satisfied by this state.
    /// Missing facts are treated as not satisfied.
    pub fn satisfies(&self, required: &WorldState) -> bool {
        required
            .facts
            .iter()
            .all(|(key, required_val)| self.facts.get(key) == Some(required_val))
    }

    /// Count unsatisfied facts compared to `required`
    pub fn unsatisfied_count(&self, required: &WorldState) -> usize {
        required
            .facts
            .iter()
            .filter(|(key, required_val)| self.facts.get(*key) != Some(*required_val))
            .count()
    }

    /// Apply effects: merge all facts from `effects` into this state
    pub fn apply(&mut self, effects: &WorldState) {
        for (key, val) in &effects.facts {
            self.facts.insert(key.clone(), val.clone());
        }
    }

    /// Iterate over all facts in no particular order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &WorldValue)> {
        self.facts.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of facts
    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }
}

impl<K: Into<WorldStateKey>, V: Into<WorldValue>> FromIterator<(K, V)> for WorldState {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut ws = Self::new();
        for (k, v) in iter {
            ws.set(k, v);
        }
        ws
    }
}

impl fmt::Display for WorldState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&String> = self.facts.keys().collect();
        keys.sort();
        write!(f, "{{")?;
        for (i, key) in keys.into_iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", key, self.facts[key])?;
        }
        write!(f, "}}")
    }
}
