//! GOAP goal definitions

use goap_core::WorldState;
use serde::{Deserialize, Serialize};

/// A desired world state change with priority
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub name: String,
    pub desired_state: WorldState,
    pub priority: f32,
}

impl Goal {
    pub fn new(name: impl Into<String>, desired_state: WorldState, priority: f32) -> Self {
        Self {
            name: name.into(),
            desired_state,
            priority,
        }
    }

    /// Whether `state` already satisfies this goal
    pub fn is_satisfied_by(&self, state: &WorldState) -> bool {
        state.satisfies(&self.desired_state)
    }
}
