use serde::{Deserialize, Serialize};

/// Search limits for [`GoapPlanner`](crate::GoapPlanner).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Maximum number of search nodes expanded before giving up
    pub max_iterations: usize,
    /// Longest action sequence the planner will consider
    pub max_plan_length: usize,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            max_plan_length: 8,
        }
    }
}
