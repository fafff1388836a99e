//! GOAP Core - World state and shared types for goal-oriented action planning
//!
//! This crate provides the foundational types used by the planner and executor:
//! - [`WorldState`], a key-unique map of facts used for preconditions, effects and goals
//! - Identifiers for agents and action targets
//! - The [`GoapError`] configuration error type

pub mod error;
pub mod types;
pub mod world_state;

pub use error::{GoapError, Result};
pub use types::{AgentId, TargetId};
pub use world_state::{WorldState, WorldStateKey, WorldValue};
