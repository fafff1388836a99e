//! GOAP Agent - Goal Oriented Action Planning for agents
//!
//! Provides the action primitive (declarative preconditions and effects plus
//! a runtime [`Behavior`]), an A* planner over action definitions, a shared
//! [`ActionCatalog`], and a per-agent [`GoapExecutor`] that runs plans tick by tick.

pub mod action;
pub mod agent;
pub mod behavior;
pub mod catalog;
pub mod config;
pub mod executor;
pub mod goal;
pub mod planner;

pub use action::{ActionDef, ActionInstance, ActionRecord, DEFAULT_COST};
pub use agent::Agent;
pub use behavior::Behavior;
pub use catalog::ActionCatalog;
pub use config::PlannerConfig;
pub use executor::{AbortReason, GoapExecutor, Phase, TickOutcome};
pub use goal::Goal;
pub use planner::GoapPlanner;

pub use goap_core::{GoapError, TargetId, WorldState, WorldValue};
