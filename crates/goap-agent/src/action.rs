//! GOAP action definitions and per-agent action instances
//!
//! An action is split in two. [`ActionDef`] is the static declaration the
//! planner reads (preconditions, effects, cost) and may be shared between
//! agents. [`ActionInstance`] pairs a shared definition with the mutable,
//! per-agent pieces: the [`ActionRecord`] (target, range flag) and the
//! [`Behavior`] that does the actual work.

use std::fmt;
use std::sync::Arc;

use goap_core::{GoapError, Result, TargetId, WorldState, WorldStateKey, WorldValue};
use tracing::debug;

use crate::behavior::Behavior;

/// Cost assigned to actions that do not set one
pub const DEFAULT_COST: f32 = 1.0;

/// Something an agent can do to change world state
#[derive(Debug, Clone, PartialEq)]
pub struct ActionDef {
    name: String,
    preconditions: WorldState,
    effects: WorldState,
    cost: f32,
}

impl ActionDef {
    /// Create an action with no preconditions, no effects and the default cost.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            preconditions: WorldState::new(),
            effects: WorldState::new(),
            cost: DEFAULT_COST,
        }
    }

    pub fn with_precondition(
        mut self,
        key: impl Into<WorldStateKey>,
        value: impl Into<WorldValue>,
    ) -> Self {
        self.add_precondition(key, value);
        self
    }

    pub fn with_effect(mut self, key: impl Into<WorldStateKey>, value: impl Into<WorldValue>) -> Self {
        self.add_effect(key, value);
        self
    }

    pub fn with_cost(mut self, cost: f32) -> Result<Self> {
        self.set_cost(cost)?;
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn preconditions(&self) -> &WorldState {
        &self.preconditions
    }

    pub fn effects(&self) -> &WorldState {
        &self.effects
    }

    pub fn cost(&self) -> f32 {
        self.cost
    }

    /// Set the planning cost. Lower-cost sequences are preferred by the planner.
    pub fn set_cost(&mut self, cost: f32) -> Result<()> {
        if !cost.is_finite() || cost < 0.0 {
            return Err(GoapError::InvalidCost {
                action: self.name.clone(),
                cost,
            });
        }
        self.cost = cost;
        Ok(())
    }

    /// Insert or replace the precondition for `key`.
    pub fn add_precondition(&mut self, key: impl Into<WorldStateKey>, value: impl Into<WorldValue>) {
        self.preconditions.set(key, value);
    }

    /// Remove the precondition for `key`, returning its value.
    ///
    /// Removing a key that was never added is a setup bug and fails with
    /// [`GoapError::MissingPrecondition`].
    pub fn remove_precondition(&mut self, key: &str) -> Result<WorldValue> {
        self.preconditions
            .remove(key)
            .ok_or_else(|| GoapError::MissingPrecondition {
                action: self.name.clone(),
                key: key.to_string(),
            })
    }

    /// Insert or replace the effect for `key`.
    pub fn add_effect(&mut self, key: impl Into<WorldStateKey>, value: impl Into<WorldValue>) {
        self.effects.set(key, value);
    }

    /// Remove the effect for `key`, returning its value.
    pub fn remove_effect(&mut self, key: &str) -> Result<WorldValue> {
        self.effects.remove(key).ok_or_else(|| GoapError::MissingEffect {
            action: self.name.clone(),
            key: key.to_string(),
        })
    }

    /// Whether the static preconditions hold in `state`
    pub fn is_applicable(&self, state: &WorldState) -> bool {
        state.satisfies(&self.preconditions)
    }

    /// Project the effects onto `state`, assuming the action succeeds
    pub fn apply_to(&self, state: &mut WorldState) {
        state.apply(&self.effects);
    }
}

impl AsRef<ActionDef> for ActionDef {
    fn as_ref(&self) -> &ActionDef {
        self
    }
}

/// Per-attempt execution state of one action for one agent
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActionRecord {
    target: Option<TargetId>,
    in_range: bool,
}

impl ActionRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// The game object this action operates on, if one has been bound
    pub fn target(&self) -> Option<TargetId> {
        self.target
    }

    pub fn set_target(&mut self, target: Option<TargetId>) {
        self.target = target;
    }

    /// Are we in range of the target? Set by the movement collaborator.
    pub fn is_in_range(&self) -> bool {
        self.in_range
    }

    pub fn set_in_range(&mut self, in_range: bool) {
        self.in_range = in_range;
    }

    /// Forget the target and range flag
    pub fn clear(&mut self) {
        self.target = None;
        self.in_range = false;
    }
}

/// An action as owned by a single agent: shared definition, private record
/// and behavior. Built once and reused across planning cycles.
pub struct ActionInstance<A> {
    def: Arc<ActionDef>,
    record: ActionRecord,
    behavior: Box<dyn Behavior<A>>,
}

impl<A> ActionInstance<A> {
    pub fn new(def: Arc<ActionDef>, behavior: Box<dyn Behavior<A>>) -> Self {
        Self {
            def,
            record: ActionRecord::new(),
            behavior,
        }
    }

    /// Convenience constructor for an unshared definition
    pub fn from_def(def: ActionDef, behavior: impl Behavior<A> + 'static) -> Self {
        Self::new(Arc::new(def), Box::new(behavior))
    }

    pub fn def(&self) -> &ActionDef {
        &self.def
    }

    /// Shared handle to the definition
    pub fn shared_def(&self) -> &Arc<ActionDef> {
        &self.def
    }

    pub fn name(&self) -> &str {
        self.def.name()
    }

    pub fn cost(&self) -> f32 {
        self.def.cost()
    }

    pub fn record(&self) -> &ActionRecord {
        &self.record
    }

    /// Borrow the definition and the mutable record at the same time
    pub fn split_mut(&mut self) -> (&ActionDef, &mut ActionRecord) {
        (&self.def, &mut self.record)
    }

    pub fn target(&self) -> Option<TargetId> {
        self.record.target()
    }

    pub fn is_in_range(&self) -> bool {
        self.record.is_in_range()
    }

    pub fn set_in_range(&mut self, in_range: bool) {
        self.record.set_in_range(in_range);
    }

    /// Start a fresh attempt: clear range and target, then the behavior's own state.
    pub fn do_reset(&mut self) {
        debug!(action = self.def.name(), "reset");
        self.record.clear();
        self.behavior.reset();
    }

    pub fn is_done(&self) -> bool {
        self.behavior.is_done()
    }

    pub fn requires_in_range(&self) -> bool {
        self.behavior.requires_in_range()
    }

    pub fn check_procedural_precondition(&mut self, agent: &A) -> bool {
        self.behavior
            .check_procedural_precondition(agent, &mut self.record)
    }

    pub fn perform(&mut self, agent: &mut A) -> bool {
        self.behavior.perform(agent, &self.record)
    }
}

impl<A> AsRef<ActionDef> for ActionInstance<A> {
    fn as_ref(&self) -> &ActionDef {
        &self.def
    }
}

impl<A> fmt::Debug for ActionInstance<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionInstance")
            .field("def", &self.def)
            .field("record", &self.record)
            .finish_non_exhaustive()
    }
}
