//! The agent-side surface the executor drives

use goap_core::WorldState;

use crate::action::{ActionDef, ActionRecord};
use crate::goal::Goal;

/// Data provider and movement collaborator for a [`GoapExecutor`](crate::GoapExecutor).
///
/// The agent owns its position, perception and knowledge; the executor only
/// asks it for the current world state and goals, and tells it what happened.
pub trait Agent {
    /// Current knowledge of the world, used as the planning start state
    fn world_state(&self) -> WorldState;

    /// Goals to pursue. Tried in descending priority.
    fn goals(&self) -> Vec<Goal>;

    /// Move toward the record's target for one tick.
    ///
    /// Call `record.set_in_range(true)` once positioned. This is the only
    /// place the range flag gets set.
    fn move_agent(&mut self, action: &ActionDef, record: &mut ActionRecord);

    fn plan_found(&mut self, _goal: &Goal, _actions: &[&str]) {}

    /// No plan reaches `goal` from the current state
    fn plan_failed(&mut self, _goal: &Goal) {}

    fn action_finished(&mut self, _action: &ActionDef) {}

    /// Every action of the plan completed
    fn actions_finished(&mut self, _goal: &Goal) {}

    /// `action` failed and the remaining plan was thrown away
    fn plan_aborted(&mut self, _action: &ActionDef) {}
}
