//! The runtime half of an action

use crate::action::ActionRecord;

/// Imperative behavior behind a declared action.
///
/// One implementation per kind of action (chop a tree, pick up an axe, ...).
/// A behavior value belongs to exactly one agent, so it may keep mutable
/// per-attempt state such as counters or cached subgoal data; that state must
/// be cleared in [`Behavior::reset`].
///
/// All methods are called from a per-tick loop and must not block. Long work
/// is spread across ticks by returning `false` from [`Behavior::is_done`]
/// until it completes.
pub trait Behavior<A> {
    /// Clear behavior-local transient state before a new attempt.
    ///
    /// Called exactly once per [`ActionInstance::do_reset`](crate::ActionInstance::do_reset),
    /// after the record's target and range flag have been cleared.
    fn reset(&mut self);

    /// Has the work of the current attempt completed?
    ///
    /// Must eventually return true while `perform` keeps succeeding, or the
    /// executor will keep ticking this action forever.
    fn is_done(&self) -> bool;

    /// Runtime eligibility check beyond the static preconditions.
    ///
    /// Typically binds the target, e.g. by finding the nearest tree.
    /// Returning false invalidates the whole plan.
    fn check_procedural_precondition(&mut self, agent: &A, record: &mut ActionRecord) -> bool;

    /// Run one step of the action.
    ///
    /// Returning false signals unrecoverable failure: the remaining plan is
    /// abandoned and the agent replans from its current world state.
    fn perform(&mut self, agent: &mut A, record: &ActionRecord) -> bool;

    /// Does the agent need to be near the record's target before `perform`?
    fn requires_in_range(&self) -> bool;
}
