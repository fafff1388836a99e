//! A* GOAP planner — searches action space to find a plan that reaches a goal
//!
//! The planner only reads an action's preconditions, effects and cost. It
//! assumes every action's effects take hold, even though `perform` may fail at
//! runtime; the executor deals with that by replanning.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use goap_core::WorldState;
use tracing::{debug, trace};

use crate::action::ActionDef;
use crate::config::PlannerConfig;
use crate::goal::Goal;

/// A node in the A* search
#[derive(Debug)]
struct PlanNode {
    /// World state after applying actions so far
    state: WorldState,
    /// Indices of actions taken to reach this state
    actions: Vec<usize>,
    /// Actual cost so far (g)
    cost: f32,
    /// Estimated total cost (f = g + h)
    estimated_total: f32,
}

impl PartialEq for PlanNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}
impl Eq for PlanNode {}

impl PartialOrd for PlanNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PlanNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap (BinaryHeap is a max-heap).
        // Ties: fewer steps first, then earlier-registered actions first.
        other
            .estimated_total
            .total_cmp(&self.estimated_total)
            .then_with(|| other.actions.len().cmp(&self.actions.len()))
            .then_with(|| other.actions.cmp(&self.actions))
    }
}

#[derive(Debug, Clone, Default)]
pub struct GoapPlanner {
    config: PlannerConfig,
}

impl GoapPlanner {
    pub fn new(config: PlannerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Find the cheapest sequence of actions that transforms `current_state`
    /// into one that satisfies the goal's `desired_state`.
    ///
    /// Returns action indices into `available_actions`, an empty plan if the
    /// goal already holds, or None if no plan exists within the search limits.
    pub fn plan<T: AsRef<ActionDef>>(
        &self,
        current_state: &WorldState,
        goal: &Goal,
        available_actions: &[T],
    ) -> Option<Vec<usize>> {
        if current_state.satisfies(&goal.desired_state) {
            return Some(Vec::new()); // already satisfied
        }

        // Any unsatisfied state needs at least one more action, so the
        // cheapest action cost never overestimates the remaining cost.
        let min_cost = available_actions
            .iter()
            .map(|a| a.as_ref().cost())
            .min_by(|a, b| a.total_cmp(b))
            .unwrap_or(0.0);
        let heuristic = |state: &WorldState| {
            if state.satisfies(&goal.desired_state) {
                0.0
            } else {
                min_cost
            }
        };

        let mut open = BinaryHeap::new();
        // Expanded states with the depth they were reached at. A state is only
        // skipped when it was already expanded at the same or a smaller depth,
        // so a shorter path can still fit under `max_plan_length`.
        let mut closed: Vec<(WorldState, usize)> = Vec::new();
        let is_closed = |closed: &[(WorldState, usize)], state: &WorldState, depth: usize| {
            closed.iter().any(|(s, d)| *d <= depth && s == state)
        };

        open.push(PlanNode {
            state: current_state.clone(),
            actions: Vec::new(),
            cost: 0.0,
            estimated_total: heuristic(current_state),
        });

        let mut iterations = 0;

        while let Some(node) = open.pop() {
            // Check if goal reached
            if node.state.satisfies(&goal.desired_state) {
                debug!(
                    goal = %goal.name,
                    cost = node.cost,
                    steps = node.actions.len(),
                    iterations,
                    "plan found"
                );
                return Some(node.actions);
            }

            let depth = node.actions.len();
            if is_closed(&closed, &node.state, depth) {
                continue;
            }

            iterations += 1;
            if iterations > self.config.max_iterations {
                debug!(goal = %goal.name, "planner iteration limit reached");
                break;
            }

            // Limit plan length
            if depth >= self.config.max_plan_length {
                closed.push((node.state, depth));
                continue;
            }

            for (i, action) in available_actions.iter().enumerate() {
                let action = action.as_ref();
                if !action.is_applicable(&node.state) {
                    continue;
                }

                let mut new_state = node.state.clone();
                action.apply_to(&mut new_state);
                if new_state == node.state || is_closed(&closed, &new_state, depth + 1) {
                    continue;
                }

                let new_cost = node.cost + action.cost();
                let mut new_actions = node.actions.clone();
                new_actions.push(i);
                trace!(action = action.name(), cost = new_cost, "expand");

                open.push(PlanNode {
                    estimated_total: new_cost + heuristic(&new_state),
                    state: new_state,
                    actions: new_actions,
                    cost: new_cost,
                });
            }

            closed.push((node.state, depth));
        }

        None // no plan found
    }
}
