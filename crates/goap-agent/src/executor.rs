//! Per-agent plan execution
//!
//! [`GoapExecutor`] is ticked once per simulation step. It plans when idle,
//! then walks the queued actions through their lifecycle:
//!
//! `Starting` (reset + procedural check) -> `MoveTo` (only if the action
//! requires range) -> `Perform` (until `is_done`) -> next action.
//!
//! Any failure drops the whole queue and the next tick replans.

use std::collections::VecDeque;

use tracing::{debug, info, warn};

use crate::action::ActionInstance;
use crate::agent::Agent;
use crate::config::PlannerConfig;
use crate::goal::Goal;
use crate::planner::GoapPlanner;

/// Where the executor is in the current plan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No plan; the next tick plans
    Idle,
    /// The front action has not been reset and checked yet
    Starting,
    MoveTo,
    Perform,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortReason {
    ProceduralCheckFailed,
    PerformFailed,
}

/// What a single tick did
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// The agent offered no goals
    NoGoal,
    /// Every goal already holds
    GoalSatisfied,
    /// No goal could be planned for
    NoPlan,
    PlanStarted { goal: String, actions: Vec<String> },
    Moving { action: String },
    Performing { action: String },
    ActionCompleted { action: String },
    PlanCompleted { goal: String },
    PlanAborted { action: String, reason: AbortReason },
}

/// Drives one agent's actions. Owns that agent's action instances, so the
/// range flags, targets and behavior state are never shared.
pub struct GoapExecutor<A> {
    actions: Vec<ActionInstance<A>>,
    planner: GoapPlanner,
    queue: VecDeque<usize>,
    goal: Option<Goal>,
    phase: Phase,
}

impl<A: Agent> GoapExecutor<A> {
    pub fn new(actions: Vec<ActionInstance<A>>) -> Self {
        Self::with_config(actions, PlannerConfig::default())
    }

    pub fn with_config(actions: Vec<ActionInstance<A>>, config: PlannerConfig) -> Self {
        Self {
            actions,
            planner: GoapPlanner::new(config),
            queue: VecDeque::new(),
            goal: None,
            phase: Phase::Idle,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn actions(&self) -> &[ActionInstance<A>] {
        &self.actions
    }

    pub fn action(&self, name: &str) -> Option<&ActionInstance<A>> {
        self.actions.iter().find(|a| a.name() == name)
    }

    /// Goal of the plan being executed
    pub fn current_goal(&self) -> Option<&Goal> {
        self.goal.as_ref()
    }

    /// Get the name of the currently executing action
    pub fn current_action(&self) -> Option<&str> {
        let idx = self.queue.front()?;
        Some(self.actions[*idx].name())
    }

    /// Names of the actions still queued, current one first
    pub fn remaining_plan(&self) -> Vec<&str> {
        self.queue.iter().map(|&i| self.actions[i].name()).collect()
    }

    /// Drop the current plan; the next tick replans.
    pub fn abort(&mut self) {
        if !self.queue.is_empty() {
            debug!("plan cancelled");
        }
        self.clear_plan();
    }

    /// Advance by one tick
    pub fn tick(&mut self, agent: &mut A) -> TickOutcome {
        if self.phase == Phase::Idle {
            return self.start_plan(agent);
        }

        let Some(&idx) = self.queue.front() else {
            self.clear_plan();
            return self.start_plan(agent);
        };

        if self.phase == Phase::Starting {
            let action = &mut self.actions[idx];
            action.do_reset();
            if !action.check_procedural_precondition(agent) {
                return self.abort_plan(agent, idx, AbortReason::ProceduralCheckFailed);
            }
            self.phase = if action.requires_in_range() {
                Phase::MoveTo
            } else {
                Phase::Perform
            };
        }

        let action = &mut self.actions[idx];

        if self.phase == Phase::MoveTo {
            if !action.is_in_range() {
                let (def, record) = action.split_mut();
                agent.move_agent(def, record);
            }
            if !action.is_in_range() {
                return TickOutcome::Moving {
                    action: action.name().to_string(),
                };
            }
            debug!(action = action.name(), "in range");
            self.phase = Phase::Perform;
        }

        if action.is_done() {
            return self.complete_action(agent, idx);
        }

        if action.requires_in_range() && !action.is_in_range() {
            // Range was lost after arriving; move again before performing.
            self.phase = Phase::MoveTo;
            return TickOutcome::Moving {
                action: action.name().to_string(),
            };
        }

        if !action.perform(agent) {
            return self.abort_plan(agent, idx, AbortReason::PerformFailed);
        }

        if action.is_done() {
            return self.complete_action(agent, idx);
        }

        TickOutcome::Performing {
            action: action.name().to_string(),
        }
    }

    /// Select highest priority unsatisfied goal and run the planner
    fn start_plan(&mut self, agent: &mut A) -> TickOutcome {
        let state = agent.world_state();
        let mut goals = agent.goals();
        if goals.is_empty() {
            return TickOutcome::NoGoal;
        }

        // Sort goals by priority (highest first)
        goals.sort_by(|a, b| b.priority.total_cmp(&a.priority));

        let mut all_satisfied = true;
        for goal in goals {
            if goal.is_satisfied_by(&state) {
                continue;
            }
            all_satisfied = false;

            match self.planner.plan(&state, &goal, &self.actions) {
                Some(plan) if !plan.is_empty() => {
                    let names: Vec<&str> = plan.iter().map(|&i| self.actions[i].name()).collect();
                    info!(goal = %goal.name, plan = ?names, "plan found");
                    agent.plan_found(&goal, &names);
                    let actions = names.iter().map(|n| n.to_string()).collect();

                    self.queue = plan.into_iter().collect();
                    self.phase = Phase::Starting;
                    let outcome = TickOutcome::PlanStarted {
                        goal: goal.name.clone(),
                        actions,
                    };
                    self.goal = Some(goal);
                    return outcome;
                }
                Some(_) => {}
                None => {
                    warn!(goal = %goal.name, state = %state, "no plan found");
                    agent.plan_failed(&goal);
                }
            }
        }

        if all_satisfied {
            TickOutcome::GoalSatisfied
        } else {
            TickOutcome::NoPlan
        }
    }

    fn complete_action(&mut self, agent: &mut A, idx: usize) -> TickOutcome {
        self.queue.pop_front();
        let action = &self.actions[idx];
        debug!(action = action.name(), "action done");
        agent.action_finished(action.def());

        if self.queue.is_empty() {
            let goal = self.goal.take();
            self.clear_plan();
            let name = match goal {
                Some(goal) => {
                    info!(goal = %goal.name, "plan completed");
                    agent.actions_finished(&goal);
                    goal.name
                }
                None => String::new(),
            };
            TickOutcome::PlanCompleted { goal: name }
        } else {
            self.phase = Phase::Starting;
            TickOutcome::ActionCompleted {
                action: action.name().to_string(),
            }
        }
    }

    fn abort_plan(&mut self, agent: &mut A, idx: usize, reason: AbortReason) -> TickOutcome {
        let dropped = self.queue.len();
        self.clear_plan();
        let action = &self.actions[idx];
        warn!(action = action.name(), ?reason, dropped, "plan aborted");
        agent.plan_aborted(action.def());
        TickOutcome::PlanAborted {
            action: action.name().to_string(),
            reason,
        }
    }

    fn clear_plan(&mut self) {
        self.queue.clear();
        self.goal = None;
        self.phase = Phase::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{ActionDef, ActionRecord};
    use crate::behavior::Behavior;
    use goap_core::{TargetId, WorldState};
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    /// Minimal agent: a world state, one goal, and a movement counter.
    #[derive(Default)]
    struct TestAgent {
        state: WorldState,
        goals: Vec<Goal>,
        /// Ticks of movement needed before arriving
        travel_ticks: u32,
        moves: u32,
        events: Vec<String>,
    }

    impl Agent for TestAgent {
        fn world_state(&self) -> WorldState {
            self.state.clone()
        }

        fn goals(&self) -> Vec<Goal> {
            self.goals.clone()
        }

        fn move_agent(&mut self, _action: &ActionDef, record: &mut ActionRecord) {
            self.moves += 1;
            if self.moves >= self.travel_ticks {
                record.set_in_range(true);
            }
        }

        fn plan_found(&mut self, goal: &Goal, actions: &[&str]) {
            self.events.push(format!("found {} {:?}", goal.name, actions));
        }

        fn plan_failed(&mut self, goal: &Goal) {
            self.events.push(format!("failed {}", goal.name));
        }

        fn action_finished(&mut self, action: &ActionDef) {
            self.events.push(format!("finished {}", action.name()));
        }

        fn actions_finished(&mut self, goal: &Goal) {
            self.events.push(format!("completed {}", goal.name));
        }

        fn plan_aborted(&mut self, action: &ActionDef) {
            self.events.push(format!("aborted {}", action.name()));
        }
    }

    /// Shared probes so tests can observe a behavior after handing it over
    #[derive(Default, Clone)]
    struct Probe {
        resets: Rc<Cell<u32>>,
        performs: Rc<Cell<u32>>,
        /// `perform` calls seen while the record was out of range
        performs_out_of_range: Rc<Cell<u32>>,
        log: Rc<RefCell<Vec<String>>>,
    }

    /// Works for `steps` ticks then sets `effect` in the agent's state.
    struct Scripted {
        name: &'static str,
        probe: Probe,
        steps: u32,
        done_after: u32,
        in_range: bool,
        check_passes: bool,
        fail_on_perform: bool,
        effect: Option<&'static str>,
    }

    impl Scripted {
        fn new(name: &'static str, probe: &Probe) -> Self {
            Self {
                name,
                probe: probe.clone(),
                steps: 0,
                done_after: 1,
                in_range: false,
                check_passes: true,
                fail_on_perform: false,
                effect: None,
            }
        }
    }

    impl Behavior<TestAgent> for Scripted {
        fn reset(&mut self) {
            self.probe.resets.set(self.probe.resets.get() + 1);
            self.steps = 0;
        }

        fn is_done(&self) -> bool {
            self.steps >= self.done_after
        }

        fn check_procedural_precondition(
            &mut self,
            _agent: &TestAgent,
            record: &mut ActionRecord,
        ) -> bool {
            record.set_target(Some(TargetId::new()));
            self.check_passes
        }

        fn perform(&mut self, agent: &mut TestAgent, record: &ActionRecord) -> bool {
            self.probe.performs.set(self.probe.performs.get() + 1);
            if !record.is_in_range() {
                self.probe
                    .performs_out_of_range
                    .set(self.probe.performs_out_of_range.get() + 1);
            }
            self.probe.log.borrow_mut().push(self.name.to_string());
            if self.fail_on_perform {
                return false;
            }
            self.steps += 1;
            if self.is_done() {
                if let Some(key) = self.effect {
                    agent.state.set_bool(key, true);
                }
            }
            true
        }

        fn requires_in_range(&self) -> bool {
            self.in_range
        }
    }

    fn wood_goal() -> Goal {
        Goal::new("collect_wood", WorldState::from_bool("has_wood", true), 1.0)
    }

    fn chop_def() -> ActionDef {
        ActionDef::new("chop_tree")
            .with_precondition("has_axe", true)
            .with_effect("has_wood", true)
    }

    fn run_until_idle(executor: &mut GoapExecutor<TestAgent>, agent: &mut TestAgent) -> Vec<TickOutcome> {
        let mut outcomes = Vec::new();
        for _ in 0..50 {
            let outcome = executor.tick(agent);
            let finished = matches!(
                outcome,
                TickOutcome::PlanCompleted { .. }
                    | TickOutcome::PlanAborted { .. }
                    | TickOutcome::NoPlan
                    | TickOutcome::NoGoal
                    | TickOutcome::GoalSatisfied
            );
            outcomes.push(outcome);
            if finished {
                break;
            }
        }
        outcomes
    }

    #[test]
    fn chop_wood_waits_for_range() {
        let probe = Probe::default();
        let mut chop = Scripted::new("chop_tree", &probe);
        chop.in_range = true;
        chop.done_after = 3;
        chop.effect = Some("has_wood");

        let mut executor = GoapExecutor::new(vec![ActionInstance::from_def(chop_def(), chop)]);
        let mut agent = TestAgent {
            state: WorldState::new().with("has_axe", true).with("has_wood", false),
            goals: vec![wood_goal()],
            travel_ticks: 3,
            ..Default::default()
        };

        assert_eq!(
            executor.tick(&mut agent),
            TickOutcome::PlanStarted {
                goal: "collect_wood".into(),
                actions: vec!["chop_tree".into()],
            }
        );

        // Two ticks of travel, no perform yet
        for _ in 0..2 {
            assert!(matches!(executor.tick(&mut agent), TickOutcome::Moving { .. }));
            assert_eq!(probe.performs.get(), 0);
        }

        let outcomes = run_until_idle(&mut executor, &mut agent);
        assert_eq!(
            outcomes.last(),
            Some(&TickOutcome::PlanCompleted {
                goal: "collect_wood".into()
            })
        );
        assert_eq!(probe.performs.get(), 3);
        assert_eq!(probe.performs_out_of_range.get(), 0);
        assert_eq!(agent.state, WorldState::new().with("has_axe", true).with("has_wood", true));
        assert_eq!(executor.phase(), Phase::Idle);
    }

    #[test]
    fn failed_perform_abandons_remaining_actions() {
        let probe = Probe::default();
        let mut get_axe = Scripted::new("get_axe", &probe);
        get_axe.fail_on_perform = true;
        let chop = Scripted::new("chop_tree", &probe);

        let mut executor = GoapExecutor::new(vec![
            ActionInstance::from_def(ActionDef::new("get_axe").with_effect("has_axe", true), get_axe),
            ActionInstance::from_def(chop_def(), chop),
        ]);
        let mut agent = TestAgent {
            goals: vec![wood_goal()],
            ..Default::default()
        };

        let outcomes = run_until_idle(&mut executor, &mut agent);
        assert_eq!(
            outcomes.last(),
            Some(&TickOutcome::PlanAborted {
                action: "get_axe".into(),
                reason: AbortReason::PerformFailed,
            })
        );
        assert_eq!(*probe.log.borrow(), vec!["get_axe".to_string()]);
        assert!(executor.remaining_plan().is_empty());
        assert_eq!(executor.phase(), Phase::Idle);
        assert!(agent.events.contains(&"aborted get_axe".to_string()));

        // the next tick replans from the current state
        assert!(matches!(executor.tick(&mut agent), TickOutcome::PlanStarted { .. }));
    }

    #[test]
    fn procedural_check_failure_aborts_before_perform() {
        let probe = Probe::default();
        let mut chop = Scripted::new("chop_tree", &probe);
        chop.check_passes = false;

        let mut executor = GoapExecutor::new(vec![ActionInstance::from_def(chop_def(), chop)]);
        let mut agent = TestAgent {
            state: WorldState::from_bool("has_axe", true),
            goals: vec![wood_goal()],
            ..Default::default()
        };

        executor.tick(&mut agent);
        assert_eq!(
            executor.tick(&mut agent),
            TickOutcome::PlanAborted {
                action: "chop_tree".into(),
                reason: AbortReason::ProceduralCheckFailed,
            }
        );
        assert_eq!(probe.performs.get(), 0);
        assert_eq!(probe.resets.get(), 1);
    }

    #[test]
    fn multi_step_plan_runs_in_order() {
        let probe = Probe::default();
        let mut get_axe = Scripted::new("get_axe", &probe);
        get_axe.effect = Some("has_axe");
        let mut chop = Scripted::new("chop_tree", &probe);
        chop.effect = Some("has_wood");
        chop.done_after = 2;

        let mut executor = GoapExecutor::new(vec![
            ActionInstance::from_def(chop_def(), chop),
            ActionInstance::from_def(ActionDef::new("get_axe").with_effect("has_axe", true), get_axe),
        ]);
        let mut agent = TestAgent {
            goals: vec![wood_goal()],
            ..Default::default()
        };

        let outcomes = run_until_idle(&mut executor, &mut agent);
        assert!(outcomes.contains(&TickOutcome::ActionCompleted {
            action: "get_axe".into()
        }));
        assert_eq!(
            *probe.log.borrow(),
            vec!["get_axe".to_string(), "chop_tree".into(), "chop_tree".into()]
        );
        assert_eq!(
            agent.events,
            vec![
                "found collect_wood [\"get_axe\", \"chop_tree\"]".to_string(),
                "finished get_axe".into(),
                "finished chop_tree".into(),
                "completed collect_wood".into(),
            ]
        );
    }

    #[test]
    fn second_cycle_starts_out_of_range() {
        let probe = Probe::default();
        let mut chop = Scripted::new("chop_tree", &probe);
        chop.in_range = true;

        let mut executor = GoapExecutor::new(vec![ActionInstance::from_def(chop_def(), chop)]);
        let mut agent = TestAgent {
            state: WorldState::from_bool("has_axe", true),
            goals: vec![wood_goal()],
            travel_ticks: 1,
            ..Default::default()
        };

        run_until_idle(&mut executor, &mut agent);
        assert!(executor.action("chop_tree").unwrap().is_in_range());

        // Wood was used up; plan again with the same instance
        agent.state.set_bool("has_wood", false);
        executor.tick(&mut agent);
        assert_eq!(executor.phase(), Phase::Starting);
        assert!(executor.action("chop_tree").unwrap().is_in_range());

        agent.travel_ticks = 100;
        assert!(matches!(executor.tick(&mut agent), TickOutcome::Moving { .. }));
        assert!(!executor.action("chop_tree").unwrap().is_in_range());
        assert_eq!(probe.resets.get(), 2);
        assert_eq!(probe.performs_out_of_range.get(), 0);
    }

    #[test]
    fn satisfied_goal_needs_no_plan() {
        let mut executor: GoapExecutor<TestAgent> = GoapExecutor::new(Vec::new());
        let mut agent = TestAgent {
            state: WorldState::from_bool("has_wood", true),
            goals: vec![wood_goal()],
            ..Default::default()
        };
        assert_eq!(executor.tick(&mut agent), TickOutcome::GoalSatisfied);

        agent.goals.clear();
        assert_eq!(executor.tick(&mut agent), TickOutcome::NoGoal);
    }

    #[test]
    fn unreachable_goal_reports_failure() {
        let probe = Probe::default();
        let chop = Scripted::new("chop_tree", &probe);
        let mut executor = GoapExecutor::new(vec![ActionInstance::from_def(chop_def(), chop)]);
        let mut agent = TestAgent {
            goals: vec![wood_goal()],
            ..Default::default()
        };

        assert_eq!(executor.tick(&mut agent), TickOutcome::NoPlan);
        assert_eq!(agent.events, vec!["failed collect_wood".to_string()]);
    }

    #[test]
    fn higher_priority_goal_planned_first() {
        let probe = Probe::default();
        let mut rest = Scripted::new("rest", &probe);
        rest.effect = Some("rested");
        let mut chop = Scripted::new("chop_tree", &probe);
        chop.effect = Some("has_wood");

        let mut executor = GoapExecutor::new(vec![
            ActionInstance::from_def(chop_def(), chop),
            ActionInstance::from_def(ActionDef::new("rest").with_effect("rested", true), rest),
        ]);
        let mut agent = TestAgent {
            state: WorldState::from_bool("has_axe", true),
            goals: vec![
                wood_goal(),
                Goal::new("recover", WorldState::from_bool("rested", true), 5.0),
            ],
            ..Default::default()
        };

        assert_eq!(
            executor.tick(&mut agent),
            TickOutcome::PlanStarted {
                goal: "recover".into(),
                actions: vec!["rest".into()],
            }
        );
        assert_eq!(executor.current_goal().map(|g| g.name.as_str()), Some("recover"));
    }

    #[test]
    fn abort_clears_queue() {
        let probe = Probe::default();
        let mut chop = Scripted::new("chop_tree", &probe);
        chop.in_range = true;
        let mut executor = GoapExecutor::new(vec![ActionInstance::from_def(chop_def(), chop)]);
        let mut agent = TestAgent {
            state: WorldState::from_bool("has_axe", true),
            goals: vec![wood_goal()],
            travel_ticks: 10,
            ..Default::default()
        };

        executor.tick(&mut agent);
        assert_eq!(executor.current_action(), Some("chop_tree"));
        executor.abort();
        assert_eq!(executor.current_action(), None);
        assert_eq!(executor.phase(), Phase::Idle);
    }
}
