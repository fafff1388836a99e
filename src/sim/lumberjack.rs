//! The lumberjack agent

use glam::Vec2;
use goap_agent::{ActionDef, ActionRecord, Agent, Goal};
use goap_core::{AgentId, WorldState};
use rand::rngs::StdRng;
use tracing::{debug, info};

use super::forest::Forest;

pub struct Lumberjack {
    pub id: AgentId,
    pub name: String,
    pub position: Vec2,
    pub speed: f32,
    /// Distance at which a target counts as in range
    pub reach: f32,
    pub delta: f32,
    pub has_axe: bool,
    pub carried_logs: u32,
    pub forest: Forest,
    pub rng: StdRng,
    /// Chance per chop stroke that the axe breaks
    pub axe_break_chance: f32,
    pub plans_aborted: u32,
    pub plans_completed: u32,
}

impl Lumberjack {
    /// Step toward `target`; returns true once within reach.
    pub fn step_toward(&mut self, target: Vec2) -> bool {
        let to_target = target - self.position;
        let distance = to_target.length();
        if distance <= self.reach {
            return true;
        }
        let step = self.speed * self.delta;
        if step >= distance - self.reach {
            self.position = target - to_target.normalize_or_zero() * self.reach;
            true
        } else {
            self.position += to_target.normalize_or_zero() * step;
            false
        }
    }
}

impl Agent for Lumberjack {
    fn world_state(&self) -> WorldState {
        WorldState::new()
            .with("has_axe", self.has_axe)
            .with("has_logs", self.carried_logs > 0)
            .with("axe_available", self.forest.shed.axes > 0)
            .with("trees_standing", self.forest.has_standing_trees())
            // the pile always wants more
            .with("logs_delivered", false)
    }

    fn goals(&self) -> Vec<Goal> {
        vec![Goal::new(
            "deliver_logs",
            WorldState::from_bool("logs_delivered", true),
            1.0,
        )]
    }

    fn move_agent(&mut self, action: &ActionDef, record: &mut ActionRecord) {
        let Some(target) = record.target().and_then(|id| self.forest.position_of(id)) else {
            // nothing to walk to
            record.set_in_range(true);
            return;
        };
        if self.step_toward(target) {
            debug!(agent = %self.name, id = %self.id, action = action.name(), "arrived");
            record.set_in_range(true);
        }
    }

    fn plan_found(&mut self, goal: &Goal, actions: &[&str]) {
        info!(agent = %self.name, id = %self.id, goal = %goal.name, "plan: {}", actions.join(" -> "));
    }

    fn actions_finished(&mut self, _goal: &Goal) {
        self.plans_completed += 1;
    }

    fn plan_aborted(&mut self, action: &ActionDef) {
        info!(agent = %self.name, id = %self.id, action = action.name(), "replanning");
        self.plans_aborted += 1;
    }
}
