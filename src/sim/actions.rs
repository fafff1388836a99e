//! Lumberjack actions

use goap_agent::{ActionCatalog, ActionDef, ActionRecord, Behavior};
use goap_core::Result;
use rand::Rng;
use tracing::debug;

use super::lumberjack::Lumberjack;
use crate::settings::SimulationSettings;

/// Fetch an axe from the tool shed
#[derive(Default)]
pub struct PickUpAxe {
    done: bool,
}

impl Behavior<Lumberjack> for PickUpAxe {
    fn reset(&mut self) {
        self.done = false;
    }

    fn is_done(&self) -> bool {
        self.done
    }

    fn check_procedural_precondition(&mut self, agent: &Lumberjack, record: &mut ActionRecord) -> bool {
        record.set_target(Some(agent.forest.shed.id));
        agent.forest.shed.axes > 0
    }

    fn perform(&mut self, agent: &mut Lumberjack, _record: &ActionRecord) -> bool {
        if agent.forest.shed.axes == 0 {
            // someone else got there first
            return false;
        }
        agent.forest.shed.axes -= 1;
        agent.has_axe = true;
        self.done = true;
        true
    }

    fn requires_in_range(&self) -> bool {
        true
    }
}

/// Chop a log from the nearest tree. Takes several strokes and may break the axe.
pub struct ChopTree {
    strokes: u32,
    strokes_needed: u32,
    done: bool,
}

impl ChopTree {
    pub fn new(strokes_needed: u32) -> Self {
        Self {
            strokes: 0,
            strokes_needed: strokes_needed.max(1),
            done: false,
        }
    }
}

impl Behavior<Lumberjack> for ChopTree {
    fn reset(&mut self) {
        self.strokes = 0;
        self.done = false;
    }

    fn is_done(&self) -> bool {
        self.done
    }

    fn check_procedural_precondition(&mut self, agent: &Lumberjack, record: &mut ActionRecord) -> bool {
        let tree = agent.forest.nearest_tree(agent.position).map(|t| t.id);
        record.set_target(tree);
        tree.is_some()
    }

    fn perform(&mut self, agent: &mut Lumberjack, record: &ActionRecord) -> bool {
        if !agent.has_axe {
            return false;
        }
        let chance = agent.axe_break_chance;
        if agent.rng.gen::<f32>() < chance {
            debug!(agent = %agent.name, "axe broke");
            agent.has_axe = false;
            return false;
        }

        self.strokes += 1;
        if self.strokes < self.strokes_needed {
            return true;
        }

        let Some(tree) = record.target().and_then(|id| agent.forest.tree_mut(id)) else {
            return false;
        };
        if tree.logs == 0 {
            return false;
        }
        tree.logs -= 1;
        agent.carried_logs += 1;
        self.done = true;
        true
    }

    fn requires_in_range(&self) -> bool {
        true
    }
}

/// Gather fallen branches by hand. Slow, but needs no axe.
pub struct CollectBranches {
    ticks: u32,
    ticks_needed: u32,
    done: bool,
}

impl CollectBranches {
    pub fn new(ticks_needed: u32) -> Self {
        Self {
            ticks: 0,
            ticks_needed: ticks_needed.max(1),
            done: false,
        }
    }
}

impl Behavior<Lumberjack> for CollectBranches {
    fn reset(&mut self) {
        self.ticks = 0;
        self.done = false;
    }

    fn is_done(&self) -> bool {
        self.done
    }

    fn check_procedural_precondition(&mut self, agent: &Lumberjack, record: &mut ActionRecord) -> bool {
        let tree = agent.forest.nearest_tree(agent.position).map(|t| t.id);
        record.set_target(tree);
        tree.is_some()
    }

    fn perform(&mut self, agent: &mut Lumberjack, record: &ActionRecord) -> bool {
        self.ticks += 1;
        if self.ticks < self.ticks_needed {
            return true;
        }
        let Some(tree) = record.target().and_then(|id| agent.forest.tree_mut(id)) else {
            return false;
        };
        if tree.logs == 0 {
            return false;
        }
        tree.logs -= 1;
        agent.carried_logs += 1;
        self.done = true;
        true
    }

    fn requires_in_range(&self) -> bool {
        true
    }
}

/// Put carried logs on the pile
#[derive(Default)]
pub struct DropOffLogs {
    done: bool,
}

impl Behavior<Lumberjack> for DropOffLogs {
    fn reset(&mut self) {
        self.done = false;
    }

    fn is_done(&self) -> bool {
        self.done
    }

    fn check_procedural_precondition(&mut self, agent: &Lumberjack, record: &mut ActionRecord) -> bool {
        record.set_target(Some(agent.forest.pile.id));
        true
    }

    fn perform(&mut self, agent: &mut Lumberjack, _record: &ActionRecord) -> bool {
        agent.forest.pile.logs += agent.carried_logs;
        agent.carried_logs = 0;
        self.done = true;
        true
    }

    fn requires_in_range(&self) -> bool {
        true
    }
}

/// Everything a lumberjack knows how to do
pub fn lumberjack_catalog(settings: &SimulationSettings) -> Result<ActionCatalog<Lumberjack>> {
    let mut catalog = ActionCatalog::new();

    catalog.register(
        ActionDef::new("pick_up_axe")
            .with_precondition("has_axe", false)
            .with_precondition("axe_available", true)
            .with_effect("has_axe", true)
            .with_cost(2.0)?,
        PickUpAxe::default,
    )?;

    let strokes = settings.chop_strokes;
    catalog.register(
        ActionDef::new("chop_tree")
            .with_precondition("has_axe", true)
            .with_precondition("has_logs", false)
            .with_precondition("trees_standing", true)
            .with_effect("has_logs", true)
            .with_cost(4.0)?,
        move || ChopTree::new(strokes),
    )?;

    let branch_ticks = settings.branch_ticks;
    catalog.register(
        ActionDef::new("collect_branches")
            .with_precondition("has_logs", false)
            .with_precondition("trees_standing", true)
            .with_effect("has_logs", true)
            .with_cost(8.0)?,
        move || CollectBranches::new(branch_ticks),
    )?;

    catalog.register(
        ActionDef::new("drop_off_logs")
            .with_precondition("has_logs", true)
            .with_effect("has_logs", false)
            .with_effect("logs_delivered", true),
        DropOffLogs::default,
    )?;

    Ok(catalog)
}
