//! Woodcutter simulation — one lumberjack, a shed of axes, and a forest

pub mod actions;
pub mod forest;
pub mod lumberjack;

use glam::Vec2;
use goap_agent::{GoapExecutor, TickOutcome};
use goap_core::AgentId;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::settings::SimSettings;
use actions::lumberjack_catalog;
use forest::Forest;
use lumberjack::Lumberjack;

/// Totals at the end of a run
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub ticks: u32,
    pub logs_delivered: u32,
    pub plans_completed: u32,
    pub plans_aborted: u32,
    pub axes_left: u32,
    pub logs_standing: u32,
}

/// Run the simulation for the configured number of ticks
pub fn run(settings: &SimSettings) -> goap_core::Result<Report> {
    let sim = &settings.simulation;
    let catalog = lumberjack_catalog(sim)?;

    let mut rng = StdRng::seed_from_u64(sim.seed);
    let forest = Forest::generate(&mut rng, sim.trees, sim.logs_per_tree, sim.axes, sim.forest_radius);

    let mut agent = Lumberjack {
        id: AgentId::new(),
        name: "lumberjack".into(),
        position: Vec2::ZERO,
        speed: sim.speed,
        reach: sim.reach,
        delta: sim.delta,
        has_axe: false,
        carried_logs: 0,
        forest,
        rng,
        axe_break_chance: sim.axe_break_chance,
        plans_aborted: 0,
        plans_completed: 0,
    };
    let mut executor = GoapExecutor::with_config(catalog.instantiate(), settings.planner.clone());

    let mut ticks = 0;
    for tick in 0..sim.ticks {
        ticks = tick + 1;
        let outcome = executor.tick(&mut agent);
        debug!(agent = %agent.id, tick, ?outcome);
        if outcome == TickOutcome::NoPlan && !agent.forest.has_standing_trees() && agent.carried_logs == 0 {
            info!(tick, "forest cleared");
            break;
        }
    }

    Ok(Report {
        ticks,
        logs_delivered: agent.forest.pile.logs,
        plans_completed: agent.plans_completed,
        plans_aborted: agent.plans_aborted,
        axes_left: agent.forest.shed.axes,
        logs_standing: agent.forest.trees.iter().map(|t| t.logs).sum(),
    })
}
