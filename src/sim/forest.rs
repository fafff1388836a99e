//! The woodcutter's world: a tool shed, a log pile, and some trees

use glam::Vec2;
use goap_core::TargetId;
use rand::Rng;

#[derive(Debug, Clone)]
pub struct Tree {
    pub id: TargetId,
    pub position: Vec2,
    pub logs: u32,
}

#[derive(Debug, Clone)]
pub struct ToolShed {
    pub id: TargetId,
    pub position: Vec2,
    pub axes: u32,
}

#[derive(Debug, Clone)]
pub struct LogPile {
    pub id: TargetId,
    pub position: Vec2,
    pub logs: u32,
}

#[derive(Debug, Clone)]
pub struct Forest {
    pub shed: ToolShed,
    pub pile: LogPile,
    pub trees: Vec<Tree>,
}

impl Forest {
    /// Shed and pile near the origin, trees scattered within `radius`.
    /// A negative or non-finite radius puts every tree at the origin.
    pub fn generate(rng: &mut impl Rng, trees: usize, logs_per_tree: u32, axes: u32, radius: f32) -> Self {
        let radius = if radius.is_finite() { radius.max(0.0) } else { 0.0 };
        let trees = (0..trees)
            .map(|_| Tree {
                id: TargetId::new(),
                position: Vec2::new(rng.gen_range(-radius..=radius), rng.gen_range(-radius..=radius)),
                logs: logs_per_tree,
            })
            .collect();

        Self {
            shed: ToolShed {
                id: TargetId::new(),
                position: Vec2::new(-4.0, 0.0),
                axes,
            },
            pile: LogPile {
                id: TargetId::new(),
                position: Vec2::new(4.0, 0.0),
                logs: 0,
            },
            trees,
        }
    }

    /// World position of any object in the forest
    pub fn position_of(&self, id: TargetId) -> Option<Vec2> {
        if id == self.shed.id {
            return Some(self.shed.position);
        }
        if id == self.pile.id {
            return Some(self.pile.position);
        }
        self.trees.iter().find(|t| t.id == id).map(|t| t.position)
    }

    /// Closest tree that still has logs
    pub fn nearest_tree(&self, from: Vec2) -> Option<&Tree> {
        self.trees
            .iter()
            .filter(|t| t.logs > 0)
            .min_by(|a, b| {
                a.position
                    .distance_squared(from)
                    .total_cmp(&b.position.distance_squared(from))
            })
    }

    pub fn tree_mut(&mut self, id: TargetId) -> Option<&mut Tree> {
        self.trees.iter_mut().find(|t| t.id == id)
    }

    pub fn has_standing_trees(&self) -> bool {
        self.trees.iter().any(|t| t.logs > 0)
    }
}
