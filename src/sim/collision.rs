//! Broad collision detection between entities
//!
//! The detector only finds overlapping pairs. Resolution (who takes what damage,
//! which events fire) belongs to the engine and the entities themselves.

use super::entity::Entity;
use crate::Rect;

/// Indices of two overlapping entities, `a < b`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CollisionPair {
    pub a: usize,
    pub b: usize,
}

/// All-pairs AABB detector, rebuilt every tick
#[derive(Debug, Default)]
pub struct HitDetector {
    candidates: Vec<(usize, Rect)>,
}

impl HitDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overlapping pairs among alive, collidable entities, in slice order
    pub fn determine_collisions(&mut self, entities: &[Entity]) -> Vec<CollisionPair> {
        self.candidates.clear();
        self.candidates.extend(
            entities
                .iter()
                .enumerate()
                .filter(|(_, e)| e.body.can_collide())
                .map(|(i, e)| (i, e.body.hitbox_rect())),
        );

        let mut pairs = Vec::new();
        for (n, (a, rect_a)) in self.candidates.iter().enumerate() {
            for (b, rect_b) in &self.candidates[n + 1..] {
                if rect_a.intersects(rect_b) {
                    pairs.push(CollisionPair { a: *a, b: *b });
                }
            }
        }
        pairs
    }
}
