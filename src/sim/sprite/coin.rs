//! Collectible coins

use glam::DVec2;

use super::layers;
use crate::draw::instruction::{BitmapId, DrawInstruction};
use crate::settings::Dimensions;
use crate::sim::animation::SpriteAnimation;
use crate::sim::entity::{Behavior, Body, CollisionPartner, Entity, EntityKind, EntityTag};
use crate::sim::update::UpdateContext;

/// Coin side in tile widths; coins sit centered in their tile
const SIZE_TILES: f64 = 0.6;
const SPIN_FRAME: DVec2 = DVec2::new(32.0, 32.0);

#[derive(Debug, Clone)]
pub struct Coin {
    spin: SpriteAnimation,
}

impl Coin {
    /// Coin centered in the tile whose top-left corner is `tile_pos`
    pub fn spawn(tile_pos: DVec2, dims: &Dimensions) -> Entity {
        let side = SIZE_TILES * dims.tile_width;
        let inset = (dims.tile_width - side) / 2.0;
        let body = Body::new(tile_pos + DVec2::splat(inset), DVec2::splat(side), 0);
        Entity::new(
            body,
            EntityKind::Coin(Coin {
                spin: SpriteAnimation::looping(BitmapId::Coin, 6, 90.0),
            }),
        )
    }
}

impl Behavior for Coin {
    fn tag(&self) -> EntityTag {
        EntityTag::Coin
    }

    fn draw_layer(&self) -> usize {
        layers::COIN
    }

    fn update_speeds(&mut self, body: &mut Body, ctx: &UpdateContext) {
        body.vel.x = -ctx.scroll_speed;
    }

    fn update_actions(&mut self, body: &mut Body, _ctx: &mut UpdateContext) {
        if body.is_past_left_edge() {
            body.terminate();
        }
    }

    fn update_animations(&mut self, _body: &mut Body, ctx: &UpdateContext) {
        self.spin.update(ctx.delta_ms());
    }

    fn handle_collision(
        &mut self,
        body: &mut Body,
        other: &CollisionPartner,
        _damage: i32,
        _ctx: &mut UpdateContext,
    ) {
        // Scoring happens on the ship side
        if other.tag == EntityTag::Ship {
            body.terminate();
        }
    }

    fn draw(&self, body: &Body, out: &mut Vec<DrawInstruction>) {
        self.spin.draw(body.bounds(), SPIN_FRAME, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::Lifecycle;
    use crate::sim::state::GameState;
    use crate::sim::time::GameTime;
    use crate::sim::update::TickOutput;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_centered_in_tile() {
        let dims = Dimensions::from_screen(1000, 600);
        let coin = Coin::spawn(DVec2::new(940.0, 94.0), &dims);
        let inset = (94.0 - 0.6 * 94.0) / 2.0;
        assert!((coin.body.pos.x - (940.0 + inset)).abs() < 1e-9);
        assert_eq!(coin.body.health, 0);
    }

    #[test]
    fn test_only_ship_collects() {
        let dims = Dimensions::from_screen(1000, 600);
        let mut rng = Pcg32::seed_from_u64(0);
        let mut out = TickOutput::default();
        let mut coin = Coin::spawn(DVec2::new(500.0, 0.0), &dims);
        let mut ctx = UpdateContext {
            game_time: GameTime::default(),
            state: GameState::Playing,
            difficulty: 0.1,
            scroll_speed: 0.0,
            dims: &dims,
            ship_target: None,
            rng: &mut rng,
            out: &mut out,
        };
        let partner = |tag| CollisionPartner {
            tag,
            pos: DVec2::ZERO,
            size: DVec2::ONE,
        };
        coin.handle_collision(&partner(EntityTag::Alien), 12, &mut ctx);
        assert!(coin.body.is_alive());
        coin.handle_collision(&partner(EntityTag::Ship), 100, &mut ctx);
        assert_eq!(coin.body.lifecycle, Lifecycle::Terminated);
    }
}
