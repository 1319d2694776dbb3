//! Indestructible obstacle blocks

use glam::DVec2;

use super::layers;
use crate::draw::instruction::{BitmapId, DrawInstruction};
use crate::settings::Dimensions;
use crate::sim::entity::{Behavior, Body, CollisionPartner, Entity, EntityKind, EntityTag};
use crate::sim::update::UpdateContext;

/// Large enough to destroy anything that runs into it
pub const OBSTACLE_HEALTH: i32 = 1_000_000;

/// One tile of wall, scrolling with the map
#[derive(Debug, Clone, Default)]
pub struct Obstacle;

impl Obstacle {
    pub fn spawn(pos: DVec2, dims: &Dimensions) -> Entity {
        let size = DVec2::splat(dims.tile_width);
        Entity::new(Body::new(pos, size, OBSTACLE_HEALTH), EntityKind::Obstacle(Obstacle))
    }
}

impl Behavior for Obstacle {
    fn tag(&self) -> EntityTag {
        EntityTag::Obstacle
    }

    fn draw_layer(&self) -> usize {
        layers::OBSTACLE
    }

    fn update_speeds(&mut self, body: &mut Body, ctx: &UpdateContext) {
        body.vel.x = -ctx.scroll_speed;
    }

    fn update_actions(&mut self, body: &mut Body, _ctx: &mut UpdateContext) {
        if body.is_past_left_edge() {
            body.terminate();
        }
    }

    fn handle_collision(
        &mut self,
        _body: &mut Body,
        _other: &CollisionPartner,
        _damage: i32,
        _ctx: &mut UpdateContext,
    ) {
    }

    fn draw(&self, body: &Body, out: &mut Vec<DrawInstruction>) {
        out.push(DrawInstruction::image_into(BitmapId::Obstacle, body.bounds()));
    }
}
