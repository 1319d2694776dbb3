//! Tumbling asteroids

use glam::DVec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::{enemy_health, layers};
use crate::draw::instruction::{BitmapId, DrawInstruction};
use crate::settings::Dimensions;
use crate::sim::animation::{FlashAnimator, HealthBarAnimation, LoseHealthAnimation};
use crate::sim::entity::{Behavior, Body, CollisionPartner, Entity, EntityKind, EntityTag};
use crate::sim::update::{EventId, UpdateContext};

const SIZE_TILES: f64 = 0.9;
/// Max spin in degrees per second
const MAX_SPIN_DPS: f64 = 120.0;

/// Moves on a fixed diagonal, bouncing off the top and bottom of the game area
#[derive(Debug, Clone)]
pub struct Asteroid {
    rotation_deg: f64,
    spin_dps: f64,
    flash: FlashAnimator,
    health_bar: HealthBarAnimation,
    damage_numbers: Vec<LoseHealthAnimation>,
}

impl Asteroid {
    pub fn spawn(
        pos: DVec2,
        difficulty: f64,
        scroll_speed: f64,
        dims: &Dimensions,
        rng: &mut Pcg32,
    ) -> Entity {
        let size = DVec2::splat(SIZE_TILES * dims.tile_width);
        let health = enemy_health(difficulty);
        let speed_x = -scroll_speed * (0.6 + rng.random_range(0..60) as f64 / 100.0);
        let speed_y = -scroll_speed * (-0.2 + rng.random_range(0..40) as f64 / 100.0);
        let asteroid = Asteroid {
            rotation_deg: rng.random_range(0.0..360.0),
            spin_dps: rng.random_range(-MAX_SPIN_DPS..MAX_SPIN_DPS),
            flash: FlashAnimator::default(),
            health_bar: HealthBarAnimation::new(health),
            damage_numbers: Vec::new(),
        };
        let body = Body::new(pos, size, health)
            .with_vel(DVec2::new(speed_x, speed_y))
            .with_hitbox(size * 0.15, size * 0.7);
        Entity::new(body, EntityKind::Asteroid(asteroid))
    }
}

impl Behavior for Asteroid {
    fn tag(&self) -> EntityTag {
        EntityTag::Asteroid
    }

    fn draw_layer(&self) -> usize {
        layers::ASTEROID
    }

    fn move_body(&mut self, body: &mut Body, ctx: &UpdateContext) {
        body.apply_velocity(ctx.delta_s());
        let max_y = (ctx.dims.game_height - body.size.y).max(0.0);
        if body.pos.y < 0.0 {
            body.pos.y = 0.0;
            body.vel.y = body.vel.y.abs();
        } else if body.pos.y > max_y {
            body.pos.y = max_y;
            body.vel.y = -body.vel.y.abs();
        }
    }

    fn update_actions(&mut self, body: &mut Body, _ctx: &mut UpdateContext) {
        if body.is_past_left_edge() {
            body.terminate();
        }
    }

    fn update_animations(&mut self, _body: &mut Body, ctx: &UpdateContext) {
        let dt = ctx.delta_ms();
        self.rotation_deg = (self.rotation_deg + self.spin_dps * dt / 1000.0).rem_euclid(360.0);
        self.flash.update(dt);
        self.health_bar.update(dt);
        for number in &mut self.damage_numbers {
            number.update(dt);
        }
        self.damage_numbers.retain(|n| !n.is_finished());
    }

    fn handle_collision(
        &mut self,
        body: &mut Body,
        other: &CollisionPartner,
        damage: i32,
        ctx: &mut UpdateContext,
    ) {
        if !matches!(other.tag, EntityTag::Ship | EntityTag::PlayerProjectile) {
            return;
        }
        if other.tag == EntityTag::PlayerProjectile {
            ctx.event(EventId::AsteroidShot);
        }
        if damage <= 0 {
            return;
        }

        self.flash.flash();
        self.health_bar.trigger();
        self.damage_numbers.push(LoseHealthAnimation::new(
            damage.min(body.health.max(0)),
            other.pos - body.pos,
            body.size.y,
        ));

        if body.take_damage(damage) {
            log::debug!("Asteroid destroyed");
            ctx.event(EventId::AsteroidDestroyed);
            body.terminate();
        }
    }

    fn draw(&self, body: &Body, out: &mut Vec<DrawInstruction>) {
        let bounds = body.bounds();
        out.push(DrawInstruction::Image {
            bitmap: BitmapId::Asteroid,
            x: bounds.x,
            y: bounds.y,
            src: None,
            dst: Some(bounds),
            rotation_deg: self.rotation_deg as f32,
            filter: self.flash.filter(),
        });
        self.health_bar.draw(bounds, body.health, out);
        for number in &self.damage_numbers {
            number.draw(body.pos, (body.size.y * 0.4) as f32, out);
        }
    }
}
