//! Flying alien enemies
//!
//! Aliens drift left slower than the map scrolls, bob up and down, and fire aimed
//! shots at the ship while fully on screen. Killing one plays an explosion before
//! the entity is removed.

use std::f64::consts::TAU;

use glam::DVec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::projectile::Projectile;
use super::{enemy_health, layers};
use crate::audio::SoundId;
use crate::draw::instruction::{BitmapId, DrawInstruction};
use crate::settings::Dimensions;
use crate::sim::animation::{
    FlashAnimator, HealthBarAnimation, LoseHealthAnimation, SpriteAnimation,
};
use crate::sim::entity::{
    Behavior, Body, CollisionPartner, Entity, EntityKind, EntityTag, Lifecycle,
};
use crate::sim::update::{EventId, UpdateContext};

const SIZE_TILES: DVec2 = DVec2::new(0.9, 0.7);
/// Horizontal speed as a fraction of the scroll speed
const DRIFT_FRACTION: f64 = 0.5;
const BOB_PERIOD_MS: f64 = 2000.0;
/// Time between shots at difficulty 0 and 1
const FIRE_INTERVAL_EASY_MS: f64 = 2600.0;
const FIRE_INTERVAL_HARD_MS: f64 = 1000.0;
const EXPLODE_FRAME: DVec2 = DVec2::new(64.0, 64.0);

#[derive(Debug, Clone)]
pub struct Alien {
    bob_amplitude: f64,
    bob_phase: f64,
    elapsed_ms: f64,
    fire_interval_ms: f64,
    fire_cooldown_ms: f64,
    explode_anim: SpriteAnimation,
    flash: FlashAnimator,
    health_bar: HealthBarAnimation,
    damage_numbers: Vec<LoseHealthAnimation>,
}

impl Alien {
    pub fn spawn(pos: DVec2, difficulty: f64, dims: &Dimensions, rng: &mut Pcg32) -> Entity {
        let size = SIZE_TILES * dims.tile_width;
        let health = enemy_health(difficulty);
        let fire_interval_ms = FIRE_INTERVAL_EASY_MS
            + (FIRE_INTERVAL_HARD_MS - FIRE_INTERVAL_EASY_MS) * difficulty.clamp(0.0, 1.0);
        let alien = Alien {
            bob_amplitude: dims.tile_width * rng.random_range(0.3..0.8),
            bob_phase: rng.random_range(0.0..TAU),
            elapsed_ms: 0.0,
            fire_interval_ms,
            fire_cooldown_ms: fire_interval_ms * rng.random_range(0.3..1.0),
            explode_anim: SpriteAnimation::once(BitmapId::AlienExplode, 8, 60.0),
            flash: FlashAnimator::default(),
            health_bar: HealthBarAnimation::new(health),
            damage_numbers: Vec::new(),
        };
        let body = Body::new(pos, size, health)
            .with_hitbox(size * DVec2::new(0.05, 0.1), size * DVec2::new(0.9, 0.8));
        Entity::new(body, EntityKind::Alien(alien))
    }

    fn fire(&mut self, body: &Body, target: DVec2, ctx: &mut UpdateContext) {
        let origin = DVec2::new(body.pos.x, body.pos.y + body.size.y / 2.0);
        ctx.spawn(Projectile::aimed(origin, target, ctx.dims));
        ctx.event(EventId::AlienFiredBullet);
        ctx.sound(SoundId::AlienFire);
    }
}

impl Behavior for Alien {
    fn tag(&self) -> EntityTag {
        EntityTag::Alien
    }

    fn draw_layer(&self) -> usize {
        layers::ALIEN
    }

    fn update_speeds(&mut self, body: &mut Body, ctx: &UpdateContext) {
        body.vel.x = -ctx.scroll_speed * DRIFT_FRACTION;
        if !body.is_alive() {
            body.vel.y = 0.0;
            return;
        }
        self.elapsed_ms += ctx.delta_ms();
        // Derivative of amplitude * sin(w t + phase)
        let omega = TAU / (BOB_PERIOD_MS / 1000.0);
        body.vel.y = self.bob_amplitude
            * omega
            * (omega * self.elapsed_ms / 1000.0 + self.bob_phase).cos();
    }

    fn move_body(&mut self, body: &mut Body, ctx: &UpdateContext) {
        body.apply_velocity(ctx.delta_s());
        let max_y = (ctx.dims.game_height - body.size.y).max(0.0);
        body.pos.y = body.pos.y.clamp(0.0, max_y);
    }

    fn update_actions(&mut self, body: &mut Body, ctx: &mut UpdateContext) {
        match body.lifecycle {
            Lifecycle::Dead => {
                if self.explode_anim.has_played() {
                    body.terminate();
                }
                return;
            }
            Lifecycle::Terminated => return,
            Lifecycle::Alive => {}
        }

        if body.is_past_left_edge() {
            body.terminate();
            return;
        }

        self.fire_cooldown_ms = (self.fire_cooldown_ms - ctx.delta_ms()).max(0.0);
        if self.fire_cooldown_ms > 0.0 || !body.is_fully_on_screen_x(ctx.dims) {
            return;
        }
        if let Some(target) = ctx.ship_target {
            // Only shoot at a ship that's still ahead of us
            if target.x < body.pos.x {
                self.fire(body, target, ctx);
                self.fire_cooldown_ms = self.fire_interval_ms;
            }
        }
    }

    fn update_animations(&mut self, _body: &mut Body, ctx: &UpdateContext) {
        let dt = ctx.delta_ms();
        self.explode_anim.update(dt);
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
            ctx.event(EventId::AlienShot);
        }
        if damage <= 0 {
            return;
        }

        let shown = damage.min(body.health.max(0));
        self.flash.flash();
        self.health_bar.trigger();
        self.damage_numbers.push(LoseHealthAnimation::new(
            shown,
            other.pos - body.pos,
            body.size.y,
        ));

        if body.take_damage(damage) {
            log::debug!("Alien destroyed");
            body.kill();
            self.explode_anim.start();
            ctx.event(EventId::AlienDied);
            ctx.sound(SoundId::Explosion);
        }
    }

    fn draw(&self, body: &Body, out: &mut Vec<DrawInstruction>) {
        let bounds = body.bounds();
        match body.lifecycle {
            Lifecycle::Alive => out.push(DrawInstruction::Image {
                bitmap: BitmapId::Alien,
                x: bounds.x,
                y: bounds.y,
                src: None,
                dst: Some(bounds),
                rotation_deg: 0.0,
                filter: self.flash.filter(),
            }),
            Lifecycle::Dead => self.explode_anim.draw(bounds, EXPLODE_FRAME, out),
            Lifecycle::Terminated => return,
        }
        self.health_bar.draw(bounds, body.health, out);
        for number in &self.damage_numbers {
            number.draw(body.pos, (body.size.y * 0.4) as f32, out);
        }
    }
}
