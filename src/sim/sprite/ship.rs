//! The player ship

use glam::DVec2;

use super::layers;
use super::projectile::Projectile;
use crate::Rect;
use crate::audio::SoundId;
use crate::draw::instruction::{BitmapId, DrawInstruction};
use crate::settings::Dimensions;
use crate::sim::animation::{FlashAnimator, SpriteAnimation};
use crate::sim::control::{ControlState, Direction};
use crate::sim::entity::{
    Behavior, Body, CollisionPartner, Entity, EntityKind, EntityTag, Lifecycle,
};
use crate::sim::update::{EventId, UpdateContext};

/// Ship size in tile widths
const SIZE_TILES: DVec2 = DVec2::new(1.1, 0.55);
/// Vertical speed at full tilt (fraction of game height per second)
const MAX_VERTICAL_SPEED_FRACTION: f64 = 0.9;
/// Per-frame decay of vertical speed when not steering, at 60 fps
const SPEED_DECAY: f64 = 1.0 / 1.7;
const REFERENCE_FRAME_MS: f64 = 1000.0 / 60.0;
/// Minimum ticks between volleys
const SHOT_DELAY_TICKS: u32 = 10;

const EXHAUST_FRAME: DVec2 = DVec2::new(32.0, 16.0);
const EXPLODE_FRAME: DVec2 = DVec2::new(64.0, 64.0);

/// Player-controlled ship
#[derive(Debug, Clone)]
pub struct Ship {
    controllable: bool,
    direction: Direction,
    magnitude: f32,
    shooting: bool,
    ticks_since_last_shot: u32,
    exhaust_anim: SpriteAnimation,
    explode_anim: SpriteAnimation,
    flash: FlashAnimator,
}

impl Ship {
    /// New ship just off the left edge, vertically centered
    pub fn spawn(dims: &Dimensions, starting_health: i32) -> Entity {
        let size = SIZE_TILES * dims.tile_width;
        let pos = DVec2::new(-size.x, (dims.game_height - size.y) / 2.0);
        let body = Body::new(pos, size, starting_health)
            .with_hitbox(size * DVec2::new(0.1, 0.15), size * DVec2::new(0.8, 0.7));
        let ship = Ship {
            controllable: false,
            direction: Direction::None,
            magnitude: 0.0,
            shooting: false,
            ticks_since_last_shot: SHOT_DELAY_TICKS,
            exhaust_anim: SpriteAnimation::looping(BitmapId::SpaceshipMove, 4, 60.0),
            explode_anim: SpriteAnimation::once(BitmapId::SpaceshipExplode, 8, 70.0),
            flash: FlashAnimator::default(),
        };
        Entity::new(body, EntityKind::Ship(ship))
    }

    pub fn controllable(&self) -> bool {
        self.controllable
    }

    pub fn set_controllable(&mut self, controllable: bool) {
        self.controllable = controllable;
    }

    pub fn apply_controls(&mut self, control: &ControlState) {
        self.direction = control.direction;
        self.magnitude = control.magnitude;
        self.shooting = control.shooting;
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn explode_anim_done(&self) -> bool {
        self.explode_anim.has_played()
    }

    fn fire(&mut self, body: &Body, ctx: &mut UpdateContext) {
        let x = body.pos.x + body.size.x * 0.6;
        for cannon_y in [0.25, 0.75] {
            let y = body.pos.y + body.size.y * cannon_y;
            ctx.spawn(Projectile::player(DVec2::new(x, y), ctx.dims));
            ctx.event(EventId::BulletFired);
        }
        ctx.sound(SoundId::Laser);
        self.ticks_since_last_shot = 0;
    }

    fn die(&mut self, body: &mut Body, ctx: &mut UpdateContext) {
        log::info!("Ship destroyed");
        body.kill();
        body.vel.y = 0.0;
        self.controllable = false;
        self.explode_anim.start();
        ctx.sound(SoundId::Explosion);
        ctx.event(EventId::SpaceshipKilled);
    }
}

impl Behavior for Ship {
    fn tag(&self) -> EntityTag {
        EntityTag::Ship
    }

    fn draw_layer(&self) -> usize {
        layers::SHIP
    }

    fn update_speeds(&mut self, body: &mut Body, ctx: &UpdateContext) {
        if !self.controllable || !body.is_alive() {
            return;
        }
        let max_speed = MAX_VERTICAL_SPEED_FRACTION * ctx.dims.game_height;
        body.vel.y = match self.direction {
            Direction::Up => -max_speed * self.magnitude as f64,
            Direction::Down => max_speed * self.magnitude as f64,
            Direction::None => {
                body.vel.y * SPEED_DECAY.powf(ctx.delta_ms() / REFERENCE_FRAME_MS)
            }
        };
    }

    fn move_body(&mut self, body: &mut Body, ctx: &UpdateContext) {
        body.apply_velocity(ctx.delta_s());
        let max_y = (ctx.dims.game_height - body.size.y).max(0.0);
        if body.pos.y < 0.0 || body.pos.y > max_y {
            body.pos.y = body.pos.y.clamp(0.0, max_y);
            body.vel.y = 0.0;
        }
    }

    fn update_actions(&mut self, body: &mut Body, ctx: &mut UpdateContext) {
        self.ticks_since_last_shot = self.ticks_since_last_shot.saturating_add(1);
        if self.controllable
            && body.is_alive()
            && self.shooting
            && self.ticks_since_last_shot >= SHOT_DELAY_TICKS
        {
            self.fire(body, ctx);
        }

        if body.lifecycle == Lifecycle::Dead && self.explode_anim.has_played() {
            body.terminate();
            ctx.event(EventId::SpaceshipInvisible);
        }
    }

    fn update_animations(&mut self, _body: &mut Body, ctx: &UpdateContext) {
        let dt = ctx.delta_ms();
        self.exhaust_anim.update(dt);
        self.explode_anim.update(dt);
        self.flash.update(dt);
    }

    fn handle_collision(
        &mut self,
        body: &mut Body,
        other: &CollisionPartner,
        damage: i32,
        ctx: &mut UpdateContext,
    ) {
        // Own bullets spawn inside the hull
        if other.tag == EntityTag::PlayerProjectile {
            return;
        }

        if other.tag == EntityTag::Coin {
            ctx.event(EventId::CoinCollected);
            ctx.sound(SoundId::CoinCollected);
        }

        if damage > 0 {
            ctx.event(EventId::SpaceshipDamaged);
            self.flash.flash();
            if body.take_damage(damage) {
                self.die(body, ctx);
            }
        }
    }

    fn draw(&self, body: &Body, out: &mut Vec<DrawInstruction>) {
        match body.lifecycle {
            Lifecycle::Alive => {
                let exhaust_size = DVec2::new(body.size.x * 0.35, body.size.y * 0.5);
                let exhaust = Rect::new(
                    body.pos.x - exhaust_size.x,
                    body.pos.y + (body.size.y - exhaust_size.y) / 2.0,
                    exhaust_size.x,
                    exhaust_size.y,
                );
                self.exhaust_anim.draw(exhaust, EXHAUST_FRAME, out);

                let bounds = body.bounds();
                out.push(DrawInstruction::Image {
                    bitmap: BitmapId::Spaceship,
                    x: bounds.x,
                    y: bounds.y,
                    src: None,
                    dst: Some(bounds),
                    rotation_deg: 0.0,
                    filter: self.flash.filter(),
                });
            }
            Lifecycle::Dead => {
                // Explosion is square and centered on the hull
                let side = body.size.x;
                let center = body.bounds();
                let dst = Rect::new(
                    center.x,
                    center.y + (center.height - side) / 2.0,
                    side,
                    side,
                );
                self.explode_anim.draw(dst, EXPLODE_FRAME, out);
            }
            Lifecycle::Terminated => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::GameState;
    use crate::sim::time::GameTime;
    use crate::sim::update::TickOutput;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn ctx<'a>(
        dims: &'a Dimensions,
        rng: &'a mut Pcg32,
        out: &'a mut TickOutput,
        delta_ms: f64,
    ) -> UpdateContext<'a> {
        UpdateContext {
            game_time: GameTime {
                ms_since_prev_update: delta_ms,
                run_time_ms: 0.0,
            },
            state: GameState::Playing,
            difficulty: 0.1,
            scroll_speed: 100.0,
            dims,
            ship_target: None,
            rng,
            out,
        }
    }

    fn ship_mut(entity: &mut Entity) -> &mut Ship {
        entity.as_ship_mut().unwrap()
    }

    #[test]
    fn test_spawns_off_screen_left() {
        let dims = Dimensions::from_screen(1000, 600);
        let entity = Ship::spawn(&dims, 100);
        assert!(entity.body.pos.x + entity.body.size.x <= 0.0);
        assert_eq!(entity.body.health, 100);
        assert!(!entity.as_ship().unwrap().controllable());
    }

    #[test]
    fn test_steering_and_clamp() {
        let dims = Dimensions::from_screen(1000, 600);
        let mut rng = Pcg32::seed_from_u64(1);
        let mut out = TickOutput::default();
        let mut entity = Ship::spawn(&dims, 100);
        let ship = ship_mut(&mut entity);
        ship.set_controllable(true);
        ship.apply_controls(&ControlState::new(Direction::Up, 1.0, false).unwrap());

        for _ in 0..200 {
            let mut c = ctx(&dims, &mut rng, &mut out, 16.0);
            entity.update(&mut c);
        }
        assert_eq!(entity.body.pos.y, 0.0);
        assert_eq!(entity.body.vel.y, 0.0);
    }

    #[test]
    fn test_speed_decays_without_direction() {
        let dims = Dimensions::from_screen(1000, 600);
        let mut rng = Pcg32::seed_from_u64(1);
        let mut out = TickOutput::default();
        let mut entity = Ship::spawn(&dims, 100);
        ship_mut(&mut entity).set_controllable(true);
        entity.body.vel.y = 100.0;

        let mut c = ctx(&dims, &mut rng, &mut out, REFERENCE_FRAME_MS);
        entity.update(&mut c);
        assert!((entity.body.vel.y - 100.0 / 1.7).abs() < 1e-9);
    }

    #[test]
    fn test_fires_two_bullets_with_delay() {
        let dims = Dimensions::from_screen(1000, 600);
        let mut rng = Pcg32::seed_from_u64(1);
        let mut out = TickOutput::default();
        let mut entity = Ship::spawn(&dims, 100);
        let ship = ship_mut(&mut entity);
        ship.set_controllable(true);
        ship.apply_controls(&ControlState::new(Direction::None, 0.0, true).unwrap());

        for _ in 0..SHOT_DELAY_TICKS {
            let mut c = ctx(&dims, &mut rng, &mut out, 16.0);
            entity.update(&mut c);
        }
        // One volley on the first tick, the next only after the delay
        assert_eq!(out.created.len(), 2);
        assert_eq!(out.sounds, vec![SoundId::Laser]);
        let fired = out
            .events
            .iter()
            .filter(|e| **e == EventId::BulletFired)
            .count();
        assert_eq!(fired, 2);
    }

    #[test]
    fn test_not_controllable_never_fires() {
        let dims = Dimensions::from_screen(1000, 600);
        let mut rng = Pcg32::seed_from_u64(1);
        let mut out = TickOutput::default();
        let mut entity = Ship::spawn(&dims, 100);
        ship_mut(&mut entity).apply_controls(&ControlState::new(Direction::Up, 1.0, true).unwrap());
        let y = entity.body.pos.y;

        let mut c = ctx(&dims, &mut rng, &mut out, 16.0);
        entity.update(&mut c);
        assert!(out.created.is_empty());
        assert_eq!(entity.body.pos.y, y);
    }

    #[test]
    fn test_coin_pickup_is_harmless() {
        let dims = Dimensions::from_screen(1000, 600);
        let mut rng = Pcg32::seed_from_u64(1);
        let mut out = TickOutput::default();
        let mut entity = Ship::spawn(&dims, 100);
        let coin = CollisionPartner {
            tag: EntityTag::Coin,
            pos: DVec2::ZERO,
            size: DVec2::ONE,
        };
        let mut c = ctx(&dims, &mut rng, &mut out, 16.0);
        entity.handle_collision(&coin, 0, &mut c);
        assert_eq!(entity.body.health, 100);
        assert_eq!(out.events, vec![EventId::CoinCollected]);
        assert_eq!(out.sounds, vec![SoundId::CoinCollected]);
    }

    #[test]
    fn test_fatal_hit_then_explosion_then_terminated() {
        let dims = Dimensions::from_screen(1000, 600);
        let mut rng = Pcg32::seed_from_u64(1);
        let mut out = TickOutput::default();
        let mut entity = Ship::spawn(&dims, 100);
        let rock = CollisionPartner {
            tag: EntityTag::Obstacle,
            pos: DVec2::ZERO,
            size: DVec2::ONE,
        };
        {
            let mut c = ctx(&dims, &mut rng, &mut out, 16.0);
            entity.handle_collision(&rock, 1_000_000, &mut c);
        }
        assert_eq!(entity.body.lifecycle, Lifecycle::Dead);
        assert!(!entity.body.collidable);
        assert!(out.events.contains(&EventId::SpaceshipKilled));
        assert!(out.sounds.contains(&SoundId::Explosion));

        for _ in 0..60 {
            let mut c = ctx(&dims, &mut rng, &mut out, 16.0);
            entity.update(&mut c);
        }
        assert!(entity.as_ship().unwrap().explode_anim_done());
        assert_eq!(entity.body.lifecycle, Lifecycle::Terminated);
        assert!(out.events.contains(&EventId::SpaceshipInvisible));
    }
}
