//! Entity model
//!
//! Every world object is an `Entity`: shared `Body` state plus a variant payload.
//! Per-variant behavior lives behind the `Behavior` trait and is selected by a
//! single exhaustive match in `Entity::split_mut`.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::sprite::{Alien, Asteroid, Coin, Obstacle, Projectile, Ship};
use super::update::UpdateContext;
use crate::Rect;
use crate::draw::instruction::DrawInstruction;
use crate::settings::Dimensions;

/// Entity lifecycle. Alive -> Dead -> Terminated, or Alive -> Terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Lifecycle {
    Alive,
    /// Playing out a death animation; renders but never interacts
    Dead,
    /// Removed at the end of the tick
    Terminated,
}

/// Hitbox relative to the entity position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hitbox {
    pub offset: DVec2,
    pub size: DVec2,
}

/// State shared by every entity
#[derive(Debug, Clone)]
pub struct Body {
    pub pos: DVec2,
    /// Velocity in px/s
    pub vel: DVec2,
    pub size: DVec2,
    pub health: i32,
    pub collidable: bool,
    pub lifecycle: Lifecycle,
    pub hitbox: Hitbox,
}

impl Body {
    /// Alive, collidable body whose hitbox covers its full size
    pub fn new(pos: DVec2, size: DVec2, health: i32) -> Self {
        Self {
            pos,
            vel: DVec2::ZERO,
            size,
            health,
            collidable: true,
            lifecycle: Lifecycle::Alive,
            hitbox: Hitbox {
                offset: DVec2::ZERO,
                size,
            },
        }
    }

    pub fn with_hitbox(mut self, offset: DVec2, size: DVec2) -> Self {
        self.hitbox = Hitbox { offset, size };
        self
    }

    pub fn with_vel(mut self, vel: DVec2) -> Self {
        self.vel = vel;
        self
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    pub fn hitbox_rect(&self) -> Rect {
        Rect::from_pos_size(self.pos + self.hitbox.offset, self.hitbox.size)
    }

    pub fn hitbox_center(&self) -> DVec2 {
        self.pos + self.hitbox.offset + self.hitbox.size / 2.0
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.lifecycle == Lifecycle::Alive
    }

    /// Eligible for collision detection
    #[inline]
    pub fn can_collide(&self) -> bool {
        self.is_alive() && self.collidable
    }

    pub fn terminate(&mut self) {
        self.lifecycle = Lifecycle::Terminated;
        self.collidable = false;
    }

    /// Enter the death-animation phase
    pub fn kill(&mut self) {
        self.lifecycle = Lifecycle::Dead;
        self.collidable = false;
    }

    /// Subtract damage. Returns true if this hit took health to zero or below.
    pub fn take_damage(&mut self, damage: i32) -> bool {
        if damage <= 0 {
            return false;
        }
        let was_positive = self.health > 0;
        self.health -= damage;
        was_positive && self.health <= 0
    }

    pub fn apply_velocity(&mut self, delta_s: f64) {
        self.pos += self.vel * delta_s;
    }

    /// Any part of the body is within the game area
    pub fn is_on_screen(&self, dims: &Dimensions) -> bool {
        self.bounds()
            .intersects(&Rect::new(0.0, 0.0, dims.game_width, dims.game_height))
    }

    /// Whole body is within the game area horizontally
    pub fn is_fully_on_screen_x(&self, dims: &Dimensions) -> bool {
        self.pos.x >= 0.0 && self.pos.x + self.size.x <= dims.game_width
    }

    /// Scrolled off the left edge
    pub fn is_past_left_edge(&self) -> bool {
        self.pos.x + self.size.x < 0.0
    }
}

/// Variant tag used for collision filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityTag {
    Ship,
    PlayerProjectile,
    EnemyProjectile,
    Obstacle,
    Coin,
    Alien,
    Asteroid,
}

/// Snapshot of the other side of a collision
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionPartner {
    pub tag: EntityTag,
    pub pos: DVec2,
    pub size: DVec2,
}

/// Per-variant behavior, called in tick order
pub trait Behavior {
    fn tag(&self) -> EntityTag;

    /// Index into the draw layers (lower draws first)
    fn draw_layer(&self) -> usize;

    fn update_speeds(&mut self, _body: &mut Body, _ctx: &UpdateContext) {}

    fn move_body(&mut self, body: &mut Body, ctx: &UpdateContext) {
        body.apply_velocity(ctx.delta_s());
    }

    fn update_actions(&mut self, body: &mut Body, ctx: &mut UpdateContext);

    fn update_animations(&mut self, _body: &mut Body, _ctx: &UpdateContext) {}

    /// `damage` is the partner's health captured before either handler ran
    fn handle_collision(
        &mut self,
        body: &mut Body,
        other: &CollisionPartner,
        damage: i32,
        ctx: &mut UpdateContext,
    );

    fn draw(&self, body: &Body, out: &mut Vec<DrawInstruction>);
}

/// Variant payload
#[derive(Debug, Clone)]
pub enum EntityKind {
    Ship(Ship),
    Projectile(Projectile),
    Obstacle(Obstacle),
    Coin(Coin),
    Alien(Alien),
    Asteroid(Asteroid),
}

/// A world object
#[derive(Debug, Clone)]
pub struct Entity {
    /// Assigned when the engine registers the entity (0 = unregistered)
    pub id: u32,
    pub body: Body,
    pub kind: EntityKind,
}

impl Entity {
    pub fn new(body: Body, kind: EntityKind) -> Self {
        Self { id: 0, body, kind }
    }

    fn behavior(&self) -> &dyn Behavior {
        let behavior: &dyn Behavior = match &self.kind {
            EntityKind::Ship(s) => s,
            EntityKind::Projectile(p) => p,
            EntityKind::Obstacle(o) => o,
            EntityKind::Coin(c) => c,
            EntityKind::Alien(a) => a,
            EntityKind::Asteroid(a) => a,
        };
        behavior
    }

    fn split_mut(&mut self) -> (&mut Body, &mut dyn Behavior) {
        let behavior: &mut dyn Behavior = match &mut self.kind {
            EntityKind::Ship(s) => s,
            EntityKind::Projectile(p) => p,
            EntityKind::Obstacle(o) => o,
            EntityKind::Coin(c) => c,
            EntityKind::Alien(a) => a,
            EntityKind::Asteroid(a) => a,
        };
        (&mut self.body, behavior)
    }

    pub fn tag(&self) -> EntityTag {
        self.behavior().tag()
    }

    pub fn draw_layer(&self) -> usize {
        self.behavior().draw_layer()
    }

    pub fn partner(&self) -> CollisionPartner {
        CollisionPartner {
            tag: self.tag(),
            pos: self.body.pos,
            size: self.body.size,
        }
    }

    /// Run the per-tick update pipeline: speeds, movement, actions, animations
    pub fn update(&mut self, ctx: &mut UpdateContext) {
        let (body, behavior) = self.split_mut();
        behavior.update_speeds(body, ctx);
        behavior.move_body(body, ctx);
        behavior.update_actions(body, ctx);
        behavior.update_animations(body, ctx);
    }

    pub fn handle_collision(
        &mut self,
        other: &CollisionPartner,
        damage: i32,
        ctx: &mut UpdateContext,
    ) {
        let (body, behavior) = self.split_mut();
        behavior.handle_collision(body, other, damage, ctx);
    }

    pub fn draw(&self, out: &mut Vec<DrawInstruction>) {
        self.behavior().draw(&self.body, out);
    }

    pub fn as_ship(&self) -> Option<&Ship> {
        match &self.kind {
            EntityKind::Ship(ship) => Some(ship),
            _ => None,
        }
    }

    pub fn as_ship_mut(&mut self) -> Option<&mut Ship> {
        match &mut self.kind {
            EntityKind::Ship(ship) => Some(ship),
            _ => None,
        }
    }
}
