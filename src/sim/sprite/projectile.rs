//! Projectiles fired by the ship and by aliens

use glam::DVec2;

use super::layers;
use crate::audio::SoundId;
use crate::draw::instruction::{BitmapId, DrawInstruction};
use crate::settings::Dimensions;
use crate::sim::entity::{Behavior, Body, CollisionPartner, Entity, EntityKind, EntityTag};
use crate::sim::update::{EventId, UpdateContext};

const PLAYER_SIZE_TILES: DVec2 = DVec2::new(0.35, 0.12);
const ENEMY_SIZE_TILES: DVec2 = DVec2::new(0.18, 0.18);
/// Horizontal speeds as fractions of game width per second
const PLAYER_SPEED_FRACTION: f64 = 0.45;
const ENEMY_SPEED_FRACTION: f64 = 0.35;
/// Cap on the vertical aim speed (fraction of game height per second)
const ENEMY_MAX_VERTICAL_FRACTION: f64 = 0.3;

const PLAYER_HEALTH: i32 = 5;
const ENEMY_HEALTH: i32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectileOwner {
    Player,
    Enemy,
}

/// A bullet travelling in a straight line until it hits something or leaves the screen
#[derive(Debug, Clone)]
pub struct Projectile {
    pub owner: ProjectileOwner,
    rotation_deg: f32,
}

impl Projectile {
    /// Player bullet whose left-center sits at `origin`, flying right
    pub fn player(origin: DVec2, dims: &Dimensions) -> Entity {
        let size = PLAYER_SIZE_TILES * dims.tile_width;
        let pos = DVec2::new(origin.x, origin.y - size.y / 2.0);
        let body = Body::new(pos, size, PLAYER_HEALTH)
            .with_vel(DVec2::new(PLAYER_SPEED_FRACTION * dims.game_width, 0.0));
        Entity::new(
            body,
            EntityKind::Projectile(Projectile {
                owner: ProjectileOwner::Player,
                rotation_deg: 0.0,
            }),
        )
    }

    /// Enemy bullet centered on `origin`, aimed at `target`
    pub fn aimed(origin: DVec2, target: DVec2, dims: &Dimensions) -> Entity {
        let size = ENEMY_SIZE_TILES * dims.tile_width;
        let speed_x = ENEMY_SPEED_FRACTION * dims.game_width;
        let dx = origin.x - target.x;
        let max_vy = ENEMY_MAX_VERTICAL_FRACTION * dims.game_height;
        let vel_y = if dx > 0.0 {
            ((target.y - origin.y) * speed_x / dx).clamp(-max_vy, max_vy)
        } else {
            0.0
        };
        let vel = DVec2::new(-speed_x, vel_y);
        let body = Body::new(origin - size / 2.0, size, ENEMY_HEALTH).with_vel(vel);
        Entity::new(
            body,
            EntityKind::Projectile(Projectile {
                owner: ProjectileOwner::Enemy,
                rotation_deg: vel.y.atan2(vel.x).to_degrees() as f32,
            }),
        )
    }

    fn ignores(&self, other: EntityTag) -> bool {
        match self.owner {
            ProjectileOwner::Player => matches!(
                other,
                EntityTag::Ship | EntityTag::Coin | EntityTag::PlayerProjectile
            ),
            ProjectileOwner::Enemy => !matches!(other, EntityTag::Ship | EntityTag::Obstacle),
        }
    }
}

impl Behavior for Projectile {
    fn tag(&self) -> EntityTag {
        match self.owner {
            ProjectileOwner::Player => EntityTag::PlayerProjectile,
            ProjectileOwner::Enemy => EntityTag::EnemyProjectile,
        }
    }

    fn draw_layer(&self) -> usize {
        layers::PROJECTILE
    }

    fn update_actions(&mut self, body: &mut Body, ctx: &mut UpdateContext) {
        if !body.is_on_screen(ctx.dims) {
            body.terminate();
        }
    }

    fn handle_collision(
        &mut self,
        body: &mut Body,
        other: &CollisionPartner,
        _damage: i32,
        ctx: &mut UpdateContext,
    ) {
        if self.ignores(other.tag) {
            return;
        }
        ctx.event(EventId::BulletCollided);
        ctx.sound(SoundId::BulletDestroyed);
        body.terminate();
    }

    fn draw(&self, body: &Body, out: &mut Vec<DrawInstruction>) {
        let bounds = body.bounds();
        let bitmap = match self.owner {
            ProjectileOwner::Player => BitmapId::Bullet,
            ProjectileOwner::Enemy => BitmapId::AlienBullet,
        };
        out.push(DrawInstruction::Image {
            bitmap,
            x: bounds.x,
            y: bounds.y,
            src: None,
            dst: Some(bounds),
            rotation_deg: self.rotation_deg,
            filter: None,
        });
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

    fn partner(tag: EntityTag) -> CollisionPartner {
        CollisionPartner {
            tag,
            pos: DVec2::ZERO,
            size: DVec2::ONE,
        }
    }

    fn hit(entity: &mut Entity, tag: EntityTag) -> TickOutput {
        let dims = Dimensions::from_screen(1000, 600);
        let mut rng = Pcg32::seed_from_u64(3);
        let mut out = TickOutput::default();
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
        entity.handle_collision(&partner(tag), 10, &mut ctx);
        out
    }

    #[test]
    fn test_player_bullet_filters() {
        let dims = Dimensions::from_screen(1000, 600);
        for ignored in [EntityTag::Ship, EntityTag::Coin, EntityTag::PlayerProjectile] {
            let mut bullet = Projectile::player(DVec2::new(100.0, 100.0), &dims);
            let out = hit(&mut bullet, ignored);
            assert!(out.events.is_empty());
            assert!(bullet.body.is_alive());
        }

        let mut bullet = Projectile::player(DVec2::new(100.0, 100.0), &dims);
        let out = hit(&mut bullet, EntityTag::Alien);
        assert_eq!(out.events, vec![EventId::BulletCollided]);
        assert_eq!(out.sounds, vec![SoundId::BulletDestroyed]);
        assert_eq!(bullet.body.lifecycle, Lifecycle::Terminated);
        assert!(!bullet.body.collidable);
    }

    #[test]
    fn test_enemy_bullet_hits_only_ship_and_obstacles() {
        let dims = Dimensions::from_screen(1000, 600);
        let origin = DVec2::new(800.0, 100.0);
        let target = DVec2::new(250.0, 300.0);
        for ignored in [EntityTag::Coin, EntityTag::Alien, EntityTag::Asteroid, EntityTag::PlayerProjectile] {
            let mut bullet = Projectile::aimed(origin, target, &dims);
            hit(&mut bullet, ignored);
            assert!(bullet.body.is_alive());
        }
        for tag in [EntityTag::Ship, EntityTag::Obstacle] {
            let mut bullet = Projectile::aimed(origin, target, &dims);
            hit(&mut bullet, tag);
            assert_eq!(bullet.body.lifecycle, Lifecycle::Terminated);
        }
    }

    #[test]
    fn test_aimed_bullet_heads_for_target() {
        let dims = Dimensions::from_screen(1000, 600);
        let bullet = Projectile::aimed(DVec2::new(800.0, 100.0), DVec2::new(450.0, 150.0), &dims);
        assert!(bullet.body.vel.x < 0.0);
        // 350px at 350px/s is one second, so 50px of drop per second
        assert!((bullet.body.vel.y - 50.0).abs() < 1e-9);
        assert_eq!(bullet.tag(), EntityTag::EnemyProjectile);
    }
}
