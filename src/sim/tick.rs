//! Per-tick simulation pipeline
//!
//! One call to `tick` reads the clock once, applies inputs, advances the world and
//! returns everything the presentation layer needs for the frame.

use super::collision::CollisionPair;
use super::engine::GameEngine;
use super::entity::{Entity, Lifecycle};
use super::state::{GameState, next_state};
use super::time::GameTime;
use super::update::{EventId, TickOutput, UpdateContext, UpdateResult};
use crate::consts::SCORE_PER_SECOND;
use crate::error::EngineError;
use crate::platform::input::ExternalInput;
use crate::ui::UiView;

impl GameEngine {
    /// Drain the input queue and advance one tick
    pub fn update(&mut self) -> Result<UpdateResult, EngineError> {
        let inputs = self.input_rx.drain();
        self.tick(inputs)
    }

    /// Advance the simulation by one tick using the given inputs
    pub fn tick<I>(&mut self, inputs: I) -> Result<UpdateResult, EngineError>
    where
        I: IntoIterator<Item = ExternalInput>,
    {
        let now_ms = self.clock.now_ms();
        let mut out = TickOutput::default();

        for input in inputs {
            self.apply_input(input, now_ms, &mut out)?;
        }
        self.process_ui_input(now_ms, &mut out)?;

        let game_time = self.timer.record_update(now_ms);
        self.frame_stats.record_frame(now_ms);

        let next = next_state(self.state, self.ship_status());
        self.enter_state(next, now_ms, &mut out)?;

        // World is frozen while paused
        if !self.paused {
            if self.state.is_scrolling() {
                self.map.update(&game_time, &mut self.rng, &mut out.created)?;
            }
            self.update_entities(game_time, &mut out);
        }

        for entity in std::mem::take(&mut out.created) {
            self.register(entity);
        }
        self.entities
            .retain(|e| e.body.lifecycle != Lifecycle::Terminated);

        self.update_score(&game_time, &out.events);

        if self.state.is_scrolling() && !self.paused {
            self.background.update(
                self.map.scroll_speed(),
                game_time.delta_s(),
                self.map.difficulty(),
            );
        }
        let view = self.ui_view();
        self.ui.update(&view, game_time.ms_since_prev_update);

        let mut draw_instructions = Vec::new();
        self.background.draw(&mut draw_instructions);
        self.draw_layers.rebuild(&self.entities)?;
        self.draw_layers
            .draw(&self.entities, self.settings.debug, &mut draw_instructions);
        self.ui.draw(&mut draw_instructions);

        if self.muted {
            out.sounds.clear();
        }

        Ok(UpdateResult {
            draw_instructions,
            events: out.events,
            sounds: out.sounds,
            frame_count: self.frame_stats.frame_count(),
            fps: self.frame_stats.fps(),
            game_state: self.state,
            score: self.score,
            difficulty: self.map.difficulty(),
        })
    }

    /// Prune dead weight, run every entity's update pipeline, then resolve collisions
    fn update_entities(&mut self, game_time: GameTime, out: &mut TickOutput) {
        self.entities
            .retain(|e| e.body.lifecycle != Lifecycle::Terminated);

        let ship_target = self
            .ship()
            .filter(|e| e.body.is_alive())
            .map(|e| e.body.hitbox_center());
        let mut ctx = UpdateContext {
            game_time,
            state: self.state,
            difficulty: self.map.difficulty(),
            scroll_speed: self.map.scroll_speed(),
            dims: &self.dims,
            ship_target,
            rng: &mut self.rng,
            out,
        };

        for entity in &mut self.entities {
            entity.update(&mut ctx);
        }

        let pairs = self.hit_detector.determine_collisions(&self.entities);
        resolve_collisions(&mut self.entities, &pairs, &mut ctx);
    }

    fn update_score(&mut self, game_time: &GameTime, events: &[EventId]) {
        if self.state == GameState::Playing {
            self.score += game_time.delta_s() * self.map.difficulty() * SCORE_PER_SECOND;
        }
        let coins = events
            .iter()
            .filter(|e| **e == EventId::CoinCollected)
            .count();
        self.score += coins as f64 * f64::from(self.settings.coin_value);
    }

    fn ui_view(&self) -> UiView {
        UiView {
            state: self.state,
            paused: self.paused,
            muted: self.muted,
            health: self.ship().map_or(0, |e| e.body.health),
            max_health: self.settings.starting_health,
            score: self.score,
        }
    }
}

/// Run both collision handlers for each pair
///
/// Each side is damaged by the other's health as it was before either handler ran.
/// A pair is skipped if an earlier pair this tick already took one side out.
fn resolve_collisions(entities: &mut [Entity], pairs: &[CollisionPair], ctx: &mut UpdateContext) {
    for pair in pairs {
        let (head, tail) = entities.split_at_mut(pair.b);
        let (a, b) = (&mut head[pair.a], &mut tail[0]);
        if !a.body.can_collide() || !b.body.can_collide() {
            continue;
        }
        let (partner_a, partner_b) = (a.partner(), b.partner());
        let (damage_to_a, damage_to_b) = (b.body.health.max(0), a.body.health.max(0));
        a.handle_collision(&partner_b, damage_to_a, ctx);
        b.handle_collision(&partner_a, damage_to_b, ctx);
    }
}

#[cfg(test)]
mod tests {
    use glam::DVec2;

    use super::*;
    use crate::audio::SoundId;
    use crate::draw::instruction::{BitmapId, DrawInstruction};
    use crate::platform::input::{MotionPhase, SensorReading};
    use crate::platform::time::{ManualClock, StepClock};
    use crate::settings::Settings;
    use crate::sim::entity::EntityTag;
    use crate::sim::sprite::{Alien, Asteroid, Coin, Obstacle, Projectile};
    use crate::ui::{ElementKind, shoot_button_bounds};

    fn settings() -> Settings {
        Settings {
            screen_width_px: 1000,
            screen_height_px: 600,
            seed: 7,
            ..Default::default()
        }
    }

    fn engine() -> GameEngine {
        GameEngine::new(settings(), Box::new(StepClock::new(16.0))).unwrap()
    }

    fn idle(engine: &mut GameEngine) -> UpdateResult {
        engine.tick(Vec::<ExternalInput>::new()).unwrap()
    }

    /// Start a game and tick until the ship is at its resting position
    fn playing_engine() -> GameEngine {
        let mut engine = engine();
        engine.tick([ExternalInput::StartGame]).unwrap();
        for _ in 0..1000 {
            if idle(&mut engine).game_state == GameState::Playing {
                return engine;
            }
        }
        panic!("never reached Playing");
    }

    fn ship_pos(engine: &GameEngine) -> DVec2 {
        engine.ship().unwrap().body.pos
    }

    /// Kill the ship by parking an obstacle on it, then run until the game is over.
    /// Returns every result produced on the way.
    fn crash(engine: &mut GameEngine) -> Vec<UpdateResult> {
        let pos = ship_pos(engine);
        let obstacle = Obstacle::spawn(pos, &engine.dims);
        engine.register(obstacle);
        let mut results = Vec::new();
        for _ in 0..200 {
            let result = idle(engine);
            let over = result.game_state == GameState::GameOver;
            results.push(result);
            if over {
                return results;
            }
        }
        panic!("never reached GameOver");
    }

    #[test]
    fn test_waits_for_start() {
        let mut engine = engine();
        let result = idle(&mut engine);
        assert_eq!(result.game_state, GameState::WaitingForStart);
        assert_eq!(result.score, 0.0);
        assert_eq!(result.difficulty, 0.1);
        assert_eq!(result.frame_count, 1);
        assert_eq!(engine.entities().len(), 1);
    }

    #[test]
    fn test_start_flies_ship_on_then_playing() {
        let mut engine = engine();
        let result = engine.tick([ExternalInput::StartGame]).unwrap();
        assert_eq!(result.game_state, GameState::Starting);
        assert!(result.events.contains(&EventId::GameStarted));

        let ship = engine.ship().unwrap();
        assert!((ship.body.vel.x - 120.0).abs() < 1e-9);
        assert!(!ship.as_ship().unwrap().controllable());

        let mut reached = None;
        for n in 0..1000 {
            if idle(&mut engine).game_state == GameState::Playing {
                reached = Some(n);
                break;
            }
        }
        // 353.4 px at 120 px/s in 16 ms ticks
        assert!(reached.is_some_and(|n| (180..190).contains(&n)));
        let ship = engine.ship().unwrap();
        assert_eq!(ship.body.pos.x, 250.0);
        assert_eq!(ship.body.vel.x, 0.0);
        assert!(ship.as_ship().unwrap().controllable());
    }

    #[test]
    fn test_start_and_restart_ignored_in_wrong_state() {
        let mut engine = engine();
        let result = engine.tick([ExternalInput::Restart]).unwrap();
        assert_eq!(result.game_state, GameState::WaitingForStart);

        engine.tick([ExternalInput::StartGame]).unwrap();
        let result = engine.tick([ExternalInput::StartGame]).unwrap();
        assert_eq!(result.game_state, GameState::Starting);
        assert!(!result.events.contains(&EventId::GameStarted));
    }

    #[test]
    fn test_death_passes_through_player_dead() {
        let mut engine = playing_engine();
        let results = crash(&mut engine);

        let states: Vec<GameState> = results.iter().map(|r| r.game_state).collect();
        let dead_at = states
            .iter()
            .position(|s| *s == GameState::PlayerDead)
            .unwrap();
        let over_at = states.len() - 1;
        assert!(dead_at < over_at);

        let killed: Vec<&UpdateResult> = results
            .iter()
            .filter(|r| r.events.contains(&EventId::SpaceshipKilled))
            .collect();
        assert_eq!(killed.len(), 1);
        assert!(killed[0].sounds.contains(&SoundId::Explosion));

        let last = &results[over_at];
        assert!(last.events.contains(&EventId::GameOver));
        assert!(last.sounds.contains(&SoundId::GameOver));
    }

    #[test]
    fn test_score_frozen_after_death() {
        let mut engine = playing_engine();
        for _ in 0..30 {
            idle(&mut engine);
        }
        assert!(engine.score() > 0.0);

        let results = crash(&mut engine);
        let dead: Vec<f64> = results
            .iter()
            .filter(|r| r.game_state == GameState::PlayerDead)
            .map(|r| r.score)
            .collect();
        assert!(dead.windows(2).all(|w| w[0] == w[1]));

        let final_score = engine.score();
        for _ in 0..20 {
            assert_eq!(idle(&mut engine).score, final_score);
        }
    }

    #[test]
    fn test_restart_resets_run() {
        let mut engine = playing_engine();
        for _ in 0..60 {
            idle(&mut engine);
        }
        crash(&mut engine);

        let result = engine.tick([ExternalInput::Restart]).unwrap();
        assert_eq!(result.game_state, GameState::Starting);
        assert!(result.events.contains(&EventId::GameStarted));
        assert_eq!(result.score, 0.0);
        assert_eq!(result.difficulty, 0.1);
        assert!(!engine.is_paused());
        let ship = engine.ship().unwrap();
        assert_eq!(ship.body.health, 100);
        assert_eq!(ship.body.lifecycle, Lifecycle::Alive);
    }

    #[test]
    fn test_game_over_tap_restarts_with_click() {
        let mut engine = playing_engine();
        crash(&mut engine);

        let overlay = engine
            .ui
            .elements()
            .iter()
            .find(|e| matches!(e.kind, ElementKind::GameOverOverlay { .. }))
            .unwrap()
            .bounds;
        let (x, y) = (
            (overlay.x + overlay.width / 2.0) as f32,
            (overlay.y + overlay.height / 2.0) as f32,
        );
        let tap = |phase: MotionPhase| ExternalInput::Motion {
            pointer_id: 0,
            phase,
            x,
            y,
        };

        let result = engine
            .tick([tap(MotionPhase::Down), tap(MotionPhase::Up)])
            .unwrap();
        assert_eq!(result.game_state, GameState::Starting);
        assert!(result.sounds.contains(&SoundId::ButtonClick));
    }

    #[test]
    fn test_mute_clears_sounds_but_keeps_events() {
        let mut engine = playing_engine();
        let button = shoot_button_bounds(&engine.dims);
        let press = ExternalInput::Motion {
            pointer_id: 0,
            phase: MotionPhase::Down,
            x: (button.x + button.width / 2.0) as f32,
            y: (button.y + button.height / 2.0) as f32,
        };

        let result = engine.tick([ExternalInput::Mute, press]).unwrap();
        assert!(engine.is_muted());
        assert!(result.events.contains(&EventId::BulletFired));
        assert!(result.sounds.is_empty());

        // Held button keeps firing once the delay has passed
        let mut fired_unmuted = false;
        for i in 0..20 {
            let inputs = if i == 0 {
                vec![ExternalInput::Unmute]
            } else {
                Vec::new()
            };
            let result = engine.tick(inputs).unwrap();
            fired_unmuted |= result.sounds.contains(&SoundId::Laser);
        }
        assert!(fired_unmuted);
    }

    #[test]
    fn test_draw_order_background_entities_ui() {
        let mut engine = playing_engine();
        let result = idle(&mut engine);
        let instructions = &result.draw_instructions;

        let dims = *engine.dimensions();
        assert!(matches!(
            &instructions[0],
            DrawInstruction::Rect { rect, .. }
                if rect.width == dims.game_width && rect.height == dims.game_height
        ));
        let ship_at = instructions
            .iter()
            .position(|i| matches!(i, DrawInstruction::Image { bitmap: BitmapId::Spaceship, .. }))
            .unwrap();
        let pause_at = instructions
            .iter()
            .position(|i| matches!(i, DrawInstruction::Image { bitmap: BitmapId::PauseButton, .. }))
            .unwrap();
        assert!(ship_at < pause_at);
    }

    #[test]
    fn test_same_seed_same_results() {
        let run = || {
            let mut engine = engine();
            let inputs = engine.input_sender();
            inputs.start_game();
            let mut results = Vec::new();
            for i in 0..600 {
                let y = if (i / 40) % 2 == 0 { 1.5 } else { -1.5 };
                inputs.sensor(SensorReading { x: 0.0, y, z: 0.0 });
                results.push(serde_json::to_string(&engine.update().unwrap()).unwrap());
            }
            results
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_stall_is_clamped() {
        let clock = ManualClock::new(0.0);
        let mut engine = GameEngine::new(settings(), Box::new(clock.clone())).unwrap();
        engine.tick([ExternalInput::StartGame]).unwrap();
        let start_x = ship_pos(&engine).x;

        clock.advance(10_000.0);
        idle(&mut engine);
        // 120 px/s for the 100 ms cap
        assert!((ship_pos(&engine).x - start_x - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_coin_scores_and_is_purged() {
        let mut engine = engine();
        let pos = DVec2::new(300.0, 200.0);
        if let Some((body, _)) = engine.ship_parts_mut() {
            body.pos = pos;
        }
        let coin = Coin::spawn(pos, &engine.dims);
        let coin_id = engine.register(coin);

        let result = idle(&mut engine);
        assert!(result.events.contains(&EventId::CoinCollected));
        assert!(result.sounds.contains(&SoundId::CoinCollected));
        assert_eq!(result.score, 100.0);
        assert!(engine.entities().iter().all(|e| e.id != coin_id));
    }

    #[test]
    fn test_damage_uses_health_before_handlers() {
        let mut engine = engine();
        let pos = DVec2::new(300.0, 200.0);
        if let Some((body, _)) = engine.ship_parts_mut() {
            body.pos = pos;
            body.health = 20;
        }
        let mut asteroid = Asteroid::spawn(pos, 0.5, 200.0, &engine.dims, &mut engine.rng);
        asteroid.body.health = 30;
        let asteroid_id = engine.register(asteroid);

        let result = idle(&mut engine);
        assert!(result.events.contains(&EventId::SpaceshipKilled));
        let asteroid = engine
            .entities()
            .iter()
            .find(|e| e.id == asteroid_id)
            .unwrap();
        assert_eq!(asteroid.body.health, 10);
        assert_eq!(engine.ship().unwrap().body.lifecycle, Lifecycle::Dead);
    }

    #[test]
    fn test_spent_bullet_hits_only_one_alien() {
        let mut engine = engine();
        let pos = DVec2::new(500.0, 200.0);
        let first = Alien::spawn(pos, 0.1, &engine.dims, &mut engine.rng);
        let second = Alien::spawn(pos, 0.1, &engine.dims, &mut engine.rng);
        let full_health = first.body.health;
        let center = first.body.hitbox_center();
        let first_id = engine.register(first);
        let second_id = engine.register(second);
        engine.register(Projectile::player(center, &engine.dims));

        let result = idle(&mut engine);
        let shot = result
            .events
            .iter()
            .filter(|e| **e == EventId::AlienShot)
            .count();
        assert_eq!(shot, 1);

        let health = |id: u32| {
            engine
                .entities()
                .iter()
                .find(|e| e.id == id)
                .unwrap()
                .body
                .health
        };
        assert_eq!(health(first_id), full_health - 5);
        assert_eq!(health(second_id), full_health);
        assert!(
            engine
                .entities()
                .iter()
                .all(|e| e.tag() != EntityTag::PlayerProjectile)
        );
    }

    #[test]
    fn test_terminated_entities_are_pruned() {
        let mut engine = engine();
        let mut coin = Coin::spawn(DVec2::new(600.0, 100.0), &engine.dims);
        coin.body.terminate();
        let coin_id = engine.register(coin);
        idle(&mut engine);
        assert!(engine.entities().iter().all(|e| e.id != coin_id));
    }

    #[test]
    fn test_non_finite_sensor_is_fatal() {
        let mut engine = engine();
        let reading = SensorReading {
            x: 0.0,
            y: f32::NAN,
            z: 0.0,
        };
        assert!(matches!(
            engine.tick([ExternalInput::Sensor(reading)]),
            Err(EngineError::MalformedInput(_))
        ));
    }

    #[test]
    fn test_enter_state_idempotent_and_checked() {
        let mut engine = engine();
        let mut out = TickOutput::default();
        engine
            .enter_state(GameState::WaitingForStart, 0.0, &mut out)
            .unwrap();
        assert!(out.events.is_empty());

        assert_eq!(
            engine.enter_state(GameState::GameOver, 0.0, &mut out),
            Err(EngineError::InvalidTransition {
                from: GameState::WaitingForStart,
                to: GameState::GameOver,
            })
        );

        engine.enter_state(GameState::Starting, 0.0, &mut out).unwrap();
        engine.enter_state(GameState::Starting, 0.0, &mut out).unwrap();
        assert_eq!(out.events, vec![EventId::GameStarted]);
    }

    #[test]
    fn test_pause_freezes_world() {
        let mut engine = engine();
        // Not scrolling yet, so there's nothing to pause
        engine.tick([ExternalInput::Pause]).unwrap();
        assert!(!engine.is_paused());

        engine.tick([ExternalInput::StartGame]).unwrap();
        for _ in 0..10 {
            idle(&mut engine);
        }
        engine.tick([ExternalInput::Pause]).unwrap();
        assert!(engine.is_paused());
        let x = ship_pos(&engine).x;
        let scrolled = engine.map.num_px_scrolled();
        let score = engine.score();
        for _ in 0..20 {
            idle(&mut engine);
        }
        assert_eq!(ship_pos(&engine).x, x);
        assert_eq!(engine.map.num_px_scrolled(), scrolled);
        assert_eq!(engine.score(), score);

        engine.tick([ExternalInput::Resume]).unwrap();
        idle(&mut engine);
        assert!(ship_pos(&engine).x > x);
    }
}
