//! Simulation engine: owned world state, input handling and state entry actions
//!
//! The per-tick pipeline lives in `tick.rs`.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::background::Background;
use super::collision::HitDetector;
use super::control::{ControlState, TiltController};
use super::entity::{Body, Entity, EntityKind};
use super::map::Map;
use super::sprite::Ship;
use super::state::{GameState, ShipStatus};
use super::time::{FrameStats, GameTimer};
use super::update::{EventId, TickOutput};
use crate::audio::SoundId;
use crate::consts::{NUM_DRAW_LAYERS, ONBOARD_SPEED_FRACTION};
use crate::draw::layers::DrawLayers;
use crate::error::{ConfigError, EngineError};
use crate::platform::input::ExternalInput;
use crate::platform::queue::{InputReceiver, InputSender, input_queue};
use crate::platform::time::Clock;
use crate::settings::{Dimensions, Settings};
use crate::ui::{GameUi, UiInput};

/// The game simulation
///
/// Owns every piece of world state. Only the thread driving `tick`/`update`
/// touches it; other threads talk to it through the `InputSender`.
pub struct GameEngine {
    pub(super) settings: Settings,
    pub(super) dims: Dimensions,
    pub(super) clock: Box<dyn Clock>,
    input_tx: InputSender,
    pub(super) input_rx: InputReceiver,
    pub(super) rng: Pcg32,

    pub(super) state: GameState,
    pub(super) score: f64,
    pub(super) paused: bool,
    pub(super) muted: bool,
    pub(super) timer: GameTimer,
    pub(super) frame_stats: FrameStats,

    pub(super) entities: Vec<Entity>,
    pub(super) ship_id: u32,
    next_id: u32,

    pub(super) map: Map,
    pub(super) background: Background,
    pub(super) ui: GameUi,
    pub(super) tilt: TiltController,
    pub(super) hit_detector: HitDetector,
    pub(super) draw_layers: DrawLayers,
}

impl GameEngine {
    pub fn new(settings: Settings, clock: Box<dyn Clock>) -> Result<Self, ConfigError> {
        settings.validate()?;
        let dims = settings.dimensions();
        let mut rng = Pcg32::seed_from_u64(settings.seed);
        let (input_tx, input_rx) = input_queue();

        let background = Background::new(dims, &mut rng);
        let ui = GameUi::new(&dims, settings.starting_health, settings.debug);
        let mut engine = Self {
            dims,
            clock,
            input_tx,
            input_rx,
            rng,
            state: GameState::WaitingForStart,
            score: 0.0,
            paused: false,
            muted: false,
            timer: GameTimer::new(),
            frame_stats: FrameStats::new(),
            entities: Vec::new(),
            ship_id: 0,
            next_id: 1,
            map: Map::new(dims),
            background,
            ui,
            tilt: TiltController::new(),
            hit_detector: HitDetector::new(),
            draw_layers: DrawLayers::new(NUM_DRAW_LAYERS),
            settings,
        };
        engine.init_game_objects();
        log::info!(
            "Engine ready: game area {}x{} tile {:.1}px seed {}",
            dims.game_width,
            dims.game_height,
            dims.tile_width,
            engine.settings.seed
        );
        Ok(engine)
    }

    /// Cloneable handle for enqueuing inputs from any thread
    pub fn input_sender(&self) -> InputSender {
        self.input_tx.clone()
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn difficulty(&self) -> f64 {
        self.map.difficulty()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn dimensions(&self) -> &Dimensions {
        &self.dims
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// The player ship, until it has been purged
    pub fn ship(&self) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == self.ship_id)
    }

    pub(super) fn ship_parts_mut(&mut self) -> Option<(&mut Body, &mut Ship)> {
        let ship_id = self.ship_id;
        let entity = self.entities.iter_mut().find(|e| e.id == ship_id)?;
        match &mut entity.kind {
            EntityKind::Ship(ship) => Some((&mut entity.body, ship)),
            _ => None,
        }
    }

    /// Assign an id and add to the world
    pub(super) fn register(&mut self, mut entity: Entity) -> u32 {
        entity.id = self.next_id;
        self.next_id += 1;
        log::debug!("Registered {:?} #{}", entity.tag(), entity.id);
        let id = entity.id;
        self.entities.push(entity);
        id
    }

    /// Build a fresh world: new ship, map, timer, background and UI
    fn init_game_objects(&mut self) {
        self.entities.clear();
        self.next_id = 1;
        let ship = Ship::spawn(&self.dims, self.settings.starting_health);
        self.ship_id = self.register(ship);

        self.score = 0.0;
        self.paused = false;
        self.timer = GameTimer::new();
        self.map = Map::new(self.dims);
        self.background = Background::new(self.dims, &mut self.rng);
        self.ui = GameUi::new(&self.dims, self.settings.starting_health, self.settings.debug);
        self.tilt = TiltController::new();
    }

    pub(super) fn ship_status(&self) -> ShipStatus {
        match self.ship() {
            Some(entity) => ShipStatus {
                health: entity.body.health,
                lifecycle: entity.body.lifecycle,
                explode_anim_done: entity.as_ship().is_none_or(|s| s.explode_anim_done()),
                reached_rest_x: entity.body.pos.x >= self.dims.ship_rest_x(),
            },
            None => ShipStatus::absent(),
        }
    }

    /// Switch state and run the entry action. Re-entering the current state does nothing.
    pub(super) fn enter_state(
        &mut self,
        next: GameState,
        now_ms: f64,
        out: &mut TickOutput,
    ) -> Result<(), EngineError> {
        if next == self.state {
            return Ok(());
        }
        if !self.state.can_transition_to(next) {
            return Err(EngineError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        log::info!("Game state {} -> {}", self.state.as_str(), next.as_str());
        self.state = next;

        match next {
            GameState::WaitingForStart => {}
            GameState::Starting => {
                self.timer.start(now_ms);
                let onboard_speed = ONBOARD_SPEED_FRACTION * self.dims.game_width;
                if let Some((body, ship)) = self.ship_parts_mut() {
                    ship.set_controllable(false);
                    body.vel.x = onboard_speed;
                }
                out.event(EventId::GameStarted);
            }
            GameState::Playing => {
                let rest_x = self.dims.ship_rest_x();
                if let Some((body, ship)) = self.ship_parts_mut() {
                    ship.set_controllable(true);
                    body.pos.x = rest_x;
                    body.vel.x = 0.0;
                }
            }
            GameState::PlayerDead => {
                if let Some((_, ship)) = self.ship_parts_mut() {
                    ship.set_controllable(false);
                }
            }
            GameState::GameOver => {
                self.timer.pause();
                out.event(EventId::GameOver);
                out.sound(SoundId::GameOver);
                log::info!("Final score {:.0}", self.score);
            }
        }
        Ok(())
    }

    /// Apply one external input
    pub(super) fn apply_input(
        &mut self,
        input: ExternalInput,
        now_ms: f64,
        out: &mut TickOutput,
    ) -> Result<(), EngineError> {
        input.validate()?;
        match input {
            ExternalInput::StartGame => {
                if self.state == GameState::WaitingForStart {
                    self.enter_state(GameState::Starting, now_ms, out)?;
                } else {
                    log::debug!("Ignoring START in state {}", self.state.as_str());
                }
            }
            ExternalInput::Restart => self.restart(now_ms, out)?,
            ExternalInput::Pause => self.set_paused(true, now_ms),
            ExternalInput::Resume => self.set_paused(false, now_ms),
            ExternalInput::Mute => self.set_muted(true),
            ExternalInput::Unmute => self.set_muted(false),
            ExternalInput::Motion {
                pointer_id,
                phase,
                x,
                y,
            } => self.ui.input_motion(pointer_id, phase, x, y),
            ExternalInput::Sensor(reading) => self.tilt.input(reading),
        }
        Ok(())
    }

    /// Apply the inputs the UI generated and push the resulting controls to the ship
    pub(super) fn process_ui_input(
        &mut self,
        now_ms: f64,
        out: &mut TickOutput,
    ) -> Result<(), EngineError> {
        // Polled up front: a restart below replaces the UI
        let ui_inputs = self.ui.poll_inputs();
        out.sounds.extend(self.ui.poll_sounds());

        let mut shooting = false;
        for input in ui_inputs {
            match input {
                UiInput::Pause => self.set_paused(true, now_ms),
                UiInput::Resume => self.set_paused(false, now_ms),
                UiInput::Restart => self.restart(now_ms, out)?,
                UiInput::Mute => self.set_muted(true),
                UiInput::Unmute => self.set_muted(false),
                UiInput::Shoot => shooting = true,
            }
        }

        let (direction, magnitude) = self.tilt.tilt_state();
        let control = ControlState::new(direction, magnitude, shooting && !self.paused)?;
        if let Some((_, ship)) = self.ship_parts_mut() {
            ship.apply_controls(&control);
        }
        Ok(())
    }

    fn restart(&mut self, now_ms: f64, out: &mut TickOutput) -> Result<(), EngineError> {
        if self.state != GameState::GameOver {
            log::debug!("Ignoring RESTART in state {}", self.state.as_str());
            return Ok(());
        }
        log::info!("Restarting game");
        self.init_game_objects();
        self.enter_state(GameState::Starting, now_ms, out)
    }

    fn set_paused(&mut self, paused: bool, now_ms: f64) {
        if paused == self.paused {
            return;
        }
        if paused {
            if !self.state.is_scrolling() {
                log::debug!("Ignoring PAUSE in state {}", self.state.as_str());
                return;
            }
            self.timer.pause();
        } else {
            self.timer.resume(now_ms);
        }
        log::info!("{}", if paused { "Paused" } else { "Resumed" });
        self.paused = paused;
    }

    fn set_muted(&mut self, muted: bool) {
        if muted != self.muted {
            log::info!("{}", if muted { "Muted" } else { "Unmuted" });
        }
        self.muted = muted;
    }
}
