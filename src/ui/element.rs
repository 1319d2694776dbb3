//! UI elements: buttons, overlays and HUD readouts

use serde::{Deserialize, Serialize};

use crate::Rect;
use crate::audio::SoundId;
use crate::draw::instruction::{BitmapId, DrawInstruction, FontId, colors};
use crate::settings::Dimensions;
use crate::sim::state::GameState;

/// Inputs generated by the UI for the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UiInput {
    Pause,
    Resume,
    Restart,
    Mute,
    Unmute,
    Shoot,
}

/// Engine state the UI reflects
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UiView {
    pub state: GameState,
    pub paused: bool,
    pub muted: bool,
    pub health: i32,
    pub max_health: i32,
    pub score: f64,
}

/// Element variants with their display state
#[derive(Debug, Clone, PartialEq)]
pub enum ElementKind {
    GameOverOverlay { score: f64 },
    PauseOverlay,
    PauseButton { paused: bool },
    MuteButton { muted: bool },
    ShootButton,
    HealthBar { displayed: f64, max_health: i32 },
    ScoreDisplay { score: f64 },
}

/// Time constant for the health bar catching up with actual health (ms)
const HEALTH_EASE_MS: f64 = 150.0;

#[derive(Debug, Clone)]
pub struct UiElement {
    pub kind: ElementKind,
    pub bounds: Rect,
    pub visible: bool,
    /// Pointers currently inside this element
    pointers_inside: u32,
}

impl UiElement {
    pub fn new(kind: ElementKind, bounds: Rect) -> Self {
        Self {
            kind,
            bounds,
            visible: false,
            pointers_inside: 0,
        }
    }

    pub fn is_pressed(&self) -> bool {
        self.pointers_inside > 0
    }

    /// Whether touches are routed to this element right now
    pub fn is_touchable(&self) -> bool {
        self.visible
            && !matches!(
                self.kind,
                ElementKind::HealthBar { .. } | ElementKind::ScoreDisplay { .. }
            )
    }

    pub fn on_touch_enter(&mut self) {
        self.pointers_inside += 1;
    }

    pub fn on_touch_leave(&mut self) {
        self.pointers_inside = self.pointers_inside.saturating_sub(1);
    }

    /// Pointer lifted inside the element
    pub fn on_touch_release(&mut self, inputs: &mut Vec<UiInput>, sounds: &mut Vec<SoundId>) {
        self.on_touch_leave();
        if !self.is_touchable() {
            return;
        }
        let input = match self.kind {
            ElementKind::GameOverOverlay { .. } => UiInput::Restart,
            ElementKind::PauseOverlay => UiInput::Resume,
            ElementKind::PauseButton { paused } => {
                if paused {
                    UiInput::Resume
                } else {
                    UiInput::Pause
                }
            }
            ElementKind::MuteButton { muted } => {
                if muted {
                    UiInput::Unmute
                } else {
                    UiInput::Mute
                }
            }
            ElementKind::ShootButton
            | ElementKind::HealthBar { .. }
            | ElementKind::ScoreDisplay { .. } => return,
        };
        inputs.push(input);
        sounds.push(SoundId::ButtonClick);
    }

    /// Continuous inputs while held
    pub fn poll_held(&self, inputs: &mut Vec<UiInput>) {
        if self.kind == ElementKind::ShootButton && self.visible && self.is_pressed() {
            inputs.push(UiInput::Shoot);
        }
    }

    pub fn update(&mut self, view: &UiView, delta_ms: f64) {
        let in_run = matches!(
            view.state,
            GameState::Starting | GameState::Playing | GameState::PlayerDead
        );
        self.visible = match &mut self.kind {
            ElementKind::GameOverOverlay { score } => {
                *score = view.score;
                view.state == GameState::GameOver
            }
            ElementKind::PauseOverlay => view.paused && in_run,
            ElementKind::PauseButton { paused } => {
                *paused = view.paused;
                in_run
            }
            ElementKind::MuteButton { muted } => {
                *muted = view.muted;
                true
            }
            ElementKind::ShootButton => view.state == GameState::Playing && !view.paused,
            ElementKind::HealthBar {
                displayed,
                max_health,
            } => {
                *max_health = view.max_health;
                let target = view.health.max(0) as f64;
                *displayed += (target - *displayed) * (delta_ms / HEALTH_EASE_MS).min(1.0);
                view.state != GameState::WaitingForStart
            }
            ElementKind::ScoreDisplay { score } => {
                *score = view.score;
                view.state != GameState::WaitingForStart
            }
        };
        if !self.visible {
            self.pointers_inside = 0;
        }
    }

    pub fn draw(&self, out: &mut Vec<DrawInstruction>) {
        if !self.visible {
            return;
        }
        let b = self.bounds;
        match &self.kind {
            ElementKind::GameOverOverlay { score } => {
                out.push(DrawInstruction::fill_rect(b, colors::OVERLAY));
                let size = (b.height * 0.1) as f32;
                centered_text(out, "GAME OVER", b, b.height * 0.4, size, FontId::Display);
                centered_text(
                    out,
                    &format!("SCORE {}", *score as u64),
                    b,
                    b.height * 0.55,
                    size * 0.5,
                    FontId::Monospace,
                );
                centered_text(out, "TAP TO RESTART", b, b.height * 0.7, size * 0.4, FontId::Monospace);
            }
            ElementKind::PauseOverlay => {
                out.push(DrawInstruction::fill_rect(b, colors::OVERLAY));
                let size = (b.height * 0.1) as f32;
                centered_text(out, "PAUSED", b, b.height * 0.45, size, FontId::Display);
                centered_text(out, "TAP TO RESUME", b, b.height * 0.6, size * 0.4, FontId::Monospace);
            }
            ElementKind::PauseButton { paused } => {
                let bitmap = if *paused {
                    BitmapId::PlayButton
                } else {
                    BitmapId::PauseButton
                };
                out.push(DrawInstruction::image_into(bitmap, b));
            }
            ElementKind::MuteButton { muted } => {
                let bitmap = if *muted {
                    BitmapId::MuteButtonMuted
                } else {
                    BitmapId::MuteButtonUnmuted
                };
                out.push(DrawInstruction::image_into(bitmap, b));
            }
            ElementKind::ShootButton => {
                let bitmap = if self.is_pressed() {
                    BitmapId::ShootButtonPressed
                } else {
                    BitmapId::ShootButton
                };
                out.push(DrawInstruction::image_into(bitmap, b));
            }
            ElementKind::HealthBar {
                displayed,
                max_health,
            } => {
                let frac = (displayed / (*max_health).max(1) as f64).clamp(0.0, 1.0);
                let color = colors::HEALTH_LOW.lerp(colors::HEALTH_GOOD, frac);
                out.push(DrawInstruction::fill_rect(
                    Rect::new(b.x, b.y, b.width * frac, b.height),
                    color,
                ));
                out.push(DrawInstruction::outline_rect(b, colors::HEALTH_FRAME, 2.0));
            }
            ElementKind::ScoreDisplay { score } => {
                out.push(DrawInstruction::text(
                    format!("{:08}", *score as u64),
                    b.x,
                    b.bottom(),
                    colors::WHITE,
                    b.height as f32,
                ));
            }
        }
    }
}

fn centered_text(
    out: &mut Vec<DrawInstruction>,
    text: &str,
    area: Rect,
    baseline: f64,
    size: f32,
    font: FontId,
) {
    // Rough advance width for the bundled fonts
    let width = text.chars().count() as f64 * size as f64 * 0.6;
    out.push(DrawInstruction::Text {
        text: text.to_string(),
        x: area.x + (area.width - width) / 2.0,
        y: area.y + baseline,
        color: colors::WHITE,
        size,
        font,
    });
}

/// Elements in registration order: front-most first
pub fn layout(dims: &Dimensions, max_health: i32) -> Vec<UiElement> {
    let screen = Rect::new(0.0, 0.0, dims.screen_width, dims.screen_height);
    let margin = dims.tile_width * 0.2;
    let button = dims.tile_width * 0.8;
    let shoot = dims.tile_width * 1.3;
    let hud_height = dims.screen_height - dims.game_height;

    vec![
        UiElement::new(ElementKind::GameOverOverlay { score: 0.0 }, screen),
        UiElement::new(ElementKind::PauseOverlay, screen),
        UiElement::new(
            ElementKind::PauseButton { paused: false },
            Rect::new(dims.screen_width - margin - button, margin, button, button),
        ),
        UiElement::new(
            ElementKind::MuteButton { muted: false },
            Rect::new(
                dims.screen_width - 2.0 * (margin + button),
                margin,
                button,
                button,
            ),
        ),
        UiElement::new(ElementKind::ShootButton, shoot_button_bounds(dims)),
        UiElement::new(
            ElementKind::HealthBar {
                displayed: max_health as f64,
                max_health,
            },
            Rect::new(
                margin,
                dims.game_height + hud_height * 0.2,
                dims.screen_width * 0.3,
                hud_height * 0.6,
            ),
        ),
        UiElement::new(
            ElementKind::ScoreDisplay { score: 0.0 },
            Rect::new(margin, margin, shoot * 2.0, button * 0.5),
        ),
    ]
}

/// Where the shoot button sits, for drivers that simulate touches
pub fn shoot_button_bounds(dims: &Dimensions) -> Rect {
    let margin = dims.tile_width * 0.2;
    let side = dims.tile_width * 1.3;
    Rect::new(
        dims.screen_width - margin - side,
        dims.game_height - margin - side,
        side,
        side,
    )
}
