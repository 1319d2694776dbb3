//! Time-driven animations
//!
//! All animations advance by the tick's clamped delta, so they freeze while the
//! game is paused along with everything else.

use glam::DVec2;

use crate::Rect;
use crate::draw::instruction::{BitmapId, ColorFilter, DrawInstruction, colors};

/// Sprite-sheet animation: frames laid out horizontally in one bitmap
#[derive(Debug, Clone)]
pub struct SpriteAnimation {
    pub bitmap: BitmapId,
    num_frames: usize,
    frame_ms: f64,
    looping: bool,
    playing: bool,
    has_played: bool,
    elapsed_ms: f64,
}

impl SpriteAnimation {
    /// Looping animation, playing from construction
    pub fn looping(bitmap: BitmapId, num_frames: usize, frame_ms: f64) -> Self {
        Self {
            bitmap,
            num_frames: num_frames.max(1),
            frame_ms,
            looping: true,
            playing: true,
            has_played: false,
            elapsed_ms: 0.0,
        }
    }

    /// One-shot animation, idle until `start`
    pub fn once(bitmap: BitmapId, num_frames: usize, frame_ms: f64) -> Self {
        Self {
            looping: false,
            playing: false,
            ..Self::looping(bitmap, num_frames, frame_ms)
        }
    }

    pub fn start(&mut self) {
        self.playing = true;
        self.has_played = false;
        self.elapsed_ms = 0.0;
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// One-shot animation ran to its last frame
    pub fn has_played(&self) -> bool {
        self.has_played
    }

    pub fn duration_ms(&self) -> f64 {
        self.num_frames as f64 * self.frame_ms
    }

    pub fn update(&mut self, delta_ms: f64) {
        if !self.playing {
            return;
        }
        self.elapsed_ms += delta_ms;
        if self.looping {
            self.elapsed_ms %= self.duration_ms();
        } else if self.elapsed_ms >= self.duration_ms() {
            self.playing = false;
            self.has_played = true;
        }
    }

    pub fn current_frame(&self) -> usize {
        ((self.elapsed_ms / self.frame_ms) as usize).min(self.num_frames - 1)
    }

    /// Current frame drawn into `dst`. `frame_size` is the bitmap's frame size in px.
    pub fn draw(&self, dst: Rect, frame_size: DVec2, out: &mut Vec<DrawInstruction>) {
        let frame = self.current_frame() as f64;
        out.push(DrawInstruction::Image {
            bitmap: self.bitmap,
            x: dst.x,
            y: dst.y,
            src: Some(Rect::new(frame * frame_size.x, 0.0, frame_size.x, frame_size.y)),
            dst: Some(dst),
            rotation_deg: 0.0,
            filter: None,
        });
    }
}

const FLASH_DURATION_MS: f64 = 400.0;
const FLASH_PERIOD_MS: f64 = 100.0;

/// White blink after taking damage
#[derive(Debug, Clone, Default)]
pub struct FlashAnimator {
    remaining_ms: f64,
}

impl FlashAnimator {
    pub fn flash(&mut self) {
        self.remaining_ms = FLASH_DURATION_MS;
    }

    pub fn is_flashing(&self) -> bool {
        self.remaining_ms > 0.0
    }

    pub fn update(&mut self, delta_ms: f64) {
        self.remaining_ms = (self.remaining_ms - delta_ms).max(0.0);
    }

    /// Filter for the current moment, alternating on/off each half period
    pub fn filter(&self) -> Option<ColorFilter> {
        if !self.is_flashing() {
            return None;
        }
        let elapsed = FLASH_DURATION_MS - self.remaining_ms;
        let on = (elapsed % FLASH_PERIOD_MS) < FLASH_PERIOD_MS / 2.0;
        on.then(|| ColorFilter::flash(0.8))
    }
}

const HEALTH_BAR_SHOW_MS: f64 = 1500.0;
const HEALTH_BAR_FADE_MS: f64 = 500.0;

/// Small health bar shown above a damaged enemy
#[derive(Debug, Clone)]
pub struct HealthBarAnimation {
    max_health: i32,
    remaining_ms: f64,
}

impl HealthBarAnimation {
    pub fn new(max_health: i32) -> Self {
        Self {
            max_health: max_health.max(1),
            remaining_ms: 0.0,
        }
    }

    /// Show (or keep showing) the bar
    pub fn trigger(&mut self) {
        self.remaining_ms = HEALTH_BAR_SHOW_MS;
    }

    pub fn is_visible(&self) -> bool {
        self.remaining_ms > 0.0
    }

    pub fn update(&mut self, delta_ms: f64) {
        self.remaining_ms = (self.remaining_ms - delta_ms).max(0.0);
    }

    pub fn draw(&self, bounds: Rect, health: i32, out: &mut Vec<DrawInstruction>) {
        if !self.is_visible() {
            return;
        }
        let alpha = (self.remaining_ms / HEALTH_BAR_FADE_MS).min(1.0);
        let alpha = (alpha * 255.0) as u8;
        let frac = (health.max(0) as f64 / self.max_health as f64).min(1.0);
        let height = (bounds.height * 0.1).max(2.0);
        let frame = Rect::new(bounds.x, bounds.y - height * 2.0, bounds.width, height);
        let fill_color = colors::HEALTH_LOW.lerp(colors::HEALTH_GOOD, frac);

        out.push(DrawInstruction::fill_rect(
            Rect::new(frame.x, frame.y, frame.width * frac, frame.height),
            fill_color.with_alpha(alpha),
        ));
        out.push(DrawInstruction::outline_rect(
            frame,
            colors::HEALTH_FRAME.with_alpha(alpha),
            1.0,
        ));
    }
}

const LOSE_HEALTH_DURATION_MS: f64 = 700.0;

/// Floating "-N" damage number
#[derive(Debug, Clone)]
pub struct LoseHealthAnimation {
    amount: i32,
    /// Offset from the owning entity's position where the hit landed
    offset: DVec2,
    /// Rise distance over the whole animation (px)
    rise: f64,
    elapsed_ms: f64,
}

impl LoseHealthAnimation {
    pub fn new(amount: i32, offset: DVec2, rise: f64) -> Self {
        Self {
            amount,
            offset,
            rise,
            elapsed_ms: 0.0,
        }
    }

    pub fn update(&mut self, delta_ms: f64) {
        self.elapsed_ms += delta_ms;
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed_ms >= LOSE_HEALTH_DURATION_MS
    }

    pub fn draw(&self, owner_pos: DVec2, text_size: f32, out: &mut Vec<DrawInstruction>) {
        let t = (self.elapsed_ms / LOSE_HEALTH_DURATION_MS).min(1.0);
        let pos = owner_pos + self.offset - DVec2::new(0.0, self.rise * t);
        let alpha = ((1.0 - t) * 255.0) as u8;
        out.push(DrawInstruction::text(
            format!("-{}", self.amount),
            pos.x,
            pos.y,
            colors::DAMAGE_TEXT.with_alpha(alpha),
            text_size,
        ));
    }
}
