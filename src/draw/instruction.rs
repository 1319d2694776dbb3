//! Draw instruction types
//!
//! Renderer-agnostic descriptions of single paint operations. The presentation
//! layer maps `BitmapId`/`FontId` to its own assets.

use serde::{Deserialize, Serialize};

use crate::Rect;

/// RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Same color with a new alpha
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Linear blend toward `other` by `t` in [0, 1]
    pub fn lerp(self, other: Color, t: f64) -> Color {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Color {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: mix(self.a, other.a),
        }
    }
}

/// Colors for game elements
pub mod colors {
    use super::Color;

    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const SPACE_CALM: Color = Color::rgb(4, 6, 20);
    pub const SPACE_HOSTILE: Color = Color::rgb(30, 4, 22);
    pub const STAR: Color = Color::rgb(220, 220, 255);
    pub const HEALTH_GOOD: Color = Color::rgb(60, 200, 90);
    pub const HEALTH_LOW: Color = Color::rgb(220, 60, 50);
    pub const HEALTH_FRAME: Color = Color::rgb(180, 180, 190);
    pub const DAMAGE_TEXT: Color = Color::rgb(255, 90, 70);
    pub const OVERLAY: Color = Color::rgba(0, 0, 0, 160);
    pub const HITBOX: Color = Color::rgb(255, 0, 0);
    pub const UI_BOUNDS: Color = Color::rgb(0, 255, 0);
}

/// Bitmaps the engine refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BitmapId {
    Spaceship,
    SpaceshipMove,
    SpaceshipExplode,
    Bullet,
    AlienBullet,
    Obstacle,
    Coin,
    Alien,
    AlienExplode,
    Asteroid,
    PauseButton,
    PlayButton,
    MuteButtonMuted,
    MuteButtonUnmuted,
    ShootButton,
    ShootButtonPressed,
}

/// Fonts the engine refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FontId {
    Monospace,
    Display,
}

/// Color adjustment applied when drawing an image
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorFilter {
    /// Added brightness in [0, 1] (1 = fully white)
    pub brightness: f32,
    /// Opacity in [0, 1]
    pub alpha: f32,
}

impl ColorFilter {
    pub const fn flash(brightness: f32) -> Self {
        Self {
            brightness,
            alpha: 1.0,
        }
    }
}

/// How a rectangle is painted
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RectStyle {
    Fill,
    Outline { stroke_width: f32 },
}

/// One renderer-agnostic paint operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawInstruction {
    /// Draw (a region of) a bitmap at a position or into a destination rectangle
    Image {
        bitmap: BitmapId,
        x: f64,
        y: f64,
        /// Source region of the bitmap (None = whole bitmap)
        src: Option<Rect>,
        /// Destination rectangle (None = natural size at x/y)
        dst: Option<Rect>,
        /// Degrees of rotation about the image center
        rotation_deg: f32,
        filter: Option<ColorFilter>,
    },
    /// Filled or outlined rectangle
    Rect {
        rect: Rect,
        color: Color,
        style: RectStyle,
    },
    /// Text anchored at its bottom-left corner
    Text {
        text: String,
        x: f64,
        y: f64,
        color: Color,
        size: f32,
        font: FontId,
    },
}

impl DrawInstruction {
    /// Plain bitmap at a position
    pub fn image(bitmap: BitmapId, x: f64, y: f64) -> Self {
        DrawInstruction::Image {
            bitmap,
            x,
            y,
            src: None,
            dst: None,
            rotation_deg: 0.0,
            filter: None,
        }
    }

    /// Bitmap scaled into a destination rectangle
    pub fn image_into(bitmap: BitmapId, dst: Rect) -> Self {
        DrawInstruction::Image {
            bitmap,
            x: dst.x,
            y: dst.y,
            src: None,
            dst: Some(dst),
            rotation_deg: 0.0,
            filter: None,
        }
    }

    pub fn fill_rect(rect: Rect, color: Color) -> Self {
        DrawInstruction::Rect {
            rect,
            color,
            style: RectStyle::Fill,
        }
    }

    pub fn outline_rect(rect: Rect, color: Color, stroke_width: f32) -> Self {
        DrawInstruction::Rect {
            rect,
            color,
            style: RectStyle::Outline { stroke_width },
        }
    }

    pub fn text(text: impl Into<String>, x: f64, y: f64, color: Color, size: f32) -> Self {
        DrawInstruction::Text {
            text: text.into(),
            x,
            y,
            color,
            size,
            font: FontId::Monospace,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_lerp() {
        let mid = colors::BLACK.lerp(colors::WHITE, 0.5);
        assert_eq!(mid, Color::rgb(128, 128, 128));
        assert_eq!(colors::BLACK.lerp(colors::WHITE, 2.0), colors::WHITE);
    }

    #[test]
    fn test_image_into_uses_dst_origin() {
        let dst = Rect::new(5.0, 6.0, 20.0, 20.0);
        match DrawInstruction::image_into(BitmapId::PauseButton, dst) {
            DrawInstruction::Image { x, y, dst: Some(d), .. } => {
                assert_eq!((x, y), (5.0, 6.0));
                assert_eq!(d, dst);
            }
            other => panic!("unexpected instruction {other:?}"),
        }
    }
}
