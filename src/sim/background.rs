//! Scrolling starfield behind the game area

use rand::Rng;
use rand_pcg::Pcg32;

use crate::Rect;
use crate::consts::BASE_DIFFICULTY;
use crate::draw::instruction::{Color, DrawInstruction, colors};
use crate::settings::Dimensions;

const NUM_STARS: usize = 60;

#[derive(Debug, Clone)]
struct Star {
    x: f64,
    y: f64,
    size: f64,
    /// Fraction of the map scroll speed this star moves at
    parallax: f64,
}

#[derive(Debug, Clone)]
pub struct Background {
    dims: Dimensions,
    stars: Vec<Star>,
    color: Color,
}

impl Background {
    pub fn new(dims: Dimensions, rng: &mut Pcg32) -> Self {
        let stars = (0..NUM_STARS)
            .map(|_| Star {
                x: rng.random_range(0.0..dims.game_width),
                y: rng.random_range(0.0..dims.game_height),
                size: rng.random_range(1.0..3.0),
                parallax: rng.random_range(0.1..0.5),
            })
            .collect();
        Self {
            dims,
            stars,
            color: colors::SPACE_CALM,
        }
    }

    pub fn color(&self) -> Color {
        self.color
    }

    /// Drift the stars and shift the sky color toward hostile as difficulty rises
    pub fn update(&mut self, scroll_speed: f64, delta_s: f64, difficulty: f64) {
        for star in &mut self.stars {
            star.x -= scroll_speed * star.parallax * delta_s;
            if star.x + star.size < 0.0 {
                star.x += self.dims.game_width + star.size;
            }
        }
        let t = (difficulty - BASE_DIFFICULTY) / (1.0 - BASE_DIFFICULTY);
        self.color = colors::SPACE_CALM.lerp(colors::SPACE_HOSTILE, t);
    }

    pub fn draw(&self, out: &mut Vec<DrawInstruction>) {
        out.push(DrawInstruction::fill_rect(
            Rect::new(0.0, 0.0, self.dims.game_width, self.dims.game_height),
            self.color,
        ));
        for star in &self.stars {
            out.push(DrawInstruction::fill_rect(
                Rect::new(star.x, star.y, star.size, star.size),
                colors::STAR,
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_sky_color_follows_difficulty() {
        let dims = Dimensions::from_screen(1000, 600);
        let mut rng = Pcg32::seed_from_u64(0);
        let mut bg = Background::new(dims, &mut rng);
        bg.update(0.0, 0.0, BASE_DIFFICULTY);
        assert_eq!(bg.color(), colors::SPACE_CALM);
        bg.update(0.0, 0.0, 1.0);
        assert_eq!(bg.color(), colors::SPACE_HOSTILE);
    }

    #[test]
    fn test_stars_wrap_and_stay_in_view() {
        let dims = Dimensions::from_screen(1000, 600);
        let mut rng = Pcg32::seed_from_u64(0);
        let mut bg = Background::new(dims, &mut rng);
        for _ in 0..500 {
            bg.update(500.0, 0.1, 0.5);
        }
        let mut out = Vec::new();
        bg.draw(&mut out);
        assert_eq!(out.len(), NUM_STARS + 1);
        for instr in &out[1..] {
            match instr {
                DrawInstruction::Rect { rect, .. } => {
                    assert!(rect.right() >= 0.0 && rect.x <= dims.game_width)
                }
                other => panic!("unexpected instruction {other:?}"),
            }
        }
    }
}
