//! Renderer-agnostic drawing
//!
//! The engine never paints pixels. Each tick it emits an ordered list of
//! `DrawInstruction`s for the presentation layer to execute.

pub mod instruction;
pub mod layers;

pub use instruction::{BitmapId, Color, ColorFilter, DrawInstruction, FontId, RectStyle};
pub use layers::DrawLayers;
