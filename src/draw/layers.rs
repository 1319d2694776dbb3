//! Entity draw ordering
//!
//! Entities are bucketed by draw layer each tick. Within a layer they keep
//! insertion order, so the output is fully deterministic.

use super::instruction::{DrawInstruction, colors};
use crate::error::EngineError;
use crate::sim::entity::Entity;

/// Per-layer entity indices
#[derive(Debug, Clone)]
pub struct DrawLayers {
    layers: Vec<Vec<usize>>,
}

impl DrawLayers {
    pub fn new(num_layers: usize) -> Self {
        Self {
            layers: vec![Vec::new(); num_layers],
        }
    }

    pub fn clear(&mut self) {
        for layer in &mut self.layers {
            layer.clear();
        }
    }

    pub fn add(&mut self, index: usize, layer: usize) -> Result<(), EngineError> {
        let num_layers = self.layers.len();
        self.layers
            .get_mut(layer)
            .ok_or(EngineError::DrawLayerOutOfRange { layer, num_layers })?
            .push(index);
        Ok(())
    }

    /// Bucket every entity by its layer, replacing the previous contents
    pub fn rebuild(&mut self, entities: &[Entity]) -> Result<(), EngineError> {
        self.clear();
        for (index, entity) in entities.iter().enumerate() {
            self.add(index, entity.draw_layer())?;
        }
        Ok(())
    }

    /// Draw layers in ascending order, with hitbox outlines after each entity in debug
    pub fn draw(&self, entities: &[Entity], debug: bool, out: &mut Vec<DrawInstruction>) {
        for &index in self.layers.iter().flatten() {
            let Some(entity) = entities.get(index) else {
                continue;
            };
            entity.draw(out);
            if debug {
                out.push(DrawInstruction::outline_rect(
                    entity.body.hitbox_rect(),
                    colors::HITBOX,
                    1.0,
                ));
            }
        }
    }
}
