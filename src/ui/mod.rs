//! In-game UI
//!
//! Buttons and overlays are driven by the abstract `Motion` inputs. Each pointer is
//! tracked from DOWN to UP so an element sees enter/leave/release events even with
//! several fingers on screen.

pub mod element;

use std::collections::HashMap;

pub use element::{ElementKind, UiElement, UiInput, UiView, shoot_button_bounds};

use crate::audio::SoundId;
use crate::draw::instruction::{DrawInstruction, colors};
use crate::platform::input::MotionPhase;
use crate::settings::Dimensions;

pub struct GameUi {
    elements: Vec<UiElement>,
    /// Pointer id -> element currently under it
    touches: HashMap<u32, Option<usize>>,
    inputs: Vec<UiInput>,
    sounds: Vec<SoundId>,
    debug: bool,
}

impl GameUi {
    pub fn new(dims: &Dimensions, max_health: i32, debug: bool) -> Self {
        Self {
            elements: element::layout(dims, max_health),
            touches: HashMap::new(),
            inputs: Vec::new(),
            sounds: Vec::new(),
            debug,
        }
    }

    pub fn elements(&self) -> &[UiElement] {
        &self.elements
    }

    /// Front-most touchable element at the point
    fn hit_test(&self, x: f64, y: f64) -> Option<usize> {
        self.elements
            .iter()
            .position(|e| e.is_touchable() && e.bounds.contains(x, y))
    }

    pub fn input_motion(&mut self, pointer_id: u32, phase: MotionPhase, x: f32, y: f32) {
        let (x, y) = (x as f64, y as f64);
        match phase {
            MotionPhase::Down => {
                if self.touches.contains_key(&pointer_id) {
                    log::warn!("Ignoring second DOWN for pointer {pointer_id}");
                    return;
                }
                self.touch_down(pointer_id, x, y);
            }
            MotionPhase::Move => {
                let Some(&current) = self.touches.get(&pointer_id) else {
                    log::warn!("MOVE without DOWN for pointer {pointer_id}, treating as DOWN");
                    self.touch_down(pointer_id, x, y);
                    return;
                };
                let target = self.hit_test(x, y);
                if target != current {
                    if let Some(i) = current {
                        self.elements[i].on_touch_leave();
                    }
                    if let Some(i) = target {
                        self.elements[i].on_touch_enter();
                    }
                    self.touches.insert(pointer_id, target);
                }
            }
            MotionPhase::Up => match self.touches.remove(&pointer_id) {
                Some(Some(i)) => {
                    self.elements[i].on_touch_release(&mut self.inputs, &mut self.sounds)
                }
                Some(None) => {}
                None => log::warn!("Ignoring UP without DOWN for pointer {pointer_id}"),
            },
            MotionPhase::Cancel => {
                if let Some(Some(i)) = self.touches.remove(&pointer_id) {
                    self.elements[i].on_touch_leave();
                }
            }
        }
    }

    fn touch_down(&mut self, pointer_id: u32, x: f64, y: f64) {
        let target = self.hit_test(x, y);
        if let Some(i) = target {
            self.elements[i].on_touch_enter();
        }
        self.touches.insert(pointer_id, target);
    }

    /// Inputs generated since the last poll, including held buttons
    pub fn poll_inputs(&mut self) -> Vec<UiInput> {
        let mut inputs = std::mem::take(&mut self.inputs);
        for element in &self.elements {
            element.poll_held(&mut inputs);
        }
        inputs
    }

    pub fn poll_sounds(&mut self) -> Vec<SoundId> {
        std::mem::take(&mut self.sounds)
    }

    pub fn update(&mut self, view: &UiView, delta_ms: f64) {
        for element in &mut self.elements {
            element.update(view, delta_ms);
        }
        // Hidden elements dropped their presses; forget pointers that pointed at them
        let elements = &self.elements;
        for target in self.touches.values_mut() {
            if target.is_some_and(|i| !elements[i].visible) {
                *target = None;
            }
        }
    }

    /// Draw back to front (reverse registration order)
    pub fn draw(&self, out: &mut Vec<DrawInstruction>) {
        for element in self.elements.iter().rev() {
            element.draw(out);
            if self.debug && element.visible {
                out.push(DrawInstruction::outline_rect(
                    element.bounds,
                    colors::UI_BOUNDS,
                    1.0,
                ));
            }
        }
    }
}
