//! Press/move/release tracking that tells a click apart from an orbit drag.

use glam::Vec2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragMode {
    Rotate,
    Pan,
}

#[derive(Clone, Copy, Debug)]
struct Press {
    origin: Vec2,
    last: Vec2,
    mode: DragMode,
    dragging: bool,
}

/// One pointer's gesture. Positions are CSS pixels.
#[derive(Clone, Copy, Debug)]
pub struct PointerGesture {
    threshold: f32,
    press: Option<Press>,
}

impl PointerGesture {
    pub fn new(threshold_px: f32) -> Self {
        Self {
            threshold: threshold_px.max(0.0),
            press: None,
        }
    }

    pub fn press(&mut self, pos: Vec2, mode: DragMode) {
        self.press = Some(Press {
            origin: pos,
            last: pos,
            mode,
            dragging: false,
        });
    }

    pub fn is_pressed(&self) -> bool {
        self.press.is_some()
    }

    pub fn is_dragging(&self) -> bool {
        self.press.map(|p| p.dragging).unwrap_or(false)
    }

    /// Movement to feed the orbit controller, once the press has travelled
    /// past the threshold. Nothing is reported before that.
    pub fn move_to(&mut self, pos: Vec2) -> Option<(DragMode, Vec2)> {
        let p = self.press.as_mut()?;
        if !p.dragging {
            if pos.distance(p.origin) <= self.threshold {
                return None;
            }
            p.dragging = true;
        }
        let delta = pos - p.last;
        p.last = pos;
        Some((p.mode, delta))
    }

    /// Ends the press. Returns true when it was a click.
    pub fn release(&mut self) -> bool {
        matches!(self.press.take(), Some(p) if !p.dragging)
    }

    pub fn cancel(&mut self) {
        self.press = None;
    }
}
