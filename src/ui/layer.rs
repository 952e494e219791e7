//! Canvas layer geometry and redraw requests

use embedded_graphics::{prelude::*, primitives::Rectangle};

/// The single drawable layer of the clock window
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    /// Full layer area
    bounds: Rectangle,
    /// Area not covered by system overlays
    unobstructed: Rectangle,
    /// Set when a repaint was requested
    dirty: bool,
}

impl Layer {
    /// Create a layer covering `bounds`, marked dirty so the first frame is painted
    pub fn new(bounds: Rectangle) -> Self {
        Self {
            bounds,
            unobstructed: bounds,
            dirty: true,
        }
    }

    pub fn bounds(&self) -> Rectangle {
        self.bounds
    }

    pub fn unobstructed_bounds(&self) -> Rectangle {
        self.unobstructed
    }

    /// Update the viewable area, clipped to the layer
    pub fn set_unobstructed_bounds(&mut self, area: Rectangle) {
        self.unobstructed = self.bounds.intersection(&area);
    }

    /// Request a repaint. Repeated requests before the next paint coalesce.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Consume a pending repaint request
    pub fn take_dirty(&mut self) -> bool {
        core::mem::replace(&mut self.dirty, false)
    }
}
