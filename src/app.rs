//! Watch app: one window hosting the clock face
//!
//! The host feeds events strictly one at a time from its event loop.

use core::fmt;

use chrono::NaiveDateTime;
use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, channel::Channel};
use embassy_time::Instant;
use embedded_graphics::{prelude::*, primitives::Rectangle};

use crate::{
    config::ClockFaceConfig,
    system::random::RandomSource,
    ui::{
        animation::{self, Scheduler},
        canvas::Canvas,
        clock_face::ClockFace,
        WatchFace,
    },
};

/// Notifications from the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    /// A new minute started
    Tick(NaiveDateTime),
    /// An overlay is about to change the viewable area to the given bounds
    UnobstructedWillChange(Rectangle),
    /// The viewable area finished changing
    UnobstructedDidChange,
}

/// Notifications the host may queue between two frames
pub const HOST_EVENT_DEPTH: usize = 4;

/// Queue of host notifications, each one applied in order
pub type HostEvents = Channel<CriticalSectionRawMutex, HostEvent, HOST_EVENT_DEPTH>;

/// Top level window
#[derive(Debug)]
struct Window {
    /// Root layer bounds
    bounds: Rectangle,
    /// Viewable part of the root layer
    unobstructed: Rectangle,
    loaded: bool,
}

pub struct App<R> {
    window: Window,
    face: ClockFace<R>,
    animations: Scheduler,
}

impl<R: RandomSource> App<R> {
    /// Initialize the app for a screen of `size` and sample the current time
    pub fn init(now: NaiveDateTime, size: Size, rng: R, config: ClockFaceConfig) -> Self {
        let mut face = ClockFace::new(rng, config);
        face.tick(&now);

        let bounds = Rectangle::new(Point::zero(), size);
        Self {
            window: Window {
                bounds,
                unobstructed: bounds,
                loaded: false,
            },
            face,
            animations: Scheduler::new(),
        }
    }

    pub fn face(&self) -> &ClockFace<R> {
        &self.face
    }

    pub fn is_loaded(&self) -> bool {
        self.window.loaded
    }

    /// Show the window: create the canvas and play the grow-in
    pub fn push_window(&mut self, now: Instant) -> Result<(), Error> {
        if self.window.loaded {
            return Ok(());
        }
        self.window.loaded = true;
        info!(
            "Window loaded ({}x{})",
            self.window.bounds.size.width,
            self.window.bounds.size.height
        );

        self.face.create_canvas(self.window.unobstructed);
        self.face.start_animation(&mut self.animations, now)?;

        Ok(())
    }

    /// Hide the window and release the canvas
    pub fn pop_window(&mut self) {
        if !self.window.loaded {
            return;
        }
        self.face.cancel_animation(&mut self.animations);
        self.face.destroy_canvas();
        self.window.loaded = false;
        info!("Window unloaded");
    }

    pub fn handle(&mut self, event: HostEvent, now: Instant) -> Result<(), Error> {
        match event {
            HostEvent::Tick(time) => {
                info!("Minute tick");
                self.face.tick(&time);
            }
            HostEvent::UnobstructedWillChange(area) => {
                debug!(
                    "Viewable area will change to {}x{}",
                    area.size.width,
                    area.size.height
                );
                self.window.unobstructed = self.window.bounds.intersection(&area);
                self.face.unobstructed_will_change();
            }
            HostEvent::UnobstructedDidChange => {
                debug!("Viewable area changed");
                let area = self.window.unobstructed;
                if let Some(layer) = self.face.layer_mut() {
                    layer.set_unobstructed_bounds(area);
                    layer.mark_dirty();
                }
                if self.window.loaded {
                    self.face.unobstructed_did_change(&mut self.animations, now)?;
                }
            }
        }

        Ok(())
    }

    /// Apply every queued notification in arrival order. Returns how many were handled.
    pub fn handle_queued(&mut self, events: &HostEvents, now: Instant) -> usize {
        let mut handled = 0;
        while let Ok(event) = events.try_receive() {
            if let Err(e) = self.handle(event, now) {
                warn!("Host event failed: {}", e);
            }
            handled += 1;
        }
        handled
    }

    /// Step running animations to `now`
    pub fn advance(&mut self, now: Instant) {
        let Self {
            face, animations, ..
        } = self;
        animations.advance(now, |event| face.on_animation(event));
    }

    /// Whether animations are still scheduled or running
    pub fn is_animating(&self) -> bool {
        self.animations.is_active()
    }

    /// Paint the face if a redraw was requested. Returns whether a frame was painted.
    pub fn render<C: Canvas>(&mut self, canvas: &mut C) -> Result<bool, Error> {
        let dirty = match self.face.layer_mut() {
            Some(layer) => layer.take_dirty(),
            None => false,
        };
        if !dirty {
            return Ok(false);
        }

        self.face.draw(canvas).map_err(|_| Error::Draw)?;
        trace!(
            "Painted frame, radius {}",
            self.face.state().radius
        );

        Ok(true)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(target_os = "none", derive(defmt::Format))]
pub enum Error {
    /// Animation could not be scheduled
    Animation(animation::Error),
    /// The display rejected a drawing command
    Draw,
}

impl From<animation::Error> for Error {
    fn from(e: animation::Error) -> Self {
        Error::Animation(e)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Animation(e) => write!(f, "animation failed: {e}"),
            Error::Draw => write!(f, "drawing failed"),
        }
    }
}
