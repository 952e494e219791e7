//! Analog clock face with a grow-in animation

use chrono::Timelike;
use embassy_time::Instant;
use embedded_graphics::{pixelcolor::Rgb888, primitives::Rectangle};

use super::{
    animation::{Animation, AnimationEvent, AnimationId, Animator, Curve, Error, Phase},
    canvas::Canvas,
    layer::Layer,
    renderer, WatchFace,
};
use crate::{
    config::ClockFaceConfig,
    system::{
        random::RandomSource,
        time::{hours_to_minutes, ClockReading},
    },
};

/// Background color channels
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Palette(pub [u8; 3]);

impl Palette {
    fn random<R: RandomSource>(rng: &mut R) -> Self {
        Self([rng.next_byte(), rng.next_byte(), rng.next_byte()])
    }

    pub fn color(&self) -> Rgb888 {
        let [r, g, b] = self.0;
        Rgb888::new(r, g, b)
    }
}

/// Everything the renderer reads
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ClockViewState {
    /// Last wall-clock sample
    pub last: ClockReading,
    /// Interpolated reading, only meaningful while `animating`
    pub animated: ClockReading,
    pub palette: Palette,
    /// Current face radius in pixels
    pub radius: u32,
    /// Radius at the end of the grow-in, fixed per canvas
    pub final_radius: u32,
    /// Set between the start and stop of the hand sweep
    pub animating: bool,
}

impl ClockViewState {
    /// Reading the hands should show
    pub fn mode_time(&self) -> ClockReading {
        if self.animating {
            self.animated
        } else {
            self.last
        }
    }
}

/// Animations of the current grow-in
#[derive(Debug, Clone, Copy)]
struct GrowIn {
    radius: AnimationId,
    hands: AnimationId,
}

/// Scale `max` by animation progress, rounding down
fn anim_percentage(progress: f32, max: u32) -> u32 {
    (progress.clamp(0.0, 1.0) * max as f32) as u32
}

pub struct ClockFace<R> {
    state: ClockViewState,
    /// Canvas layer, present while the window is loaded
    layer: Option<Layer>,
    grow_in: Option<GrowIn>,
    rng: R,
    config: ClockFaceConfig,
}

impl<R: RandomSource> ClockFace<R> {
    pub fn new(rng: R, config: ClockFaceConfig) -> Self {
        Self {
            state: ClockViewState::default(),
            layer: None,
            grow_in: None,
            rng,
            config,
        }
    }

    pub fn state(&self) -> &ClockViewState {
        &self.state
    }

    pub fn layer(&self) -> Option<&Layer> {
        self.layer.as_ref()
    }

    pub fn layer_mut(&mut self) -> Option<&mut Layer> {
        self.layer.as_mut()
    }

    pub fn config(&self) -> &ClockFaceConfig {
        &self.config
    }

    fn mark_dirty(&mut self) {
        if let Some(layer) = self.layer.as_mut() {
            layer.mark_dirty();
        }
    }

    /// Sample a new wall-clock time and pick a new background
    pub fn tick<T: Timelike>(&mut self, time: &T) {
        self.state.last = ClockReading::from_time(time);
        self.state.palette = Palette::random(&mut self.rng);
        debug!(
            "Tick {}:{} (shown as {}:{})",
            time.hour(),
            time.minute(),
            self.state.last.hours,
            self.state.last.minutes
        );

        self.mark_dirty();
    }

    /// Create the canvas layer inside the window's viewable area
    pub fn create_canvas(&mut self, bounds: Rectangle) {
        self.state.final_radius = self.config.final_radius(bounds.size.width);
        // A new canvas always grows in from nothing
        self.state.radius = 0;
        self.state.animated = ClockReading::default();
        self.layer = Some(Layer::new(bounds));
        info!("Canvas created, final radius {}", self.state.final_radius);
    }

    pub fn destroy_canvas(&mut self) {
        self.layer = None;
    }

    /// Play the grow-in: radius first, then the coupled hour/minute sweep
    pub fn start_animation<A: Animator>(&mut self, animator: &mut A, now: Instant) -> Result<(), Error> {
        self.cancel_animation(animator);

        let radius = Animation {
            duration: self.config.animation_duration,
            delay: self.config.animation_delay,
            curve: Curve::EaseInOut,
            handlers: false,
        };
        let hands = Animation {
            duration: self.config.hands_duration(),
            handlers: true,
            ..radius
        };

        let radius = animator.schedule(radius, now)?;
        let hands = match animator.schedule(hands, now) {
            Ok(hands) => hands,
            Err(e) => {
                animator.unschedule(radius);
                return Err(e);
            }
        };
        self.grow_in = Some(GrowIn { radius, hands });
        debug!("Grow-in scheduled");

        Ok(())
    }

    /// Drop a grow-in that is still scheduled or running
    pub fn cancel_animation<A: Animator>(&mut self, animator: &mut A) {
        if let Some(grow_in) = self.grow_in.take() {
            animator.unschedule(grow_in.radius);
            if animator.unschedule(grow_in.hands) && self.state.animating {
                self.state.animating = false;
                self.mark_dirty();
            }
        }
    }

    /// Apply an event reported by the animation service
    pub fn on_animation(&mut self, event: AnimationEvent) {
        let Some(grow_in) = self.grow_in else {
            return;
        };

        if event.id == grow_in.radius {
            if let Phase::Update(progress) = event.phase {
                self.state.radius = anim_percentage(progress, self.state.final_radius);
                self.mark_dirty();
            }
        } else if event.id == grow_in.hands {
            match event.phase {
                Phase::Started => {
                    self.state.animating = true;
                    debug!("Hand sweep started");
                }
                Phase::Update(progress) => {
                    let hours = hours_to_minutes(self.state.last.hours) as u32;
                    let minutes = self.state.last.minutes as u32;
                    self.state.animated = ClockReading {
                        hours: anim_percentage(progress, hours) as u8,
                        minutes: anim_percentage(progress, minutes) as u8,
                    };
                    self.mark_dirty();
                }
                Phase::Stopped => {
                    self.state.animating = false;
                    self.grow_in = None;
                    debug!("Hand sweep stopped");
                }
            }
        }
    }

    /// Fires once before an overlay appears or disappears
    pub fn unobstructed_will_change(&mut self) {
        if self.state.animating {
            return;
        }
        // Reset the clock animation
        self.state.radius = 0;
        self.state.animated = ClockReading::default();
        self.mark_dirty();
    }

    /// Fires once after an overlay appeared or disappeared
    pub fn unobstructed_did_change<A: Animator>(
        &mut self,
        animator: &mut A,
        now: Instant,
    ) -> Result<(), Error> {
        if self.state.animating {
            return Ok(());
        }
        self.start_animation(animator, now)
    }
}

impl<R> WatchFace for ClockFace<R> {
    fn draw<C: Canvas>(&self, canvas: &mut C) -> Result<(), C::Error> {
        match self.layer.as_ref() {
            Some(layer) => renderer::render(&self.state, layer, &self.config, canvas),
            None => Ok(()),
        }
    }
}
