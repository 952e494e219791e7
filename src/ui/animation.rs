//! Tween animations
//!
//! A small stand-in for the watch OS animation service: animations are
//! scheduled with a delay, a duration and an easing curve, and the
//! [`Scheduler`] reports their progress each time the host advances it.

use core::fmt;

use embassy_time::{Duration, Instant};
use heapless::Vec;

/// Maximum number of animations in flight
pub const MAX_ANIMATIONS: usize = 4;

/// Rate of change of an animation over its duration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(target_os = "none", derive(defmt::Format))]
pub enum Curve {
    /// Quadratic ease-in-out
    EaseInOut,
}

impl Curve {
    /// Map linear progress in `[0, 1]` onto the curve
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Curve::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    let u = 2.0 - 2.0 * t;
                    1.0 - u * u / 2.0
                }
            }
        }
    }
}

/// Timing of a single animation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Animation {
    pub duration: Duration,
    pub delay: Duration,
    pub curve: Curve,
    /// Report `Started` and `Stopped` in addition to progress updates
    pub handlers: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(target_os = "none", derive(defmt::Format))]
pub struct AnimationId(pub(crate) u32);

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Phase {
    Started,
    /// Eased progress in `[0, 1]`
    Update(f32),
    /// Ran to completion
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationEvent {
    pub id: AnimationId,
    pub phase: Phase,
}

/// Animation service used by the watch face
pub trait Animator {
    /// Schedule an animation relative to `now`
    fn schedule(&mut self, animation: Animation, now: Instant) -> Result<AnimationId, Error>;

    /// Drop an animation without further events. Returns whether it was still scheduled.
    fn unschedule(&mut self, id: AnimationId) -> bool;
}

struct Entry {
    id: AnimationId,
    animation: Animation,
    /// End of the delay
    start_at: Instant,
    started: bool,
}

/// Animation scheduler driven by the host frame loop
pub struct Scheduler {
    entries: Vec<Entry, MAX_ANIMATIONS>,
    next_id: u32,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
        }
    }

    /// Whether any animation is scheduled or running
    pub fn is_active(&self) -> bool {
        !self.entries.is_empty()
    }

    /// Step all animations to `now`, reporting their events in scheduling order.
    ///
    /// Finished animations report a final `Update(1.0)` and are removed.
    pub fn advance<F>(&mut self, now: Instant, mut on_event: F)
    where
        F: FnMut(AnimationEvent),
    {
        self.entries.retain_mut(|entry| {
            if now < entry.start_at {
                return true;
            }

            let id = entry.id;
            if !entry.started {
                entry.started = true;
                if entry.animation.handlers {
                    on_event(AnimationEvent {
                        id,
                        phase: Phase::Started,
                    });
                }
            }

            let elapsed = now.saturating_duration_since(entry.start_at);
            let duration = entry.animation.duration.as_ticks();
            let raw = if duration == 0 {
                1.0
            } else {
                (elapsed.as_ticks() as f32 / duration as f32).min(1.0)
            };
            let finished = raw >= 1.0;

            on_event(AnimationEvent {
                id,
                phase: Phase::Update(entry.animation.curve.apply(raw)),
            });

            if finished {
                if entry.animation.handlers {
                    on_event(AnimationEvent {
                        id,
                        phase: Phase::Stopped,
                    });
                }
                trace!("Animation {} finished", id.0);
            }

            !finished
        });
    }
}

impl Animator for Scheduler {
    fn schedule(&mut self, animation: Animation, now: Instant) -> Result<AnimationId, Error> {
        let id = AnimationId(self.next_id);
        self.entries
            .push(Entry {
                id,
                animation,
                start_at: now + animation.delay,
                started: false,
            })
            .map_err(|_| Error::SchedulerFull)?;
        self.next_id = self.next_id.wrapping_add(1);
        Ok(id)
    }

    fn unschedule(&mut self, id: AnimationId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        before != self.entries.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(target_os = "none", derive(defmt::Format))]
pub enum Error {
    SchedulerFull,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::SchedulerFull => write!(f, "no free animation slot"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::vec::Vec;

    fn ms(millis: u64) -> Instant {
        Instant::from_millis(millis)
    }

    fn animation(duration: u64, delay: u64, handlers: bool) -> Animation {
        Animation {
            duration: Duration::from_millis(duration),
            delay: Duration::from_millis(delay),
            curve: Curve::EaseInOut,
            handlers,
        }
    }

    fn collect(scheduler: &mut Scheduler, now: Instant) -> Vec<AnimationEvent> {
        let mut events = Vec::new();
        scheduler.advance(now, |event| events.push(event));
        events
    }

    #[test]
    fn ease_in_out_hits_both_ends() {
        assert_eq!(Curve::EaseInOut.apply(0.0), 0.0);
        assert_eq!(Curve::EaseInOut.apply(0.5), 0.5);
        assert_eq!(Curve::EaseInOut.apply(1.0), 1.0);
        assert_eq!(Curve::EaseInOut.apply(1.5), 1.0);
    }

    #[test]
    fn ease_in_out_is_monotonic() {
        let mut previous = 0.0;
        for step in 0..=100 {
            let value = Curve::EaseInOut.apply(step as f32 / 100.0);
            assert!(value >= previous);
            previous = value;
        }
        assert!(Curve::EaseInOut.apply(0.25) < 0.25);
        assert!(Curve::EaseInOut.apply(0.75) > 0.75);
    }

    #[test]
    fn nothing_happens_during_delay() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(animation(500, 600, true), ms(0)).unwrap();
        assert!(collect(&mut scheduler, ms(599)).is_empty());
        assert!(scheduler.is_active());
    }

    #[test]
    fn reports_start_progress_and_stop() {
        let mut scheduler = Scheduler::new();
        let id = scheduler.schedule(animation(500, 600, true), ms(100)).unwrap();

        assert_eq!(
            collect(&mut scheduler, ms(700)),
            [
                AnimationEvent { id, phase: Phase::Started },
                AnimationEvent { id, phase: Phase::Update(0.0) },
            ]
        );
        assert_eq!(
            collect(&mut scheduler, ms(950)),
            [AnimationEvent { id, phase: Phase::Update(0.5) }]
        );
        assert_eq!(
            collect(&mut scheduler, ms(2_000)),
            [
                AnimationEvent { id, phase: Phase::Update(1.0) },
                AnimationEvent { id, phase: Phase::Stopped },
            ]
        );
        assert!(!scheduler.is_active());
        assert!(collect(&mut scheduler, ms(3_000)).is_empty());
    }

    #[test]
    fn without_handlers_only_progress_is_reported() {
        let mut scheduler = Scheduler::new();
        let id = scheduler.schedule(animation(100, 0, false), ms(0)).unwrap();

        assert_eq!(
            collect(&mut scheduler, ms(50)),
            [AnimationEvent { id, phase: Phase::Update(0.5) }]
        );
        assert_eq!(
            collect(&mut scheduler, ms(100)),
            [AnimationEvent { id, phase: Phase::Update(1.0) }]
        );
    }

    #[test]
    fn progress_is_eased() {
        let mut scheduler = Scheduler::new();
        let id = scheduler.schedule(animation(100, 0, false), ms(0)).unwrap();
        assert_eq!(
            collect(&mut scheduler, ms(25)),
            [AnimationEvent { id, phase: Phase::Update(0.125) }]
        );
    }

    #[test]
    fn zero_duration_completes_at_once() {
        let mut scheduler = Scheduler::new();
        let id = scheduler.schedule(animation(0, 0, true), ms(0)).unwrap();
        assert_eq!(
            collect(&mut scheduler, ms(0)),
            [
                AnimationEvent { id, phase: Phase::Started },
                AnimationEvent { id, phase: Phase::Update(1.0) },
                AnimationEvent { id, phase: Phase::Stopped },
            ]
        );
    }

    #[test]
    fn unscheduled_animation_goes_quiet() {
        let mut scheduler = Scheduler::new();
        let first = scheduler.schedule(animation(100, 0, true), ms(0)).unwrap();
        let second = scheduler.schedule(animation(100, 0, true), ms(0)).unwrap();
        assert_ne!(first, second);

        assert!(scheduler.unschedule(first));
        assert!(!scheduler.unschedule(first));

        let events = collect(&mut scheduler, ms(10));
        assert!(events.iter().all(|event| event.id == second));
    }

    #[test]
    fn pool_is_bounded() {
        let mut scheduler = Scheduler::new();
        for _ in 0..MAX_ANIMATIONS {
            scheduler.schedule(animation(100, 0, false), ms(0)).unwrap();
        }
        assert_eq!(
            scheduler.schedule(animation(100, 0, false), ms(0)),
            Err(Error::SchedulerFull)
        );
    }
}
