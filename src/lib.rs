//! Analog clock watch face for the PineTime
//!
//! The face core is hardware independent: the host (firmware or desktop
//! simulator) feeds it wall-clock ticks, animation frames and unobstructed
//! area changes, and paints it through a [`ui::canvas::Canvas`].

#![no_std]

#[cfg(test)]
extern crate std;

#[macro_use]
mod fmt;

pub mod app;
pub mod config;
pub mod system;
pub mod ui;

pub use app::{App, HostEvent};
pub use config::ClockFaceConfig;
