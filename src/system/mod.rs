//! Host services the clock face relies on

pub mod random;
pub mod time;
