//! Random bytes for the background palette

/// Source of uniformly distributed bytes
pub trait RandomSource {
    fn next_byte(&mut self) -> u8;
}

impl RandomSource for fastrand::Rng {
    fn next_byte(&mut self) -> u8 {
        self.u8(..)
    }
}

/// Seed the system generator once from the wall clock
pub fn seeded(timestamp: i64) -> fastrand::Rng {
    fastrand::Rng::with_seed(timestamp as u64)
}
