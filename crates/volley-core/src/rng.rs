//! Injectable randomness for the simulation.
//!
//! All stochastic draws in the engine go through the [`Dice`] trait rather
//! than calling into `rand` directly. Tests substitute a seeded source to
//! get bit-reproducible trials, and batch runs hand each trial its own
//! independent stream.

use rand::Rng;
use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// The canonical seeded RNG used for reproducible runs.
pub type SimRng = ChaCha8Rng;

/// Creates a deterministic [`SimRng`] from a seed.
#[must_use]
pub fn seeded(seed: u64) -> SimRng {
    SimRng::seed_from_u64(seed)
}

/// Uniform random draws, as the simulation consumes them.
///
/// Implemented for every [`rand::Rng`], so a `ChaCha8Rng`, a thread RNG, or
/// a test double all plug in directly.
pub trait Dice {
    /// Uniform integer in the inclusive range `[min, max]`.
    fn roll(&mut self, min: i32, max: i32) -> i32;

    /// Uniform fraction in `[0, 1)`.
    fn fraction(&mut self) -> f64;

    /// Percentile check: true with probability `chance / 100`.
    ///
    /// The chance may be fractional (core disruption rolls at half the
    /// weapon's listed chance); the draw itself is a whole number in
    /// `[0, 99]`, matching the resolution of the listed percentages.
    fn percent(&mut self, chance: f64) -> bool {
        f64::from(self.roll(0, 99)) < chance
    }
}

impl<R: Rng> Dice for R {
    fn roll(&mut self, min: i32, max: i32) -> i32 {
        self.gen_range(min..=max)
    }

    fn fraction(&mut self) -> f64 {
        self.gen::<f64>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roll_stays_in_range() {
        let mut rng = seeded(1);
        for _ in 0..1000 {
            let v = rng.roll(5, 24);
            assert!((5..=24).contains(&v));
        }
    }

    #[test]
    fn roll_is_inclusive_of_both_ends() {
        let mut rng = seeded(2);
        let mut seen = [false; 3];
        for _ in 0..1000 {
            seen[usize::try_from(rng.roll(0, 2)).unwrap()] = true;
        }
        assert_eq!(seen, [true, true, true]);
    }

    #[test]
    fn percent_zero_never_fires() {
        let mut rng = seeded(3);
        for _ in 0..1000 {
            assert!(!rng.percent(0.0));
        }
    }

    #[test]
    fn percent_hundred_always_fires() {
        let mut rng = seeded(4);
        for _ in 0..1000 {
            assert!(rng.percent(100.0));
        }
    }

    #[test]
    fn same_seed_same_stream() {
        let mut a = seeded(99);
        let mut b = seeded(99);
        for _ in 0..100 {
            assert_eq!(a.roll(0, 1000), b.roll(0, 1000));
        }
    }
}
