//! Seeded randomness and small vector helpers

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Shared seeded random source handed to every scene
#[derive(Clone)]
pub struct Random {
    rng: Rc<RefCell<Pcg32>>,
}

impl Random {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Rc::new(RefCell::new(Pcg32::seed_from_u64(seed))),
        }
    }

    /// Random integer in `[min, max]`, both ends included
    pub fn between(&self, min: i32, max: i32) -> i32 {
        if min >= max {
            return min;
        }
        self.rng.borrow_mut().random_range(min..=max)
    }
}

/// Unit vector pointing from `from` to `to`, zero when they coincide
#[inline]
pub fn direction(from: Vec2, to: Vec2) -> Vec2 {
    (to - from).normalize_or_zero()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_between_is_inclusive_and_seeded() {
        let a = Random::new(42);
        let b = Random::new(42);
        let mut saw_min = false;
        let mut saw_max = false;
        for _ in 0..500 {
            let v = a.between(0, 3);
            assert_eq!(v, b.between(0, 3));
            assert!((0..=3).contains(&v));
            saw_min |= v == 0;
            saw_max |= v == 3;
        }
        assert!(saw_min && saw_max);
    }

    #[test]
    fn test_degenerate_ranges() {
        let rng = Random::new(1);
        assert_eq!(rng.between(5, 5), 5);
        assert_eq!(rng.between(9, 2), 9);
    }

    #[test]
    fn test_direction_of_zero_vector() {
        assert_eq!(direction(Vec2::ONE, Vec2::ONE), Vec2::ZERO);
        let d = direction(Vec2::ZERO, Vec2::new(3.0, 4.0));
        assert!((d.length() - 1.0).abs() < 1e-6);
    }
}
