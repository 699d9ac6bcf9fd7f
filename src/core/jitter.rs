use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt;
use std::sync::Mutex;

/// Source of the random perturbation added to matching scores
///
/// `sample` returns a value in `[0, 1)`; scoring scales it to the jitter span.
pub trait JitterSource: Send + Sync + fmt::Debug {
    fn sample(&self) -> f64;
}

/// Thread-local RNG, the production default
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadJitter;

impl JitterSource for ThreadJitter {
    fn sample(&self) -> f64 {
        rand::thread_rng().gen::<f64>()
    }
}

/// Seeded generator for reproducible runs
#[derive(Debug)]
pub struct SeededJitter {
    rng: Mutex<StdRng>,
}

impl SeededJitter {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl JitterSource for SeededJitter {
    fn sample(&self) -> f64 {
        match self.rng.lock() {
            Ok(mut rng) => rng.gen::<f64>(),
            // A poisoned lock still holds a valid generator
            Err(poisoned) => poisoned.into_inner().gen::<f64>(),
        }
    }
}

/// Constant sample, clamped into `[0, 1)`
#[derive(Debug, Clone, Copy)]
pub struct FixedJitter(pub f64);

impl JitterSource for FixedJitter {
    fn sample(&self) -> f64 {
        if self.0.is_nan() {
            return 0.0;
        }
        self.0.clamp(0.0, 1.0 - f64::EPSILON)
    }
}
