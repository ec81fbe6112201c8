use rand::Rng;
use std::f64::consts::{PI, TAU};

use super::alert::AlertMode;

/// Source of the random draws behind a single step attempt.
pub trait MoveSampler {
    /// Heading in radians.
    fn heading(&mut self, alert: AlertMode) -> f64;
    /// Unscaled step length in [0, 1).
    fn step_length(&mut self) -> f64;
}

/// Uniform over [0, 2π), or over [π, 2π) while the alert is on. The alert arc
/// is a fixed half-plane of headings, not a direction computed from the coastline.
pub fn sample_heading<R: Rng + ?Sized>(rng: &mut R, alert: AlertMode) -> f64 {
    if alert.is_on() {
        rng.gen_range(PI..TAU)
    } else {
        rng.gen_range(0.0..TAU)
    }
}

/// Production sampler. Also lends its generator to the rest of the service so
/// a single seed drives every draw.
#[derive(Debug, Clone)]
pub struct RngMoveSampler<R> {
    rng: R,
}

impl<R: Rng> RngMoveSampler<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }
}

impl<R: Rng> MoveSampler for RngMoveSampler<R> {
    fn heading(&mut self, alert: AlertMode) -> f64 {
        sample_heading(&mut self.rng, alert)
    }

    fn step_length(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}
