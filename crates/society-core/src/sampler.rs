//! Stochastic Sampler
//!
//! Poisson-distributed counts drawn from a seeded generator. Every rule of a
//! run draws from the same sampler, in a fixed order, so a seed fully
//! determines a trajectory.

use std::collections::VecDeque;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Rate above which the chunked algorithm is used; also the chunk size.
///
/// `exp(-STEP)` and `exp(STEP)` are both comfortably inside `f64` range.
pub const STEP: f64 = 500.0;

/// Source of Poisson-distributed counts.
pub trait PoissonSampler {
    /// Draws a count with mean `lambda`.
    ///
    /// `lambda` must be finite and `>= 0`; a zero rate returns 0 without
    /// consuming randomness.
    fn next_poisson(&mut self, lambda: f64) -> u64;
}

impl<S: PoissonSampler + ?Sized> PoissonSampler for &mut S {
    fn next_poisson(&mut self, lambda: f64) -> u64 {
        (**self).next_poisson(lambda)
    }
}

impl<S: PoissonSampler + ?Sized> PoissonSampler for Box<S> {
    fn next_poisson(&mut self, lambda: f64) -> u64 {
        (**self).next_poisson(lambda)
    }
}

/// Seeded random number generator for a simulation run.
#[derive(Debug, Clone)]
pub struct SimRng(pub SmallRng);

impl SimRng {
    pub fn seeded(seed: u64) -> Self {
        Self(SmallRng::seed_from_u64(seed))
    }

    /// Non-reproducible generator seeded from the OS.
    pub fn from_entropy() -> Self {
        Self(SmallRng::from_entropy())
    }

    /// Seed 0 means "no fixed seed".
    pub fn from_config_seed(seed: u64) -> Self {
        if seed == 0 {
            Self::from_entropy()
        } else {
            Self::seeded(seed)
        }
    }

    /// Uniform draw in `[0, 1)`.
    pub fn next_uniform(&mut self) -> f64 {
        self.0.gen::<f64>()
    }

    /// Multiplies uniforms until the product drops to `exp(-lambda)`.
    fn poisson_direct(&mut self, lambda: f64) -> u64 {
        let limit = (-lambda).exp();
        let mut k = 0;
        let mut p = self.next_uniform();
        while p > limit {
            k += 1;
            p *= self.next_uniform();
        }
        k
    }

    /// Same product, rescaled by `exp(STEP)` chunks of the remaining rate
    /// whenever it falls below 1, so neither `exp(-lambda)` nor the product
    /// underflows.
    fn poisson_chunked(&mut self, lambda: f64) -> u64 {
        let step_factor = STEP.exp();
        let mut remaining = lambda;
        let mut k = 0;
        let mut p = 1.0;
        loop {
            p *= self.next_uniform();
            while p < 1.0 && remaining > 0.0 {
                if remaining > STEP {
                    p *= step_factor;
                    remaining -= STEP;
                } else {
                    p *= remaining.exp();
                    remaining = 0.0;
                }
            }
            if p <= 1.0 {
                return k;
            }
            k += 1;
        }
    }
}

impl PoissonSampler for SimRng {
    fn next_poisson(&mut self, lambda: f64) -> u64 {
        debug_assert!(
            lambda >= 0.0 && lambda.is_finite(),
            "invalid Poisson rate {}",
            lambda
        );
        // Also covers NaN and negative rates in release builds.
        if !(lambda > 0.0) {
            return 0;
        }
        if !lambda.is_finite() {
            return u64::MAX;
        }
        if lambda < STEP {
            self.poisson_direct(lambda)
        } else {
            self.poisson_chunked(lambda)
        }
    }
}

/// Replays a fixed sequence of counts and records every rate requested.
///
/// Used to pin the random part of a step, e.g. in tests or when replaying a
/// recorded run. Once the queue is empty it keeps returning the fallback.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSampler {
    counts: VecDeque<u64>,
    fallback: u64,
    requests: Vec<f64>,
}

impl ScriptedSampler {
    pub fn new(counts: impl IntoIterator<Item = u64>) -> Self {
        Self {
            counts: counts.into_iter().collect(),
            fallback: 0,
            requests: Vec::new(),
        }
    }

    /// Returns `count` for every draw.
    pub fn always(count: u64) -> Self {
        Self {
            fallback: count,
            ..Self::default()
        }
    }

    /// Rates passed to `next_poisson`, in call order.
    pub fn requests(&self) -> &[f64] {
        &self.requests
    }

    pub fn call_count(&self) -> usize {
        self.requests.len()
    }
}

impl PoissonSampler for ScriptedSampler {
    fn next_poisson(&mut self, lambda: f64) -> u64 {
        self.requests.push(lambda);
        self.counts.pop_front().unwrap_or(self.fallback)
    }
}
