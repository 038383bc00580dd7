//! Step composer.
//!
//! Every rule is evaluated against the same input status; their deltas are
//! summed onto it and the result normalized. The sampler is owned by the
//! engine and handed to the rules in a fixed order, so a seeded engine
//! replays the same trajectory.

use std::collections::HashMap;

use society_records::KpiRecord;
use thiserror::Error;

use crate::config::RulesConfig;
use crate::rules::{standard_rules, Rule};
use crate::sampler::{PoissonSampler, SimRng};
use crate::status::Status;

/// Keys reserved for the status observables.
const OBSERVABLE_KEYS: [&str; 2] = ["population", "technology"];

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("KPI key {key:?} emitted by both {previous} and {rule}")]
    DuplicateKpiKey {
        key: &'static str,
        rule: &'static str,
        previous: &'static str,
    },

    #[error("time interval must be finite and positive, got {0}")]
    InvalidTimeInterval(f64),

    #[error("minimum technology must be finite and non-negative, got {0}")]
    InvalidMinTechnology(f64),
}

/// Status after one step and the indicators collected on the way. The
/// `population` and `technology` indicators are those of the input status,
/// so they line up with the rates the rules computed from it.
#[derive(Debug, Clone, PartialEq)]
pub struct StepOutcome {
    pub status: Status,
    pub kpi: KpiRecord,
}

pub struct Engine<S: PoissonSampler> {
    rules: Vec<Box<dyn Rule>>,
    sampler: S,
    time_interval: f64,
    min_technology: f64,
}

impl<S: PoissonSampler> Engine<S> {
    /// Builds an engine from an explicit rule set. Fails if two rules share
    /// a KPI key or the step parameters are degenerate.
    pub fn new(
        rules: Vec<Box<dyn Rule>>,
        sampler: S,
        time_interval: f64,
        min_technology: f64,
    ) -> Result<Self, EngineError> {
        if !(time_interval.is_finite() && time_interval > 0.0) {
            return Err(EngineError::InvalidTimeInterval(time_interval));
        }
        if !(min_technology.is_finite() && min_technology >= 0.0) {
            return Err(EngineError::InvalidMinTechnology(min_technology));
        }

        let mut owners: HashMap<&'static str, &'static str> =
            OBSERVABLE_KEYS.iter().map(|&key| (key, "status")).collect();
        for rule in &rules {
            for &key in rule.kpi_keys() {
                if let Some(previous) = owners.insert(key, rule.name()) {
                    return Err(EngineError::DuplicateKpiKey {
                        key,
                        rule: rule.name(),
                        previous,
                    });
                }
            }
        }

        Ok(Self {
            rules,
            sampler,
            time_interval,
            min_technology,
        })
    }

    /// The five standard rules with the configured parameters.
    pub fn from_config(config: &RulesConfig, sampler: S) -> Result<Self, EngineError> {
        Self::new(
            standard_rules(config),
            sampler,
            config.time_interval,
            config.min_technology,
        )
    }

    /// Column order for KPI output: observables first, then each rule's keys.
    pub fn kpi_columns(&self) -> Vec<&'static str> {
        OBSERVABLE_KEYS
            .iter()
            .copied()
            .chain(self.rules.iter().flat_map(|rule| rule.kpi_keys().iter().copied()))
            .collect()
    }

    /// Advances `status` by the configured time interval.
    pub fn step(&mut self, status: &Status) -> StepOutcome {
        self.step_with_interval(status, self.time_interval)
    }

    /// Advances `status` by `dt`.
    pub fn step_with_interval(&mut self, status: &Status, dt: f64) -> StepOutcome {
        let mut next = *status;
        let mut kpi = KpiRecord::new();
        for rule in &self.rules {
            let outcome = rule.apply(status, dt, &mut self.sampler);
            next = next + outcome.delta;
            let merged = kpi.merge(outcome.kpi);
            debug_assert!(merged.is_ok(), "{} emitted {:?}", rule.name(), merged);
        }

        let next = next.normalize(self.min_technology);
        let merged = kpi.merge(status.observables());
        debug_assert!(merged.is_ok(), "rule emitted an observable key: {:?}", merged);

        tracing::trace!(
            "step: population {} -> {}, technology {} -> {}",
            status.population(),
            next.population(),
            status.technology(),
            next.technology()
        );
        StepOutcome { status: next, kpi }
    }

    pub fn rules(&self) -> &[Box<dyn Rule>] {
        &self.rules
    }

    pub fn time_interval(&self) -> f64 {
        self.time_interval
    }

    pub fn min_technology(&self) -> f64 {
        self.min_technology
    }

    pub fn sampler(&self) -> &S {
        &self.sampler
    }
}

impl Engine<SimRng> {
    /// Standard rules driven by an RNG seeded from `config.seed`
    /// (entropy when the seed is 0).
    pub fn seeded_from_config(config: &RulesConfig) -> Result<Self, EngineError> {
        Self::from_config(config, SimRng::from_config_seed(config.seed))
    }
}
