//! Transition Rules
//!
//! Each rule reads the current status, turns a supply/demand ratio into a
//! Poisson rate and samples a single-purpose delta: deaths or births change
//! the population, research and education change technology. Rules never see
//! each other's output within a step, so their deltas can simply be summed.

pub mod education;
pub mod food;
pub mod health;
pub mod research;
pub mod settlement;

use society_records::KpiRecord;

use crate::config::RulesConfig;
use crate::sampler::PoissonSampler;
use crate::status::Status;

pub use education::Education;
pub use food::FoodProduction;
pub use health::Health;
pub use research::Research;
pub use settlement::OverSettlement;

/// Delta and indicators produced by one rule for one step.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleOutcome {
    pub delta: Status,
    pub kpi: KpiRecord,
}

/// A stochastic transition process.
pub trait Rule: Send + Sync {
    /// Short identifier used in logs and errors.
    fn name(&self) -> &'static str;

    /// Every KPI key `apply` emits.
    fn kpi_keys(&self) -> &'static [&'static str];

    /// Evaluates the rule on `status` over a time step `dt`.
    fn apply(&self, status: &Status, dt: f64, sampler: &mut dyn PoissonSampler) -> RuleOutcome;
}

/// The five rules in evaluation order.
pub fn standard_rules(config: &RulesConfig) -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(OverSettlement::new(config.resources, config.over_settlement.clone())),
        Box::new(FoodProduction::new(config.resources, config.food_production.clone())),
        Box::new(Research::new(config.resources, config.research.clone())),
        Box::new(Education::new(config.resources, config.education.clone())),
        Box::new(Health::new(config.resources, config.health.clone())),
    ]
}

/// Draws only for a positive rate, so a zero rate never touches the sampler.
pub(crate) fn sample(sampler: &mut dyn PoissonSampler, lambda: f64) -> u64 {
    if lambda > 0.0 {
        sampler.next_poisson(lambda)
    } else {
        0
    }
}

/// `value / population`, or 0 for an empty society.
pub(crate) fn per_capita(value: f64, population: f64) -> f64 {
    if population > 0.0 {
        value / population
    } else {
        0.0
    }
}

/// Converts a sampled count into a population delta magnitude.
pub(crate) fn count_delta(count: u64) -> i64 {
    i64::try_from(count).unwrap_or(i64::MAX)
}
