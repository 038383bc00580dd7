//! Over-settlement: deaths from crowding when the population exceeds what
//! the settlement resources can house.

use society_records::KpiRecord;

use super::{count_delta, per_capita, sample, Rule, RuleOutcome};
use crate::config::OverSettlementConfig;
use crate::sampler::PoissonSampler;
use crate::status::Status;

const KPI_KEYS: &[&str] = &["deathsO", "maxPopO", "popO", "lambdaO", "ko"];

#[derive(Debug, Clone, PartialEq)]
pub struct OverSettlement {
    resources: f64,
    params: OverSettlementConfig,
}

impl OverSettlement {
    pub fn new(resources: f64, params: OverSettlementConfig) -> Self {
        Self { resources, params }
    }
}

impl Rule for OverSettlement {
    fn name(&self) -> &'static str {
        "over_settlement"
    }

    fn kpi_keys(&self) -> &'static [&'static str] {
        KPI_KEYS
    }

    fn apply(&self, status: &Status, dt: f64, sampler: &mut dyn PoissonSampler) -> RuleOutcome {
        let population = status.population() as f64;
        let capacity = status.settlement_ratio() * self.resources * self.params.density;
        let ko = per_capita(capacity, population);

        // Both terms are death rates: the whole population versus the
        // population the settlement can hold.
        let max_pop = capacity * dt / self.params.death_time_constant;
        let pop = population * dt / self.params.death_time_constant;
        let lambda = (pop - max_pop).max(0.0);
        tracing::debug!(
            "over_settlement: lambda={} max_pop={} pop={}",
            lambda,
            max_pop,
            pop
        );

        let deaths = -count_delta(sample(sampler, lambda));
        if deaths != 0 {
            tracing::info!("{} deaths from over settlement", -deaths);
        }

        let kpi = KpiRecord::new()
            .with("deathsO", deaths as f64)
            .with("maxPopO", max_pop)
            .with("popO", pop)
            .with("lambdaO", lambda)
            .with("ko", ko);
        let delta = if deaths == 0 {
            Status::ZERO
        } else {
            Status::population_delta(deaths)
        };
        RuleOutcome { delta, kpi }
    }
}
