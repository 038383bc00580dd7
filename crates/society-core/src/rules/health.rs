//! Health: natural deaths at a rate set by life expectancy, which rises
//! linearly from the configured minimum to the maximum as doctors and health
//! resources approach the demand for care.

use society_records::KpiRecord;

use super::{count_delta, per_capita, sample, Rule, RuleOutcome};
use crate::config::HealthConfig;
use crate::sampler::PoissonSampler;
use crate::status::Status;

const KPI_KEYS: &[&str] = &["deathsH", "kh", "lambdaH", "lifeExpectancy"];

#[derive(Debug, Clone, PartialEq)]
pub struct Health {
    resources: f64,
    params: HealthConfig,
}

impl Health {
    pub fn new(resources: f64, params: HealthConfig) -> Self {
        Self { resources, params }
    }

    /// Life expectancy for a care capacity ratio; saturates at the maximum.
    pub fn life_expectancy(&self, kh: f64) -> f64 {
        let min = self.params.min_life_expectancy;
        let max = self.params.max_life_expectancy;
        (max - min) * kh.clamp(0.0, 1.0) + min
    }
}

impl Rule for Health {
    fn name(&self) -> &'static str {
        "health"
    }

    fn kpi_keys(&self) -> &'static [&'static str] {
        KPI_KEYS
    }

    fn apply(&self, status: &Status, dt: f64, sampler: &mut dyn PoissonSampler) -> RuleOutcome {
        let population = status.population() as f64;

        let by_pop = status.doctors() * self.params.productivity;
        let by_res = status.health_ratio() * self.resources;
        let kh =
            status.efficiency() * per_capita(by_pop.min(by_res), population) / self.params.demand;
        let life_expectancy = self.life_expectancy(kh);
        let lambda = population * dt / life_expectancy;
        tracing::debug!("health: lambda={} kh={} life={}", lambda, kh, life_expectancy);

        let deaths = -count_delta(sample(sampler, lambda));
        if deaths != 0 {
            tracing::info!("{} natural deaths", -deaths);
        }

        let kpi = KpiRecord::new()
            .with("deathsH", deaths as f64)
            .with("kh", kh)
            .with("lambdaH", lambda)
            .with("lifeExpectancy", life_expectancy);
        let delta = if deaths == 0 {
            Status::ZERO
        } else {
            Status::population_delta(deaths)
        };
        RuleOutcome { delta, kpi }
    }
}
