//! Food production: births when farmers and food resources feed more than
//! the population needs, starvation deaths when they feed less.
//!
//! The birth and death rates come from the same capacity ratio `kf` as
//! `pop * (kf - 1)` and `pop * (1 - kf)`. These are negations of each other,
//! so for a non-negative population at most one of them is positive and a
//! step yields births or deaths, never both.

use society_records::KpiRecord;

use super::{count_delta, per_capita, sample, Rule, RuleOutcome};
use crate::config::FoodProductionConfig;
use crate::sampler::PoissonSampler;
use crate::status::Status;

const KPI_KEYS: &[&str] = &["deathsS", "births", "kf", "kfPop", "kfRes", "lambdaS", "lambdaB"];

#[derive(Debug, Clone, PartialEq)]
pub struct FoodProduction {
    resources: f64,
    params: FoodProductionConfig,
}

impl FoodProduction {
    pub fn new(resources: f64, params: FoodProductionConfig) -> Self {
        Self { resources, params }
    }
}

impl Rule for FoodProduction {
    fn name(&self) -> &'static str {
        "food_production"
    }

    fn kpi_keys(&self) -> &'static [&'static str] {
        KPI_KEYS
    }

    fn apply(&self, status: &Status, dt: f64, sampler: &mut dyn PoissonSampler) -> RuleOutcome {
        let population = status.population() as f64;
        let eta = status.efficiency();
        let demand = self.params.demand;

        // Food per head relative to demand, limited by labor or by land.
        let kf_pop =
            eta * per_capita(self.params.productivity * status.farmers(), population) / demand;
        let kf_res = eta * per_capita(status.food_ratio() * self.resources, population) / demand;
        let kf = kf_pop.min(kf_res);

        let lambda_deaths =
            (population * (1.0 - kf)).max(0.0) * dt / self.params.death_time_constant;
        let deaths = -count_delta(sample(sampler, lambda_deaths));

        let lambda_births =
            (population * (kf - 1.0)).max(0.0) * dt / self.params.birth_time_constant;
        let births = count_delta(sample(sampler, lambda_births));

        tracing::debug!(
            "food_production: kf={} kf_pop={} kf_res={} lambda_deaths={} lambda_births={}",
            kf,
            kf_pop,
            kf_res,
            lambda_deaths,
            lambda_births
        );
        if deaths != 0 {
            tracing::info!("{} deaths from starvation", -deaths);
        } else if births != 0 {
            tracing::info!("{} births", births);
        }

        let kpi = KpiRecord::new()
            .with("deathsS", deaths as f64)
            .with("births", births as f64)
            .with("kf", kf)
            .with("kfPop", kf_pop)
            .with("kfRes", kf_res)
            .with("lambdaS", lambda_deaths)
            .with("lambdaB", lambda_births);
        let change = births + deaths;
        let delta = if change == 0 {
            Status::ZERO
        } else {
            Status::population_delta(change)
        };
        RuleOutcome { delta, kpi }
    }
}
