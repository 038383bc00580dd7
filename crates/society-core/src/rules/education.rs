//! Education: knowledge is lost when educators and education resources do
//! not meet the demand for teaching.
//!
//! The sampled count is read as the number of individuals who failed to
//! receive the knowledge; technology shrinks by the same fraction of the
//! population, and never by more than its current level.

use society_records::KpiRecord;

use super::{per_capita, sample, Rule, RuleOutcome};
use crate::config::EducationConfig;
use crate::sampler::PoissonSampler;
use crate::status::Status;

const KPI_KEYS: &[&str] = &["deltaTE", "lambdaE", "ke"];

#[derive(Debug, Clone, PartialEq)]
pub struct Education {
    resources: f64,
    params: EducationConfig,
}

impl Education {
    pub fn new(resources: f64, params: EducationConfig) -> Self {
        Self { resources, params }
    }
}

impl Rule for Education {
    fn name(&self) -> &'static str {
        "education"
    }

    fn kpi_keys(&self) -> &'static [&'static str] {
        KPI_KEYS
    }

    fn apply(&self, status: &Status, dt: f64, sampler: &mut dyn PoissonSampler) -> RuleOutcome {
        let population = status.population() as f64;
        let technology = status.technology();

        // Teaching labor is per individual; the resource path is not.
        let by_pop = per_capita(status.educators() * self.params.productivity, population);
        let by_res = status.education_ratio() * self.resources;
        let ke = status.efficiency() * by_pop.min(by_res) / self.params.demand;
        let lambda = (1.0 - ke).max(0.0) * population * dt / self.params.time_constant;
        tracing::debug!("education: lambda={} ke={}", lambda, ke);

        let failures = sample(sampler, lambda);
        let lost_fraction = if failures == 0 {
            0.0
        } else {
            per_capita(failures as f64, population).min(1.0)
        };
        let delta_t = -technology * lost_fraction;
        if failures != 0 {
            tracing::info!("{} technology loss", delta_t);
        }

        let kpi = KpiRecord::new()
            .with("deltaTE", delta_t)
            .with("lambdaE", lambda)
            .with("ke", ke);
        let delta = if failures == 0 {
            Status::ZERO
        } else {
            Status::technology_delta(delta_t)
        };
        RuleOutcome { delta, kpi }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_support::*;
    use crate::sampler::ScriptedSampler;
    use crate::status::{Occupation, Resource};

    const EDUCATORS: i64 = 100;
    const POPULATION: f64 = 140.0;

    /// 100 educators and 10 of each other occupation; 100 of the 140
    /// resource units go to education. Efficiency is 0.5.
    fn school_status() -> Status {
        status_with(
            Occupation::Educator.index(),
            EDUCATORS,
            10,
            Resource::Education.index(),
            100.0,
            10.0,
            technology_for(0.5),
        )
    }

    /// Demand at which teaching labor yields the capacity ratio `k`.
    fn rule_with_ke(k: f64) -> Education {
        Education::new(
            140.0,
            EducationConfig {
                productivity: 1.0,
                demand: 0.5 * EDUCATORS as f64 / POPULATION / k,
                time_constant: 1.0,
            },
        )
    }

    #[test]
    fn test_under_education_loses_technology() {
        let status = school_status();
        let technology = status.technology();
        let mut sampler = ScriptedSampler::always(3);

        let outcome = rule_with_ke(0.5).apply(&status, 1.0, &mut sampler);

        let lambda = 0.5 * POPULATION;
        let expected = -technology * 3.0 / POPULATION;
        assert_close(outcome.delta.technology(), expected, 1e-6);
        assert_eq!(outcome.delta.population(), 0);
        assert_eq!(sampler.call_count(), 1);
        assert_close(sampler.requests()[0], lambda, 1e-6);
        assert_close(outcome.kpi.get("deltaTE").unwrap(), expected, 1e-6);
        assert_close(outcome.kpi.get("lambdaE").unwrap(), lambda, 1e-6);
        assert_close(outcome.kpi.get("ke").unwrap(), 0.5, 1e-6);
    }

    #[test]
    fn test_over_education_never_samples() {
        let mut sampler = ScriptedSampler::always(200);

        let outcome = rule_with_ke(2.0).apply(&school_status(), 1.0, &mut sampler);

        assert_eq!(sampler.call_count(), 0);
        assert_eq!(outcome.delta, Status::ZERO);
        assert_eq!(outcome.kpi.get("lambdaE"), Some(0.0));
        assert_eq!(outcome.kpi.get("deltaTE"), Some(0.0));
        assert_close(outcome.kpi.get("ke").unwrap(), 2.0, 1e-6);
    }

    #[test]
    fn test_loss_capped_at_current_technology() {
        let status = school_status();
        let mut sampler = ScriptedSampler::always(1_000);

        let outcome = rule_with_ke(0.1).apply(&status, 1.0, &mut sampler);

        assert_close(outcome.delta.technology(), -status.technology(), 1e-12);
        let after = (status + outcome.delta).technology();
        assert!(after.abs() < 1e-12);
    }

    #[test]
    fn test_limited_by_resources() {
        // One resource unit in total: its education share binds before labor.
        let status = status_with(2, EDUCATORS, 10, 2, 5.0, 33.75, technology_for(0.5));
        let rule = Education::new(
            1.0,
            EducationConfig {
                productivity: 1.0,
                demand: 0.1,
                time_constant: 2.0,
            },
        );
        let mut sampler = ScriptedSampler::always(0);

        let outcome = rule.apply(&status, 1.0, &mut sampler);

        let ke = 0.5 * (5.0 / POPULATION) / 0.1;
        assert_close(outcome.kpi.get("ke").unwrap(), ke, 1e-6);
        assert_close(sampler.requests()[0], (1.0 - ke) * POPULATION / 2.0, 1e-6);
        assert_eq!(outcome.delta, Status::ZERO);
    }

    #[test]
    fn test_resources_are_not_shared_per_capita() {
        // Education resources are counted in full, not per individual, so a
        // small share of a modest endowment still covers the teaching labor.
        let status = status_with(2, EDUCATORS, 10, 2, 5.0, 33.75, technology_for(0.5));
        let rule = Education::new(
            140.0,
            EducationConfig {
                productivity: 1.0,
                demand: 0.1,
                time_constant: 1.0,
            },
        );
        let mut sampler = ScriptedSampler::always(4);

        let outcome = rule.apply(&status, 1.0, &mut sampler);

        let ke = 0.5 * (EDUCATORS as f64 / POPULATION) / 0.1;
        assert_close(outcome.kpi.get("ke").unwrap(), ke, 1e-6);
        assert_eq!(outcome.kpi.get("lambdaE"), Some(0.0));
        assert_eq!(sampler.call_count(), 0);
        assert_eq!(outcome.delta, Status::ZERO);
    }
}
