//! Research: technology advances in fixed quanta at a rate set by the
//! research output of researchers and research resources.

use society_records::KpiRecord;

use super::{sample, Rule, RuleOutcome};
use crate::config::ResearchConfig;
use crate::sampler::PoissonSampler;
use crate::status::Status;

const KPI_KEYS: &[&str] = &["deltaTR", "lambdaR", "kr"];

#[derive(Debug, Clone, PartialEq)]
pub struct Research {
    resources: f64,
    params: ResearchConfig,
}

impl Research {
    pub fn new(resources: f64, params: ResearchConfig) -> Self {
        Self { resources, params }
    }
}

impl Rule for Research {
    fn name(&self) -> &'static str {
        "research"
    }

    fn kpi_keys(&self) -> &'static [&'static str] {
        KPI_KEYS
    }

    fn apply(&self, status: &Status, dt: f64, sampler: &mut dyn PoissonSampler) -> RuleOutcome {
        let by_pop = status.researchers() * self.params.productivity;
        let by_res = status.research_ratio() * self.resources;
        // Quanta achievable per unit time
        let kr = status.efficiency() * by_pop.min(by_res) / self.params.cost;
        let lambda = kr * dt;
        tracing::debug!(
            "research: lambda={} by_pop={} by_res={}",
            lambda,
            by_pop,
            by_res
        );

        let steps = sample(sampler, lambda);
        let delta_t = steps as f64 * self.params.quantum;
        if steps != 0 {
            tracing::info!("{} technology enhancement", delta_t);
        }

        let kpi = KpiRecord::new()
            .with("deltaTR", delta_t)
            .with("lambdaR", lambda)
            .with("kr", kr);
        let delta = if steps == 0 {
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

    fn rule(resources: f64) -> Research {
        Research::new(
            resources,
            ResearchConfig {
                productivity: 1.0,
                cost: 1.0,
                quantum: 0.01,
            },
        )
    }

    #[test]
    fn test_limited_by_researchers() {
        let status = status_with(
            Occupation::Researcher.index(),
            10,
            10,
            Resource::Research.index(),
            100.0,
            10.0,
            technology_for(0.5),
        );
        let mut sampler = ScriptedSampler::always(3);

        let outcome = rule(140.0).apply(&status, 1.0, &mut sampler);

        let lambda = 0.5 * 10.0;
        assert_close(outcome.delta.technology(), 0.03, 1e-9);
        assert_eq!(outcome.delta.population(), 0);
        assert_close(sampler.requests()[0], lambda, 1e-6);
        assert_close(outcome.kpi.get("deltaTR").unwrap(), 0.03, 1e-9);
        assert_close(outcome.kpi.get("lambdaR").unwrap(), lambda, 1e-6);
        assert_close(outcome.kpi.get("kr").unwrap(), lambda, 1e-6);
    }

    #[test]
    fn test_limited_by_resources() {
        let status = status_with(
            Occupation::Researcher.index(),
            100,
            100,
            Resource::Research.index(),
            10.0,
            1.0,
            technology_for(0.5),
        );
        let mut sampler = ScriptedSampler::always(3);

        let outcome = rule(14.0).apply(&status, 2.0, &mut sampler);

        let lambda = 0.5 * 10.0 * 2.0;
        assert_close(sampler.requests()[0], lambda, 1e-6);
        assert_close(outcome.kpi.get("kr").unwrap(), lambda / 2.0, 1e-6);
        assert_close(outcome.delta.technology(), 0.03, 1e-9);
    }

    #[test]
    fn test_no_technology_no_research() {
        let status = status_with(1, 10, 10, 1, 100.0, 10.0, 0.0);
        let mut sampler = ScriptedSampler::always(3);

        let outcome = rule(140.0).apply(&status, 1.0, &mut sampler);

        assert_eq!(sampler.call_count(), 0);
        assert_eq!(outcome.delta, Status::ZERO);
        assert_eq!(outcome.kpi.get("deltaTR"), Some(0.0));
        assert_eq!(outcome.kpi.get("lambdaR"), Some(0.0));
    }
}
