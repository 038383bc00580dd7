//! Batch driver: steps an engine until extinction or a step limit,
//! forwarding every KPI record to a sink.

use society_records::{KpiSink, RecordError};

use crate::engine::Engine;
use crate::sampler::PoissonSampler;
use crate::status::Status;

/// Progress is logged every this many steps.
const PROGRESS_INTERVAL: u64 = 1000;

#[derive(Debug, Clone, PartialEq)]
pub struct BatchSummary {
    /// Status after the last step run
    pub status: Status,
    pub steps: u64,
    /// Population reached 0
    pub extinct: bool,
}

/// Runs at most `max_steps` steps starting from `status`.
///
/// An empty society is an absorbing state: no step is taken once the
/// population reaches 0, including for an already extinct initial status.
pub fn run_batch<S: PoissonSampler>(
    engine: &mut Engine<S>,
    status: Status,
    max_steps: u64,
    sink: &mut dyn KpiSink,
) -> Result<BatchSummary, RecordError> {
    let mut status = status;
    let mut steps = 0;
    while status.population() > 0 && steps < max_steps {
        let outcome = engine.step(&status);
        sink.write_record(&outcome.kpi)?;
        status = outcome.status;
        steps += 1;

        if steps % PROGRESS_INTERVAL == 0 {
            tracing::info!(
                "step {}: population {}, technology {:.4}",
                steps,
                status.population(),
                status.technology()
            );
        }
    }

    let extinct = status.population() <= 0;
    if extinct {
        tracing::info!("population extinct after {} steps", steps);
    }
    Ok(BatchSummary {
        status,
        steps,
        extinct,
    })
}
