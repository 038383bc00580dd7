//! Shared record types and serialization for the society simulation.
//!
//! This crate contains pure data structures with no simulation logic:
//! per-step KPI records, the persisted status snapshot and the CSV KPI sink.
//! It is a dependency of `society-core`.

pub mod csv;
pub mod error;
pub mod kpi;
pub mod snapshot;

pub use csv::{DiscardSink, KpiCsvWriter, KpiSink};
pub use error::RecordError;
pub use kpi::{DuplicateKpiKey, KpiRecord};
pub use snapshot::{StatusSnapshot, SNAPSHOT_VERSION};
