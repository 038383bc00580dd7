//! Stochastic society simulation: status algebra, Poisson sampler,
//! transition rules and the step composer.

pub mod batch;
pub mod config;
pub mod engine;
pub mod prefs;
pub mod rules;
pub mod sampler;
pub mod status;

pub use batch::{run_batch, BatchSummary};
pub use config::{ConfigError, RulesConfig};
pub use engine::{Engine, EngineError, StepOutcome};
pub use rules::{standard_rules, Rule, RuleOutcome};
pub use sampler::{PoissonSampler, ScriptedSampler, SimRng};
pub use status::{Occupation, Resource, Status, StatusError};
