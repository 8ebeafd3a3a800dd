//! eduboost-core: risk scoring, goals, resources and study plans.
//!
//! This crate defines the data model, the rule-table engine that turns
//! per-module performance records into risk assessments, goals and plans,
//! and the provider traits the advisor service is built on.

pub mod analysis;
pub mod engine;
pub mod error;
pub mod goals;
pub mod legacy;
pub mod model;
pub mod planner;
pub mod report;
pub mod resources;
pub mod risk;
pub mod rulebook;
pub mod statistics;
pub mod traits;

pub use engine::{AdvisorConfig, AdvisorService, Engine, NoopReporter, ProgressReporter};
pub use error::EngineError;
