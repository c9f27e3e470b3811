#![forbid(unsafe_code)]
//! pathwise-core library.
//!
//! Shared vocabulary for the roadmap analyzer and the schedule synthesizer:
//! the knowledge-node data model, progress and time constraints, machine
//! readable error codes, planner configuration, and the caller-owned result
//! cache.
//!
//! # Conventions
//!
//! - **Errors**: typed `thiserror` enums for domain failures, `anyhow::Result`
//!   at I/O edges (config loading).
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod cache;
pub mod config;
pub mod error;
pub mod model;

pub use cache::{MemoryCache, ResultCache, stable_key};
pub use config::PlannerConfig;
pub use error::{ErrorCode, ModelError};
pub use model::{
    Difficulty, DifficultyDistribution, KnowledgeNode, PrerequisiteEdge, ProgressIndex,
    ProgressRecord, ProgressStatus, Roadmap, TimeConstraints, ValidationRule,
};
