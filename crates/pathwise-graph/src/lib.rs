#![forbid(unsafe_code)]
//! pathwise-graph library.
//!
//! Pure analysis over a prerequisite graph built with [`petgraph`]:
//!
//! ```text
//! nodes + edges
//!        ↓  build::RoadmapGraph::from_parts()
//! RoadmapGraph (DiGraph, dangling edges set aside)
//!        ├─ cycles::detect_cycles()
//!        ├─ components::connected_components()
//!        ├─ sequence::suggest_sequence()        (refuses cycles)
//!        ├─ critical_path::compute_critical_path() (refuses cycles)
//!        └─ metrics::compute_metrics()
//! validate::validate_graph() runs named rules over all of the above.
//! ```
//!
//! # Conventions
//!
//! - **Errors**: [`GraphError`] for refused requests; structural defects are
//!   returned as [`ValidationIssue`]s, never as errors.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod build;
pub mod components;
pub mod critical_path;
pub mod cycles;
pub mod error;
pub mod metrics;
pub mod sequence;
pub mod validate;

pub use build::{GraphNode, RoadmapGraph};
pub use components::{component_count, connected_components};
pub use critical_path::{CriticalPath, compute_critical_path};
pub use cycles::{detect_cycles, format_cycle, has_cycles};
pub use error::GraphError;
pub use metrics::{GraphMetrics, MetricsReport, compute_metrics};
pub use sequence::{LearningSequence, suggest_sequence};
pub use validate::{Severity, ValidationIssue, ValidationReport, validate_graph};
