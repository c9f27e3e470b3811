pub mod constraints;
pub mod node;
pub mod progress;
pub mod roadmap;
pub mod rules;

pub use constraints::TimeConstraints;
pub use node::{Difficulty, KnowledgeNode, PrerequisiteEdge};
pub use progress::{ProgressIndex, ProgressRecord, ProgressStatus};
pub use roadmap::{DifficultyDistribution, Roadmap};
pub use rules::ValidationRule;
