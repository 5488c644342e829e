//! Learning option policies with off-policy Tree-Backup(λ)
//!
//! Action values are linear in binary state features. Tabular (one-hot)
//! features tie a learned option to one environment; displacement features
//! describe the agent relative to its subgoal, so the same weights carry over
//! to any room with the same local layout.

pub mod features;
pub mod option_learning;
pub mod tree_backup;

pub use features::{DisplacementFeatures, FeatureKind, FeatureMap, Features, OneHotFeatures};
pub use option_learning::{LearnedOption, OptionSet, learn_option, learn_region_option};
pub use tree_backup::{Backup, TreeBackup};
