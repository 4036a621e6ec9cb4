//! Model training.
//!
//! Two independent classifiers over the same feature contract: a gradient
//! boosted tree ensemble fit on raw features and a fixed-topology neural
//! network fit on scaled features.

pub mod decision_tree;
pub mod gradient_boosting;
pub mod metrics;
pub mod neural_network;

pub use decision_tree::{RegressionTree, TreeNode};
pub use gradient_boosting::{GradientBoostingClassifier, GradientBoostingConfig};
pub use metrics::EvalMetrics;
pub use neural_network::{ArbitrageNet, NetCheckpoint, NetConfig, TrainingSummary};
