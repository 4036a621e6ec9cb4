//! arbfinder-train - Batch training pipeline for arbitrage opportunity
//! classifiers
//!
//! Loads a CSV of labeled cross-exchange price discrepancies, trains a
//! gradient boosted tree ensemble and a feed-forward neural network on the
//! same stratified train/test split, and exports both models plus the
//! feature scaler to portable inference formats.
//!
//! # Modules
//!
//! - [`config`] - Pipeline configuration and the feature/label contract
//! - [`data`] - CSV loading and the deterministic stratified split
//! - [`preprocessing`] - Standard scaling
//! - [`training`] - Gradient boosting, the neural network, evaluation metrics
//! - [`export`] - Computation-graph export
//! - [`pipeline`] - Step entry points and artifact hand-off
//! - [`cli`] - Command-line interface

pub mod error;

pub mod config;
pub mod data;
pub mod preprocessing;
pub mod training;

pub mod export;
pub mod pipeline;

pub mod cli;

pub use error::{PipelineError, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{PipelineConfig, FEATURE_COLS, LABEL_COL};
    pub use crate::error::{PipelineError, Result};
    pub use crate::export::{GraphExport, OnnxExporter, OnnxGraph};
    pub use crate::pipeline::ArtifactStore;
    pub use crate::preprocessing::{ScalerParams, StandardScaler};
    pub use crate::training::{
        ArbitrageNet, EvalMetrics, GradientBoostingClassifier, GradientBoostingConfig,
        NetCheckpoint, NetConfig,
    };
}
