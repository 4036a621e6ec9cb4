//! Pipeline steps and orchestration.
//!
//! Each step is independently runnable and communicates with the others
//! only through the artifact files on disk. `train_all` is the
//! convenience orchestrator: tree trainer, then neural trainer, stopping
//! at the first failure with no retries and no rollback of artifacts the
//! finished step already wrote.

pub mod artifacts;
pub mod export;
pub mod net;
pub mod tree;

pub use artifacts::ArtifactStore;

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::training::EvalMetrics;

/// Run the tree trainer, then the neural trainer.
pub fn train_all(config: &PipelineConfig) -> Result<(EvalMetrics, EvalMetrics)> {
    let tree_metrics = tree::run(config)?;
    let net_metrics = net::run(config)?;
    Ok((tree_metrics, net_metrics))
}
