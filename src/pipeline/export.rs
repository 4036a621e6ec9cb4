//! Export step: converts trained artifacts to portable inference formats.

use std::fs::File;
use std::io::BufWriter;

use ndarray::Array2;
use tracing::info;

use super::artifacts::{self, ArtifactStore};
use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};
use crate::export::{GraphExport, OnnxExporter, OnnxGraph};
use crate::preprocessing::StandardScaler;
use crate::training::{ArbitrageNet, GradientBoostingClassifier, NetCheckpoint};

/// Export both models and the scaler parameters.
///
/// Requires every training artifact to exist already; fails fast naming
/// the first missing one. Re-running with unchanged inputs rewrites the
/// same bytes, so the step is idempotent.
pub fn run(config: &PipelineConfig) -> Result<()> {
    let store = ArtifactStore::new(&config.models_dir);

    let feature_cols = store.read_feature_cols()?;
    let checkpoint: NetCheckpoint = artifacts::load_bincode(&store.net_model_path())?;
    let classifier: GradientBoostingClassifier =
        artifacts::load_bincode(&store.tree_model_path())?;
    let scaler: StandardScaler = artifacts::load_bincode(&store.scaler_path())?;

    if checkpoint.input_size != feature_cols.len() {
        return Err(PipelineError::Export(format!(
            "network expects {} features but {} columns are persisted",
            checkpoint.input_size,
            feature_cols.len()
        )));
    }
    if classifier.n_features() != feature_cols.len() {
        return Err(PipelineError::Export(format!(
            "tree ensemble was fit on {} features but {} columns are persisted",
            classifier.n_features(),
            feature_cols.len()
        )));
    }

    info!("exporting network graph");
    let graph = checkpoint.model.to_graph()?;
    verify_graph(&graph, &checkpoint.model)?;
    OnnxExporter::new().export(&graph, &store.net_export_path())?;
    info!("saved: {}", store.net_export_path().display());

    info!("exporting tree ensemble");
    let file = File::create(store.tree_export_path())?;
    serde_json::to_writer_pretty(BufWriter::new(file), &classifier)?;
    info!("saved: {}", store.tree_export_path().display());

    info!("exporting scaler parameters");
    let file = File::create(store.scaler_export_path())?;
    serde_json::to_writer(BufWriter::new(file), &scaler.params())?;
    info!("saved: {}", store.scaler_export_path().display());

    info!("export complete:");
    for (name, size) in store.summary()? {
        info!("  {} ({:.1} KB)", name, size as f64 / 1024.0);
    }

    Ok(())
}

/// Check the emitted graph against the in-memory network on a probe batch.
/// Divergence beyond f32 rounding means the lowering is wrong and the
/// artifact must not be shipped.
fn verify_graph(graph: &OnnxGraph, model: &ArbitrageNet) -> Result<()> {
    let n_features = model.input_size();
    let probe = Array2::from_shape_fn((4, n_features), |(i, j)| {
        ((i * n_features + j) % 7) as f64 - 3.0
    });

    let from_graph = graph.evaluate(&probe)?;
    let from_model = model.predict(&probe)?;

    for (got, expected) in from_graph.column(0).iter().zip(from_model.iter()) {
        if (got - expected).abs() > 1e-4 {
            return Err(PipelineError::Export(format!(
                "graph output {got} diverges from model output {expected}"
            )));
        }
    }
    Ok(())
}
