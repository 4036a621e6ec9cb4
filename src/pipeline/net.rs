//! Neural trainer step: fits the network on scaled features.

use ndarray::{Array1, Axis};
use tracing::info;

use super::artifacts::{self, ArtifactStore};
use crate::config::PipelineConfig;
use crate::data;
use crate::error::Result;
use crate::preprocessing::StandardScaler;
use crate::training::{ArbitrageNet, EvalMetrics, NetCheckpoint};

/// Train the neural classifier.
///
/// Hard dependency on the tree trainer's scaler and feature-list
/// artifacts. The CSV is re-read and re-split with the same seed and
/// stratification, so train/test membership is identical to the tree
/// trainer's without any shared state.
pub fn run(config: &PipelineConfig) -> Result<EvalMetrics> {
    let store = ArtifactStore::new(&config.models_dir);

    let scaler: StandardScaler = artifacts::load_bincode(&store.scaler_path())?;
    let feature_cols = store.read_feature_cols()?;

    info!("loading training data from {}", config.data_path.display());
    let df = data::load_dataset(&config.data_path)?;
    let x = data::feature_matrix(&df, &feature_cols)?;
    let y = data::label_vector(&df, &config.label_column)?;

    let split = data::stratified_split(&y, config.test_fraction, config.seed)?;

    let x_train = scaler.transform(&x.select(Axis(0), &split.train))?;
    let y_train = Array1::from_iter(split.train.iter().map(|&i| y[i]));
    let x_test = scaler.transform(&x.select(Axis(0), &split.test))?;
    let y_test = Array1::from_iter(split.test.iter().map(|&i| y[i]));

    info!("device: cpu ({} threads)", rayon::current_num_threads());

    let mut net = ArbitrageNet::new(feature_cols.len(), config.net.clone());
    info!("parameters: {}", net.parameter_count());

    info!(
        "training network ({} epochs, batch size {})",
        config.net.max_epochs, config.net.batch_size
    );
    let summary = net.fit(&x_train, &y_train)?;
    info!(
        "finished after {} epochs, loss {:.4}",
        summary.epochs, summary.final_loss
    );

    let probs = net.predict(&x_test)?;
    let metrics = EvalMetrics::from_probabilities(&y_test, &probs, 0.5);
    info!("accuracy: {:.4}", metrics.accuracy);
    info!("f1: {:.4}", metrics.f1_score);
    info!("auc: {:.4}", metrics.roc_auc);

    let checkpoint = NetCheckpoint {
        input_size: feature_cols.len(),
        feature_cols,
        model: net,
    };
    artifacts::save_bincode(&checkpoint, &store.net_model_path())?;
    info!("saved: {}", store.net_model_path().display());

    Ok(metrics)
}
