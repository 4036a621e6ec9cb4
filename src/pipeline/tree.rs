//! Tree trainer step: fits the scaler and the gradient boosted classifier.

use ndarray::{Array1, Axis};
use tracing::info;

use super::artifacts::{self, ArtifactStore};
use crate::config::PipelineConfig;
use crate::data;
use crate::error::Result;
use crate::preprocessing::StandardScaler;
use crate::training::{EvalMetrics, GradientBoostingClassifier};

/// Train the gradient boosted tree classifier on raw features.
///
/// Also fits the standard scaler on the training partition and persists
/// it together with the ordered feature column list, for the neural
/// trainer and the exporter.
pub fn run(config: &PipelineConfig) -> Result<EvalMetrics> {
    let store = ArtifactStore::new(&config.models_dir);
    store.ensure_dir()?;

    info!("loading training data from {}", config.data_path.display());
    let df = data::load_dataset(&config.data_path)?;
    let x = data::feature_matrix(&df, &config.feature_columns)?;
    let y = data::label_vector(&df, &config.label_column)?;

    let split = data::stratified_split(&y, config.test_fraction, config.seed)?;
    info!(
        "split: {} train rows, {} test rows",
        split.train.len(),
        split.test.len()
    );

    let x_train = x.select(Axis(0), &split.train);
    let y_train = Array1::from_iter(split.train.iter().map(|&i| y[i]));
    let x_test = x.select(Axis(0), &split.test);
    let y_test = Array1::from_iter(split.test.iter().map(|&i| y[i]));

    // The scaler belongs to this step even though the tree never sees
    // scaled features: it is fit on exactly this training partition so the
    // neural trainer and the inference runtime share one normalization
    let scaler = StandardScaler::fit(&x_train)?;
    artifacts::save_bincode(&scaler, &store.scaler_path())?;
    store.write_feature_cols(&config.feature_columns)?;

    info!(
        "training gradient boosted trees ({} rounds, depth {})",
        config.tree.n_estimators, config.tree.max_depth
    );
    let mut classifier = GradientBoostingClassifier::new(config.tree.clone());
    classifier.fit(&x_train, &y_train)?;

    let probs = classifier.predict_proba(&x_test)?;
    let metrics = EvalMetrics::from_probabilities(&y_test, &probs, 0.5);
    info!("accuracy: {:.4}", metrics.accuracy);
    info!("f1: {:.4}", metrics.f1_score);
    info!("auc: {:.4}", metrics.roc_auc);

    artifacts::save_bincode(&classifier, &store.tree_model_path())?;
    info!("saved: {}", store.tree_model_path().display());

    Ok(metrics)
}
