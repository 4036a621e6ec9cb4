//! Integration test: full train-and-export pipeline against a synthetic
//! labeled dataset.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use arbfinder_train::config::{PipelineConfig, FEATURE_COLS};
use arbfinder_train::error::PipelineError;
use arbfinder_train::export::onnx;
use arbfinder_train::pipeline::{self, ArtifactStore};
use arbfinder_train::preprocessing::{ScalerParams, StandardScaler};

/// Write a deterministic CSV with 11 feature columns and a 15% positive
/// rate. Profitable rows carry lifted spreads and volatility so both
/// models have signal to learn.
fn write_training_csv(path: &Path, n_rows: usize) {
    let mut out = String::new();
    out.push_str(&FEATURE_COLS.join(","));
    out.push_str(",is_profitable\n");

    let mut rng = ChaCha8Rng::seed_from_u64(7);
    for i in 0..n_rows {
        let profitable = i % 100 < 15;
        let lift = if profitable { 1.5 } else { 0.0 };

        let s1 = rng.gen::<f64>() + lift;
        let s2 = rng.gen::<f64>() + lift * 0.5;
        let s3 = rng.gen::<f64>();
        let v1 = 100.0 + rng.gen::<f64>() * 50.0;
        let v2 = 80.0 + rng.gen::<f64>() * 40.0;
        let v3 = 60.0 + rng.gen::<f64>() * 30.0;
        let vol = rng.gen::<f64>() * 0.1 + if profitable { 0.05 } else { 0.0 };
        let hour = (i % 24) as f64;
        let dow = (i % 7) as f64;
        let liq = rng.gen::<f64>();
        let bps = s1.max(s2).max(s3) * 100.0;

        writeln!(
            out,
            "{s1:.6},{s2:.6},{s3:.6},{v1:.6},{v2:.6},{v3:.6},{vol:.6},{hour},{dow},{liq:.6},{bps:.6},{}",
            u8::from(profitable)
        )
        .unwrap();
    }

    std::fs::write(path, out).unwrap();
}

/// Pipeline config with reduced model sizes so the suite stays fast. The
/// artifact contract and split behavior are identical to the defaults.
fn test_config(dir: &Path) -> PipelineConfig {
    let mut config = PipelineConfig::default();
    config.data_path = dir.join("training.csv");
    config.models_dir = dir.join("models");
    config.tree.n_estimators = 30;
    config.tree.max_depth = 4;
    config.net.max_epochs = 25;
    config.net.batch_size = 128;
    config.net.log_every = 100;
    config
}

fn setup(n_rows: usize) -> (tempfile::TempDir, PipelineConfig) {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    write_training_csv(&config.data_path, n_rows);
    (dir, config)
}

fn exported_paths(store: &ArtifactStore) -> Vec<PathBuf> {
    vec![
        store.net_export_path(),
        store.tree_export_path(),
        store.scaler_export_path(),
    ]
}

#[test]
fn test_end_to_end_produces_all_artifacts() {
    let (_dir, config) = setup(1000);

    let tree_metrics = pipeline::tree::run(&config).unwrap();
    assert!(
        tree_metrics.accuracy > 0.7,
        "tree accuracy too low: {}",
        tree_metrics.accuracy
    );

    let net_metrics = pipeline::net::run(&config).unwrap();
    assert_eq!(
        net_metrics.n_test, tree_metrics.n_test,
        "both models must be evaluated on the same held-out rows"
    );

    pipeline::export::run(&config).unwrap();

    let store = ArtifactStore::new(&config.models_dir);
    let summary = store.summary().unwrap();
    let names: Vec<&str> = summary.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "arbitrage_net.bin",
            "arbitrage_net.onnx.json",
            "feature_cols.txt",
            "gbdt_classifier.bin",
            "gbdt_classifier.json",
            "scaler.bin",
            "scaler_params.json",
        ]
    );
    assert!(summary.iter().all(|(_, size)| *size > 0));

    // Persisted feature order must match the contract
    let cols = store.read_feature_cols().unwrap();
    assert_eq!(cols, FEATURE_COLS.to_vec());

    // Scaler export carries one mean/scale pair per feature column
    let raw = std::fs::read_to_string(store.scaler_export_path()).unwrap();
    let params: ScalerParams = serde_json::from_str(&raw).unwrap();
    assert_eq!(params.mean.len(), 11);
    assert_eq!(params.scale.len(), 11);
    assert!(params.scale.iter().all(|s| *s > 0.0));

    // The persisted scaler must round-trip feature vectors
    let scaler: StandardScaler =
        pipeline::artifacts::load_bincode(&store.scaler_path()).unwrap();
    let probe = ndarray::Array2::from_shape_fn((3, 11), |(i, j)| (i + j) as f64 * 0.25 + 1.0);
    let restored = scaler
        .inverse_transform(&scaler.transform(&probe).unwrap())
        .unwrap();
    for (orig, back) in probe.iter().zip(restored.iter()) {
        assert!((orig - back).abs() < 1e-10);
    }
}

#[test]
fn test_neural_trainer_fails_fast_without_tree_artifacts() {
    let (_dir, config) = setup(300);

    let err = pipeline::net::run(&config).unwrap_err();
    assert!(matches!(err, PipelineError::MissingArtifact(_)));
    assert!(err.to_string().contains("scaler.bin"));
}

#[test]
fn test_export_fails_fast_without_training() {
    let (_dir, config) = setup(300);

    let err = pipeline::export::run(&config).unwrap_err();
    assert!(matches!(err, PipelineError::MissingArtifact(_)));
    assert!(err.to_string().contains("feature_cols.txt"));
}

#[test]
fn test_export_is_idempotent() {
    let (_dir, config) = setup(400);

    pipeline::train_all(&config).unwrap();
    pipeline::export::run(&config).unwrap();

    let store = ArtifactStore::new(&config.models_dir);
    let first: Vec<Vec<u8>> = exported_paths(&store)
        .iter()
        .map(|p| std::fs::read(p).unwrap())
        .collect();

    pipeline::export::run(&config).unwrap();
    let second: Vec<Vec<u8>> = exported_paths(&store)
        .iter()
        .map(|p| std::fs::read(p).unwrap())
        .collect();

    assert_eq!(first, second);
}

#[test]
fn test_exported_graph_batches_and_is_deterministic() {
    let (_dir, config) = setup(400);

    pipeline::train_all(&config).unwrap();
    pipeline::export::run(&config).unwrap();

    let store = ArtifactStore::new(&config.models_dir);
    let model = onnx::load_model(&store.net_export_path()).unwrap();

    let batch = ndarray::Array2::from_shape_fn((5, 11), |(i, j)| {
        (i as f64 - 2.0) * 0.5 + j as f64 * 0.1
    });

    let probs = model.graph.evaluate(&batch).unwrap();
    assert_eq!(probs.shape(), &[5, 1]);
    assert!(probs.iter().all(|p| (0.0..=1.0).contains(p)));

    let again = model.graph.evaluate(&batch).unwrap();
    assert_eq!(probs, again);
}
