//! Artifact files shared between pipeline steps.
//!
//! Flat files in one directory are the only hand-off mechanism between the
//! tree trainer, the neural trainer, and the exporter. Every path is
//! derived here so the steps never disagree on names.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{PipelineError, Result};

pub const FEATURE_COLS_FILE: &str = "feature_cols.txt";
pub const SCALER_FILE: &str = "scaler.bin";
pub const TREE_MODEL_FILE: &str = "gbdt_classifier.bin";
pub const NET_MODEL_FILE: &str = "arbitrage_net.bin";
pub const NET_EXPORT_FILE: &str = "arbitrage_net.onnx.json";
pub const TREE_EXPORT_FILE: &str = "gbdt_classifier.json";
pub const SCALER_EXPORT_FILE: &str = "scaler_params.json";

/// The artifacts directory of one pipeline run.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the directory if it does not exist yet.
    pub fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        Ok(())
    }

    pub fn feature_cols_path(&self) -> PathBuf {
        self.dir.join(FEATURE_COLS_FILE)
    }

    pub fn scaler_path(&self) -> PathBuf {
        self.dir.join(SCALER_FILE)
    }

    pub fn tree_model_path(&self) -> PathBuf {
        self.dir.join(TREE_MODEL_FILE)
    }

    pub fn net_model_path(&self) -> PathBuf {
        self.dir.join(NET_MODEL_FILE)
    }

    pub fn net_export_path(&self) -> PathBuf {
        self.dir.join(NET_EXPORT_FILE)
    }

    pub fn tree_export_path(&self) -> PathBuf {
        self.dir.join(TREE_EXPORT_FILE)
    }

    pub fn scaler_export_path(&self) -> PathBuf {
        self.dir.join(SCALER_EXPORT_FILE)
    }

    /// Persist the ordered feature column list, one name per line.
    pub fn write_feature_cols(&self, columns: &[String]) -> Result<()> {
        fs::write(self.feature_cols_path(), columns.join("\n"))?;
        Ok(())
    }

    /// Re-read the feature column list exactly as persisted.
    pub fn read_feature_cols(&self) -> Result<Vec<String>> {
        let path = self.feature_cols_path();
        if !path.exists() {
            return Err(PipelineError::MissingArtifact(path));
        }
        let contents = fs::read_to_string(path)?;
        Ok(contents
            .trim()
            .lines()
            .map(|line| line.trim().to_string())
            .collect())
    }

    /// Every file in the directory with its size, sorted by name.
    pub fn summary(&self) -> Result<Vec<(String, u64)>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                entries.push((
                    entry.file_name().to_string_lossy().into_owned(),
                    entry.metadata()?.len(),
                ));
            }
        }
        entries.sort();
        Ok(entries)
    }
}

/// Serialize a model object to its opaque binary artifact.
pub fn save_bincode<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    let bytes = bincode::serialize(value)?;
    fs::write(path, bytes)?;
    Ok(())
}

/// Load a binary artifact, failing fast with the artifact named when the
/// producing step has not run yet.
pub fn load_bincode<T: DeserializeOwned>(path: &Path) -> Result<T> {
    if !path.exists() {
        return Err(PipelineError::MissingArtifact(path.to_path_buf()));
    }
    let bytes = fs::read(path)?;
    Ok(bincode::deserialize(&bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_cols_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());

        let cols = vec!["volatility".to_string(), "liquidity_score".to_string()];
        store.write_feature_cols(&cols).unwrap();
        assert_eq!(store.read_feature_cols().unwrap(), cols);
    }

    #[test]
    fn test_missing_feature_cols_named() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());

        let err = store.read_feature_cols().unwrap_err();
        assert!(err.to_string().contains(FEATURE_COLS_FILE));
    }

    #[test]
    fn test_bincode_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("value.bin");

        save_bincode(&vec![1.0f64, 2.0, 3.0], &path).unwrap();
        let restored: Vec<f64> = load_bincode(&path).unwrap();
        assert_eq!(restored, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_missing_bincode_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.bin");

        let err = load_bincode::<Vec<f64>>(&path).unwrap_err();
        assert!(matches!(err, PipelineError::MissingArtifact(_)));
    }

    #[test]
    fn test_summary_lists_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());
        store.ensure_dir().unwrap();
        store
            .write_feature_cols(&["volatility".to_string()])
            .unwrap();

        let summary = store.summary().unwrap();
        assert_eq!(summary.len(), 1);
        assert_eq!(summary[0].0, FEATURE_COLS_FILE);
        assert!(summary[0].1 > 0);
    }
}
