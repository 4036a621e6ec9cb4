//! Dataset loading and train/test splitting.
//!
//! The CSV is the only external input. Feature extraction converts the
//! loaded DataFrame into dense `ndarray` matrices; a null anywhere in a
//! required column is a fatal data error rather than something to impute.

use std::collections::BTreeMap;
use std::path::Path;

use ndarray::{Array1, Array2};
use polars::prelude::*;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::error::{PipelineError, Result};

/// Load the training CSV into a DataFrame.
pub fn load_dataset(path: &Path) -> Result<DataFrame> {
    if !path.exists() {
        return Err(PipelineError::Data(format!(
            "training data not found at {}",
            path.display()
        )));
    }

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(1000))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;

    Ok(df)
}

/// Extract the named feature columns as a row-major `(n_rows, n_cols)`
/// matrix, in the given column order.
pub fn feature_matrix(df: &DataFrame, columns: &[String]) -> Result<Array2<f64>> {
    let n_rows = df.height();
    let mut cols: Vec<Vec<f64>> = Vec::with_capacity(columns.len());
    for name in columns {
        cols.push(numeric_column(df, name)?);
    }

    Ok(Array2::from_shape_fn((n_rows, columns.len()), |(i, j)| {
        cols[j][i]
    }))
}

/// Extract the binary label column. Values other than 0 and 1 are rejected.
pub fn label_vector(df: &DataFrame, column: &str) -> Result<Array1<f64>> {
    let values = numeric_column(df, column)?;
    if let Some(bad) = values.iter().find(|v| **v != 0.0 && **v != 1.0) {
        return Err(PipelineError::Data(format!(
            "label column '{column}' must be binary, found value {bad}"
        )));
    }
    Ok(Array1::from_vec(values))
}

fn numeric_column(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let column = df
        .column(name)
        .map_err(|_| PipelineError::MissingColumn(name.to_string()))?;
    let series = column.as_materialized_series().cast(&DataType::Float64)?;
    let ca = series.f64()?;

    if ca.null_count() > 0 {
        return Err(PipelineError::Data(format!(
            "column '{}' contains {} null value(s)",
            name,
            ca.null_count()
        )));
    }

    Ok(ca.into_no_null_iter().collect())
}

/// Row indices of a train/test partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainTestSplit {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Stratified train/test split preserving class proportions.
///
/// The same `(labels, test_fraction, seed)` always yields the same
/// membership, which is how the tree and neural trainers end up evaluating
/// on identical held-out rows without sharing any state. Class buckets are
/// visited in sorted label order so the result is stable across processes.
pub fn stratified_split(
    y: &Array1<f64>,
    test_fraction: f64,
    seed: u64,
) -> Result<TrainTestSplit> {
    if !(0.0..1.0).contains(&test_fraction) || test_fraction == 0.0 {
        return Err(PipelineError::Data(format!(
            "test fraction must be in (0, 1), got {test_fraction}"
        )));
    }

    let mut buckets: BTreeMap<i64, Vec<usize>> = BTreeMap::new();
    for (i, &label) in y.iter().enumerate() {
        buckets.entry(label as i64).or_default().push(i);
    }

    if buckets.len() < 2 {
        return Err(PipelineError::DegenerateData(
            "stratified split needs at least two label classes".to_string(),
        ));
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut train = Vec::with_capacity(y.len());
    let mut test = Vec::new();

    for (label, mut indices) in buckets {
        if indices.len() < 2 {
            return Err(PipelineError::DegenerateData(format!(
                "class {label} has fewer than two rows"
            )));
        }
        indices.shuffle(&mut rng);
        let n_test = ((indices.len() as f64) * test_fraction).round() as usize;
        let n_test = n_test.clamp(1, indices.len() - 1);
        test.extend_from_slice(&indices[..n_test]);
        train.extend_from_slice(&indices[n_test..]);
    }

    train.sort_unstable();
    test.sort_unstable();

    Ok(TrainTestSplit { train, test })
}
