//! Pipeline configuration and the feature/label contract.

use std::path::PathBuf;

use crate::training::{GradientBoostingConfig, NetConfig};

/// Feature columns, in the exact order used to fit the scaler and both
/// models. This order is persisted to `feature_cols.txt` and re-read
/// verbatim by every later stage.
pub const FEATURE_COLS: [&str; 11] = [
    "spread_binance_coinbase",
    "spread_binance_kraken",
    "spread_coinbase_kraken",
    "volume_binance",
    "volume_coinbase",
    "volume_kraken",
    "volatility",
    "hour_of_day",
    "day_of_week",
    "liquidity_score",
    "max_spread_bps",
];

/// Binary label column: 1 for a profitable opportunity, 0 otherwise.
pub const LABEL_COL: &str = "is_profitable";

/// Configuration for one pipeline run, passed explicitly into every step.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Labeled training CSV
    pub data_path: PathBuf,
    /// Directory where model artifacts are written and read
    pub models_dir: PathBuf,
    /// Feature columns in training order
    pub feature_columns: Vec<String>,
    /// Label column name
    pub label_column: String,
    /// Fraction of rows held out for evaluation
    pub test_fraction: f64,
    /// Seed for the train/test split; both trainers re-derive the same
    /// partition from this value
    pub seed: u64,
    /// Gradient boosting hyperparameters
    pub tree: GradientBoostingConfig,
    /// Neural network hyperparameters
    pub net: NetConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("data/arbitrage_training_data.csv"),
            models_dir: PathBuf::from("models"),
            feature_columns: FEATURE_COLS.iter().map(|s| s.to_string()).collect(),
            label_column: LABEL_COL.to_string(),
            test_fraction: 0.2,
            seed: 42,
            tree: GradientBoostingConfig::default(),
            net: NetConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Override the seed everywhere randomness is consumed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self.tree.random_state = Some(seed);
        self.net.random_state = Some(seed);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_feature_contract() {
        let config = PipelineConfig::default();
        assert_eq!(config.feature_columns.len(), 11);
        assert_eq!(config.feature_columns[0], "spread_binance_coinbase");
        assert_eq!(config.label_column, "is_profitable");
    }

    #[test]
    fn test_with_seed_propagates() {
        let config = PipelineConfig::default().with_seed(7);
        assert_eq!(config.seed, 7);
        assert_eq!(config.tree.random_state, Some(7));
        assert_eq!(config.net.random_state, Some(7));
    }
}
