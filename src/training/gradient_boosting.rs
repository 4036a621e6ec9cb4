//! Gradient boosted decision trees for opportunity classification.
//!
//! Binary classifier boosting regression trees on the gradient of log
//! loss, with accumulated log-odds and a sigmoid link.

use ndarray::{Array1, Array2};
use rand::prelude::*;
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::{Deserialize, Serialize};

use super::decision_tree::RegressionTree;
use crate::error::{PipelineError, Result};

/// Gradient boosting configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientBoostingConfig {
    /// Number of boosting rounds (trees)
    pub n_estimators: usize,
    /// Shrinkage applied to every tree's contribution
    pub learning_rate: f64,
    /// Maximum tree depth
    pub max_depth: usize,
    /// Minimum samples per leaf
    pub min_samples_leaf: usize,
    /// Row subsample ratio per tree (1.0 fits every tree on all rows)
    pub subsample: f64,
    /// Random seed
    pub random_state: Option<u64>,
}

impl Default for GradientBoostingConfig {
    fn default() -> Self {
        Self {
            n_estimators: 200,
            learning_rate: 0.1,
            max_depth: 8,
            min_samples_leaf: 1,
            subsample: 1.0,
            random_state: Some(42),
        }
    }
}

/// Gradient boosting classifier for binary targets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradientBoostingClassifier {
    config: GradientBoostingConfig,
    trees: Vec<RegressionTree>,
    initial_log_odds: f64,
    n_features: usize,
}

impl GradientBoostingClassifier {
    pub fn new(config: GradientBoostingConfig) -> Self {
        Self {
            config,
            trees: Vec::new(),
            initial_log_odds: 0.0,
            n_features: 0,
        }
    }

    /// Fit on raw (unscaled) features and 0/1 labels.
    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        let n_samples = x.nrows();
        if n_samples != y.len() {
            return Err(PipelineError::Shape {
                expected: format!("{} labels", n_samples),
                actual: format!("{} labels", y.len()),
            });
        }
        if n_samples == 0 {
            return Err(PipelineError::Training(
                "cannot fit on an empty dataset".to_string(),
            ));
        }

        self.n_features = x.ncols();
        self.trees = Vec::with_capacity(self.config.n_estimators);

        let p = y.mean().unwrap_or(0.5).clamp(1e-6, 1.0 - 1e-6);
        self.initial_log_odds = (p / (1.0 - p)).ln();

        let mut log_odds = Array1::from_elem(n_samples, self.initial_log_odds);

        let mut rng = match self.config.random_state {
            Some(seed) => Xoshiro256PlusPlus::seed_from_u64(seed),
            None => Xoshiro256PlusPlus::from_entropy(),
        };

        for _ in 0..self.config.n_estimators {
            // Gradient of log loss wrt the log-odds is (y - p)
            let residuals: Array1<f64> = y
                .iter()
                .zip(log_odds.iter())
                .map(|(yi, lo)| yi - sigmoid(*lo))
                .collect();

            let sample_indices = self.subsample_indices(n_samples, &mut rng);
            let x_sub = x.select(ndarray::Axis(0), &sample_indices);
            let r_sub: Array1<f64> =
                Array1::from_iter(sample_indices.iter().map(|&i| residuals[i]));

            let mut tree = RegressionTree::new(self.config.max_depth)
                .with_min_samples_leaf(self.config.min_samples_leaf);
            tree.fit(&x_sub, &r_sub)?;

            // Update every row, including those left out of the subsample,
            // so the next round's residuals stay consistent
            let tree_pred = tree.predict(x)?;
            for i in 0..n_samples {
                log_odds[i] += self.config.learning_rate * tree_pred[i];
            }

            self.trees.push(tree);
        }

        Ok(())
    }

    /// Predict profitability probabilities.
    pub fn predict_proba(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        if self.trees.is_empty() {
            return Err(PipelineError::NotFitted);
        }

        let n = x.nrows();
        let mut log_odds = Array1::from_elem(n, self.initial_log_odds);

        for tree in &self.trees {
            let tree_pred = tree.predict(x)?;
            for i in 0..n {
                log_odds[i] += self.config.learning_rate * tree_pred[i];
            }
        }

        Ok(log_odds.mapv(sigmoid))
    }

    /// Predict hard 0/1 labels at a 0.5 threshold.
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let probs = self.predict_proba(x)?;
        Ok(probs.mapv(|p| if p > 0.5 { 1.0 } else { 0.0 }))
    }

    pub fn n_estimators(&self) -> usize {
        self.trees.len()
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    fn subsample_indices(&self, n: usize, rng: &mut Xoshiro256PlusPlus) -> Vec<usize> {
        if self.config.subsample >= 1.0 {
            return (0..n).collect();
        }
        let sample_size = ((n as f64) * self.config.subsample).ceil() as usize;
        let mut indices: Vec<usize> = (0..n).collect();
        indices.shuffle(rng);
        indices.truncate(sample_size.max(1));
        indices.sort_unstable();
        indices
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array1, Array2};

    fn separable_data() -> (Array2<f64>, Array1<f64>) {
        let x = Array2::from_shape_vec(
            (100, 2),
            (0..200).map(|i| i as f64 * 0.1).collect(),
        )
        .unwrap();
        let y: Array1<f64> = x
            .rows()
            .into_iter()
            .map(|row| if row[0] + row[1] > 10.0 { 1.0 } else { 0.0 })
            .collect();
        (x, y)
    }

    fn small_config() -> GradientBoostingConfig {
        GradientBoostingConfig {
            n_estimators: 20,
            max_depth: 3,
            ..Default::default()
        }
    }

    #[test]
    fn test_learns_separable_data() {
        let (x, y) = separable_data();
        let mut model = GradientBoostingClassifier::new(small_config());
        model.fit(&x, &y).unwrap();

        let predictions = model.predict(&x).unwrap();
        let correct = y
            .iter()
            .zip(predictions.iter())
            .filter(|(t, p)| (*t - *p).abs() < 0.5)
            .count();
        assert!(correct as f64 / y.len() as f64 > 0.9);
    }

    #[test]
    fn test_probabilities_in_unit_interval() {
        let (x, y) = separable_data();
        let mut model = GradientBoostingClassifier::new(small_config());
        model.fit(&x, &y).unwrap();

        let probs = model.predict_proba(&x).unwrap();
        assert!(probs.iter().all(|p| (0.0..=1.0).contains(p)));
    }

    #[test]
    fn test_same_seed_is_deterministic() {
        let (x, y) = separable_data();

        let mut a = GradientBoostingClassifier::new(small_config());
        a.fit(&x, &y).unwrap();
        let mut b = GradientBoostingClassifier::new(small_config());
        b.fit(&x, &y).unwrap();

        let pa = a.predict_proba(&x).unwrap();
        let pb = b.predict_proba(&x).unwrap();
        assert_eq!(pa.to_vec(), pb.to_vec());
    }

    #[test]
    fn test_row_subsampling() {
        let (x, y) = separable_data();
        let config = GradientBoostingConfig {
            subsample: 0.7,
            ..small_config()
        };
        let mut model = GradientBoostingClassifier::new(config);
        model.fit(&x, &y).unwrap();

        assert_eq!(model.n_estimators(), 20);
        let predictions = model.predict(&x).unwrap();
        let correct = y
            .iter()
            .zip(predictions.iter())
            .filter(|(t, p)| (*t - *p).abs() < 0.5)
            .count();
        assert!(correct as f64 / y.len() as f64 > 0.8);
    }

    #[test]
    fn test_predict_before_fit_fails() {
        let model = GradientBoostingClassifier::new(GradientBoostingConfig::default());
        let x = Array2::zeros((2, 2));
        assert!(model.predict_proba(&x).is_err());
    }
}
