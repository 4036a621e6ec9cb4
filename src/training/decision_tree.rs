//! Regression tree, the base learner for gradient boosting.

use ndarray::{Array1, Array2};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};

/// A node in a fitted tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TreeNode {
    Leaf {
        value: f64,
        n_samples: usize,
    },
    Split {
        feature_idx: usize,
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
}

/// Regression tree minimizing squared error, grown depth-first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegressionTree {
    root: Option<TreeNode>,
    pub max_depth: usize,
    pub min_samples_leaf: usize,
    n_features: usize,
}

impl RegressionTree {
    pub fn new(max_depth: usize) -> Self {
        Self {
            root: None,
            max_depth,
            min_samples_leaf: 1,
            n_features: 0,
        }
    }

    pub fn with_min_samples_leaf(mut self, min_samples: usize) -> Self {
        self.min_samples_leaf = min_samples.max(1);
        self
    }

    /// Fit the tree to training data.
    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<&mut Self> {
        let n_samples = x.nrows();
        if n_samples != y.len() {
            return Err(PipelineError::Shape {
                expected: format!("{} target values", n_samples),
                actual: format!("{} target values", y.len()),
            });
        }
        if n_samples == 0 {
            return Err(PipelineError::Training(
                "cannot fit a tree on zero samples".to_string(),
            ));
        }

        self.n_features = x.ncols();
        let indices: Vec<usize> = (0..n_samples).collect();
        self.root = Some(self.build_node(x, y, &indices, 0));
        Ok(self)
    }

    fn build_node(&self, x: &Array2<f64>, y: &Array1<f64>, indices: &[usize], depth: usize) -> TreeNode {
        let n_samples = indices.len();
        let mean = indices.iter().map(|&i| y[i]).sum::<f64>() / n_samples as f64;

        let should_stop = depth >= self.max_depth
            || n_samples < 2 * self.min_samples_leaf
            || self.is_constant(y, indices);

        if should_stop {
            return TreeNode::Leaf {
                value: mean,
                n_samples,
            };
        }

        match self.find_best_split(x, y, indices) {
            Some((feature_idx, threshold)) => {
                let (left_indices, right_indices): (Vec<usize>, Vec<usize>) = indices
                    .iter()
                    .partition(|&&i| x[[i, feature_idx]] <= threshold);

                let left = Box::new(self.build_node(x, y, &left_indices, depth + 1));
                let right = Box::new(self.build_node(x, y, &right_indices, depth + 1));

                TreeNode::Split {
                    feature_idx,
                    threshold,
                    left,
                    right,
                }
            }
            None => TreeNode::Leaf {
                value: mean,
                n_samples,
            },
        }
    }

    /// Scan every feature in parallel; within a feature, sort once and use
    /// prefix sums so each candidate threshold is scored in O(1).
    fn find_best_split(&self, x: &Array2<f64>, y: &Array1<f64>, indices: &[usize]) -> Option<(usize, f64)> {
        let n = indices.len();
        let total_sum: f64 = indices.iter().map(|&i| y[i]).sum();
        let total_sq: f64 = indices.iter().map(|&i| y[i] * y[i]).sum();
        let parent_sse = total_sq - total_sum * total_sum / n as f64;

        let candidates: Vec<(usize, f64, f64)> = (0..x.ncols())
            .into_par_iter()
            .filter_map(|feature_idx| {
                let mut pairs: Vec<(f64, f64)> = indices
                    .iter()
                    .map(|&i| (x[[i, feature_idx]], y[i]))
                    .collect();
                pairs.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

                let mut best: Option<(f64, f64)> = None; // (gain, threshold)
                let mut left_sum = 0.0;
                let mut left_sq = 0.0;

                for k in 1..n {
                    let (prev_value, prev_target) = pairs[k - 1];
                    left_sum += prev_target;
                    left_sq += prev_target * prev_target;

                    // Ties share a side; only split where the value changes
                    if pairs[k].0 <= prev_value {
                        continue;
                    }
                    if k < self.min_samples_leaf || n - k < self.min_samples_leaf {
                        continue;
                    }

                    let right_sum = total_sum - left_sum;
                    let right_sq = total_sq - left_sq;
                    let left_sse = left_sq - left_sum * left_sum / k as f64;
                    let right_sse = right_sq - right_sum * right_sum / (n - k) as f64;
                    let gain = parent_sse - left_sse - right_sse;

                    if gain > 1e-12 && best.map_or(true, |(g, _)| gain > g) {
                        best = Some((gain, (prev_value + pairs[k].0) / 2.0));
                    }
                }

                best.map(|(gain, threshold)| (feature_idx, threshold, gain))
            })
            .collect();

        candidates
            .into_iter()
            .max_by(|a, b| a.2.partial_cmp(&b.2).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(feature_idx, threshold, _)| (feature_idx, threshold))
    }

    fn is_constant(&self, y: &Array1<f64>, indices: &[usize]) -> bool {
        let first = y[indices[0]];
        indices.iter().all(|&i| (y[i] - first).abs() < 1e-12)
    }

    /// Make predictions.
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let root = self.root.as_ref().ok_or(PipelineError::NotFitted)?;

        let predictions: Vec<f64> = x
            .rows()
            .into_iter()
            .map(|row| Self::predict_row(root, &row.to_vec()))
            .collect();

        Ok(Array1::from_vec(predictions))
    }

    fn predict_row(node: &TreeNode, row: &[f64]) -> f64 {
        match node {
            TreeNode::Leaf { value, .. } => *value,
            TreeNode::Split {
                feature_idx,
                threshold,
                left,
                right,
            } => {
                if row[*feature_idx] <= *threshold {
                    Self::predict_row(left, row)
                } else {
                    Self::predict_row(right, row)
                }
            }
        }
    }

    /// Depth of the fitted tree.
    pub fn depth(&self) -> usize {
        fn node_depth(node: &TreeNode) -> usize {
            match node {
                TreeNode::Leaf { .. } => 0,
                TreeNode::Split { left, right, .. } => 1 + node_depth(left).max(node_depth(right)),
            }
        }
        self.root.as_ref().map_or(0, node_depth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_fits_step_function() {
        let x = array![[1.0], [2.0], [3.0], [4.0], [5.0], [6.0]];
        let y = array![0.0, 0.0, 0.0, 1.0, 1.0, 1.0];

        let mut tree = RegressionTree::new(3);
        tree.fit(&x, &y).unwrap();

        let predictions = tree.predict(&x).unwrap();
        for (p, t) in predictions.iter().zip(y.iter()) {
            assert!((p - t).abs() < 1e-9, "prediction {p} vs target {t}");
        }
    }

    #[test]
    fn test_respects_max_depth() {
        let x = array![[1.0], [2.0], [3.0], [4.0], [5.0], [6.0], [7.0], [8.0]];
        let y = array![1.0, 5.0, 2.0, 8.0, 3.0, 9.0, 4.0, 7.0];

        let mut tree = RegressionTree::new(2);
        tree.fit(&x, &y).unwrap();
        assert!(tree.depth() <= 2);
    }

    #[test]
    fn test_constant_target_is_single_leaf() {
        let x = array![[1.0], [2.0], [3.0]];
        let y = array![4.0, 4.0, 4.0];

        let mut tree = RegressionTree::new(5);
        tree.fit(&x, &y).unwrap();
        assert_eq!(tree.depth(), 0);

        let predictions = tree.predict(&array![[10.0]]).unwrap();
        assert!((predictions[0] - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_min_samples_leaf() {
        let x = array![[1.0], [2.0], [3.0], [4.0]];
        let y = array![0.0, 0.0, 1.0, 1.0];

        let mut tree = RegressionTree::new(8).with_min_samples_leaf(2);
        tree.fit(&x, &y).unwrap();
        assert!(tree.depth() <= 1);
    }

    #[test]
    fn test_predict_before_fit_fails() {
        let tree = RegressionTree::new(3);
        assert!(tree.predict(&array![[1.0]]).is_err());
    }
}
