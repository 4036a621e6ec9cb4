//! Offline evaluation metrics for binary classifiers

use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Metrics computed on the held-out test partition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalMetrics {
    pub accuracy: f64,
    pub f1_score: f64,
    pub roc_auc: f64,
    /// Number of evaluated rows
    pub n_test: usize,
}

impl EvalMetrics {
    /// Compute accuracy, F1 and ROC-AUC from predicted probabilities.
    /// Hard predictions use `probability > threshold`.
    pub fn from_probabilities(
        y_true: &Array1<f64>,
        y_prob: &Array1<f64>,
        threshold: f64,
    ) -> Self {
        let n = y_true.len();

        let mut tp = 0usize;
        let mut fp = 0usize;
        let mut fn_ = 0usize;
        let mut correct = 0usize;

        for (t, p) in y_true.iter().zip(y_prob.iter()) {
            let truth = *t > 0.5;
            let pred = *p > threshold;
            if truth == pred {
                correct += 1;
            }
            match (truth, pred) {
                (true, true) => tp += 1,
                (false, true) => fp += 1,
                (true, false) => fn_ += 1,
                (false, false) => {}
            }
        }

        let accuracy = if n > 0 { correct as f64 / n as f64 } else { 0.0 };

        let precision = if tp + fp > 0 {
            tp as f64 / (tp + fp) as f64
        } else {
            0.0
        };
        let recall = if tp + fn_ > 0 {
            tp as f64 / (tp + fn_) as f64
        } else {
            0.0
        };
        let f1_score = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };

        Self {
            accuracy,
            f1_score,
            roc_auc: roc_auc(y_true, y_prob),
            n_test: n,
        }
    }
}

/// Area under the ROC curve via the rank-sum statistic, with average
/// ranks for tied scores. Returns 0.5 when only one class is present.
fn roc_auc(y_true: &Array1<f64>, y_prob: &Array1<f64>) -> f64 {
    let n = y_true.len();
    let n_pos = y_true.iter().filter(|&&t| t > 0.5).count();
    let n_neg = n - n_pos;
    if n_pos == 0 || n_neg == 0 {
        return 0.5;
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        y_prob[a]
            .partial_cmp(&y_prob[b])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    // Assign 1-based ranks, averaging within tie groups
    let mut ranks = vec![0.0; n];
    let mut i = 0;
    while i < n {
        let mut j = i;
        while j + 1 < n && y_prob[order[j + 1]] == y_prob[order[i]] {
            j += 1;
        }
        let avg_rank = (i + j) as f64 / 2.0 + 1.0;
        for k in i..=j {
            ranks[order[k]] = avg_rank;
        }
        i = j + 1;
    }

    let pos_rank_sum: f64 = y_true
        .iter()
        .zip(ranks.iter())
        .filter(|(t, _)| **t > 0.5)
        .map(|(_, r)| *r)
        .sum();

    let u = pos_rank_sum - (n_pos * (n_pos + 1)) as f64 / 2.0;
    u / (n_pos * n_neg) as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_accuracy_and_f1() {
        let y_true = array![1.0, 0.0, 1.0, 1.0, 0.0, 0.0];
        let y_prob = array![0.9, 0.2, 0.8, 0.3, 0.1, 0.7];

        let m = EvalMetrics::from_probabilities(&y_true, &y_prob, 0.5);
        // tp=2, fp=1, fn=1, tn=2
        assert!((m.accuracy - 4.0 / 6.0).abs() < 1e-12);
        let precision = 2.0 / 3.0;
        let recall = 2.0 / 3.0;
        let f1 = 2.0 * precision * recall / (precision + recall);
        assert!((m.f1_score - f1).abs() < 1e-12);
        assert_eq!(m.n_test, 6);
    }

    #[test]
    fn test_auc_perfect_separation() {
        let y_true = array![0.0, 0.0, 1.0, 1.0];
        let y_prob = array![0.1, 0.2, 0.8, 0.9];
        let m = EvalMetrics::from_probabilities(&y_true, &y_prob, 0.5);
        assert!((m.roc_auc - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_auc_inverted_scores() {
        let y_true = array![0.0, 0.0, 1.0, 1.0];
        let y_prob = array![0.9, 0.8, 0.2, 0.1];
        let m = EvalMetrics::from_probabilities(&y_true, &y_prob, 0.5);
        assert!(m.roc_auc.abs() < 1e-12);
    }

    #[test]
    fn test_auc_with_ties() {
        let y_true = array![0.0, 1.0, 0.0, 1.0];
        let y_prob = array![0.5, 0.5, 0.5, 0.5];
        let m = EvalMetrics::from_probabilities(&y_true, &y_prob, 0.5);
        assert!((m.roc_auc - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_auc_single_class_degenerate() {
        let y_true = array![1.0, 1.0, 1.0];
        let y_prob = array![0.2, 0.4, 0.9];
        let m = EvalMetrics::from_probabilities(&y_true, &y_prob, 0.5);
        assert_eq!(m.roc_auc, 0.5);
    }
}
