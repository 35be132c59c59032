//! Confusion matrix and derived metrics.

use serde::{Deserialize, Serialize};

/// TP/FP/FN/TN counts over evaluated cells.
///
/// [`merge`](Self::merge) is associative and commutative, so per-region
/// matrices can be combined in any order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    #[serde(rename = "tp")]
    true_positives: u64,
    #[serde(rename = "fp")]
    false_positives: u64,
    #[serde(rename = "fn")]
    false_negatives: u64,
    #[serde(rename = "tn")]
    true_negatives: u64,
}

impl ConfusionMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a matrix from known counts.
    pub fn from_counts(tp: u64, fp: u64, fn_: u64, tn: u64) -> Self {
        Self {
            true_positives: tp,
            false_positives: fp,
            false_negatives: fn_,
            true_negatives: tn,
        }
    }

    /// Counts one cell.
    pub fn record(&mut self, predicted: bool, actual: bool) {
        match (predicted, actual) {
            (true, true) => self.true_positives += 1,
            (true, false) => self.false_positives += 1,
            (false, true) => self.false_negatives += 1,
            (false, false) => self.true_negatives += 1,
        }
    }

    /// Sum of two matrices.
    pub fn merge(self, other: Self) -> Self {
        Self {
            true_positives: self.true_positives + other.true_positives,
            false_positives: self.false_positives + other.false_positives,
            false_negatives: self.false_negatives + other.false_negatives,
            true_negatives: self.true_negatives + other.true_negatives,
        }
    }

    pub fn true_positives(&self) -> u64 {
        self.true_positives
    }

    pub fn false_positives(&self) -> u64 {
        self.false_positives
    }

    pub fn false_negatives(&self) -> u64 {
        self.false_negatives
    }

    pub fn true_negatives(&self) -> u64 {
        self.true_negatives
    }

    /// Number of cells predicted positive (TP + FP).
    pub fn predicted_positive(&self) -> u64 {
        self.true_positives + self.false_positives
    }

    /// Total evaluated cells.
    pub fn total(&self) -> u64 {
        self.true_positives + self.false_positives + self.false_negatives + self.true_negatives
    }

    pub fn metrics(&self) -> Metrics {
        Metrics::from_matrix(self)
    }
}

/// Accuracy, precision, recall and F1. Pure functions of the four counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

impl Metrics {
    /// Computes metrics; every ratio with a zero denominator is 0.
    pub fn from_matrix(m: &ConfusionMatrix) -> Self {
        let tp = m.true_positives as f64;
        let fp = m.false_positives as f64;
        let fn_ = m.false_negatives as f64;
        let tn = m.true_negatives as f64;

        let accuracy = ratio(tp + tn, tp + fp + fn_ + tn);
        let precision = ratio(tp, tp + fp);
        let recall = ratio(tp, tp + fn_);
        let f1 = ratio(2.0 * precision * recall, precision + recall);
        Self {
            accuracy,
            precision,
            recall,
            f1,
        }
    }
}

fn ratio(num: f64, den: f64) -> f64 {
    if den == 0.0 { 0.0 } else { num / den }
}
