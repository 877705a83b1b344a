//! Accuracy and macro-averaged precision, recall and F1 from a confusion matrix.
//!
//! Reported percentages are rounded to two decimals with ties to even. A class
//! with no gold examples has undefined recall and a class that is never
//! predicted has undefined precision; both come out as `NaN` and make the
//! corresponding macro average `NaN` as well.

use std::fmt;

use crate::ml::classic::label::Label;
use crate::ml::evaluation::confusion_matrix::ConfusionMatrix;

/// One of the four reported metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Accuracy,
    MacroPrecision,
    MacroRecall,
    MacroF1,
}

/// Metrics for one value of k, as percentages in `[0, 100]` or `NaN`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricsResult {
    pub k: usize,
    pub accuracy: f64,
    pub macro_precision: f64,
    pub macro_recall: f64,
    pub macro_f1: f64,
}

impl MetricsResult {
    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Accuracy => self.accuracy,
            Metric::MacroPrecision => self.macro_precision,
            Metric::MacroRecall => self.macro_recall,
            Metric::MacroF1 => self.macro_f1,
        }
    }

    /// `false` if any metric is undefined.
    pub fn is_defined(&self) -> bool {
        [
            self.accuracy,
            self.macro_precision,
            self.macro_recall,
            self.macro_f1,
        ]
        .iter()
        .all(|v| !v.is_nan())
    }
}

impl fmt::Display for MetricsResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "k = {}: accuracy {:.2}%, macro-precision {:.2}%, macro-recall {:.2}%, macro-F1 {:.2}%",
            self.k, self.accuracy, self.macro_precision, self.macro_recall, self.macro_f1
        )
    }
}

/// Per-class scores as raw ratios in `[0, 1]` (or `NaN`), plus the class support.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassMetrics {
    pub label: Label,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    /// Number of gold examples of this class.
    pub support: usize,
}

/// Computes the [`MetricsResult`] for `k` from a finalized matrix.
pub fn evaluate(k: usize, matrix: &ConfusionMatrix) -> MetricsResult {
    let report = class_report(matrix);
    let macro_avg = |score: fn(&ClassMetrics) -> f64| {
        let sum: f64 = report.iter().map(score).sum();
        round_percent(sum / Label::COUNT as f64)
    };

    MetricsResult {
        k,
        accuracy: accuracy(matrix),
        macro_precision: macro_avg(|c| c.precision),
        macro_recall: macro_avg(|c| c.recall),
        macro_f1: macro_avg(|c| c.f1),
    }
}

/// Share of correct predictions, as a rounded percentage.
pub fn accuracy(matrix: &ConfusionMatrix) -> f64 {
    round_percent(ratio(matrix.correct(), matrix.total()))
}

/// Precision, recall, F1 and support for every class in [`Label::ALL`] order.
pub fn class_report(matrix: &ConfusionMatrix) -> [ClassMetrics; Label::COUNT] {
    Label::ALL.map(|label| {
        let tp = matrix.true_positives(label);
        let precision = ratio(tp, matrix.predicted_total(label));
        let recall = ratio(tp, matrix.gold_total(label));
        ClassMetrics {
            label,
            precision,
            recall,
            f1: f1_score(precision, recall),
            support: matrix.gold_total(label),
        }
    })
}

/// Harmonic mean of precision and recall; 0 when both are 0.
pub fn f1_score(precision: f64, recall: f64) -> f64 {
    if precision == 0.0 && recall == 0.0 {
        return 0.0;
    }
    2.0 * precision * recall / (precision + recall)
}

/// Converts a ratio to a percentage rounded to two decimals, ties to even.
pub fn round_percent(ratio: f64) -> f64 {
    (ratio * 100.0 * 100.0).round_ties_even() / 100.0
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        return f64::NAN;
    }
    numerator as f64 / denominator as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use Label::*;

    #[test]
    fn test_perfect_predictions() {
        let cm = ConfusionMatrix::from_pairs([
            (Positive, Positive),
            (Neutral, Neutral),
            (Neutral, Neutral),
            (Negative, Negative),
        ]);
        let m = evaluate(1, &cm);

        assert_eq!(m.accuracy, 100.0);
        assert_eq!(m.macro_precision, 100.0);
        assert_eq!(m.macro_recall, 100.0);
        assert_eq!(m.macro_f1, 100.0);
        assert!(m.is_defined());
    }

    #[test]
    fn test_circular_rotation_is_all_wrong() {
        let cm = ConfusionMatrix::from_pairs([
            (Positive, Neutral),
            (Neutral, Negative),
            (Negative, Positive),
            (Positive, Neutral),
        ]);
        let m = evaluate(3, &cm);

        assert_eq!(cm.correct(), 0);
        assert_eq!(m.accuracy, 0.0);
        assert_eq!(m.macro_precision, 0.0);
        assert_eq!(m.macro_recall, 0.0);
        assert_eq!(m.macro_f1, 0.0);
    }

    #[test]
    fn test_mixed_matrix() {
        // gold rows, predicted columns
        //            pos neu neg
        // positive    3   1   0
        // neutral     1   2   1
        // negative    0   1   3
        let mut pairs = Vec::new();
        let cells = [[3, 1, 0], [1, 2, 1], [0, 1, 3]];
        for (g, row) in cells.iter().enumerate() {
            for (p, &n) in row.iter().enumerate() {
                for _ in 0..n {
                    pairs.push((Label::ALL[g], Label::ALL[p]));
                }
            }
        }
        let cm = ConfusionMatrix::from_pairs(pairs);
        let report = class_report(&cm);

        assert_relative_eq!(report[0].precision, 0.75, epsilon = 1e-12);
        assert_relative_eq!(report[0].recall, 0.75, epsilon = 1e-12);
        assert_relative_eq!(report[1].precision, 0.5, epsilon = 1e-12);
        assert_relative_eq!(report[1].recall, 0.5, epsilon = 1e-12);
        assert_eq!(report[2].support, 4);

        let m = evaluate(5, &cm);
        assert_eq!(m.k, 5);
        assert_eq!(m.accuracy, 66.67);
        assert_eq!(m.macro_precision, 66.67);
        assert_eq!(m.macro_recall, 66.67);
        assert_eq!(m.macro_f1, 66.67);
    }

    #[test]
    fn test_absent_gold_class_is_undefined() {
        // No neutral gold examples, and neutral is never predicted.
        let cm = ConfusionMatrix::from_pairs([(Positive, Positive), (Negative, Negative)]);
        let report = class_report(&cm);
        let m = evaluate(1, &cm);

        assert!(report[1].recall.is_nan());
        assert!(report[1].precision.is_nan());
        assert_eq!(m.accuracy, 100.0);
        assert!(m.macro_recall.is_nan());
        assert!(m.macro_precision.is_nan());
        assert!(m.macro_f1.is_nan());
        assert!(!m.is_defined());
    }

    #[test]
    fn test_f1_zero_when_precision_and_recall_zero() {
        assert_eq!(f1_score(0.0, 0.0), 0.0);
        assert_relative_eq!(f1_score(0.5, 1.0), 2.0 / 3.0, epsilon = 1e-12);
        assert!(f1_score(f64::NAN, 0.0).is_nan());
    }

    #[test]
    fn test_round_percent_ties_to_even() {
        assert_eq!(round_percent(0.123456), 12.35);
        assert_eq!(round_percent(2.0 / 3.0), 66.67);
        assert_eq!(round_percent(0.0), 0.0);
        assert_eq!(round_percent(1.0), 100.0);
        assert_eq!(round_percent(0.125), 12.5);
        assert!(round_percent(f64::NAN).is_nan());
    }

    #[test]
    fn test_empty_matrix_accuracy_undefined() {
        assert!(accuracy(&ConfusionMatrix::default()).is_nan());
    }

    #[test]
    fn test_metrics_in_range() {
        let cm = ConfusionMatrix::from_pairs([
            (Positive, Positive),
            (Positive, Negative),
            (Neutral, Positive),
            (Neutral, Neutral),
            (Negative, Neutral),
            (Negative, Negative),
            (Negative, Negative),
        ]);
        let m = evaluate(7, &cm);
        for metric in [
            Metric::Accuracy,
            Metric::MacroPrecision,
            Metric::MacroRecall,
            Metric::MacroF1,
        ] {
            let v = m.get(metric);
            assert!((0.0..=100.0).contains(&v), "{:?} = {}", metric, v);
        }
    }

    #[test]
    fn test_display() {
        let m = MetricsResult {
            k: 3,
            accuracy: 61.2,
            macro_precision: 55.0,
            macro_recall: 50.12,
            macro_f1: 52.0,
        };
        assert_eq!(
            m.to_string(),
            "k = 3: accuracy 61.20%, macro-precision 55.00%, macro-recall 50.12%, macro-F1 52.00%"
        );
    }
}
