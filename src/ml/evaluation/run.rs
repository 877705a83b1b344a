use log::{debug, info, warn};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::ml::classic::distance::DistanceMatrix;
use crate::ml::classic::k_nearest::{KNNClassifier, TieBreak};
use crate::ml::classic::label::Label;
use crate::ml::classic::vector_store::{LabeledExample, VectorStore};
use crate::ml::evaluation::confusion_matrix::{ConfusionMatrix, ConfusionMatrixBuilder};
use crate::ml::evaluation::metrics::{self, Metric, MetricsResult};

/// Configuration options for a k-sweep evaluation.
#[derive(Debug, Clone)]
pub struct EvaluationConfig {
    /// Values of k to evaluate, in report order.
    pub k_values: Vec<usize>,
    /// Majority-vote tie resolution.
    pub tie_break: TieBreak,
    /// Seed for the tie-break random source. `None` draws from entropy.
    pub seed: Option<u64>,
    /// Compute distance rows and per-k evaluations on the rayon pool.
    pub parallel: bool,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self::new(vec![1, 3, 5, 7, 10])
    }
}

impl EvaluationConfig {
    /// Create a new config with random tie-breaking, no seed and sequential execution.
    pub fn new(k_values: Vec<usize>) -> Self {
        Self {
            k_values,
            tie_break: TieBreak::Random,
            seed: None,
            parallel: false,
        }
    }

    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

/// Outcome of evaluating a single k.
#[derive(Debug, Clone, PartialEq)]
pub struct KEvaluation {
    pub metrics: MetricsResult,
    pub confusion: ConfusionMatrix,
    /// Predicted label per query, in query order.
    pub predictions: Vec<Label>,
}

/// Results of a full sweep.
///
/// The four metric series and `k_values` are index-aligned and cover only the
/// k values that could be evaluated; the rest are listed in `failures`.
#[derive(Debug, Clone, Default)]
pub struct EvaluationReport {
    pub k_values: Vec<usize>,
    pub accuracy: Vec<f64>,
    pub macro_precision: Vec<f64>,
    pub macro_recall: Vec<f64>,
    pub macro_f1: Vec<f64>,
    pub evaluations: Vec<KEvaluation>,
    pub failures: Vec<(usize, Error)>,
}

impl EvaluationReport {
    /// Collects per-k outcomes in sweep order. Per-k errors become
    /// `failures`; the first other error is returned.
    fn from_outcomes(outcomes: Vec<(usize, Result<KEvaluation>)>) -> Result<Self> {
        let mut report = Self::default();
        for (k, outcome) in outcomes {
            match outcome {
                Ok(evaluation) => {
                    info!("{}", evaluation.metrics);
                    if !evaluation.metrics.is_defined() {
                        warn!(
                            "k = {}: some metrics are undefined (a class has no gold or no predicted examples)",
                            k
                        );
                    }
                    report.push(evaluation);
                }
                Err(e) if e.is_per_k() => {
                    warn!("skipping k = {}: {}", k, e);
                    report.failures.push((k, e));
                }
                Err(e) => return Err(e),
            }
        }
        Ok(report)
    }

    fn push(&mut self, evaluation: KEvaluation) {
        let m = evaluation.metrics;
        self.k_values.push(m.k);
        self.accuracy.push(m.accuracy);
        self.macro_precision.push(m.macro_precision);
        self.macro_recall.push(m.macro_recall);
        self.macro_f1.push(m.macro_f1);
        self.evaluations.push(evaluation);
    }

    pub fn results(&self) -> impl Iterator<Item = &MetricsResult> {
        self.evaluations.iter().map(|e| &e.metrics)
    }

    /// The series for one metric, aligned with `k_values`.
    pub fn series(&self, metric: Metric) -> &[f64] {
        match metric {
            Metric::Accuracy => &self.accuracy,
            Metric::MacroPrecision => &self.macro_precision,
            Metric::MacroRecall => &self.macro_recall,
            Metric::MacroF1 => &self.macro_f1,
        }
    }

    pub fn confusion_matrix(&self, k: usize) -> Option<&ConfusionMatrix> {
        self.evaluations
            .iter()
            .find(|e| e.metrics.k == k)
            .map(|e| &e.confusion)
    }

    /// The result with the highest defined value of `metric`. The earliest k
    /// wins on equal values.
    pub fn best_by(&self, metric: Metric) -> Option<&MetricsResult> {
        self.results()
            .filter(|m| !m.get(metric).is_nan())
            .fold(None, |best: Option<&MetricsResult>, m| match best {
                Some(b) if b.get(metric) >= m.get(metric) => Some(b),
                _ => Some(m),
            })
    }
}

/// A reference set, a labeled query set and their distance matrix, ready to
/// be evaluated over a sweep of k values.
///
/// Distances are computed once at construction and shared read-only by every
/// k. Each call to [`EvaluationRun::run`] returns a fresh report.
///
/// # Example
///
/// ```
/// use sentiknn::ml::classic::{Label, LabeledExample, VectorStore};
/// use sentiknn::ml::evaluation::{EvaluationConfig, EvaluationRun};
///
/// let store = VectorStore::new(vec![
///     LabeledExample::new(vec![1.0, 0.0], Label::Positive),
///     LabeledExample::new(vec![0.0, 1.0], Label::Negative),
///     LabeledExample::new(vec![0.0, 0.0], Label::Neutral),
/// ])
/// .unwrap();
/// let queries = vec![
///     LabeledExample::new(vec![0.9, 0.1], Label::Positive),
///     LabeledExample::new(vec![0.1, 0.8], Label::Negative),
/// ];
///
/// let run = EvaluationRun::new(store, queries, EvaluationConfig::new(vec![1]).with_seed(1)).unwrap();
/// let report = run.run().unwrap();
/// assert_eq!(report.accuracy, vec![100.0]);
/// ```
#[derive(Debug, Clone)]
pub struct EvaluationRun {
    store: VectorStore,
    queries: Vec<LabeledExample>,
    distances: DistanceMatrix,
    config: EvaluationConfig,
}

impl EvaluationRun {
    /// Validates the query set against the store and computes the distance matrix.
    ///
    /// # Errors
    ///
    /// `DimensionMismatch`, `EmptyVector` or `NonFiniteValue` for the first
    /// malformed query vector. These abort the whole run.
    pub fn new(
        store: VectorStore,
        queries: Vec<LabeledExample>,
        config: EvaluationConfig,
    ) -> Result<Self> {
        let distances = if config.parallel {
            DistanceMatrix::compute_parallel(&queries, &store)?
        } else {
            DistanceMatrix::compute(&queries, &store)?
        };
        Ok(Self {
            store,
            queries,
            distances,
            config,
        })
    }

    pub fn store(&self) -> &VectorStore {
        &self.store
    }

    pub fn queries(&self) -> &[LabeledExample] {
        &self.queries
    }

    pub fn distances(&self) -> &DistanceMatrix {
        &self.distances
    }

    pub fn config(&self) -> &EvaluationConfig {
        &self.config
    }

    /// Evaluates every configured k.
    ///
    /// An invalid k is recorded in `failures` and does not stop the other k
    /// values from being evaluated.
    ///
    /// # Errors
    ///
    /// Any error that is not confined to a single k aborts the sweep.
    pub fn run(&self) -> Result<EvaluationReport> {
        let evaluate = |(position, &k): (usize, &usize)| {
            let mut rng = self.rng_for(position);
            (k, self.evaluate_k(k, &mut rng))
        };
        let outcomes: Vec<(usize, Result<KEvaluation>)> = if self.config.parallel {
            self.config.k_values.par_iter().enumerate().map(evaluate).collect()
        } else {
            self.config.k_values.iter().enumerate().map(evaluate).collect()
        };
        EvaluationReport::from_outcomes(outcomes)
    }

    /// Classifies every query with the given k and scores the predictions.
    ///
    /// # Errors
    ///
    /// `InvalidK` if `k == 0` or `k` exceeds the reference set size.
    pub fn evaluate_k(&self, k: usize, rng: &mut ChaCha20Rng) -> Result<KEvaluation> {
        let classifier = KNNClassifier::new(&self.store).with_tie_break(self.config.tie_break);
        classifier.validate_k(k)?;
        debug!("evaluating k = {} over {} queries", k, self.queries.len());

        let mut builder = ConfusionMatrixBuilder::new();
        let mut predictions = Vec::with_capacity(self.queries.len());
        for (i, query) in self.queries.iter().enumerate() {
            let predicted = classifier.classify_row(self.distances.row(i), k, rng)?;
            builder.record(query.label, predicted);
            predictions.push(predicted);
        }

        let confusion = builder.finish();
        Ok(KEvaluation {
            metrics: metrics::evaluate(k, &confusion),
            confusion,
            predictions,
        })
    }

    /// Random source for the k at `position` in the sweep. With a seed, every
    /// position reads its own ChaCha stream of the same key.
    fn rng_for(&self, position: usize) -> ChaCha20Rng {
        match self.config.seed {
            Some(seed) => {
                let mut rng = ChaCha20Rng::seed_from_u64(seed);
                rng.set_stream(position as u64);
                rng
            }
            None => ChaCha20Rng::from_entropy(),
        }
    }
}
