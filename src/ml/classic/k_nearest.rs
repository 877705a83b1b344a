use ndarray::ArrayView1;
use rand::Rng;

use crate::error::{Error, Result};
use crate::ml::classic::distance::euclidean_distance;
use crate::ml::classic::label::Label;
use crate::ml::classic::vector_store::VectorStore;

/// How a majority vote is resolved when several labels share the highest count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TieBreak {
    /// Pick uniformly at random among the tied labels.
    #[default]
    Random,
    /// Pick the tied label whose closest neighbor ranks first.
    Nearest,
}

/// A brute-force k-NN classifier over a shared reference set.
///
/// The classifier is stateless apart from the borrowed store and the tie-break
/// policy, so one instance can serve every k of a sweep.
///
/// # Example
///
/// ```
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha20Rng;
/// use sentiknn::ml::classic::{KNNClassifier, Label, LabeledExample, VectorStore};
///
/// let store = VectorStore::new(vec![
///     LabeledExample::new(vec![1.0, 0.0], Label::Positive),
///     LabeledExample::new(vec![0.0, 1.0], Label::Negative),
/// ])
/// .unwrap();
///
/// let knn = KNNClassifier::new(&store);
/// let mut rng = ChaCha20Rng::seed_from_u64(7);
/// let label = knn.predict(&[0.9, 0.1], 1, &mut rng).unwrap();
/// assert_eq!(label, Label::Positive);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct KNNClassifier<'a> {
    store: &'a VectorStore,
    tie_break: TieBreak,
}

impl<'a> KNNClassifier<'a> {
    pub fn new(store: &'a VectorStore) -> Self {
        Self {
            store,
            tie_break: TieBreak::default(),
        }
    }

    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    pub fn tie_break(&self) -> TieBreak {
        self.tie_break
    }

    pub fn store(&self) -> &'a VectorStore {
        self.store
    }

    /// Predicts a label from one precomputed distance row.
    ///
    /// `row[j]` must be the distance to reference example `j`.
    ///
    /// # Errors
    ///
    /// - `InvalidK` if `k == 0` or `k` exceeds the reference set size.
    /// - `EmptyRow` if the row length differs from the reference set size.
    pub fn classify_row<R: Rng>(
        &self,
        row: ArrayView1<'_, f64>,
        k: usize,
        rng: &mut R,
    ) -> Result<Label> {
        self.validate_k(k)?;
        if row.len() != self.store.len() {
            return Err(Error::EmptyRow {
                expected: self.store.len(),
                found: row.len(),
            });
        }
        let neighbors = self.find_k_nearest(row, k);
        Ok(self.majority_vote(&neighbors, rng))
    }

    /// Predicts the label of a single query point.
    pub fn predict<R: Rng>(&self, point: &[f64], k: usize, rng: &mut R) -> Result<Label> {
        self.validate_k(k)?;
        self.store.check_queries([point])?;
        let row: Vec<f64> = self
            .store
            .features()
            .iter()
            .map(|r| euclidean_distance(point, r))
            .collect();
        self.classify_row(ArrayView1::from(&row[..]), k, rng)
    }

    /// Predicts labels for multiple query points at once.
    pub fn predict_batch<R: Rng>(
        &self,
        points: &[Vec<f64>],
        k: usize,
        rng: &mut R,
    ) -> Result<Vec<Label>> {
        points.iter().map(|p| self.predict(p, k, rng)).collect()
    }

    /// Fails with `InvalidK` unless `1 <= k <= N`.
    pub fn validate_k(&self, k: usize) -> Result<()> {
        if k == 0 || k > self.store.len() {
            return Err(Error::InvalidK {
                k,
                reference_size: self.store.len(),
            });
        }
        Ok(())
    }

    /// Indices of the `k` smallest distances, closest first.
    ///
    /// The sort is stable: equal distances keep reference-set order.
    fn find_k_nearest(&self, row: ArrayView1<'_, f64>, k: usize) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..row.len()).collect();
        indices.sort_by(|&a, &b| row[a].total_cmp(&row[b]));
        indices.truncate(k);
        indices
    }

    /// Majority vote over the neighbors' labels, resolving ties per `self.tie_break`.
    fn majority_vote<R: Rng>(&self, neighbors: &[usize], rng: &mut R) -> Label {
        let labels = self.store.labels();
        let mut counts = [0_usize; Label::COUNT];
        let mut first_rank = [usize::MAX; Label::COUNT];
        for (rank, &idx) in neighbors.iter().enumerate() {
            let c = labels[idx].index();
            counts[c] += 1;
            first_rank[c] = first_rank[c].min(rank);
        }

        let max_count = counts.iter().copied().max().unwrap_or(0);
        let tied: Vec<Label> = Label::ALL
            .iter()
            .copied()
            .filter(|l| counts[l.index()] == max_count)
            .collect();

        match (tied.len(), self.tie_break) {
            (1, _) => tied[0],
            (_, TieBreak::Random) => tied[rng.gen_range(0..tied.len())],
            (_, TieBreak::Nearest) => tied
                .iter()
                .copied()
                .min_by_key(|l| first_rank[l.index()])
                .unwrap_or(tied[0]),
        }
    }
}
