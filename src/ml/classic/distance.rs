use log::debug;
use ndarray::{Array2, ArrayView1};
use rayon::prelude::*;

use crate::error::Result;
use crate::ml::classic::vector_store::VectorStore;

/// Full pairwise Euclidean distances between a query set (rows) and a
/// reference set (columns).
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    distances: Array2<f64>,
}

impl DistanceMatrix {
    /// Computes the `M x N` matrix for `queries` against `store`.
    ///
    /// # Errors
    ///
    /// `DimensionMismatch` (with the offending query index), `EmptyVector` or
    /// `NonFiniteValue` if a query vector does not fit the store.
    pub fn compute<Q>(queries: &[Q], store: &VectorStore) -> Result<Self>
    where
        Q: AsRef<[f64]> + Sync,
    {
        Self::build(queries, store, false)
    }

    /// Same as [`DistanceMatrix::compute`], with rows computed on the rayon
    /// thread pool. Each row is written by exactly one task.
    pub fn compute_parallel<Q>(queries: &[Q], store: &VectorStore) -> Result<Self>
    where
        Q: AsRef<[f64]> + Sync,
    {
        Self::build(queries, store, true)
    }

    fn build<Q>(queries: &[Q], store: &VectorStore, parallel: bool) -> Result<Self>
    where
        Q: AsRef<[f64]> + Sync,
    {
        store.check_queries(queries.iter().map(|q| q.as_ref()))?;

        let references = store.features();
        let row = |q: &Q| -> Vec<f64> {
            references
                .iter()
                .map(|r| euclidean_distance(q.as_ref(), r))
                .collect()
        };
        let rows: Vec<Vec<f64>> = if parallel {
            queries.par_iter().map(row).collect()
        } else {
            queries.iter().map(row).collect()
        };

        let (m, n) = (queries.len(), references.len());
        debug!("computed {}x{} distance matrix (parallel = {})", m, n, parallel);
        Ok(Self {
            distances: Array2::from_shape_fn((m, n), |(i, j)| rows[i][j]),
        })
    }

    /// Number of query rows (M).
    pub fn rows(&self) -> usize {
        self.distances.nrows()
    }

    /// Number of reference columns (N).
    pub fn cols(&self) -> usize {
        self.distances.ncols()
    }

    /// Distances from query `i` to every reference example, in reference order.
    pub fn row(&self, i: usize) -> ArrayView1<'_, f64> {
        self.distances.row(i)
    }

    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        self.distances.get((i, j)).copied()
    }

    pub fn as_array(&self) -> &Array2<f64> {
        &self.distances
    }
}

/// Euclidean (L2) distance between two vectors of equal length.
pub fn euclidean_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}
