use log::debug;

use crate::error::{Error, ExampleSet, Result};
use crate::ml::classic::label::Label;

/// A document reduced to a fixed-length vector by some feature builder
/// (bag-of-words counts, averaged word embeddings, ...).
pub type FeatureVector = Vec<f64>;

/// A feature vector paired with its gold label.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledExample {
    pub features: FeatureVector,
    pub label: Label,
}

impl LabeledExample {
    pub fn new(features: FeatureVector, label: Label) -> Self {
        Self { features, label }
    }
}

impl AsRef<[f64]> for LabeledExample {
    fn as_ref(&self) -> &[f64] {
        &self.features
    }
}

/// The reference (training) set searched by the classifier.
///
/// Insertion order is preserved and defines the column order of every
/// distance matrix built against the store.
#[derive(Debug, Clone)]
pub struct VectorStore {
    features: Vec<FeatureVector>,
    labels: Vec<Label>,
    dimension: usize,
}

impl VectorStore {
    /// Builds a store from labeled examples.
    ///
    /// # Errors
    ///
    /// - `EmptyReferenceSet` if `examples` is empty.
    /// - `EmptyVector`, `DimensionMismatch` or `NonFiniteValue` if a vector is
    ///   malformed; the first vector fixes the dimension.
    pub fn new(examples: Vec<LabeledExample>) -> Result<Self> {
        if examples.is_empty() {
            return Err(Error::EmptyReferenceSet);
        }
        let dimension = check_vectors(
            ExampleSet::Reference,
            examples.iter().map(|e| e.features.as_slice()),
            None,
        )?;

        let (features, labels): (Vec<FeatureVector>, Vec<Label>) = examples
            .into_iter()
            .map(|e| (e.features, e.label))
            .unzip();

        Ok(Self {
            features,
            labels,
            dimension,
        })
    }

    /// Builds a store from feature-builder output in which some documents may
    /// have produced no vector (e.g. no in-vocabulary word). Those documents
    /// are dropped and the remaining pairs stay aligned.
    pub fn from_optional(pairs: Vec<(Option<FeatureVector>, Label)>) -> Result<Self> {
        Self::new(align_examples(pairs))
    }

    /// Number of reference examples (N).
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Dimension (D) shared by every stored vector.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn features(&self) -> &[FeatureVector] {
        &self.features
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn label(&self, index: usize) -> Option<Label> {
        self.labels.get(index).copied()
    }

    /// Checks that every query vector matches the store's dimension.
    pub fn check_queries<'a, I>(&self, queries: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a [f64]>,
    {
        check_vectors(ExampleSet::Query, queries, Some(self.dimension)).map(|_| ())
    }
}

/// Drops documents for which the feature builder produced no vector and
/// keeps the remaining `(vector, label)` pairs aligned, in their original order.
///
/// Applies to reference and query sets alike; after this step, positions no
/// longer correspond to rows of the raw dataset.
pub fn align_examples(pairs: Vec<(Option<FeatureVector>, Label)>) -> Vec<LabeledExample> {
    let total = pairs.len();
    let examples: Vec<LabeledExample> = pairs
        .into_iter()
        .filter_map(|(features, label)| features.map(|f| LabeledExample::new(f, label)))
        .collect();
    if examples.len() < total {
        debug!(
            "dropped {} of {} documents without a feature vector",
            total - examples.len(),
            total
        );
    }
    examples
}

/// Validates a collection of vectors and returns their common dimension.
///
/// With `expected = None` the first vector fixes the dimension. An empty
/// collection returns `expected.unwrap_or(0)`.
pub(crate) fn check_vectors<'a, I>(
    set: ExampleSet,
    vectors: I,
    expected: Option<usize>,
) -> Result<usize>
where
    I: IntoIterator<Item = &'a [f64]>,
{
    let mut dimension = expected;
    for (index, v) in vectors.into_iter().enumerate() {
        if v.is_empty() {
            return Err(Error::EmptyVector { set, index });
        }
        let expected = *dimension.get_or_insert(v.len());
        if v.len() != expected {
            return Err(Error::DimensionMismatch {
                set,
                index,
                expected,
                found: v.len(),
            });
        }
        if let Some(position) = v.iter().position(|x| !x.is_finite()) {
            return Err(Error::NonFiniteValue {
                set,
                index,
                position,
            });
        }
    }
    Ok(dimension.unwrap_or(0))
}
