pub mod distance;
pub mod k_nearest;
pub mod label;
pub mod vector_store;

// Re-export public types and functions
pub use distance::{euclidean_distance, DistanceMatrix};
pub use k_nearest::{KNNClassifier, TieBreak};
pub use label::Label;
pub use vector_store::{align_examples, FeatureVector, LabeledExample, VectorStore};
