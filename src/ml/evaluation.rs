pub mod confusion_matrix;
pub mod metrics;
pub mod run;

pub use confusion_matrix::{ConfusionMatrix, ConfusionMatrixBuilder};
pub use metrics::{ClassMetrics, Metric, MetricsResult};
pub use run::{EvaluationConfig, EvaluationReport, EvaluationRun, KEvaluation};
