pub mod error;
pub mod ml;

pub use error::{Error, ExampleSet, Result};
pub use ml::{classic, evaluation};
