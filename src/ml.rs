pub mod classic;
pub mod evaluation;

pub use classic::*;
pub use evaluation::*;
