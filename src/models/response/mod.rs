pub mod types;
pub mod queries;
pub mod grading;

pub use types::*;
pub use queries::*;
pub use grading::*;
