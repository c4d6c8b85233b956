pub mod types;
pub mod queries;
pub mod allocator;

pub use types::*;
pub use queries::*;
pub use allocator::*;
