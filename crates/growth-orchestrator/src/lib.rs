//! Batch orchestration for the growth index pipeline.

pub mod batch;
pub mod source;

pub use batch::BatchOrchestrator;
pub use source::{InMemorySource, StatementSource};
