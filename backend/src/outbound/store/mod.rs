//! Document store adapters.

mod memory;

pub use memory::{MemoryDocumentStore, RetryPolicy};
