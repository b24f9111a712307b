//! Result storage
//!
//! Completed analyses are kept for a short time so a report can be generated
//! for them later. Nothing is persisted.

mod memory;
mod traits;

pub use memory::MemoryResultStore;
pub use traits::{ResultStore, StoreError, StoreResult};
