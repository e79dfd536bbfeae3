//! Target execution
//!
//! This module owns everything that happens after a graph is built: the
//! immutable build context handed to actions, the sequential engine, and
//! the per-run outcome records.

pub mod context;
pub mod engine;
pub mod summary;

// Re-export main types
pub use context::*;
pub use engine::*;
pub use summary::*;
