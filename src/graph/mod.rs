//! Target graph construction and resolution
//!
//! A build is described as a directed acyclic graph of named targets. This
//! module owns the immutable graph: registration, validation, and the
//! deterministic resolution of a requested target set into an execution plan.

pub mod resolve;
pub mod target;

// Re-export main types
pub use resolve::*;
pub use target::*;
