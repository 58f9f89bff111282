//! # Snapshot Testing Support
//!
//! Utilities for testing documents via structural assertions and invariant checks.
//!
//! ## Modules
//!
//! - **`normalize`**: Converts a finalized document to a stable, serializable
//!   `Snap` tree that compares with `assert_eq!` and prints as JSON
//! - **`invariants`**: Runtime checks for model correctness (root placement,
//!   leaves without children, heading levels, content model, no nested links)

pub mod invariants;
pub mod normalize;

pub use invariants::check as invariants;
pub use normalize::{NodeSnap, Snap, normalize};
