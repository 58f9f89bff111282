//! Structured rich-text documents: build a tree of blocks and inline runs,
//! finalize it into an immutable [`Document`], resolve its embedded
//! resource references, and hand it to renderers through a [`Processor`].

pub mod builder;
pub mod document;
pub mod error;
pub mod model;
pub mod processor;
pub mod reference;
pub mod snapshot;

// Re-export key types for easier usage
pub use builder::{BuildState, FinalizeOptions, NodeBuilder, finalize, finalize_with};
pub use document::{Document, Walk};
pub use error::*;
pub use model::*;
pub use processor::{Checker, Context, KindChecker, Processor, Renderer};
pub use reference::{
    ReferenceKey, ReferenceOutcome, ReferenceResolver, Resolution, Resolve, ResolvedFields,
    ResolvedReference, ResourceKind, ResourceReference, resolve,
};
