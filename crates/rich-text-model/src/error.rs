use thiserror::Error;

use crate::model::{MarkKind, NodeKind, NodePath};
use crate::reference::ReferenceKey;

/// Errors raised while constructing or finalizing a document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("invalid mark: {reason}")]
    InvalidMark { reason: MarkProblem },

    #[error("cannot append {child} to {parent} at {path}: {reason}")]
    InvalidChild {
        parent: NodeKind,
        child: NodeKind,
        path: NodePath,
        reason: ChildProblem,
    },

    #[error("heading level {level} is outside 1..=6")]
    InvalidHeadingLevel { level: u8 },

    #[error("{kind} at {path} is sealed by a finalized document")]
    SealedNode { kind: NodeKind, path: NodePath },

    #[error("document is incomplete at {path}: {reason}")]
    IncompleteDocument {
        path: NodePath,
        reason: IncompleteReason,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarkProblem {
    #[error("custom marks need a non-empty name")]
    MissingCustomName,

    #[error("{kind} marks take no custom name (got `{name}`)")]
    UnexpectedName { kind: MarkKind, name: String },

    #[error("{kind} nodes cannot carry marks")]
    NotMarkable { kind: NodeKind },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ChildProblem {
    #[error("leaf nodes take no children")]
    LeafNode,

    #[error("links cannot contain other links")]
    NestedLink,

    #[error("not allowed by the parent's content model")]
    NotAllowed,

    #[error("a document is always the root")]
    NestedDocument,

    #[error("the child already has a parent")]
    AlreadyAttached,

    #[error("the child is the target or one of its ancestors")]
    Cycle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IncompleteReason {
    #[error("the root is not a document node")]
    RootNotDocument,

    #[error("a link is nested inside another link")]
    NestedLink,

    #[error("lists need at least one item")]
    EmptyList,
}

/// Why a resolver could not produce fields for a reference.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("not found")]
    NotFound,

    #[error("lookup timed out")]
    TimedOut,

    #[error(transparent)]
    Upstream(#[from] anyhow::Error),
}

/// A reference stayed unresolved; the reference itself is untouched.
#[derive(Debug, Error)]
#[error("could not resolve {key}")]
pub struct UnresolvedError {
    pub key: ReferenceKey,
    #[source]
    pub cause: LookupError,
}

impl UnresolvedError {
    pub fn is_not_found(&self) -> bool {
        matches!(self.cause, LookupError::NotFound)
    }
}
