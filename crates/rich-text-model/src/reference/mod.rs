//! # Resource References
//!
//! Embedded links point at content stored elsewhere: an **entry** (structured
//! content) or an **asset** (media). The tree only ever stores the identifier
//! and the kind. Field data is attached later by resolution, which is the one
//! post-finalize mutation a document allows.
//!
//! - **`fields`**: `ResolvedFields`, localized field values of a resolved resource
//! - **`resolver`**: the `Resolve` lookup trait, the single-flight `resolve`
//!   function and the per-id caching `ReferenceResolver`

pub mod fields;
pub mod resolver;

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

pub use fields::ResolvedFields;
pub use resolver::{
    ReferenceOutcome, ReferenceResolver, Resolution, Resolve, ResolvedReference, resolve,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Entry,
    Asset,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::Entry => f.write_str("entry"),
            ResourceKind::Asset => f.write_str("asset"),
        }
    }
}

/// Identity of an external resource: its id plus the entry/asset discriminator.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReferenceKey {
    pub id: String,
    pub kind: ResourceKind,
}

impl ReferenceKey {
    pub fn new(id: impl Into<String>, kind: ResourceKind) -> Self {
        Self {
            id: id.into(),
            kind,
        }
    }
}

impl fmt::Display for ReferenceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} `{}`", self.kind, self.id)
    }
}

/// Unresolved pointer to an entry or asset, plus the slot its resolved
/// fields are attached to.
///
/// Equality only looks at the key: resolving a reference does not change
/// which resource it points at.
#[derive(Debug)]
pub struct ResourceReference {
    key: ReferenceKey,
    resolved: Mutex<Option<Arc<ResolvedFields>>>,
}

impl ResourceReference {
    pub fn new(id: impl Into<String>, kind: ResourceKind) -> Self {
        Self {
            key: ReferenceKey::new(id, kind),
            resolved: Mutex::new(None),
        }
    }

    pub fn entry(id: impl Into<String>) -> Self {
        Self::new(id, ResourceKind::Entry)
    }

    pub fn asset(id: impl Into<String>) -> Self {
        Self::new(id, ResourceKind::Asset)
    }

    pub fn id(&self) -> &str {
        &self.key.id
    }

    pub fn kind(&self) -> ResourceKind {
        self.key.kind
    }

    pub fn key(&self) -> &ReferenceKey {
        &self.key
    }

    /// Fields attached by a previous successful resolution.
    pub fn resolved(&self) -> Option<Arc<ResolvedFields>> {
        self.resolved.lock().clone()
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved.lock().is_some()
    }

    /// Held for the whole lookup so one reference never has two in flight.
    pub(crate) fn slot(&self) -> &Mutex<Option<Arc<ResolvedFields>>> {
        &self.resolved
    }
}

impl Clone for ResourceReference {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            resolved: Mutex::new(self.resolved()),
        }
    }
}

impl PartialEq for ResourceReference {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for ResourceReference {}
