//! # Tree Construction
//!
//! Documents are assembled from [`NodeBuilder`] handles and frozen by
//! [`finalize`] into an immutable [`Document`](crate::Document).
//!
//! ## Lifecycle
//!
//! ```text
//! NodeBuilder::text(..) ─┐
//! NodeBuilder::list(..) ─┼─ append ─▶ Open tree ─ finalize ─▶ Document
//! NodeBuilder::heading(..)┘   (validated)            │
//!                                                   └─▶ builders Sealed
//! ```
//!
//! - **`validate`**: attach-time checks (leaves, content model, link nesting,
//!   re-parenting and cycles)
//! - **`finalize`**: whole-tree re-validation, freezing and sealing
//!
//! ## Key Invariants
//!
//! - Every check runs when a child is attached, never later
//! - A node has at most one parent and is never re-parented
//! - Insertion order is reading order and is kept exactly
//! - Sealed builders reject every mutation
//!
//! Builder trees share nodes through `Rc` handles and are therefore confined
//! to a single thread. Attach checks cost the same at any depth, and building,
//! finalizing and dropping never recurse, so nesting is bounded only by memory.

pub mod finalize;
mod tree;
pub mod validate;

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use url::Url;

use crate::document::Document;
use crate::error::{BuildError, MarkProblem};
use crate::model::{
    EmbedDisplay, HeadingLevel, ListKind, Mark, MarkSet, NodeData, NodeKind, NodePath,
};
use crate::reference::ResourceReference;

pub use finalize::{FinalizeOptions, finalize, finalize_with};

/// Lifecycle state of a builder node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildState {
    /// Children and marks may still change.
    Open,
    /// Part of a finalized document; every mutation fails.
    Sealed,
}

pub(crate) struct BuilderNode {
    pub(crate) data: NodeData,
    pub(crate) children: Vec<NodeBuilder>,
    pub(crate) parent: Weak<RefCell<BuilderNode>>,
    pub(crate) state: BuildState,
    pub(crate) tree: Rc<tree::TreeId>,
}

impl Drop for BuilderNode {
    // Children are unlinked one at a time; a deep chain would otherwise drop recursively.
    fn drop(&mut self) {
        let mut stack = std::mem::take(&mut self.children);
        while let Some(child) = stack.pop() {
            if let Ok(node) = Rc::try_unwrap(child.0) {
                stack.append(&mut node.into_inner().children);
            }
        }
    }
}

/// Handle to a node under construction.
///
/// Cloning the handle does not copy the node: both handles see the same
/// node, which is how a caller keeps hold of a child after appending it.
#[derive(Clone)]
pub struct NodeBuilder(pub(crate) Rc<RefCell<BuilderNode>>);

impl NodeBuilder {
    fn from_data(data: NodeData) -> Self {
        Self(Rc::new(RefCell::new(BuilderNode {
            data,
            children: Vec::new(),
            parent: Weak::new(),
            state: BuildState::Open,
            tree: tree::TreeId::new(),
        })))
    }

    pub fn document() -> Self {
        Self::from_data(NodeData::Document)
    }

    /// A heading; `level` must be within `1..=6`.
    pub fn heading(level: u8) -> Result<Self, BuildError> {
        Ok(Self::from_data(NodeData::Heading {
            level: HeadingLevel::new(level)?,
        }))
    }

    /// A paragraph-like block.
    pub fn block() -> Self {
        Self::from_data(NodeData::Block)
    }

    pub fn quote() -> Self {
        Self::from_data(NodeData::Quote)
    }

    pub fn list(kind: ListKind) -> Self {
        Self::from_data(NodeData::List { kind })
    }

    pub fn ordered_list() -> Self {
        Self::list(ListKind::Ordered)
    }

    pub fn unordered_list() -> Self {
        Self::list(ListKind::Unordered)
    }

    pub fn list_item() -> Self {
        Self::from_data(NodeData::ListItem)
    }

    pub fn horizontal_rule() -> Self {
        Self::from_data(NodeData::HorizontalRule)
    }

    pub fn text(value: impl Into<String>) -> Self {
        Self::from_data(NodeData::Text {
            value: value.into(),
            marks: MarkSet::new(),
        })
    }

    /// A text run decorated with `marks`; duplicates collapse into one.
    pub fn text_with_marks(value: impl Into<String>, marks: impl IntoIterator<Item = Mark>) -> Self {
        Self::from_data(NodeData::Text {
            value: value.into(),
            marks: marks.into_iter().collect(),
        })
    }

    pub fn hyperlink(target: Url) -> Self {
        Self::from_data(NodeData::HyperLink { target })
    }

    pub fn embedded_link(reference: ResourceReference, display: EmbedDisplay) -> Self {
        Self::from_data(NodeData::EmbeddedLink {
            reference,
            display,
            marks: MarkSet::new(),
        })
    }

    pub fn kind(&self) -> NodeKind {
        self.0.borrow().data.kind()
    }

    /// A copy of this node's payload.
    pub fn data(&self) -> NodeData {
        self.0.borrow().data.clone()
    }

    pub fn state(&self) -> BuildState {
        self.0.borrow().state
    }

    pub fn is_sealed(&self) -> bool {
        self.state() == BuildState::Sealed
    }

    pub fn child_count(&self) -> usize {
        self.0.borrow().children.len()
    }

    pub fn child(&self, index: usize) -> Option<NodeBuilder> {
        self.0.borrow().children.get(index).cloned()
    }

    pub fn children(&self) -> Vec<NodeBuilder> {
        self.0.borrow().children.clone()
    }

    pub fn parent(&self) -> Option<NodeBuilder> {
        self.0.borrow().parent.upgrade().map(NodeBuilder)
    }

    pub fn marks(&self) -> MarkSet {
        self.0.borrow().data.marks().cloned().unwrap_or_default()
    }

    /// Path of this node from the root of the tree it currently belongs to.
    pub fn path(&self) -> NodePath {
        let mut indices = Vec::new();
        let mut current = self.clone();
        while let Some(parent) = current.parent() {
            let index = parent
                .0
                .borrow()
                .children
                .iter()
                .position(|child| child.ptr_eq(&current))
                .expect("an attached node is listed among its parent's children");
            indices.push(index);
            current = parent;
        }
        indices.reverse();
        NodePath::from(indices)
    }

    /// Whether both handles point at the same node.
    pub fn ptr_eq(&self, other: &NodeBuilder) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Append `children` in order and return this builder for chaining.
    ///
    /// The whole batch is validated before anything is attached, so a failed
    /// call leaves the tree unchanged.
    ///
    /// ```rust
    /// # use rich_text_model::{BuildError, NodeBuilder, NodeKind};
    /// let item = NodeBuilder::list_item();
    /// item.append([NodeBuilder::text("first")])?
    ///     .append([NodeBuilder::unordered_list()])?;
    /// assert_eq!(item.child_count(), 2);
    ///
    /// let text = NodeBuilder::text("leaf");
    /// assert!(matches!(
    ///     text.append([NodeBuilder::text("child")]),
    ///     Err(BuildError::InvalidChild { parent: NodeKind::Text, .. })
    /// ));
    /// # Ok::<(), BuildError>(())
    /// ```
    pub fn append<I>(&self, children: I) -> Result<&Self, BuildError>
    where
        I: IntoIterator<Item = NodeBuilder>,
    {
        let children: Vec<NodeBuilder> = children.into_iter().collect();
        for (index, child) in children.iter().enumerate() {
            validate::check_attach(self, child)?;
            if children[..index].iter().any(|earlier| earlier.ptr_eq(child)) {
                return Err(validate::invalid_child(
                    self,
                    child,
                    crate::error::ChildProblem::AlreadyAttached,
                ));
            }
        }

        let parent = Rc::downgrade(&self.0);
        let parent_tree = Rc::clone(&self.0.borrow().tree);
        for child in children {
            log::trace!("Attaching {} to {}", child.kind(), self.kind());
            {
                let mut node = child.0.borrow_mut();
                node.parent = parent.clone();
                tree::merge(&node.tree, &parent_tree);
            }
            self.0.borrow_mut().children.push(child);
        }
        Ok(self)
    }

    /// Add a mark to a text run or inline embedded link. Re-adding a mark
    /// that is already present does nothing.
    pub fn add_mark(&self, mark: Mark) -> Result<&Self, BuildError> {
        validate::check_open(self)?;
        let mut node = self.0.borrow_mut();
        let kind = node.data.kind();
        match node.data.marks_mut() {
            Some(marks) => {
                marks.insert(mark);
                Ok(self)
            }
            None => Err(BuildError::InvalidMark {
                reason: MarkProblem::NotMarkable { kind },
            }),
        }
    }

    /// Shorthand for [`finalize`] with default options.
    pub fn finalize(&self) -> Result<Document, BuildError> {
        finalize(self)
    }

    pub fn finalize_with(&self, options: &FinalizeOptions) -> Result<Document, BuildError> {
        finalize_with(self, options)
    }
}

impl fmt::Debug for NodeBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let node = self.0.borrow();
        f.debug_struct("NodeBuilder")
            .field("data", &node.data)
            .field("state", &node.state)
            .field("children", &node.children)
            .finish()
    }
}
