use crate::builder::{NodeBuilder, tree};
use crate::error::{BuildError, ChildProblem};
use crate::model::NodeKind;

pub(crate) fn invalid_child(
    parent: &NodeBuilder,
    child: &NodeBuilder,
    reason: ChildProblem,
) -> BuildError {
    BuildError::InvalidChild {
        parent: parent.kind(),
        child: child.kind(),
        path: parent.path(),
        reason,
    }
}

pub(crate) fn check_open(node: &NodeBuilder) -> Result<(), BuildError> {
    if node.is_sealed() {
        return Err(BuildError::SealedNode {
            kind: node.kind(),
            path: node.path(),
        });
    }
    Ok(())
}

/// Checks that `child` may be attached as the last child of `parent`.
pub(crate) fn check_attach(parent: &NodeBuilder, child: &NodeBuilder) -> Result<(), BuildError> {
    check_open(parent)?;
    check_open(child)?;

    let parent_kind = parent.kind();
    let child_kind = child.kind();

    if parent_kind.is_leaf() {
        return Err(invalid_child(parent, child, ChildProblem::LeafNode));
    }
    if child_kind == NodeKind::Document {
        return Err(invalid_child(parent, child, ChildProblem::NestedDocument));
    }
    if child.parent().is_some() {
        return Err(invalid_child(parent, child, ChildProblem::AlreadyAttached));
    }
    // The child is the root of its own tree, so sharing a tree with the
    // parent means it is the parent or one of its ancestors.
    if tree::same_tree(&parent.0.borrow().tree, &child.0.borrow().tree) {
        return Err(invalid_child(parent, child, ChildProblem::Cycle));
    }

    let role = child.0.borrow().data.role();
    if !parent.0.borrow().data.accepts(role) {
        return Err(invalid_child(parent, child, ChildProblem::NotAllowed));
    }

    // Links only take inline content and the only inline non-link is a text
    // leaf, so below a link there is nothing but text. A link nests in a link
    // exactly when both ends of this edge are links.
    if parent_kind.is_link() && child_kind.is_link() {
        return Err(invalid_child(parent, child, ChildProblem::NestedLink));
    }
    Ok(())
}
