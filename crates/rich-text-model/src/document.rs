use std::sync::Arc;

use crate::model::{Children, Node, NodePath};
use crate::reference::ResourceReference;

/// A finalized, immutable document tree.
///
/// Cloning is cheap and a `Document` can be shared across threads freely;
/// the only thing that can still change after finalize is the resolution
/// state of its [`ResourceReference`]s.
///
/// ```rust
/// # use rich_text_model::{NodeBuilder, NodeKind};
/// let doc = NodeBuilder::document();
/// doc.append([NodeBuilder::block().append([NodeBuilder::text("Hello")])?.clone()])?;
/// let doc = doc.finalize()?;
///
/// let kinds: Vec<_> = doc.walk().map(|(_, node)| node.kind()).collect();
/// assert_eq!(kinds, vec![NodeKind::Document, NodeKind::Block, NodeKind::Text]);
/// # Ok::<(), rich_text_model::BuildError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    root: Arc<Node>,
}

impl Document {
    pub(crate) fn from_root(root: Node) -> Self {
        Self {
            root: Arc::new(root),
        }
    }

    /// The `document` node itself.
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Top-level blocks in reading order.
    pub fn children(&self) -> Children<'_> {
        self.root.children()
    }

    pub fn node_at(&self, path: &NodePath) -> Option<&Node> {
        path.indices()
            .iter()
            .try_fold(self.root(), |node, &index| node.child(index))
    }

    /// Depth-first pre-order walk over every node, root included.
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            stack: vec![(NodePath::root(), self.root())],
        }
    }

    /// Every embedded reference with the path of its link, in document order.
    pub fn references(&self) -> impl Iterator<Item = (NodePath, &ResourceReference)> {
        self.walk()
            .filter_map(|(path, node)| node.reference().map(|reference| (path, reference)))
    }

    pub fn plain_text(&self) -> String {
        self.root.plain_text()
    }
}

/// Iterator returned by [`Document::walk`].
pub struct Walk<'a> {
    stack: Vec<(NodePath, &'a Node)>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = (NodePath, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let (path, node) = self.stack.pop()?;
        for (index, child) in node.children().enumerate().rev() {
            self.stack.push((path.child(index), child));
        }
        Some((path, node))
    }
}
