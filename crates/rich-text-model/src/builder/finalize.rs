use rich_text_config::Config;

use crate::builder::{BuildState, NodeBuilder, validate};
use crate::document::Document;
use crate::error::{BuildError, IncompleteReason};
use crate::model::{Node, NodeData, NodeKind, NodePath};

/// Knobs for the whole-tree checks run by [`finalize_with`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalizeOptions {
    /// Accept lists that never received an item. On by default; turn it off
    /// to have finalize report the first empty list.
    pub allow_empty_lists: bool,
}

impl Default for FinalizeOptions {
    fn default() -> Self {
        Self {
            allow_empty_lists: true,
        }
    }
}

impl From<&Config> for FinalizeOptions {
    fn from(config: &Config) -> Self {
        Self {
            allow_empty_lists: config.allow_empty_lists,
        }
    }
}

/// Seal `root` and everything below it into an immutable [`Document`].
pub fn finalize(root: &NodeBuilder) -> Result<Document, BuildError> {
    finalize_with(root, &FinalizeOptions::default())
}

/// [`finalize`] with explicit options.
///
/// The tree is validated in document order and the first offending node is
/// reported. Nothing is sealed unless the whole tree is valid, so a failed
/// finalize can be fixed up and retried.
pub fn finalize_with(root: &NodeBuilder, options: &FinalizeOptions) -> Result<Document, BuildError> {
    validate::check_open(root)?;
    if root.kind() != NodeKind::Document || root.parent().is_some() {
        return Err(BuildError::IncompleteDocument {
            path: root.path(),
            reason: IncompleteReason::RootNotDocument,
        });
    }

    let (node, count) = freeze(root, options)?;
    seal(root);

    log::debug!("Finalized document with {count} nodes");
    Ok(Document::from_root(node))
}

/// A node whose children are still being frozen.
struct Frame {
    builder: NodeBuilder,
    /// Position among its parent's children.
    index: usize,
    inside_link: bool,
    next_child: usize,
    children: Vec<Node>,
}

impl Frame {
    fn new(builder: NodeBuilder, index: usize, parent_inside_link: bool) -> Self {
        let inside_link = parent_inside_link || builder.kind().is_link();
        Self {
            builder,
            index,
            inside_link,
            next_child: 0,
            children: Vec::new(),
        }
    }

    fn into_node(self) -> Node {
        Node::new(self.builder.data(), self.children)
    }
}

/// Copy the builder tree into immutable nodes, depth first, without recursing.
fn freeze(root: &NodeBuilder, options: &FinalizeOptions) -> Result<(Node, usize), BuildError> {
    let mut count = 1;
    let mut root_frame = Frame::new(root.clone(), 0, false);
    // Open frames below the root; their indices spell the current path.
    let mut stack: Vec<Frame> = Vec::new();

    loop {
        let top = stack.last_mut().unwrap_or(&mut root_frame);
        if let Some(child) = top.builder.child(top.next_child) {
            let index = top.next_child;
            let inside_link = top.inside_link;
            top.next_child += 1;

            if let Err(reason) = check_node(&child, inside_link, options) {
                let indices: Vec<usize> = stack
                    .iter()
                    .map(|frame| frame.index)
                    .chain([index])
                    .collect();
                return Err(BuildError::IncompleteDocument {
                    path: NodePath::from(indices),
                    reason,
                });
            }
            count += 1;
            stack.push(Frame::new(child, index, inside_link));
            continue;
        }

        match stack.pop() {
            Some(done) => {
                let node = done.into_node();
                stack
                    .last_mut()
                    .unwrap_or(&mut root_frame)
                    .children
                    .push(node);
            }
            None => return Ok((root_frame.into_node(), count)),
        }
    }
}

/// Whole-tree conditions for one node, given whether a link encloses it.
fn check_node(
    builder: &NodeBuilder,
    inside_link: bool,
    options: &FinalizeOptions,
) -> Result<(), IncompleteReason> {
    let inner = builder.0.borrow();

    // Attach-time checks make this unreachable through the public API.
    debug_assert!(!(inside_link && inner.data.kind().is_link()), "nested link");
    if inside_link && inner.data.kind().is_link() {
        return Err(IncompleteReason::NestedLink);
    }

    if matches!(inner.data, NodeData::List { .. })
        && inner.children.is_empty()
        && !options.allow_empty_lists
    {
        return Err(IncompleteReason::EmptyList);
    }
    Ok(())
}

fn seal(root: &NodeBuilder) {
    let mut stack = vec![root.clone()];
    while let Some(node) = stack.pop() {
        let mut inner = node.0.borrow_mut();
        inner.state = BuildState::Sealed;
        stack.extend(inner.children.iter().cloned());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ListKind;

    #[test]
    fn root_must_be_a_document() {
        let err = finalize(&NodeBuilder::block()).unwrap_err();
        assert_eq!(
            err,
            BuildError::IncompleteDocument {
                path: NodePath::root(),
                reason: IncompleteReason::RootNotDocument,
            }
        );
    }

    #[test]
    fn empty_list_finalizes_by_default() {
        let doc = NodeBuilder::document();
        doc.append([NodeBuilder::ordered_list()]).unwrap();

        let doc = finalize(&doc).unwrap();
        let list = doc.node_at(&NodePath::from([0])).unwrap();
        assert_eq!(list.kind(), NodeKind::List);
        assert_eq!(list.child_count(), 0);
    }

    #[test]
    fn strict_empty_list_names_its_path() {
        let doc = NodeBuilder::document();
        let item = NodeBuilder::list_item();
        let outer = NodeBuilder::list(ListKind::Custom("1".to_string()));
        item.append([NodeBuilder::text("one"), NodeBuilder::list(ListKind::Custom("A".to_string()))])
            .unwrap();
        outer.append([item]).unwrap();
        doc.append([NodeBuilder::horizontal_rule(), outer]).unwrap();

        let strict = FinalizeOptions {
            allow_empty_lists: false,
        };
        let err = finalize_with(&doc, &strict).unwrap_err();
        assert_eq!(
            err,
            BuildError::IncompleteDocument {
                path: NodePath::from([1, 0, 1]),
                reason: IncompleteReason::EmptyList,
            }
        );
        assert!(!doc.is_sealed());

        let doc = finalize(&doc).unwrap();
        assert_eq!(doc.children().count(), 2);
    }

    #[test]
    fn deep_chain_finalizes_without_recursing() {
        const DEPTH: usize = 20_000;

        let doc = NodeBuilder::document();
        let mut tip = NodeBuilder::quote();
        doc.append([tip.clone()]).unwrap();
        for _ in 1..DEPTH {
            let next = NodeBuilder::quote();
            tip.append([next.clone()]).unwrap();
            tip = next;
        }
        tip.append([NodeBuilder::text("bottom")]).unwrap();

        let document = finalize(&doc).unwrap();
        assert!(tip.is_sealed());
        let mut depth = 0;
        let mut node = document.root();
        while let Some(child) = node.child(0) {
            depth += 1;
            node = child;
        }
        assert_eq!(depth, DEPTH + 1);
        assert_eq!(node.text(), Some("bottom"));
        assert_eq!(document.plain_text(), "bottom");

        drop(tip);
        drop(doc);
        drop(document);
    }

    #[test]
    fn options_from_config() {
        let config = Config {
            allow_empty_lists: false,
            ..Config::default()
        };
        assert!(!FinalizeOptions::from(&config).allow_empty_lists);
        assert!(FinalizeOptions::from(&Config::default()).allow_empty_lists);
    }

    #[test]
    fn finalize_seals_every_builder() {
        let doc = NodeBuilder::document();
        let block = NodeBuilder::block();
        let text = NodeBuilder::text("sealed");
        block.append([text.clone()]).unwrap();
        doc.append([block.clone()]).unwrap();

        finalize(&doc).unwrap();

        for node in [&doc, &block, &text] {
            assert_eq!(node.state(), BuildState::Sealed);
        }
        assert!(matches!(
            finalize(&doc),
            Err(BuildError::SealedNode {
                kind: NodeKind::Document,
                ..
            })
        ));
    }
}
