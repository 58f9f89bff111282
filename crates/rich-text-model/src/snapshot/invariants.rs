use crate::document::Document;
use crate::model::{HeadingLevel, Node, NodeKind, Payload};

/// Validates the structural invariants of a finalized document.
///
/// Asserts that:
/// - The root is the only document node
/// - Leaves have no children
/// - Heading levels are within range
/// - Every child is allowed by its parent's content model
/// - No link contains another link at any depth
///
/// # Panics
/// Panics with a descriptive message if any invariant is violated.
pub fn check(document: &Document) {
    let root = document.root();
    assert_eq!(root.kind(), NodeKind::Document, "root is {}", root.kind());

    for (path, node) in document.walk() {
        if !path.is_root() {
            assert_ne!(node.kind(), NodeKind::Document, "nested document at {path}");
        }
        if node.kind().is_leaf() {
            assert_eq!(node.child_count(), 0, "leaf {} at {path} has children", node.kind());
        }
        if let Payload::Heading(level) = node.payload() {
            assert!(
                (HeadingLevel::MIN..=HeadingLevel::MAX).contains(&level.get()),
                "heading level {level} at {path}"
            );
        }
        for (index, child) in node.children().enumerate() {
            assert!(
                node.data().accepts(child.role()),
                "{} at {} not allowed under {}",
                child.kind(),
                path.child(index),
                node.kind()
            );
        }
        if node.kind().is_link() {
            assert_no_links_below(node, &path.to_string());
        }
    }
}

fn assert_no_links_below(link: &Node, at: &str) {
    for child in link.children() {
        assert!(!child.kind().is_link(), "link nested in link at {at}");
        assert_no_links_below(child, at);
    }
}
