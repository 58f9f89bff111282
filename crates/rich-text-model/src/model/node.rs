use std::fmt;

use url::Url;

use crate::error::BuildError;
use crate::model::mark::MarkSet;
use crate::reference::ResourceReference;

static NO_MARKS: MarkSet = MarkSet::new();

/// Discriminant of a node, without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Document,
    Heading,
    Block,
    Quote,
    List,
    ListItem,
    HorizontalRule,
    Text,
    HyperLink,
    EmbeddedLink,
}

impl NodeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Document => "document",
            NodeKind::Heading => "heading",
            NodeKind::Block => "block",
            NodeKind::Quote => "quote",
            NodeKind::List => "list",
            NodeKind::ListItem => "list-item",
            NodeKind::HorizontalRule => "hr",
            NodeKind::Text => "text",
            NodeKind::HyperLink => "hyperlink",
            NodeKind::EmbeddedLink => "embedded-link",
        }
    }

    /// Leaves never accept children.
    pub fn is_leaf(self) -> bool {
        matches!(self, NodeKind::Text | NodeKind::HorizontalRule)
    }

    pub fn is_link(self) -> bool {
        matches!(self, NodeKind::HyperLink | NodeKind::EmbeddedLink)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structural position a node may occupy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeRole {
    /// The document root.
    Root,
    /// Document-level or list-item-level structure.
    Block,
    /// Runs of text and inline spans.
    Inline,
    /// Direct child of a list.
    ListMember,
}

/// Heading level, always within `1..=6`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HeadingLevel(u8);

impl HeadingLevel {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 6;

    pub fn new(level: u8) -> Result<Self, BuildError> {
        if (Self::MIN..=Self::MAX).contains(&level) {
            Ok(Self(level))
        } else {
            Err(BuildError::InvalidHeadingLevel { level })
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Numbering style of a list. Does not constrain nesting.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ListKind {
    Ordered,
    Unordered,
    /// Arbitrary numbering system named by its first marker, e.g. `"A"` or `"I"`.
    Custom(String),
}

impl fmt::Display for ListKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListKind::Ordered => f.write_str("ordered"),
            ListKind::Unordered => f.write_str("unordered"),
            ListKind::Custom(marker) => write!(f, "custom({marker})"),
        }
    }
}

/// How an embedded link sits in the flow of the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EmbedDisplay {
    Inline,
    Block,
}

impl fmt::Display for EmbedDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmbedDisplay::Inline => f.write_str("inline"),
            EmbedDisplay::Block => f.write_str("block"),
        }
    }
}

/// Per-kind payload of a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
    Document,
    Heading {
        level: HeadingLevel,
    },
    Block,
    Quote,
    List {
        kind: ListKind,
    },
    ListItem,
    HorizontalRule,
    Text {
        value: String,
        marks: MarkSet,
    },
    HyperLink {
        target: Url,
    },
    EmbeddedLink {
        reference: ResourceReference,
        display: EmbedDisplay,
        marks: MarkSet,
    },
}

impl NodeData {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeData::Document => NodeKind::Document,
            NodeData::Heading { .. } => NodeKind::Heading,
            NodeData::Block => NodeKind::Block,
            NodeData::Quote => NodeKind::Quote,
            NodeData::List { .. } => NodeKind::List,
            NodeData::ListItem => NodeKind::ListItem,
            NodeData::HorizontalRule => NodeKind::HorizontalRule,
            NodeData::Text { .. } => NodeKind::Text,
            NodeData::HyperLink { .. } => NodeKind::HyperLink,
            NodeData::EmbeddedLink { .. } => NodeKind::EmbeddedLink,
        }
    }

    pub fn role(&self) -> NodeRole {
        match self {
            NodeData::Document => NodeRole::Root,
            NodeData::ListItem => NodeRole::ListMember,
            NodeData::Text { .. } | NodeData::HyperLink { .. } => NodeRole::Inline,
            NodeData::EmbeddedLink { display, .. } => match display {
                EmbedDisplay::Inline => NodeRole::Inline,
                EmbedDisplay::Block => NodeRole::Block,
            },
            NodeData::Heading { .. }
            | NodeData::Block
            | NodeData::Quote
            | NodeData::List { .. }
            | NodeData::HorizontalRule => NodeRole::Block,
        }
    }

    /// Whether a child in `role` may be appended under this node.
    pub fn accepts(&self, role: NodeRole) -> bool {
        match self {
            NodeData::Document => role == NodeRole::Block,
            NodeData::Heading { .. } | NodeData::HyperLink { .. } | NodeData::EmbeddedLink { .. } => {
                role == NodeRole::Inline
            }
            NodeData::Block | NodeData::Quote | NodeData::ListItem => {
                matches!(role, NodeRole::Block | NodeRole::Inline)
            }
            NodeData::List { .. } => role == NodeRole::ListMember,
            NodeData::Text { .. } | NodeData::HorizontalRule => false,
        }
    }

    /// Marks carried by this node, if it is a kind that can carry any.
    pub fn marks(&self) -> Option<&MarkSet> {
        match self {
            NodeData::Text { marks, .. } => Some(marks),
            NodeData::EmbeddedLink {
                marks,
                display: EmbedDisplay::Inline,
                ..
            } => Some(marks),
            _ => None,
        }
    }

    pub(crate) fn marks_mut(&mut self) -> Option<&mut MarkSet> {
        match self {
            NodeData::Text { marks, .. } => Some(marks),
            NodeData::EmbeddedLink {
                marks,
                display: EmbedDisplay::Inline,
                ..
            } => Some(marks),
            _ => None,
        }
    }
}

/// Borrowed view of a node's payload, for renderers and codecs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Payload<'a> {
    None,
    Heading(HeadingLevel),
    List(&'a ListKind),
    Text(&'a str),
    Target(&'a Url),
    Reference {
        reference: &'a ResourceReference,
        display: EmbedDisplay,
    },
}

/// An immutable node of a finalized document.
///
/// Nodes are only produced by finalizing a builder tree, so every node you
/// can observe already satisfies the structural invariants of the model.
#[derive(Debug)]
pub struct Node {
    data: NodeData,
    children: Vec<Node>,
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        let mut pending = vec![(self, other)];
        while let Some((left, right)) = pending.pop() {
            if left.data != right.data || left.children.len() != right.children.len() {
                return false;
            }
            pending.extend(left.children.iter().zip(&right.children));
        }
        true
    }
}

impl Eq for Node {}

impl Drop for Node {
    // Flattened so that arbitrarily deep documents drop without recursing.
    fn drop(&mut self) {
        let mut stack = std::mem::take(&mut self.children);
        while let Some(mut node) = stack.pop() {
            stack.append(&mut node.children);
        }
    }
}

impl Node {
    pub(crate) fn new(data: NodeData, children: Vec<Node>) -> Self {
        Self { data, children }
    }

    pub fn kind(&self) -> NodeKind {
        self.data.kind()
    }

    pub fn role(&self) -> NodeRole {
        self.data.role()
    }

    pub fn data(&self) -> &NodeData {
        &self.data
    }

    /// Children in document order. Call again to restart.
    pub fn children(&self) -> Children<'_> {
        Children {
            inner: self.children.iter(),
        }
    }

    pub fn child(&self, index: usize) -> Option<&Node> {
        self.children.get(index)
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Marks of a text run or inline embedded link; empty for everything else.
    pub fn marks(&self) -> &MarkSet {
        self.data.marks().unwrap_or(&NO_MARKS)
    }

    pub fn payload(&self) -> Payload<'_> {
        match &self.data {
            NodeData::Heading { level } => Payload::Heading(*level),
            NodeData::List { kind } => Payload::List(kind),
            NodeData::Text { value, .. } => Payload::Text(value),
            NodeData::HyperLink { target } => Payload::Target(target),
            NodeData::EmbeddedLink {
                reference, display, ..
            } => Payload::Reference {
                reference,
                display: *display,
            },
            NodeData::Document
            | NodeData::Block
            | NodeData::Quote
            | NodeData::ListItem
            | NodeData::HorizontalRule => Payload::None,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match &self.data {
            NodeData::Text { value, .. } => Some(value),
            _ => None,
        }
    }

    pub fn reference(&self) -> Option<&ResourceReference> {
        match &self.data {
            NodeData::EmbeddedLink { reference, .. } => Some(reference),
            _ => None,
        }
    }

    /// Concatenated text of every text run beneath this node.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if let Some(value) = node.text() {
                out.push_str(value);
            }
            stack.extend(node.children.iter().rev());
        }
        out
    }
}

/// Lazy iterator over a node's children.
#[derive(Debug, Clone)]
pub struct Children<'a> {
    inner: std::slice::Iter<'a, Node>,
}

impl<'a> Iterator for Children<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl DoubleEndedIterator for Children<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl ExactSizeIterator for Children<'_> {}
