//! # Node and Mark Types
//!
//! The value types of a finalized document tree.
//!
//! - **`mark`**: `Mark`, `MarkKind` and the insertion-ordered `MarkSet`
//! - **`node`**: `Node`, its per-kind `NodeData` payload, `NodeKind`/`NodeRole`
//!   discriminants and the `Payload` view handed to renderers
//! - **`path`**: `NodePath`, child indices from the root
//!
//! ## Content Model
//!
//! | parent | accepts |
//! |---|---|
//! | document | block |
//! | heading, hyperlink, embedded link | inline |
//! | block, quote, list item | block or inline |
//! | list | list items |
//! | text, horizontal rule | nothing |

pub mod mark;
pub mod node;
pub mod path;

pub use mark::{Mark, MarkKind, MarkName, MarkSet};
pub use node::{
    Children, EmbedDisplay, HeadingLevel, ListKind, Node, NodeData, NodeKind, NodeRole, Payload,
};
pub use path::NodePath;
