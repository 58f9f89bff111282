use serde::Serialize;

use crate::document::Document;
use crate::model::{Node, Payload};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snap {
    pub root: NodeSnap,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeSnap {
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub marks: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSnap>,
}

pub fn normalize(document: &Document) -> Snap {
    Snap {
        root: normalize_node(document.root()),
    }
}

fn normalize_node(node: &Node) -> NodeSnap {
    NodeSnap {
        kind: node.kind().to_string(),
        payload: payload(node),
        marks: node.marks().iter().map(ToString::to_string).collect(),
        children: node.children().map(normalize_node).collect(),
    }
}

fn payload(node: &Node) -> Option<String> {
    match node.payload() {
        Payload::None => None,
        Payload::Heading(level) => Some(level.to_string()),
        Payload::List(kind) => Some(kind.to_string()),
        Payload::Text(value) => Some(value.to_string()),
        Payload::Target(url) => Some(url.to_string()),
        Payload::Reference { reference, display } => Some(format!("{display} {}", reference.key())),
    }
}
