//! Destination tree model: a Markdown syntax tree (mdast).
//!
//! Nodes are deliberately loose: a `type`, optional `children`, an optional
//! literal `value` and any extra fields (`depth`, `url`, `ordered`, ...) a
//! handler wants to attach. Serialization to Markdown text happens downstream.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A node of the destination tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Node type, e.g. `paragraph` or `text`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Extra fields such as `depth` or `url`.
    #[serde(flatten)]
    pub props: BTreeMap<String, Value>,
    /// Child nodes of a parent node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Node>>,
    /// Value of a literal node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl Node {
    /// A node with children.
    pub fn parent(kind: impl Into<String>, children: Vec<Self>) -> Self {
        Self {
            kind: kind.into(),
            props: BTreeMap::new(),
            children: Some(children),
            value: None,
        }
    }

    /// A node with a literal value.
    pub fn literal(kind: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            props: BTreeMap::new(),
            children: None,
            value: Some(value.into()),
        }
    }

    /// A node with neither children nor value, such as `break`.
    pub fn void(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            props: BTreeMap::new(),
            children: None,
            value: None,
        }
    }

    /// A `text` node.
    pub fn text(value: impl Into<String>) -> Self {
        Self::literal("text", value)
    }

    /// A `root` node.
    pub fn root(children: Vec<Self>) -> Self {
        Self::parent("root", children)
    }

    /// Attach an extra field.
    #[must_use]
    pub fn with_prop(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.props.insert(key.into(), value.into());
        self
    }

    /// Attach an extra field only when a value is present.
    #[must_use]
    pub fn with_optional_prop(self, key: impl Into<String>, value: Option<impl Into<Value>>) -> Self {
        match value {
            Some(value) => self.with_prop(key, value),
            None => self,
        }
    }

    /// Read an extra field.
    pub fn prop(&self, key: &str) -> Option<&Value> {
        self.props.get(key)
    }

    /// Children, empty for literals and void nodes.
    pub fn children(&self) -> &[Self] {
        self.children.as_deref().unwrap_or_default()
    }

    /// Concatenated literal values of this node and its descendants.
    pub fn to_plain_string(&self) -> String {
        let mut out = String::new();
        self.push_plain(&mut out);
        out
    }

    fn push_plain(&self, out: &mut String) {
        if let Some(value) = &self.value {
            out.push_str(value);
        }
        for child in self.children() {
            child.push_plain(out);
        }
    }
}

/// Output of a handler or of a children transformation.
///
/// A sequence is spliced into the parent in place of the source node. An empty
/// sequence is valid output: the node intentionally produces nothing.
#[derive(Debug, Clone, PartialEq)]
pub enum Handled {
    /// Exactly one node.
    Node(Node),
    /// Zero or more nodes.
    Nodes(Vec<Node>),
}

impl Handled {
    /// An empty sequence.
    pub const fn nothing() -> Self {
        Self::Nodes(Vec::new())
    }

    /// Flatten into a list of nodes.
    pub fn into_vec(self) -> Vec<Node> {
        match self {
            Self::Node(node) => vec![node],
            Self::Nodes(nodes) => nodes,
        }
    }

    /// Collapse into a single node; a sequence becomes a `root`.
    pub fn into_node(self) -> Node {
        match self {
            Self::Node(node) => node,
            Self::Nodes(nodes) => Node::root(nodes),
        }
    }

    /// Append to an existing list, splicing sequences.
    pub(crate) fn append_to(self, out: &mut Vec<Node>) {
        match self {
            Self::Node(node) => out.push(node),
            Self::Nodes(mut nodes) => out.append(&mut nodes),
        }
    }
}

impl From<Node> for Handled {
    fn from(node: Node) -> Self {
        Self::Node(node)
    }
}

impl From<Vec<Node>> for Handled {
    fn from(nodes: Vec<Node>) -> Self {
        Self::Nodes(nodes)
    }
}
