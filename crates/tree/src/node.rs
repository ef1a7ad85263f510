//! Defines the core abstraction for a navigable, read-only XML tree.
use std::hash::Hash;

/// A qualified name: the namespace URI it resolves to, the prefix it was
/// written with (if any), and the local part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QName<'a> {
    pub namespace: Option<&'a str>,
    pub prefix: Option<&'a str>,
    pub local_part: &'a str,
}

impl<'a> QName<'a> {
    /// A name in no namespace.
    pub fn local(local_part: &'a str) -> Self {
        QName {
            namespace: None,
            prefix: None,
            local_part,
        }
    }

    /// The name as it would be written in markup, e.g. `fo:block`.
    pub fn qualified(&self) -> String {
        match self.prefix {
            Some(prefix) if !prefix.is_empty() => format!("{}:{}", prefix, self.local_part),
            _ => self.local_part.to_string(),
        }
    }
}

/// The category of a node in the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    Document,
    Element,
    Attribute,
    Text,
    Comment,
    ProcessingInstruction,
}

impl NodeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Document => "document",
            NodeType::Element => "element",
            NodeType::Attribute => "attribute",
            NodeType::Text => "text",
            NodeType::Comment => "comment",
            NodeType::ProcessingInstruction => "processing-instruction",
        }
    }
}

impl std::fmt::Display for NodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The contract every tree handed to the selection, dispatch and writer crates
/// must satisfy.
///
/// Implementors are cheap `Copy` handles into a tree owned elsewhere. `Ord`
/// must follow document order: a node sorts before its attributes, which sort
/// before its children.
pub trait TreeNode: std::fmt::Debug + Clone + Copy + PartialEq + Eq + Hash + PartialOrd + Ord {
    /// The category of the node (Element, Text, Attribute, etc.).
    fn node_type(&self) -> NodeType;

    /// The qualified name of the node. `None` for documents, text and comments.
    /// For a processing instruction this is its target.
    fn name(&self) -> Option<QName<'_>>;

    /// The string value of the node.
    /// - For a text node, this is its content.
    /// - For an element or document, the concatenation of all descendant text.
    /// - For an attribute, its value.
    /// - For a comment or processing instruction, its content.
    fn string_value(&self) -> String;

    /// The attribute nodes of this node. Empty for anything but elements.
    fn attributes(&self) -> Box<dyn Iterator<Item = Self> + '_>;

    /// The child nodes of this node in document order.
    fn children(&self) -> Box<dyn Iterator<Item = Self> + '_>;

    /// The parent node. `None` for the document node. An attribute's parent is
    /// the element that carries it.
    fn parent(&self) -> Option<Self>;

    /// The local name, or `""` for unnamed nodes.
    fn local_name(&self) -> &str {
        self.name().map(|q| q.local_part).unwrap_or("")
    }

    /// The namespace URI of the node's name, if any.
    fn namespace_uri(&self) -> Option<&str> {
        self.name().and_then(|q| q.namespace)
    }

    /// True for elements and documents: nodes whose children get processed.
    fn is_container(&self) -> bool {
        matches!(self.node_type(), NodeType::Element | NodeType::Document)
    }

    /// True for text and attribute nodes: nodes whose value gets emitted.
    fn is_leaf(&self) -> bool {
        matches!(self.node_type(), NodeType::Text | NodeType::Attribute)
    }
}
