// XML tree implementation using roxmltree
use crate::node::{NodeType, QName, TreeNode};
use roxmltree::Node;
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// A parsed XML document. Nodes handed out by [`XmlDocument::root_node`] borrow it.
pub struct XmlDocument<'input> {
    doc: roxmltree::Document<'input>,
}

impl<'input> XmlDocument<'input> {
    pub fn parse(text: &'input str) -> Result<Self, roxmltree::Error> {
        let doc = roxmltree::Document::parse(text)?;
        Ok(Self { doc })
    }

    /// The document node.
    pub fn root_node(&self) -> XmlNode<'_, 'input> {
        XmlNode::Node(self.doc.root())
    }

    /// The single top-level element.
    pub fn document_element(&self) -> XmlNode<'_, 'input> {
        XmlNode::Node(self.doc.root_element())
    }

    pub fn inner(&self) -> &roxmltree::Document<'input> {
        &self.doc
    }
}

/// Either a regular node or an attribute of an element.
/// roxmltree keeps attributes as data on their element rather than as
/// navigable nodes, so they are addressed by owner and index.
#[derive(Debug, Clone, Copy)]
pub enum XmlNode<'a, 'input> {
    /// Document, element, text, comment or processing instruction.
    Node(Node<'a, 'input>),
    Attribute { parent: Node<'a, 'input>, index: usize },
}

impl<'a, 'input> XmlNode<'a, 'input> {
    pub fn new(node: Node<'a, 'input>) -> Self {
        XmlNode::Node(node)
    }

    pub fn inner(&self) -> Option<Node<'a, 'input>> {
        match self {
            XmlNode::Node(node) => Some(*node),
            XmlNode::Attribute { .. } => None,
        }
    }

    /// The first child element with the given local name.
    pub fn child_element(&self, local_name: &str) -> Option<Self> {
        let node = self.inner()?;
        node.children()
            .find(|n| n.is_element() && n.tag_name().name() == local_name)
            .map(XmlNode::Node)
    }

    /// The attribute with the given local name.
    pub fn attribute(&self, local_name: &str) -> Option<Self> {
        let node = self.inner()?;
        node.attributes()
            .position(|a| a.name() == local_name)
            .map(|index| XmlNode::Attribute {
                parent: node,
                index,
            })
    }

    fn sort_key(&self) -> (u32, usize) {
        match self {
            XmlNode::Node(node) => (node.id().get(), 0),
            XmlNode::Attribute { parent, index } => (parent.id().get(), index + 1),
        }
    }
}

impl PartialEq for XmlNode<'_, '_> {
    fn eq(&self, other: &Self) -> bool {
        self.sort_key() == other.sort_key()
    }
}

impl Eq for XmlNode<'_, '_> {}

impl PartialOrd for XmlNode<'_, '_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// Node ids follow document order, and an element's attributes sit between the
// element and its first child.
impl Ord for XmlNode<'_, '_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl Hash for XmlNode<'_, '_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.sort_key().hash(state);
    }
}

impl<'a, 'input: 'a> TreeNode for XmlNode<'a, 'input> {
    fn node_type(&self) -> NodeType {
        match self {
            XmlNode::Node(node) => {
                if node.is_root() {
                    NodeType::Document
                } else if node.is_element() {
                    NodeType::Element
                } else if node.is_text() {
                    NodeType::Text
                } else if node.is_comment() {
                    NodeType::Comment
                } else {
                    NodeType::ProcessingInstruction
                }
            }
            XmlNode::Attribute { .. } => NodeType::Attribute,
        }
    }

    fn name(&self) -> Option<QName<'_>> {
        match self {
            XmlNode::Node(node) => {
                if node.is_element() {
                    let tag = node.tag_name();
                    let namespace = tag.namespace();
                    Some(QName {
                        namespace,
                        prefix: namespace.and_then(|uri| node.lookup_prefix(uri)),
                        local_part: tag.name(),
                    })
                } else if node.is_pi() {
                    node.pi().map(|pi| QName::local(pi.target))
                } else {
                    None
                }
            }
            XmlNode::Attribute { parent, index } => {
                parent.attributes().nth(*index).map(|attr| {
                    let namespace = attr.namespace();
                    let prefix = match namespace {
                        Some(XML_NAMESPACE) => Some("xml"),
                        Some(uri) => parent.lookup_prefix(uri),
                        None => None,
                    };
                    QName {
                        namespace,
                        prefix,
                        local_part: attr.name(),
                    }
                })
            }
        }
    }

    fn string_value(&self) -> String {
        match self {
            XmlNode::Node(node) => {
                if node.is_element() || node.is_root() {
                    node.descendants()
                        .filter(|n| n.is_text())
                        .filter_map(|n| n.text())
                        .collect()
                } else if node.is_pi() {
                    node.pi()
                        .and_then(|pi| pi.value)
                        .unwrap_or("")
                        .to_string()
                } else {
                    node.text().unwrap_or("").to_string()
                }
            }
            XmlNode::Attribute { parent, index } => parent
                .attributes()
                .nth(*index)
                .map(|attr| attr.value().to_string())
                .unwrap_or_default(),
        }
    }

    fn attributes(&self) -> Box<dyn Iterator<Item = Self> + '_> {
        match self {
            XmlNode::Node(node) if node.is_element() => {
                let parent = *node;
                let count = node.attributes().len();
                Box::new((0..count).map(move |index| XmlNode::Attribute { parent, index }))
            }
            _ => Box::new(std::iter::empty()),
        }
    }

    fn children(&self) -> Box<dyn Iterator<Item = Self> + '_> {
        match self {
            XmlNode::Node(node) => Box::new(node.children().map(XmlNode::Node)),
            XmlNode::Attribute { .. } => Box::new(std::iter::empty()),
        }
    }

    fn parent(&self) -> Option<Self> {
        match self {
            XmlNode::Node(node) => node.parent().map(XmlNode::Node),
            XmlNode::Attribute { parent, .. } => Some(XmlNode::Node(*parent)),
        }
    }
}
