//! Defines the syntax tree for compiled selection paths.

/// A union of one or more location paths, e.g. `item | @id`.
#[derive(Debug, Clone, PartialEq)]
pub struct PathExpr {
    pub branches: Vec<LocationPath>,
}

/// A single location path, like `/doc/child::item[2]` or `.//para`.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationPath {
    /// True if the path starts from the document node (e.g., `/foo`).
    pub is_absolute: bool,
    pub steps: Vec<Step>,
}

/// A single step, like `child::foo[1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub axis: Axis,
    pub node_test: NodeTest,
    pub predicates: Vec<Predicate>,
}

impl Step {
    pub fn new(axis: Axis, node_test: NodeTest) -> Self {
        Step {
            axis,
            node_test,
            predicates: vec![],
        }
    }
}

/// The axis of movement from the context node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Child,
    Descendant,
    DescendantOrSelf,
    Attribute,
    Parent,
    Ancestor,
    AncestorOrSelf,
    SelfAxis,
    FollowingSibling,
    PrecedingSibling,
}

impl Axis {
    /// Reverse axes number their nodes nearest-first for positional predicates.
    pub fn is_reverse(&self) -> bool {
        matches!(
            self,
            Axis::Parent | Axis::Ancestor | Axis::AncestorOrSelf | Axis::PrecedingSibling
        )
    }
}

/// A test applied to every node on the axis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeTest {
    /// `*`: any node of the axis' principal type.
    Wildcard,
    /// `x:*`: any node of the principal type written with prefix `x`.
    PrefixWildcard(String),
    /// `name` or `x:name`.
    Name { prefix: Option<String>, local: String },
    /// `text()`, `node()`, ...
    NodeType(NodeTypeTest),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeTypeTest {
    Text,
    Node,
    Comment,
    ProcessingInstruction,
}

/// Positional filters supported inside `[...]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Predicate {
    /// `[n]`, 1-based.
    Position(usize),
    /// `[last()]`
    Last,
}
