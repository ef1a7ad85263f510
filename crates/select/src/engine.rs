//! Evaluation of compiled paths against a context node.

use crate::ast::{Axis, LocationPath, NodeTest, NodeTypeTest, PathExpr, Predicate, Step};
use crate::axes;
use crate::error::SelectError;
use crate::parser::parse_path;
use std::collections::HashSet;
use std::fmt;
use xmlrule_tree::{NodeType, TreeNode};

/// Anything that can turn a context node into an ordered, duplicate-free node sequence.
pub trait Select<N: TreeNode> {
    fn select(&self, context: N) -> Result<Vec<N>, SelectError>;
}

impl<N: TreeNode, S: Select<N> + ?Sized> Select<N> for &S {
    fn select(&self, context: N) -> Result<Vec<N>, SelectError> {
        (**self).select(context)
    }
}

/// Adapts a closure into a [`Select`], for plugging in an external evaluator.
pub struct SelectFn<F>(pub F);

impl<N, F> Select<N> for SelectFn<F>
where
    N: TreeNode,
    F: Fn(N) -> Result<Vec<N>, SelectError>,
{
    fn select(&self, context: N) -> Result<Vec<N>, SelectError> {
        (self.0)(context)
    }
}

/// A compiled selection path.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    expr: PathExpr,
    text: String,
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl Path {
    pub fn parse(text: &str) -> Result<Self, SelectError> {
        let expr = parse_path(text)?;
        Ok(Path {
            expr,
            text: text.to_string(),
        })
    }

    pub fn expr(&self) -> &PathExpr {
        &self.expr
    }

    /// Evaluates the path with `context` as the context node. The result is in
    /// document order with duplicates removed.
    pub fn evaluate<N: TreeNode>(&self, context: N) -> Vec<N> {
        let mut seen = HashSet::new();
        let mut results = Vec::new();
        for branch in &self.expr.branches {
            for node in evaluate_location_path(branch, context) {
                if seen.insert(node) {
                    results.push(node);
                }
            }
        }
        results.sort();
        log::trace!("'{}' selected {} node(s)", self.text, results.len());
        results
    }
}

impl<N: TreeNode> Select<N> for Path {
    fn select(&self, context: N) -> Result<Vec<N>, SelectError> {
        Ok(self.evaluate(context))
    }
}

fn document_of<N: TreeNode>(node: N) -> N {
    let mut current = node;
    while let Some(parent) = current.parent() {
        current = parent;
    }
    current
}

fn evaluate_location_path<N: TreeNode>(path: &LocationPath, context: N) -> Vec<N> {
    let start = if path.is_absolute {
        document_of(context)
    } else {
        context
    };

    let mut current = vec![start];
    for step in &path.steps {
        let mut seen = HashSet::new();
        let mut next = Vec::new();
        for node in current {
            for candidate in evaluate_step(step, node) {
                if seen.insert(candidate) {
                    next.push(candidate);
                }
            }
        }
        next.sort();
        current = next;
    }
    current
}

fn evaluate_step<N: TreeNode>(step: &Step, node: N) -> Vec<N> {
    let mut matched: Vec<N> = axes::collect(step.axis, node)
        .into_iter()
        .filter(|candidate| node_test_matches(&step.node_test, step.axis, *candidate))
        .collect();

    for predicate in &step.predicates {
        let picked = match predicate {
            Predicate::Position(position) => {
                position.checked_sub(1).and_then(|i| matched.get(i).copied())
            }
            Predicate::Last => matched.last().copied(),
        };
        matched = picked.into_iter().collect();
    }
    matched
}

fn node_test_matches<N: TreeNode>(test: &NodeTest, axis: Axis, node: N) -> bool {
    let principal = if axis == Axis::Attribute {
        NodeType::Attribute
    } else {
        NodeType::Element
    };

    match test {
        NodeTest::Wildcard => node.node_type() == principal,
        NodeTest::PrefixWildcard(prefix) => {
            node.node_type() == principal
                && node.name().and_then(|q| q.prefix) == Some(prefix.as_str())
        }
        NodeTest::Name { prefix, local } => {
            node.node_type() == principal
                && node.name().is_some_and(|q| {
                    q.local_part == local.as_str() && q.prefix.filter(|p| !p.is_empty()) == prefix.as_deref()
                })
        }
        NodeTest::NodeType(ntt) => match ntt {
            NodeTypeTest::Node => true,
            NodeTypeTest::Text => node.node_type() == NodeType::Text,
            NodeTypeTest::Comment => node.node_type() == NodeType::Comment,
            NodeTypeTest::ProcessingInstruction => {
                node.node_type() == NodeType::ProcessingInstruction
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xmlrule_tree::XmlDocument;

    const XML: &str = r#"<doc><item id="a">one</item><note/><item id="b">two<sub/></item><!--c--></doc>"#;

    fn select<'d, 'i>(path: &str, context: xmlrule_tree::XmlNode<'d, 'i>) -> Vec<xmlrule_tree::XmlNode<'d, 'i>> {
        Path::parse(path).unwrap().evaluate(context)
    }

    #[test]
    fn test_child_axis() {
        let doc = XmlDocument::parse(XML).unwrap();
        let root = doc.document_element();
        let items = select("child::item", root);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].attribute("id").unwrap().string_value(), "a");

        assert_eq!(select("*", root).len(), 3);
        assert_eq!(select("node()", root).len(), 4);
        assert_eq!(select("comment()", root).len(), 1);
    }

    #[test]
    fn test_absolute_and_descendant_paths() {
        let doc = XmlDocument::parse(XML).unwrap();
        let sub = doc
            .document_element()
            .children()
            .nth(2)
            .unwrap()
            .child_element("sub")
            .unwrap();

        let root = select("/", sub);
        assert_eq!(root, vec![doc.root_node()]);

        let all_items = select("//item", sub);
        assert_eq!(all_items.len(), 2);

        let texts = select("/doc//text()", sub);
        let values: Vec<String> = texts.iter().map(|t| t.string_value()).collect();
        assert_eq!(values, vec!["one", "two"]);
    }

    #[test]
    fn test_union_is_document_ordered_and_unique() {
        let doc = XmlDocument::parse(XML).unwrap();
        let root = doc.document_element();
        let nodes = select("note | item | item[1]", root);
        let names: Vec<&str> = nodes.iter().map(|n| n.local_name()).collect();
        assert_eq!(names, vec!["item", "note", "item"]);
    }

    #[test]
    fn test_self_inclusive_axis() {
        let doc = XmlDocument::parse(XML).unwrap();
        let root = doc.document_element();
        let nodes = select("self::node() | child::*", root);
        assert_eq!(nodes[0], root);
        assert_eq!(nodes.len(), 4);
    }

    #[test]
    fn test_positional_predicates() {
        let doc = XmlDocument::parse(XML).unwrap();
        let root = doc.document_element();
        let second = select("item[2]/@id", root);
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].string_value(), "b");

        let last = select("item[last()]", root);
        assert_eq!(last[0].attribute("id").unwrap().string_value(), "b");

        assert!(select("item[5]", root).is_empty());
        assert!(select("item[0]", root).is_empty());
    }

    fn children_of<'d, 'i>(
        context: xmlrule_tree::XmlNode<'d, 'i>,
    ) -> Result<Vec<xmlrule_tree::XmlNode<'d, 'i>>, SelectError> {
        Ok(context.children().collect())
    }

    fn always_fails<'d, 'i>(
        _: xmlrule_tree::XmlNode<'d, 'i>,
    ) -> Result<Vec<xmlrule_tree::XmlNode<'d, 'i>>, SelectError> {
        Err(SelectError::Evaluation("boom".into()))
    }

    #[test]
    fn test_select_fn_adapter() {
        let doc = XmlDocument::parse(XML).unwrap();
        let root = doc.document_element();
        let external = SelectFn(children_of);
        assert_eq!(external.select(root).unwrap().len(), 4);

        let failing = SelectFn(always_fails);
        assert_eq!(
            failing.select(root),
            Err(SelectError::Evaluation("boom".into()))
        );
    }
}
