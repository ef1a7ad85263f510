//! Contains pure functions for collecting nodes along each axis.
//!
//! Forward axes return nodes in document order; reverse axes return them
//! nearest-first, which is the order positional predicates count in.

use crate::ast::Axis;
use xmlrule_tree::TreeNode;

pub fn collect<N: TreeNode>(axis: Axis, node: N) -> Vec<N> {
    let mut results = Vec::new();
    match axis {
        Axis::SelfAxis => results.push(node),
        Axis::Child => results.extend(node.children()),
        Axis::Attribute => results.extend(node.attributes()),
        Axis::Descendant => collect_descendants(node, &mut results),
        Axis::DescendantOrSelf => {
            results.push(node);
            collect_descendants(node, &mut results);
        }
        Axis::Parent => results.extend(node.parent()),
        Axis::Ancestor => collect_ancestors(node, &mut results),
        Axis::AncestorOrSelf => {
            results.push(node);
            collect_ancestors(node, &mut results);
        }
        Axis::FollowingSibling => collect_following_siblings(node, &mut results),
        Axis::PrecedingSibling => collect_preceding_siblings(node, &mut results),
    }
    results
}

fn collect_descendants<N: TreeNode>(node: N, results: &mut Vec<N>) {
    // Pre-order walk; children are pushed reversed so the first child pops first.
    let mut stack: Vec<N> = node.children().collect();
    stack.reverse();
    while let Some(current) = stack.pop() {
        results.push(current);
        let mut children: Vec<N> = current.children().collect();
        children.reverse();
        stack.extend(children);
    }
}

fn collect_ancestors<N: TreeNode>(node: N, results: &mut Vec<N>) {
    let mut current = node.parent();
    while let Some(p) = current {
        results.push(p);
        current = p.parent();
    }
}

fn collect_following_siblings<N: TreeNode>(node: N, results: &mut Vec<N>) {
    if let Some(parent) = sibling_parent(node) {
        results.extend(parent.children().skip_while(|s| *s != node).skip(1));
    }
}

fn collect_preceding_siblings<N: TreeNode>(node: N, results: &mut Vec<N>) {
    if let Some(parent) = sibling_parent(node) {
        let mut siblings: Vec<N> = parent.children().take_while(|s| *s != node).collect();
        siblings.reverse();
        results.extend(siblings);
    }
}

// Attributes have no siblings.
fn sibling_parent<N: TreeNode>(node: N) -> Option<N> {
    if node.node_type() == xmlrule_tree::NodeType::Attribute {
        return None;
    }
    node.parent()
}

#[cfg(test)]
mod tests {
    use super::*;
    use xmlrule_tree::XmlDocument;

    fn names<N: TreeNode>(nodes: &[N]) -> Vec<String> {
        nodes.iter().map(|n| n.local_name().to_string()).collect()
    }

    #[test]
    fn test_descendants_in_document_order() {
        let doc = XmlDocument::parse("<a><b><c/></b><d/></a>").unwrap();
        let a = doc.document_element();
        assert_eq!(names(&collect(Axis::Descendant, a)), vec!["b", "c", "d"]);
        assert_eq!(
            names(&collect(Axis::DescendantOrSelf, a)),
            vec!["a", "b", "c", "d"]
        );
    }

    #[test]
    fn test_reverse_axes_are_nearest_first() {
        let doc = XmlDocument::parse("<a><b/><c/><d><e/></d></a>").unwrap();
        let a = doc.document_element();
        let d = a.child_element("d").unwrap();
        let e = d.child_element("e").unwrap();

        assert_eq!(names(&collect(Axis::PrecedingSibling, d)), vec!["c", "b"]);
        assert_eq!(names(&collect(Axis::Ancestor, e)), vec!["d", "a", ""]);
        assert_eq!(names(&collect(Axis::FollowingSibling, a.child_element("b").unwrap())), vec!["c", "d"]);
    }

    #[test]
    fn test_attributes_have_no_siblings() {
        let doc = XmlDocument::parse(r#"<a x="1" y="2"><b/></a>"#).unwrap();
        let x = doc.document_element().attribute("x").unwrap();
        assert!(collect(Axis::FollowingSibling, x).is_empty());
        assert_eq!(names(&collect(Axis::Parent, x)), vec!["a"]);
    }
}
