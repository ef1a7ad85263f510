//! A named, indexed rule set and the dispatch algorithm that runs over it.
use crate::context::TemplateContext;
use crate::error::DispatchError;
use crate::rule::Rule;
use std::cmp::Ordering;
use std::collections::HashMap;
use xmlrule_tree::{NodeType, TreeNode};

struct RuleEntry<N: TreeNode> {
    rule: Rule<N>,
    /// Insertion sequence within the mode. Later registrations win ties.
    seq: u64,
}

impl<N: TreeNode> RuleEntry<N> {
    /// A NaN priority ranks with negative infinity, below every real priority.
    fn rank(&self) -> f64 {
        let priority = self.rule.priority();
        if priority.is_nan() {
            f64::NEG_INFINITY
        } else {
            priority
        }
    }

    fn precedence(&self, other: &Self) -> Ordering {
        self.rank()
            .total_cmp(&other.rank())
            .then(self.seq.cmp(&other.seq))
    }
}

/// The rules registered under one mode name.
///
/// Rules whose pattern is restricted to a local name are bucketed by that
/// name; everything else lives in a fallback list that is consulted for every
/// node. Resolving a node therefore only looks at the rules that could
/// possibly apply to its name.
pub struct Mode<N: TreeNode> {
    name: String,
    named: HashMap<String, Vec<RuleEntry<N>>>,
    fallback: Vec<RuleEntry<N>>,
    next_seq: u64,
}

impl<N: TreeNode> Mode<N> {
    pub fn new(name: impl Into<String>) -> Self {
        Mode {
            name: name.into(),
            named: HashMap::new(),
            fallback: Vec::new(),
            next_seq: 0,
        }
    }

    /// The mode's name. Empty for the default mode.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn add_rule(&mut self, rule: Rule<N>) {
        let entry = RuleEntry {
            rule,
            seq: self.next_seq,
        };
        self.next_seq += 1;
        if entry.rule.priority().is_nan() {
            log::warn!(
                "Mode '{}': rule '{}' has a NaN priority and will lose every tie",
                self.name,
                entry.rule.pattern()
            );
        }

        match entry.rule.pattern().matches_name() {
            Some(local) => {
                log::debug!(
                    "Mode '{}': adding rule '{}' (priority {}) under name '{}'",
                    self.name,
                    entry.rule.pattern(),
                    entry.rule.priority(),
                    local
                );
                self.named.entry(local.to_string()).or_default().push(entry);
            }
            None => {
                log::debug!(
                    "Mode '{}': adding fallback rule '{}' (priority {})",
                    self.name,
                    entry.rule.pattern(),
                    entry.rule.priority()
                );
                self.fallback.push(entry);
            }
        }
    }

    /// Removes every registration of `rule`. Returns `false` if it was not registered.
    pub fn remove_rule(&mut self, rule: &Rule<N>) -> bool {
        let before = self.len();
        match rule.pattern().matches_name() {
            Some(local) => {
                if let Some(bucket) = self.named.get_mut(local) {
                    bucket.retain(|entry| !entry.rule.ptr_eq(rule));
                    if bucket.is_empty() {
                        self.named.remove(local);
                    }
                }
            }
            None => self.fallback.retain(|entry| !entry.rule.ptr_eq(rule)),
        }
        let removed = self.len() < before;
        if removed {
            log::debug!("Mode '{}': removed rule '{}'", self.name, rule.pattern());
        }
        removed
    }

    pub fn clear(&mut self) {
        self.named.clear();
        self.fallback.clear();
    }

    pub fn len(&self) -> usize {
        self.named.values().map(Vec::len).sum::<usize>() + self.fallback.len()
    }

    pub fn is_empty(&self) -> bool {
        self.named.is_empty() && self.fallback.is_empty()
    }

    /// The rule that wins for `node`: highest priority, then most recently added.
    pub fn matching_rule(&self, node: N) -> Option<&Rule<N>> {
        let named = node
            .name()
            .and_then(|name| self.named.get(name.local_part))
            .into_iter()
            .flatten();

        named
            .chain(self.fallback.iter())
            .filter(|entry| entry.rule.pattern().matches(node))
            .max_by(|a, b| a.precedence(b))
            .map(|entry| &entry.rule)
    }

    /// Invokes the winning rule's action on `node`, or the built-in rule for
    /// its node type when nothing matches. Each firing is one level of depth,
    /// however the action recurses.
    pub fn fire_rule(&self, node: N, cx: &mut TemplateContext<'_, '_, N>) -> Result<(), DispatchError> {
        cx.nested(|cx| match self.matching_rule(node) {
            Some(rule) => {
                log::trace!(
                    "Mode '{}': {} matched '{}'",
                    self.name,
                    node.node_type(),
                    rule.pattern()
                );
                rule.action().invoke(cx, node)
            }
            None => self.apply_builtin(node, cx),
        })
    }

    /// Fires the best rule for each child of `node`, in document order.
    /// Grandchildren are only reached if an action (or a built-in rule) recurses.
    pub fn apply_templates(&self, node: N, cx: &mut TemplateContext<'_, '_, N>) -> Result<(), DispatchError> {
        for child in node.children() {
            self.fire_rule(child, cx)?;
        }
        Ok(())
    }

    fn apply_builtin(&self, node: N, cx: &mut TemplateContext<'_, '_, N>) -> Result<(), DispatchError> {
        match node.node_type() {
            NodeType::Document | NodeType::Element => self.apply_templates(node, cx),
            NodeType::Text | NodeType::Attribute => {
                let leaf = cx.stylesheet().rules().default_leaf_action();
                leaf.invoke(cx, node)
            }
            NodeType::Comment | NodeType::ProcessingInstruction => Ok(()),
        }
    }
}

impl<N: TreeNode> std::fmt::Debug for Mode<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mode")
            .field("name", &self.name)
            .field("rules", &self.len())
            .finish()
    }
}
