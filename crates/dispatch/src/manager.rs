use crate::action::Action;
use crate::mode::Mode;
use crate::rule::Rule;
use std::collections::HashMap;
use xmlrule_tree::TreeNode;

/// Registry of modes, keyed by name. The empty name is the default mode.
pub struct RuleManager<N: TreeNode> {
    modes: HashMap<String, Mode<N>>,
    /// Stands in for every mode name that was never registered.
    unregistered: Mode<N>,
    leaf_action: Action<N>,
}

impl<N: TreeNode> Default for RuleManager<N> {
    fn default() -> Self {
        RuleManager {
            modes: HashMap::new(),
            unregistered: Mode::new("<unregistered>"),
            leaf_action: Action::value_of(),
        }
    }
}

impl<N: TreeNode> RuleManager<N> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a rule to the default mode.
    pub fn add_rule(&mut self, rule: Rule<N>) {
        self.get_mode("").add_rule(rule);
    }

    pub fn add_rule_in(&mut self, mode: &str, rule: Rule<N>) {
        self.get_mode(mode).add_rule(rule);
    }

    /// Removes `rule` from every mode it was added to.
    pub fn remove_rule(&mut self, rule: &Rule<N>) -> bool {
        let mut removed = false;
        for mode in self.modes.values_mut() {
            removed |= mode.remove_rule(rule);
        }
        removed
    }

    /// The mode called `name`, created on first use.
    pub fn get_mode(&mut self, name: &str) -> &mut Mode<N> {
        self.modes
            .entry(name.to_string())
            .or_insert_with(|| Mode::new(name))
    }

    pub fn mode(&self, name: &str) -> Option<&Mode<N>> {
        self.modes.get(name)
    }

    /// Calls `f` with the mode called `name`. A mode that was never referenced
    /// behaves like an empty one, so only the built-in rules apply.
    pub fn with_mode<R>(&self, name: &str, f: impl FnOnce(&Mode<N>) -> R) -> R {
        f(self.modes.get(name).unwrap_or(&self.unregistered))
    }

    pub fn mode_names(&self) -> impl Iterator<Item = &str> {
        self.modes.keys().map(String::as_str)
    }

    /// Removes every rule from every mode. The modes themselves are kept.
    pub fn clear(&mut self) {
        for mode in self.modes.values_mut() {
            mode.clear();
        }
    }

    /// The action the built-in rules use for text and attribute nodes, shared
    /// by all modes.
    pub fn default_leaf_action(&self) -> &Action<N> {
        &self.leaf_action
    }

    pub fn set_default_leaf_action(&mut self, action: Action<N>) {
        self.leaf_action = action;
    }
}
