use crate::action::Action;
use crate::config::DispatchConfig;
use crate::context::TemplateContext;
use crate::error::DispatchError;
use crate::manager::RuleManager;
use crate::pattern::{Namespaces, parse_union};
use crate::rule::Rule;
use std::fmt;
use xmlrule_select::Select;
use xmlrule_tree::TreeNode;

/// A set of template rules that can be run against a tree.
///
/// Every traversal entry point takes `&self` and every registration method
/// takes `&mut self`, so rules cannot change while a traversal is running.
/// Output goes to any [`fmt::Write`] sink the caller provides.
pub struct Stylesheet<N: TreeNode> {
    rules: RuleManager<N>,
    mode_name: String,
    namespaces: Namespaces,
    config: DispatchConfig,
}

impl<N: TreeNode> Default for Stylesheet<N> {
    fn default() -> Self {
        Self::with_config(DispatchConfig::default())
    }
}

impl<N: TreeNode> Stylesheet<N> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: DispatchConfig) -> Self {
        Stylesheet {
            rules: RuleManager::new(),
            mode_name: config.mode.clone().unwrap_or_default(),
            namespaces: Namespaces::new(),
            config,
        }
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    pub fn rules(&self) -> &RuleManager<N> {
        &self.rules
    }

    pub fn rules_mut(&mut self) -> &mut RuleManager<N> {
        &mut self.rules
    }

    /// Prefix bindings used by [`Stylesheet::add_template`].
    pub fn namespaces(&self) -> &Namespaces {
        &self.namespaces
    }

    pub fn namespaces_mut(&mut self) -> &mut Namespaces {
        &mut self.namespaces
    }

    // --- Registration ---

    /// Adds a rule to the default mode.
    pub fn add_rule(&mut self, rule: Rule<N>) {
        self.rules.add_rule(rule);
    }

    pub fn add_rule_in(&mut self, mode: &str, rule: Rule<N>) {
        self.rules.add_rule_in(mode, rule);
    }

    pub fn remove_rule(&mut self, rule: &Rule<N>) -> bool {
        self.rules.remove_rule(rule)
    }

    /// Parses `pattern` (which may be a union like `title|heading`) and registers
    /// one rule per alternative, all sharing `action`. Each alternative keeps
    /// its own default priority. `None` registers in the default mode.
    pub fn add_template(
        &mut self,
        mode: Option<&str>,
        pattern: &str,
        action: Action<N>,
    ) -> Result<Vec<Rule<N>>, DispatchError> {
        let patterns = parse_union(pattern, &self.namespaces)?;
        let mode = mode.unwrap_or("");
        let rules: Vec<Rule<N>> = patterns
            .into_iter()
            .map(|p| Rule::new(p, action.clone()))
            .collect();
        for rule in &rules {
            self.rules.add_rule_in(mode, rule.clone());
        }
        Ok(rules)
    }

    /// Removes every rule from every mode.
    pub fn clear(&mut self) {
        self.rules.clear();
    }

    // --- Configuration ---

    /// The mode used when a call does not name one. Empty for the default mode.
    pub fn mode_name(&self) -> &str {
        &self.mode_name
    }

    pub fn set_mode_name(&mut self, name: impl Into<String>) {
        self.mode_name = name.into();
    }

    pub fn default_leaf_action(&self) -> &Action<N> {
        self.rules.default_leaf_action()
    }

    pub fn set_default_leaf_action(&mut self, action: Action<N>) {
        self.rules.set_default_leaf_action(action);
    }

    // --- Traversal ---

    /// Starts a traversal writing to `out`. The one-shot methods below are
    /// shorthands for a single call on a fresh context.
    pub fn context<'s, 'o>(&'s self, out: &'o mut dyn fmt::Write) -> TemplateContext<'s, 'o, N> {
        TemplateContext::new(self, out)
    }

    /// Fires the single best rule for `node`. Does not descend on its own.
    pub fn run(&self, node: N, out: &mut dyn fmt::Write) -> Result<(), DispatchError> {
        self.context(out).run(node)
    }

    pub fn run_in(&self, node: N, mode: &str, out: &mut dyn fmt::Write) -> Result<(), DispatchError> {
        self.context(out).run_in(node, mode)
    }

    pub fn run_all<I>(&self, nodes: I, out: &mut dyn fmt::Write) -> Result<(), DispatchError>
    where
        I: IntoIterator<Item = N>,
    {
        self.context(out).run_all(nodes)
    }

    pub fn run_all_in<I>(&self, nodes: I, mode: &str, out: &mut dyn fmt::Write) -> Result<(), DispatchError>
    where
        I: IntoIterator<Item = N>,
    {
        self.context(out).run_all_in(nodes, mode)
    }

    /// Runs `node` and collects the output into a string.
    pub fn run_to_string(&self, node: N) -> Result<String, DispatchError> {
        let mut out = String::new();
        self.run(node, &mut out)?;
        Ok(out)
    }

    pub fn apply_templates(&self, node: N, out: &mut dyn fmt::Write) -> Result<(), DispatchError> {
        self.context(out).apply_templates(node)
    }

    pub fn apply_templates_in(&self, node: N, mode: &str, out: &mut dyn fmt::Write) -> Result<(), DispatchError> {
        self.context(out).apply_templates_in(node, mode)
    }

    pub fn apply_templates_all<I>(&self, nodes: I, out: &mut dyn fmt::Write) -> Result<(), DispatchError>
    where
        I: IntoIterator<Item = N>,
    {
        self.context(out).apply_templates_all(nodes)
    }

    pub fn apply_templates_all_in<I>(
        &self,
        nodes: I,
        mode: &str,
        out: &mut dyn fmt::Write,
    ) -> Result<(), DispatchError>
    where
        I: IntoIterator<Item = N>,
    {
        self.context(out).apply_templates_all_in(nodes, mode)
    }

    pub fn apply_templates_select<S>(
        &self,
        input: N,
        selection: &S,
        out: &mut dyn fmt::Write,
    ) -> Result<(), DispatchError>
    where
        S: Select<N> + ?Sized,
    {
        self.context(out).apply_templates_select(input, selection)
    }

    pub fn apply_templates_select_in<S>(
        &self,
        input: N,
        selection: &S,
        mode: &str,
        out: &mut dyn fmt::Write,
    ) -> Result<(), DispatchError>
    where
        S: Select<N> + ?Sized,
    {
        self.context(out).apply_templates_select_in(input, selection, mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::Pattern;
    use std::fmt::Write as _;
    use xmlrule_tree::{XmlDocument, XmlNode};

    #[test]
    fn test_mode_name_from_config() {
        let config = DispatchConfig {
            mode: Some("toc".to_string()),
            ..Default::default()
        };
        let mut stylesheet: Stylesheet<XmlNode> = Stylesheet::with_config(config);
        assert_eq!(stylesheet.mode_name(), "toc");
        stylesheet.set_mode_name("");
        assert_eq!(stylesheet.mode_name(), "");
    }

    #[test]
    fn test_add_template_registers_each_alternative() {
        let mut stylesheet: Stylesheet<XmlNode> = Stylesheet::new();
        stylesheet.namespaces_mut().bind("x", "urn:x");
        let rules = stylesheet
            .add_template(Some("toc"), "x:title | heading | text()", Action::noop())
            .unwrap();
        assert_eq!(rules.len(), 3);
        assert_eq!(rules[2].priority(), -0.5);
        assert!(rules[0].action().ptr_eq(rules[1].action()));
        assert_eq!(stylesheet.rules().mode("toc").map(|m| m.len()), Some(3));
        assert!(stylesheet.rules().mode("").is_none());

        let err = stylesheet.add_template(None, "y:title", Action::noop());
        assert!(matches!(err, Err(DispatchError::PatternParse(..))));
    }

    #[test]
    fn test_builtin_rules_emit_text() {
        let doc = XmlDocument::parse("<doc>a<b>b<c>c</c></b><!--skip-->d<?pi skip?></doc>").unwrap();
        let stylesheet = Stylesheet::new();
        assert_eq!(stylesheet.run_to_string(doc.root_node()).unwrap(), "abcd");
    }

    #[test]
    fn test_run_does_not_descend() {
        let doc = XmlDocument::parse("<doc><item>x</item></doc>").unwrap();
        let mut stylesheet: Stylesheet<XmlNode> = Stylesheet::new();
        stylesheet.add_rule(Rule::new(
            Pattern::element("doc"),
            Action::new(|cx, _| {
                cx.out().write_str("[doc]")?;
                Ok(())
            }),
        ));
        assert_eq!(stylesheet.run_to_string(doc.root_node()).unwrap(), "[doc]");
        assert_eq!(stylesheet.run_to_string(doc.document_element()).unwrap(), "[doc]");
    }
}
