use crate::error::DispatchError;
use crate::stylesheet::Stylesheet;
use std::fmt;
use xmlrule_select::Select;
use xmlrule_tree::TreeNode;

/// The handle an action receives while a stylesheet is running.
///
/// It borrows the stylesheet immutably, so rules cannot change mid-traversal,
/// and owns the output sink and the recursion depth for the current call.
/// Actions recurse by calling back into it. It also implements
/// [`fmt::Write`], so `write!(cx, ...)` goes straight to the output.
pub struct TemplateContext<'s, 'o, N: TreeNode> {
    stylesheet: &'s Stylesheet<N>,
    out: &'o mut dyn fmt::Write,
    depth: usize,
}

impl<'s, 'o, N: TreeNode> TemplateContext<'s, 'o, N> {
    pub fn new(stylesheet: &'s Stylesheet<N>, out: &'o mut dyn fmt::Write) -> Self {
        TemplateContext {
            stylesheet,
            out,
            depth: 0,
        }
    }

    pub fn stylesheet(&self) -> &'s Stylesheet<N> {
        self.stylesheet
    }

    /// How many rule firings are currently on the stack, counting the one
    /// whose action is running. Zero outside any action.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn out(&mut self) -> &mut (dyn fmt::Write + 'o) {
        &mut *self.out
    }

    /// Writes the string value of `node`.
    pub fn value_of(&mut self, node: N) -> Result<(), DispatchError> {
        self.out.write_str(&node.string_value())?;
        Ok(())
    }

    /// Fires the single best rule for `node` in the stylesheet's mode.
    pub fn run(&mut self, node: N) -> Result<(), DispatchError> {
        let stylesheet = self.stylesheet;
        self.run_in(node, stylesheet.mode_name())
    }

    pub fn run_in(&mut self, node: N, mode: &str) -> Result<(), DispatchError> {
        let stylesheet = self.stylesheet;
        stylesheet
            .rules()
            .with_mode(mode, |m| m.fire_rule(node, self))
    }

    /// Runs each node in order.
    pub fn run_all<I>(&mut self, nodes: I) -> Result<(), DispatchError>
    where
        I: IntoIterator<Item = N>,
    {
        let stylesheet = self.stylesheet;
        self.run_all_in(nodes, stylesheet.mode_name())
    }

    pub fn run_all_in<I>(&mut self, nodes: I, mode: &str) -> Result<(), DispatchError>
    where
        I: IntoIterator<Item = N>,
    {
        for node in nodes {
            self.run_in(node, mode)?;
        }
        Ok(())
    }

    /// Applies templates to the children of `node` in the stylesheet's mode.
    /// Nodes other than elements and documents have no children to process
    /// and are skipped.
    pub fn apply_templates(&mut self, node: N) -> Result<(), DispatchError> {
        let stylesheet = self.stylesheet;
        self.apply_templates_in(node, stylesheet.mode_name())
    }

    pub fn apply_templates_in(&mut self, node: N, mode: &str) -> Result<(), DispatchError> {
        if !node.is_container() {
            log::trace!("apply_templates: skipping {} node", node.node_type());
            return Ok(());
        }
        let stylesheet = self.stylesheet;
        stylesheet
            .rules()
            .with_mode(mode, |m| m.apply_templates(node, self))
    }

    pub fn apply_templates_all<I>(&mut self, nodes: I) -> Result<(), DispatchError>
    where
        I: IntoIterator<Item = N>,
    {
        let stylesheet = self.stylesheet;
        self.apply_templates_all_in(nodes, stylesheet.mode_name())
    }

    pub fn apply_templates_all_in<I>(&mut self, nodes: I, mode: &str) -> Result<(), DispatchError>
    where
        I: IntoIterator<Item = N>,
    {
        for node in nodes {
            self.apply_templates_in(node, mode)?;
        }
        Ok(())
    }

    /// Evaluates `selection` against `input` and applies templates to the
    /// result. `input` itself is always dropped from the selection, so a
    /// self-inclusive path cannot re-apply templates to the node that asked.
    pub fn apply_templates_select<S>(&mut self, input: N, selection: &S) -> Result<(), DispatchError>
    where
        S: Select<N> + ?Sized,
    {
        let stylesheet = self.stylesheet;
        self.apply_templates_select_in(input, selection, stylesheet.mode_name())
    }

    pub fn apply_templates_select_in<S>(
        &mut self,
        input: N,
        selection: &S,
        mode: &str,
    ) -> Result<(), DispatchError>
    where
        S: Select<N> + ?Sized,
    {
        let mut nodes = selection.select(input)?;
        nodes.retain(|node| *node != input);
        log::trace!("apply_templates_select: {} node(s) selected", nodes.len());
        self.apply_templates_all_in(nodes, mode)
    }

    /// Runs `f` one level deeper, failing once the configured depth is reached.
    pub(crate) fn nested<F>(&mut self, f: F) -> Result<(), DispatchError>
    where
        F: FnOnce(&mut Self) -> Result<(), DispatchError>,
    {
        let limit = self.stylesheet.config().max_depth;
        if self.depth >= limit {
            log::warn!("Template recursion reached the depth limit of {}", limit);
            return Err(DispatchError::DepthExceeded { limit });
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }
}

impl<N: TreeNode> fmt::Write for TemplateContext<'_, '_, N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.out.write_str(s)
    }
}
