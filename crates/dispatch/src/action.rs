use crate::context::TemplateContext;
use crate::error::DispatchError;
use std::fmt;
use std::rc::Rc;
use xmlrule_tree::TreeNode;

type ActionFn<N> = dyn Fn(&mut TemplateContext<'_, '_, N>, N) -> Result<(), DispatchError>;

/// A caller-supplied handler invoked when its rule wins for a node.
///
/// Cloning an `Action` shares the underlying function, so clones compare equal
/// under [`Action::ptr_eq`].
pub struct Action<N: TreeNode> {
    inner: Rc<ActionFn<N>>,
}

impl<N: TreeNode> Action<N> {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&mut TemplateContext<'_, '_, N>, N) -> Result<(), DispatchError> + 'static,
    {
        Action { inner: Rc::new(f) }
    }

    /// Writes the node's string value to the output. This is the default leaf action.
    pub fn value_of() -> Self {
        Action::new(|cx, node| cx.value_of(node))
    }

    /// Does nothing.
    pub fn noop() -> Self {
        Action::new(|_, _| Ok(()))
    }

    /// Applies templates to the node's children in the stylesheet's default mode.
    pub fn apply_templates() -> Self {
        Action::new(|cx, node| cx.apply_templates(node))
    }

    pub fn invoke(&self, cx: &mut TemplateContext<'_, '_, N>, node: N) -> Result<(), DispatchError> {
        (self.inner)(cx, node)
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&self.inner), Rc::as_ptr(&other.inner))
    }
}

impl<N: TreeNode> Clone for Action<N> {
    fn clone(&self) -> Self {
        Action {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<N: TreeNode> fmt::Debug for Action<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Action({:p})", Rc::as_ptr(&self.inner) as *const ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xmlrule_tree::XmlNode;

    #[test]
    fn test_identity_survives_clone() {
        let a: Action<XmlNode> = Action::noop();
        let b = a.clone();
        let c: Action<XmlNode> = Action::noop();
        assert!(a.ptr_eq(&b));
        assert!(!a.ptr_eq(&c));
    }
}
