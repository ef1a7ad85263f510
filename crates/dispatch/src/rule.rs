use crate::action::Action;
use crate::pattern::Pattern;
use std::fmt;
use std::rc::Rc;
use xmlrule_tree::TreeNode;

struct RuleInner<N: TreeNode> {
    pattern: Pattern,
    action: Action<N>,
    priority: f64,
}

/// A pattern bound to an action, with a fixed effective priority.
///
/// A `Rule` is a shared handle: clones refer to the same registration, and two
/// rules built from equal patterns are still distinct.
pub struct Rule<N: TreeNode> {
    inner: Rc<RuleInner<N>>,
}

impl<N: TreeNode> Rule<N> {
    /// A rule whose priority is the pattern's own.
    pub fn new(pattern: Pattern, action: Action<N>) -> Self {
        let priority = pattern.priority();
        Rule::with_priority(pattern, action, priority)
    }

    /// A rule with an explicit priority, regardless of the pattern's. A NaN
    /// priority ranks below every other rule.
    pub fn with_priority(pattern: Pattern, action: Action<N>, priority: f64) -> Self {
        Rule {
            inner: Rc::new(RuleInner {
                pattern,
                action,
                priority,
            }),
        }
    }

    pub fn pattern(&self) -> &Pattern {
        &self.inner.pattern
    }

    pub fn action(&self) -> &Action<N> {
        &self.inner.action
    }

    pub fn priority(&self) -> f64 {
        self.inner.priority
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<N: TreeNode> Clone for Rule<N> {
    fn clone(&self) -> Self {
        Rule {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<N: TreeNode> fmt::Debug for Rule<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("pattern", &self.inner.pattern.text())
            .field("priority", &self.inner.priority)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xmlrule_tree::XmlNode;

    #[test]
    fn test_priority_defaults_to_pattern() {
        let rule: Rule<XmlNode> = Rule::new(Pattern::parse("*").unwrap(), Action::noop());
        assert_eq!(rule.priority(), -0.5);

        let explicit = Pattern::element("item").with_priority(2.0);
        let rule: Rule<XmlNode> = Rule::new(explicit, Action::noop());
        assert_eq!(rule.priority(), 2.0);

        let rule: Rule<XmlNode> = Rule::with_priority(Pattern::element("item"), Action::noop(), -1.0);
        assert_eq!(rule.priority(), -1.0);
    }

    #[test]
    fn test_identity_is_by_reference() {
        let action: Action<XmlNode> = Action::noop();
        let a = Rule::new(Pattern::element("item"), action.clone());
        let b = Rule::new(Pattern::element("item"), action);
        assert!(a.ptr_eq(&a.clone()));
        assert!(!a.ptr_eq(&b));
        assert!(a.action().ptr_eq(b.action()));
    }
}
