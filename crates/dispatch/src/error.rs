use thiserror::Error;
use xmlrule_select::SelectError;

#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Selection failed: {0}")]
    Select(#[from] SelectError),

    #[error("Template recursion exceeded the maximum depth of {limit}")]
    DepthExceeded { limit: usize },

    #[error("Output error: {0}")]
    Output(#[from] std::fmt::Error),

    #[error("Pattern parse error in '{0}': {1}")]
    PatternParse(String, String),

    /// A failure raised by a caller-supplied action, carried through unchanged.
    #[error(transparent)]
    Action(Box<dyn std::error::Error + Send + Sync>),
}

impl DispatchError {
    /// Wraps an action's own error (or message) so it can be returned from an action.
    pub fn action<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        DispatchError::Action(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_error_is_transparent() {
        let err = DispatchError::action("missing price");
        assert_eq!(err.to_string(), "missing price");

        let io = std::io::Error::other("disk full");
        let err = DispatchError::action(io);
        assert_eq!(err.to_string(), "disk full");
    }

    #[test]
    fn test_select_error_conversion() {
        let err: DispatchError = SelectError::Evaluation("bad axis".into()).into();
        assert!(matches!(err, DispatchError::Select(SelectError::Evaluation(_))));
    }
}
