use serde::{Deserialize, Serialize};

/// Settings for a [`Stylesheet`](crate::Stylesheet).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// The deepest chain of nested rule firings allowed before dispatch fails
    /// with [`DepthExceeded`](crate::DispatchError::DepthExceeded).
    ///
    /// Every rule fired from inside another rule's action adds one level,
    /// whether it was reached through `apply_templates` or `run`.
    ///
    /// Defaults to `256`.
    pub max_depth: usize,

    /// The mode used when a call does not name one. `None` is the default mode.
    pub mode: Option<String>,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            max_depth: 256,
            mode: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_from_json() {
        let config: DispatchConfig = serde_json::from_str(r#"{ "mode": "toc" }"#).unwrap();
        assert_eq!(config.mode.as_deref(), Some("toc"));
        assert_eq!(config.max_depth, 256);

        let config: DispatchConfig = serde_json::from_str(r#"{ "max_depth": 8 }"#).unwrap();
        assert_eq!(config.max_depth, 8);
        assert_eq!(config.mode, None);
    }
}
