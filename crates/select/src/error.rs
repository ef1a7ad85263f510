use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SelectError {
    #[error("Selection parse error in '{expression}': {message}")]
    Parse { expression: String, message: String },

    #[error("Selection evaluation error: {0}")]
    Evaluation(String),
}
