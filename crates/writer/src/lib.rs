//! Serializes any [`TreeNode`](xmlrule_tree::TreeNode) tree back to markup.
pub mod error;
pub mod format;
pub mod writer;

pub use error::WriterError;
pub use format::OutputFormat;
pub use writer::{XmlWriter, to_string};
