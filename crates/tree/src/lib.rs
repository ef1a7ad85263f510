//! The read-only tree model shared by the xmlrule crates.
//!
//! Selection, dispatch and serialization are written exclusively against
//! [`TreeNode`], so any tree exposing that contract can be used. [`XmlDocument`]
//! provides one backed by roxmltree.

pub mod node;
pub mod xml;

pub use node::{NodeType, QName, TreeNode};
pub use xml::{XmlDocument, XmlNode};

/// Re-exported so callers can match on parse failures without a direct dependency.
pub use roxmltree::Error as ParseError;
