//! An XML toolkit built around template-style rule dispatch.
//!
//! - [`tree`]: the read-only tree contract and a roxmltree-backed document.
//! - [`select`]: compiled location paths for picking nodes.
//! - [`dispatch`]: patterns, rules, modes and stylesheets.
//! - [`writer`]: serialization back to markup.
//!
//! The [`commands`] module wires them together for the `xmlrule` binary.
pub mod commands;
pub mod error;

pub use error::Error;

pub use xmlrule_dispatch as dispatch;
pub use xmlrule_select as select;
pub use xmlrule_tree as tree;
pub use xmlrule_writer as writer;

pub use xmlrule_dispatch::{
    Action, DispatchConfig, DispatchError, Mode, Namespaces, Pattern, Rule, RuleManager, Stylesheet,
    TemplateContext,
};
pub use xmlrule_select::{Path, Select, SelectError, SelectFn};
pub use xmlrule_tree::{NodeType, QName, TreeNode, XmlDocument, XmlNode};
pub use xmlrule_writer::{OutputFormat, WriterError, XmlWriter};
