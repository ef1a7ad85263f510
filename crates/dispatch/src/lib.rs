//! Template-style rule dispatch over any [`TreeNode`] tree.
//!
//! A [`Stylesheet`] holds [`Rule`]s grouped into named [`Mode`]s. Running it
//! on a node picks the best matching rule (highest priority, later
//! registration on ties) and invokes its [`Action`]. Actions decide whether
//! and where to recurse through the [`TemplateContext`] they receive; nodes no
//! rule matches fall back to built-in rules that walk containers and emit the
//! text of leaves.
pub mod action;
pub mod config;
pub mod context;
pub mod error;
pub mod manager;
pub mod mode;
pub mod pattern;
pub mod rule;
pub mod stylesheet;

pub use action::Action;
pub use config::DispatchConfig;
pub use context::TemplateContext;
pub use error::DispatchError;
pub use manager::RuleManager;
pub use mode::Mode;
pub use pattern::{Namespaces, Pattern, PatternTest, parse_union};
pub use rule::Rule;
pub use stylesheet::Stylesheet;
pub use xmlrule_tree::TreeNode;
