//! Compiled location-path selection over any [`xmlrule_tree::TreeNode`] tree.
//!
//! This is a path subset (axes, node tests, positional predicates and unions),
//! not a general expression language. The [`Select`] trait is the seam through
//! which the dispatch engine consumes node sequences, so a full evaluator can be
//! plugged in with [`SelectFn`].

pub mod ast;
pub mod axes;
pub mod engine;
pub mod error;
pub mod parser;

pub use ast::{Axis, LocationPath, NodeTest, NodeTypeTest, PathExpr, Predicate, Step};
pub use engine::{Path, Select, SelectFn};
pub use error::SelectError;
pub use parser::parse_path;
