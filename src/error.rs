use thiserror::Error;
use xmlrule_dispatch::DispatchError;
use xmlrule_select::SelectError;
use xmlrule_tree::ParseError;
use xmlrule_writer::WriterError;

/// Every failure the toolkit's commands can report.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to parse XML: {0}")]
    Parse(#[from] ParseError),

    #[error("Dispatch failed: {0}")]
    Dispatch(#[from] DispatchError),

    #[error("Invalid selection: {0}")]
    Select(#[from] SelectError),

    #[error("Serialization failed: {0}")]
    Writer(#[from] WriterError),

    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
