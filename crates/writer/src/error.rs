use thiserror::Error;

#[derive(Error, Debug)]
pub enum WriterError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML writer error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Serialized output is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}
