use serde::{Deserialize, Serialize};

/// Controls how [`XmlWriter`](crate::XmlWriter) lays out its output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputFormat {
    /// Spaces per nesting level. `None` writes everything on one line.
    pub indent: Option<usize>,

    /// Whether a document starts with an `<?xml ...?>` declaration.
    pub xml_declaration: bool,

    /// The encoding named in the declaration. Output is always UTF-8.
    pub encoding: String,

    /// Leave the `encoding` pseudo-attribute out of the declaration.
    pub omit_encoding: bool,

    /// Start every element on its own line even without indentation.
    /// Indentation implies it.
    pub newlines: bool,

    /// Written for every line break, including those inside text.
    pub line_separator: String,

    /// Write `<a></a>` instead of `<a/>` for elements without content.
    pub expand_empty_elements: bool,

    /// Trim text nodes and drop the ones that are only whitespace.
    pub trim_text: bool,
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::compact()
    }
}

impl OutputFormat {
    /// Everything on one line, text untouched.
    pub fn compact() -> Self {
        Self {
            indent: None,
            xml_declaration: true,
            encoding: "UTF-8".to_string(),
            omit_encoding: false,
            newlines: false,
            line_separator: "\n".to_string(),
            expand_empty_elements: false,
            trim_text: false,
        }
    }

    /// Two-space indentation with whitespace-only text dropped.
    pub fn pretty() -> Self {
        Self {
            indent: Some(2),
            trim_text: true,
            ..Self::compact()
        }
    }
}
