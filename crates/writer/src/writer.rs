use crate::error::WriterError;
use crate::format::OutputFormat;
use quick_xml::Writer;
use quick_xml::escape::escape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesPI, BytesStart, BytesText, Event};
use std::io::{self, Write};
use xmlrule_tree::{NodeType, QName, TreeNode};

const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// Prefix bindings in scope, one frame per open element.
#[derive(Debug, Default)]
struct NamespaceStack {
    scopes: Vec<Vec<(String, String)>>,
}

impl NamespaceStack {
    fn push(&mut self) {
        self.scopes.push(Vec::new());
    }

    fn pop(&mut self) {
        self.scopes.pop();
    }

    fn declare(&mut self, prefix: &str, uri: &str) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.push((prefix.to_string(), uri.to_string()));
        }
    }

    /// The URI `prefix` is bound to. The empty prefix is the default namespace.
    fn resolve(&self, prefix: &str) -> Option<&str> {
        self.scopes
            .iter()
            .rev()
            .flat_map(|scope| scope.iter().rev())
            .find(|(p, _)| p == prefix)
            .map(|(_, uri)| uri.as_str())
    }

    /// A non-empty prefix currently bound to `uri`.
    fn prefix_for(&self, uri: &str) -> Option<String> {
        self.scopes
            .iter()
            .rev()
            .flat_map(|scope| scope.iter().rev())
            .filter(|(p, u)| !p.is_empty() && u == uri)
            .map(|(p, _)| p)
            .find(|p| self.resolve(p) == Some(uri))
            .cloned()
    }

    /// `xmlns` attributes for the bindings introduced by the innermost element.
    fn declarations(&self) -> Vec<(String, String)> {
        self.scopes
            .last()
            .map(|scope| {
                scope
                    .iter()
                    .map(|(prefix, uri)| {
                        let key = if prefix.is_empty() {
                            "xmlns".to_string()
                        } else {
                            format!("xmlns:{}", prefix)
                        };
                        (key, uri.clone())
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Rewrites every `\n` passing through as the configured line separator.
struct LineSeparated<W: Write> {
    inner: W,
    separator: Vec<u8>,
}

impl<W: Write> Write for LineSeparated<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_all(buf)?;
        Ok(buf.len())
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        if self.separator == b"\n" {
            return self.inner.write_all(buf);
        }
        let mut lines = buf.split(|b| *b == b'\n');
        if let Some(first) = lines.next() {
            self.inner.write_all(first)?;
        }
        for line in lines {
            self.inner.write_all(&self.separator)?;
            self.inner.write_all(line)?;
        }
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Writes nodes as XML to an [`std::io::Write`] sink.
///
/// Namespace declarations are emitted on the first element that needs a
/// binding not already in scope, so a subtree serialized on its own still
/// carries the declarations it uses.
pub struct XmlWriter<W: Write> {
    writer: Writer<LineSeparated<W>>,
    format: OutputFormat,
    namespaces: NamespaceStack,
    generated_prefixes: usize,
}

impl<W: Write> XmlWriter<W> {
    pub fn new(inner: W, format: OutputFormat) -> Self {
        let inner = LineSeparated {
            inner,
            separator: format.line_separator.clone().into_bytes(),
        };
        let writer = match (format.indent, format.newlines) {
            (Some(size), _) => Writer::new_with_indent(inner, b' ', size),
            (None, true) => Writer::new_with_indent(inner, b' ', 0),
            (None, false) => Writer::new(inner),
        };
        XmlWriter {
            writer,
            format,
            namespaces: NamespaceStack::default(),
            generated_prefixes: 0,
        }
    }

    pub fn format(&self) -> &OutputFormat {
        &self.format
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner().inner
    }

    pub fn write_declaration(&mut self) -> Result<(), WriterError> {
        let encoding = (!self.format.omit_encoding).then_some(self.format.encoding.as_str());
        let decl = BytesDecl::new("1.0", encoding, None);
        self.writer.write_event(Event::Decl(decl))?;
        // An indenting writer breaks the line before the next element itself.
        if self.format.indent.is_none() && !self.format.newlines {
            self.writer.get_mut().write_all(b"\n")?;
        }
        Ok(())
    }

    /// Writes `node` and everything below it. A document gets the XML
    /// declaration if the format asks for one; a lone attribute is written as
    /// `name="value"`.
    pub fn write_node<N: TreeNode>(&mut self, node: N) -> Result<(), WriterError> {
        match node.node_type() {
            NodeType::Document => {
                if self.format.xml_declaration {
                    self.write_declaration()?;
                }
                for child in node.children() {
                    self.write_node(child)?;
                }
            }
            NodeType::Element => self.write_element(node)?,
            NodeType::Attribute => self.write_attribute(node)?,
            NodeType::Text => {
                if let Some(text) = self.text_content(node) {
                    self.writer.write_event(Event::Text(BytesText::new(&text)))?;
                }
            }
            NodeType::Comment => {
                let text = node.string_value();
                self.writer
                    .write_event(Event::Comment(BytesText::from_escaped(text.as_str())))?;
            }
            NodeType::ProcessingInstruction => {
                let target = node.local_name().to_string();
                let value = node.string_value();
                let content = if value.is_empty() {
                    target
                } else {
                    format!("{} {}", target, value)
                };
                self.writer.write_event(Event::PI(BytesPI::new(content)))?;
            }
        }
        Ok(())
    }

    fn write_element<N: TreeNode>(&mut self, node: N) -> Result<(), WriterError> {
        let Some(name) = node.name() else {
            log::warn!("Skipping element without a name");
            return Ok(());
        };

        self.namespaces.push();
        let element_name = self.element_name(&name);

        let mut attributes = Vec::new();
        for attr in node.attributes() {
            if let Some(attr_name) = attr.name() {
                let key = self.attribute_name(&attr_name);
                attributes.push((key, attr.string_value()));
            }
        }

        let mut start = BytesStart::new(element_name.as_str());
        for (key, value) in self.namespaces.declarations().iter().chain(attributes.iter()) {
            start.push_attribute((key.as_str(), value.as_str()));
        }

        let children: Vec<N> = node
            .children()
            .filter(|child| child.node_type() != NodeType::Text || self.text_content(*child).is_some())
            .collect();

        if children.is_empty() && !self.format.expand_empty_elements {
            self.writer.write_event(Event::Empty(start))?;
        } else {
            self.writer.write_event(Event::Start(start))?;
            for child in children {
                self.write_node(child)?;
            }
            self.writer
                .write_event(Event::End(BytesEnd::new(element_name.as_str())))?;
        }

        self.namespaces.pop();
        Ok(())
    }

    fn write_attribute<N: TreeNode>(&mut self, node: N) -> Result<(), WriterError> {
        let name = node
            .name()
            .map(|q| q.qualified())
            .unwrap_or_default();
        let value = node.string_value();
        write!(self.writer.get_mut(), "{}=\"{}\"", name, escape(value.as_str()))?;
        Ok(())
    }

    fn text_content<N: TreeNode>(&self, node: N) -> Option<String> {
        let text = node.string_value();
        if !self.format.trim_text {
            return Some(text);
        }
        let trimmed = text.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }

    /// The element's name as written, declaring its namespace if needed.
    fn element_name(&mut self, name: &QName<'_>) -> String {
        match name.namespace {
            Some(uri) => {
                let prefix = name.prefix.unwrap_or("");
                if self.namespaces.resolve(prefix) != Some(uri) {
                    self.namespaces.declare(prefix, uri);
                }
                name.qualified()
            }
            None => {
                // Undeclare an inherited default namespace.
                if self.namespaces.resolve("").is_some_and(|uri| !uri.is_empty()) {
                    self.namespaces.declare("", "");
                }
                name.local_part.to_string()
            }
        }
    }

    /// The attribute's name as written. Namespaced attributes always need a
    /// prefix; one is generated when the source has none that can be used.
    fn attribute_name(&mut self, name: &QName<'_>) -> String {
        let local = name.local_part;
        let Some(uri) = name.namespace else {
            return local.to_string();
        };
        if uri == XML_NAMESPACE {
            return format!("xml:{}", local);
        }

        if let Some(prefix) = name.prefix.filter(|p| !p.is_empty()) {
            match self.namespaces.resolve(prefix) {
                Some(bound) if bound == uri => return format!("{}:{}", prefix, local),
                None => {
                    self.namespaces.declare(prefix, uri);
                    return format!("{}:{}", prefix, local);
                }
                Some(_) => {}
            }
        }

        if let Some(prefix) = self.namespaces.prefix_for(uri) {
            return format!("{}:{}", prefix, local);
        }

        let prefix = loop {
            self.generated_prefixes += 1;
            let candidate = format!("ns{}", self.generated_prefixes);
            if self.namespaces.resolve(&candidate).is_none() {
                break candidate;
            }
        };
        log::debug!("Generated prefix '{}' for namespace '{}'", prefix, uri);
        self.namespaces.declare(&prefix, uri);
        format!("{}:{}", prefix, local)
    }
}

/// Serializes `node` into a string.
pub fn to_string<N: TreeNode>(node: N, format: &OutputFormat) -> Result<String, WriterError> {
    let mut writer = XmlWriter::new(Vec::new(), format.clone());
    writer.write_node(node)?;
    Ok(String::from_utf8(writer.into_inner())?)
}
