//! The operations behind the `xmlrule` subcommands, usable as a library too.
use crate::error::Error;
use std::fmt::Write;
use xmlrule_dispatch::{Action, DispatchConfig, Pattern, Rule, Stylesheet};
use xmlrule_select::Path;
use xmlrule_tree::{TreeNode, XmlDocument};
use xmlrule_writer::{OutputFormat, to_string};

/// Parses a [`DispatchConfig`] from JSON. Missing fields keep their defaults.
pub fn load_config(json: &str) -> Result<DispatchConfig, Error> {
    Ok(serde_json::from_str(json)?)
}

/// The text content of the document, produced by the built-in rules alone.
pub fn text(xml: &str, config: DispatchConfig) -> Result<String, Error> {
    let doc = XmlDocument::parse(xml)?;
    let stylesheet = Stylesheet::with_config(config);
    Ok(stylesheet.run_to_string(doc.root_node())?)
}

/// One line per element, indented by nesting depth, optionally listing
/// attributes. Text is suppressed.
pub fn outline(xml: &str, attributes: bool, config: DispatchConfig) -> Result<String, Error> {
    let doc = XmlDocument::parse(xml)?;
    let mut stylesheet = Stylesheet::with_config(config);
    stylesheet.set_default_leaf_action(Action::noop());
    let mode = stylesheet.mode_name().to_string();
    stylesheet.add_rule_in(&mode, Rule::new(Pattern::parse("*")?, outline_entry(attributes)));
    log::debug!("Outlining document (attributes: {})", attributes);
    let mut out = String::new();
    stylesheet.apply_templates(doc.root_node(), &mut out)?;
    Ok(out)
}

fn outline_entry<N: TreeNode>(attributes: bool) -> Action<N> {
    Action::new(move |cx, node: N| {
        let indent = cx.depth().saturating_sub(1) * 2;
        let name = node.name().map(|q| q.qualified()).unwrap_or_default();
        write!(cx, "{:indent$}{}", "", name, indent = indent)?;
        if attributes {
            for attr in node.attributes() {
                let attr_name = attr.name().map(|q| q.qualified()).unwrap_or_default();
                write!(cx, " @{}={:?}", attr_name, attr.string_value())?;
            }
        }
        writeln!(cx)?;
        cx.apply_templates(node)
    })
}

/// Serializes every node `path` selects from the document node, one per line.
pub fn select(xml: &str, path: &str) -> Result<String, Error> {
    let doc = XmlDocument::parse(xml)?;
    let path = Path::parse(path)?;
    let format = OutputFormat {
        xml_declaration: false,
        ..OutputFormat::compact()
    };

    let mut out = String::new();
    for node in path.evaluate(doc.root_node()) {
        out.push_str(&to_string(node, &format)?);
        out.push('\n');
    }
    Ok(out)
}

/// Re-serializes the whole document.
pub fn format(xml: &str, format: &OutputFormat) -> Result<String, Error> {
    let doc = XmlDocument::parse(xml)?;
    Ok(to_string(doc.root_node(), format)?)
}
