use xmlrule_tree::{TreeNode, XmlDocument};
use xmlrule_writer::{OutputFormat, XmlWriter, to_string};

fn compact() -> OutputFormat {
    OutputFormat {
        xml_declaration: false,
        ..OutputFormat::compact()
    }
}

#[test]
fn test_element_round_trip() {
    let xml = r#"<root a="1"><b>x &amp; y &lt; z</b><c/></root>"#;
    let doc = XmlDocument::parse(xml).unwrap();
    assert_eq!(to_string(doc.document_element(), &compact()).unwrap(), xml);
}

#[test]
fn test_document_gets_declaration() {
    let doc = XmlDocument::parse("<root/>").unwrap();
    let out = to_string(doc.root_node(), &OutputFormat::compact()).unwrap();
    assert_eq!(out, "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<root/>");

    // Elements never get one, even when the format asks for it.
    let out = to_string(doc.document_element(), &OutputFormat::compact()).unwrap();
    assert_eq!(out, "<root/>");
}

#[test]
fn test_namespace_declared_once_per_scope() {
    let xml = r#"<x:root xmlns:x="urn:x"><x:child/><y:other xmlns:y="urn:y"><y:inner/></y:other></x:root>"#;
    let doc = XmlDocument::parse(xml).unwrap();
    assert_eq!(to_string(doc.document_element(), &compact()).unwrap(), xml);
}

#[test]
fn test_default_namespace() {
    let xml = r#"<root xmlns="urn:d"><child/></root>"#;
    let doc = XmlDocument::parse(xml).unwrap();
    assert_eq!(to_string(doc.document_element(), &compact()).unwrap(), xml);
}

#[test]
fn test_subtree_carries_its_declarations() {
    let doc = XmlDocument::parse(r#"<x:root xmlns:x="urn:x"><x:child>t</x:child></x:root>"#).unwrap();
    let child = doc.document_element().children().next().unwrap();
    assert_eq!(
        to_string(child, &compact()).unwrap(),
        r#"<x:child xmlns:x="urn:x">t</x:child>"#
    );
}

#[test]
fn test_namespaced_attribute_declares_prefix() {
    let doc = XmlDocument::parse(r#"<root xmlns:x="urn:x" x:flag="on" xml:lang="en"/>"#).unwrap();
    assert_eq!(
        to_string(doc.document_element(), &compact()).unwrap(),
        r#"<root xmlns:x="urn:x" x:flag="on" xml:lang="en"/>"#
    );
}

#[test]
fn test_comments_and_processing_instructions() {
    let xml = "<r><!-- note --><?render fast?><?bare?></r>";
    let doc = XmlDocument::parse(xml).unwrap();
    assert_eq!(to_string(doc.document_element(), &compact()).unwrap(), xml);
}

#[test]
fn test_expand_empty_elements() {
    let doc = XmlDocument::parse("<r><c/></r>").unwrap();
    let format = OutputFormat {
        expand_empty_elements: true,
        ..compact()
    };
    assert_eq!(
        to_string(doc.document_element(), &format).unwrap(),
        "<r><c></c></r>"
    );
}

#[test]
fn test_pretty_printing() {
    let doc = XmlDocument::parse("<root>\n  <a>text</a>\n  <b><c/></b>\n</root>").unwrap();
    let out = to_string(doc.root_node(), &OutputFormat::pretty()).unwrap();
    assert_eq!(
        out,
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<root>\n  <a>text</a>\n  <b>\n    <c/>\n  </b>\n</root>"
    );
}

#[test]
fn test_declaration_without_encoding() {
    let doc = XmlDocument::parse("<root/>").unwrap();
    let format = OutputFormat {
        omit_encoding: true,
        ..OutputFormat::compact()
    };
    assert_eq!(
        to_string(doc.root_node(), &format).unwrap(),
        "<?xml version=\"1.0\"?>\n<root/>"
    );
}

#[test]
fn test_newlines_without_indent() {
    let doc = XmlDocument::parse("<r><a/><b>t</b></r>").unwrap();
    let format = OutputFormat {
        newlines: true,
        ..compact()
    };
    assert_eq!(
        to_string(doc.document_element(), &format).unwrap(),
        "<r>\n<a/>\n<b>t</b>\n</r>"
    );
}

#[test]
fn test_custom_line_separator() {
    let doc = XmlDocument::parse("<r><a/></r>").unwrap();
    let format = OutputFormat {
        line_separator: "\r\n".to_string(),
        ..OutputFormat::pretty()
    };
    assert_eq!(
        to_string(doc.root_node(), &format).unwrap(),
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\r\n<r>\r\n  <a/>\r\n</r>"
    );
}

#[test]
fn test_lone_attribute_and_text() {
    let doc = XmlDocument::parse(r#"<r id="a&amp;b">1 &lt; 2</r>"#).unwrap();
    let root = doc.document_element();
    assert_eq!(
        to_string(root.attribute("id").unwrap(), &compact()).unwrap(),
        r#"id="a&amp;b""#
    );
    let text = root.children().next().unwrap();
    assert_eq!(to_string(text, &compact()).unwrap(), "1 &lt; 2");
}

#[test]
fn test_writer_reused_for_several_nodes() {
    let doc = XmlDocument::parse("<r><a/><b/></r>").unwrap();
    let mut writer = XmlWriter::new(Vec::new(), compact());
    for child in doc.document_element().children() {
        writer.write_node(child).unwrap();
    }
    assert_eq!(String::from_utf8(writer.into_inner()).unwrap(), "<a/><b/>");
}

#[test]
fn test_format_from_json() {
    let format: OutputFormat = serde_json::from_str(r#"{ "indent": 4 }"#).unwrap();
    assert_eq!(format.indent, Some(4));
    assert!(format.xml_declaration);
    assert_eq!(format.encoding, "UTF-8");
    assert_eq!(format.line_separator, "\n");

    let format: OutputFormat =
        serde_json::from_str(r#"{ "omit_encoding": true, "newlines": true, "line_separator": "\r\n" }"#).unwrap();
    assert!(format.omit_encoding && format.newlines);
    assert_eq!(format.line_separator, "\r\n");
}
