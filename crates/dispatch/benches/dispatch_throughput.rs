use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::fmt::Write;
use std::hint::black_box;
use xmlrule_dispatch::{Action, Pattern, Rule, Stylesheet, TreeNode};
use xmlrule_tree::{XmlDocument, XmlNode};

fn generate_catalog_xml(count: usize) -> String {
    let mut xml = String::from("<catalog>");
    for i in 0..count {
        let category = match i % 3 {
            0 => "A",
            1 => "B",
            _ => "C",
        };
        xml.push_str(&format!(
            r#"<item category="{}"><name>Item {}</name><price>{}</price><note>n</note></item>"#,
            category,
            i,
            i * 10
        ));
    }
    xml.push_str("</catalog>");
    xml
}

fn labelled<N: TreeNode>(label: &'static str) -> Action<N> {
    Action::new(move |cx, node: N| {
        write!(cx, "<{}>", label)?;
        cx.apply_templates(node)?;
        write!(cx, "</{}>", label)?;
        Ok(())
    })
}

/// Registers `extra` name rules that never match, to show dispatch cost does
/// not grow with the number of unrelated rules.
fn build_stylesheet<'a, 'i>(extra: usize) -> Stylesheet<XmlNode<'a, 'i>> {
    let mut stylesheet = Stylesheet::new();
    stylesheet.add_rule(Rule::new(Pattern::element("item"), labelled("row")));
    stylesheet.add_rule(Rule::new(Pattern::element("name"), labelled("cell")));
    stylesheet.add_rule(Rule::new(Pattern::parse("*").unwrap(), Action::apply_templates()));
    for i in 0..extra {
        stylesheet.add_rule(Rule::new(Pattern::element(format!("unused{}", i)), Action::noop()));
    }
    stylesheet
}

fn benchmark_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch");

    for count in [100, 1000] {
        let xml = generate_catalog_xml(count);
        let doc = XmlDocument::parse(&xml).unwrap();
        let stylesheet = build_stylesheet(0);
        group.bench_with_input(BenchmarkId::new("items", count), &count, |b, _| {
            b.iter(|| black_box(stylesheet.run_to_string(doc.root_node()).unwrap()))
        });
    }

    let xml = generate_catalog_xml(1000);
    let doc = XmlDocument::parse(&xml).unwrap();
    for extra in [0, 100, 1000] {
        let stylesheet = build_stylesheet(extra);
        group.bench_with_input(BenchmarkId::new("unrelated_rules", extra), &extra, |b, _| {
            b.iter(|| black_box(stylesheet.run_to_string(doc.root_node()).unwrap()))
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_dispatch);
criterion_main!(benches);
