//! End-to-end conversions through the public API.

use html_to_mdast_rs::hast::{Element, Node};
use html_to_mdast_rs::{
    Children, Context, ConversionOptions, HandlerTable, Handled, Matcher, ONE_LINE, Pattern, Result,
    WhitespaceMode, convert_html, default_handlers, mdast, to_mdast, to_mdast_with_options,
};
use pretty_assertions::assert_eq;
use serde_json::json;

fn paragraph(node: &Node, children: &mut Children<'_>, _: &Context) -> Result<Option<Handled>> {
    let nodes = children.nodes_with(node, &Context::new().with(ONE_LINE, true))?;
    Ok(Some(mdast::Node::parent("paragraph", nodes).into()))
}

fn preformatted(node: &Node, children: &mut Children<'_>, _: &Context) -> Result<Option<Handled>> {
    let nodes = children.nodes_with(node, &Context::new().with(ONE_LINE, false))?;
    Ok(Some(mdast::Node::literal("code", mdast::Node::root(nodes).to_plain_string()).into()))
}

fn build_table() -> HandlerTable {
    HandlerTable::new()
        .with(Pattern::tag("pre"), preformatted)
        .with(Pattern::tag("p").can_have_any_class(), paragraph)
        .with(Matcher::predicate(Node::is_element), |node: &Node, children: &mut Children<'_>, _: &Context| {
            Ok(Some(mdast::Node::parent("generic", children.nodes(node)?).into()))
        })
}

fn sample() -> Node {
    Node::root(vec![
        Node::from(
            Element::new("p")
                .with_class("intro")
                .with_children(vec![Node::text("one\ntwo")]),
        ),
        Node::element("pre", vec![Node::text("a\n  b")]),
        Node::element("aside", vec![Node::text("side")]),
    ])
}

#[test]
fn table_order_decides_precedence() {
    let mut tree = sample();
    let conversion = to_mdast(&mut tree, &build_table(), &Context::new()).unwrap();
    let kinds: Vec<_> = conversion.tree.children().iter().map(|node| node.kind.as_str()).collect();
    assert_eq!(kinds, vec!["paragraph", "code", "generic"]);
    assert!(conversion.unhandled.is_empty());
}

#[test]
fn context_overrides_do_not_leak_to_siblings() {
    let mut tree = sample();
    let conversion = to_mdast(&mut tree, &build_table(), &Context::new()).unwrap();
    let children = conversion.tree.children();
    assert_eq!(children[0].to_plain_string(), "one two");
    assert_eq!(children[1].value.as_deref(), Some("a\n  b"));
}

#[test]
fn equivalent_tables_give_identical_output() {
    let options = ConversionOptions::with_settings(Context::new().with("listDepth", 0));
    let mut first = sample();
    let mut second = sample();
    let a = to_mdast_with_options(&mut first, &build_table(), &options).unwrap();
    let b = to_mdast_with_options(&mut second, &build_table(), &options).unwrap();
    assert_eq!(a, b);
}

#[test]
fn strict_whitespace_mode_skips_minification() {
    let options = ConversionOptions {
        whitespace_mode: WhitespaceMode::Strict,
        ..ConversionOptions::default()
    };
    let mut tree = Node::root(vec![Node::element("span", vec![Node::text("  spaced  ")])]);
    let conversion = to_mdast_with_options(&mut tree, &HandlerTable::new(), &options).unwrap();
    assert_eq!(conversion.tree, mdast::Node::root(vec![mdast::Node::text("  spaced  ")]));
    assert_eq!(conversion.unhandled, vec!["span"]);
}

#[test]
fn html_document_with_default_handlers() {
    let html = r#"<!doctype html>
<html>
  <head><title>Ignored</title></head>
  <body>
    <h1 id="top">Release
      notes</h1>
    <p class="lead">Read the <a href="/docs" class="internal">docs</a> first.</p>
    <pre><code class="language-sh">cargo build
cargo test
</code></pre>
    <ul>
      <li>fast</li>
      <li><strong>safe</strong></li>
    </ul>
    <figure><img src="chart.png" alt="Chart"></figure>
  </body>
</html>"#;
    let conversion = convert_html(html, &default_handlers(), &ConversionOptions::default()).unwrap();
    let tree = serde_json::to_value(&conversion.tree).unwrap();

    assert_eq!(
        tree["children"][0],
        json!({"type": "heading", "depth": 1, "children": [{"type": "text", "value": "Release notes"}]})
    );
    assert_eq!(tree["children"][1]["children"][1]["url"], json!("/docs"));
    assert_eq!(
        tree["children"][2],
        json!({"type": "code", "lang": "sh", "value": "cargo build\ncargo test"})
    );
    assert_eq!(tree["children"][3]["type"], json!("list"));
    assert_eq!(tree["children"][3]["children"].as_array().unwrap().len(), 2);
    assert_eq!(tree["children"][4]["type"], json!("image"));
    assert_eq!(conversion.unhandled, vec!["figure"]);
}

#[test]
fn hast_json_input_round_trips_through_serde() {
    let json = r##"{
        "type": "root",
        "children": [
            {"type": "element", "tagName": "p", "properties": {}, "children": [
                {"type": "text", "value": "Hello "},
                {"type": "element", "tagName": "em", "properties": {}, "children": [{"type": "text", "value": "there"}]}
            ]}
        ]
    }"##;
    let mut tree: Node = serde_json::from_str(json).unwrap();
    let conversion = to_mdast(&mut tree, &default_handlers(), &Context::new()).unwrap();
    assert_eq!(
        serde_json::to_value(&conversion.tree).unwrap(),
        json!({
            "type": "root",
            "children": [{
                "type": "paragraph",
                "children": [
                    {"type": "text", "value": "Hello "},
                    {"type": "emphasis", "children": [{"type": "text", "value": "there"}]}
                ]
            }]
        })
    );
}

#[test]
fn inline_images_keep_surrounding_spaces() {
    let html = r#"<p>See <img src="x.png" alt="chart"> here</p><p>one<br>
   two</p>"#;
    let conversion = convert_html(html, &default_handlers(), &ConversionOptions::default()).unwrap();
    let tree = serde_json::to_value(&conversion.tree).unwrap();

    let first = &tree["children"][0]["children"];
    assert_eq!(first[0], json!({"type": "text", "value": "See "}));
    assert_eq!(first[1]["type"], json!("image"));
    assert_eq!(first[2], json!({"type": "text", "value": " here"}));

    let second = &tree["children"][1]["children"];
    assert_eq!(
        *second,
        json!([{"type": "text", "value": "one"}, {"type": "break"}, {"type": "text", "value": "two"}])
    );
}
