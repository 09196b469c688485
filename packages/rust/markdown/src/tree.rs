//! Display tree built from translated summary markup.

use scraper::{ElementRef, Html, Node};
use serde::Serialize;

/// One node of the structural markup handed to a rendering surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "children", rename_all = "snake_case")]
pub enum MarkupNode {
    Text(String),
    Strong(Vec<MarkupNode>),
    Emphasis(Vec<MarkupNode>),
    Heading(Vec<MarkupNode>),
    List(List),
    LineBreak,
}

/// An ordered or unordered list; each item is a sequence of nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct List {
    pub ordered: bool,
    pub items: Vec<Vec<MarkupNode>>,
}

/// Parse translated markup into a node tree.
///
/// Unknown elements are flattened into their children. Adjacent text is
/// merged.
pub fn parse_markup(markup: &str) -> Vec<MarkupNode> {
    let fragment = Html::parse_fragment(markup);
    collect_children(fragment.root_element())
}

fn collect_children(parent: ElementRef<'_>) -> Vec<MarkupNode> {
    let mut nodes = Vec::new();
    for child in parent.children() {
        match child.value() {
            Node::Text(text) => push_text(&mut nodes, text),
            Node::Element(_) => {
                if let Some(el) = ElementRef::wrap(child) {
                    convert_element(el, &mut nodes);
                }
            }
            _ => {}
        }
    }
    nodes
}

fn convert_element(el: ElementRef<'_>, nodes: &mut Vec<MarkupNode>) {
    match el.value().name() {
        "strong" | "b" => nodes.push(MarkupNode::Strong(collect_children(el))),
        "em" | "i" => nodes.push(MarkupNode::Emphasis(collect_children(el))),
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
            nodes.push(MarkupNode::Heading(collect_children(el)))
        }
        "br" => nodes.push(MarkupNode::LineBreak),
        name @ ("ul" | "ol") => {
            let items = el
                .children()
                .filter_map(ElementRef::wrap)
                .filter(|child| child.value().name() == "li")
                .map(collect_children)
                .collect();
            nodes.push(MarkupNode::List(List {
                ordered: name == "ol",
                items,
            }));
        }
        _ => {
            for node in collect_children(el) {
                match node {
                    MarkupNode::Text(text) => push_text(nodes, &text),
                    other => nodes.push(other),
                }
            }
        }
    }
}

fn push_text(nodes: &mut Vec<MarkupNode>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(MarkupNode::Text(last)) = nodes.last_mut() {
        last.push_str(text);
    } else {
        nodes.push(MarkupNode::Text(text.to_string()));
    }
}

/// Render a node tree as plain text for terminals.
///
/// Headings get their own line, list items are prefixed with `- ` or `N. `.
pub fn render_plain(nodes: &[MarkupNode]) -> String {
    let mut out = String::new();
    write_plain(nodes, &mut out);
    out
}

fn write_plain(nodes: &[MarkupNode], out: &mut String) {
    for node in nodes {
        match node {
            MarkupNode::Text(text) => out.push_str(text),
            MarkupNode::Strong(children) | MarkupNode::Emphasis(children) => {
                write_plain(children, out)
            }
            MarkupNode::Heading(children) => {
                start_line(out);
                write_plain(children, out);
                out.push('\n');
            }
            MarkupNode::List(list) => {
                start_line(out);
                for (i, item) in list.items.iter().enumerate() {
                    if list.ordered {
                        out.push_str(&format!("{}. ", i + 1));
                    } else {
                        out.push_str("- ");
                    }
                    write_plain(item, out);
                    out.push('\n');
                }
            }
            MarkupNode::LineBreak => out.push('\n'),
        }
    }
}

fn start_line(out: &mut String) {
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
}
