//! Depth-first text node walk.
//!
//! Used for the lesson body, each auxiliary panel, and every embedded frame
//! body.

use scraper::ElementRef;

/// Default acceptance test: the text has something besides whitespace.
pub fn non_empty(text: &str) -> bool {
    !text.trim().is_empty()
}

/// Lazily yield the trimmed text of every accepted text node under `root`,
/// in document order.
///
/// Rejected nodes never reach the caller. The iterator borrows the document
/// and can be recreated at will; each call walks from the start.
pub fn text_nodes<'a, F>(root: ElementRef<'a>, accept: F) -> impl Iterator<Item = &'a str>
where
    F: Fn(&str) -> bool + 'a,
{
    root.descendants()
        .filter_map(|node| node.value().as_text())
        .map(|text| &**text)
        .filter(move |text| accept(*text))
        .map(str::trim)
}

/// Walk `root` with [`non_empty`] and join the results with newlines.
pub fn collect_text(root: ElementRef<'_>) -> String {
    text_nodes(root, non_empty).collect::<Vec<_>>().join("\n")
}

/// Element `textContent`, trimmed.
pub(crate) fn text_content(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    fn first<'a>(doc: &'a Html, sel: &str) -> ElementRef<'a> {
        let sel = Selector::parse(sel).unwrap();
        doc.select(&sel).next().unwrap()
    }

    #[test]
    fn walks_in_document_order_and_trims() {
        let doc = Html::parse_fragment(
            "<div id=\"r\"><h2> Title </h2><p>One <b>two</b>\n</p>   <p>three</p></div>",
        );
        let root = first(&doc, "#r");
        let texts: Vec<&str> = text_nodes(root, non_empty).collect();
        assert_eq!(texts, ["Title", "One", "two", "three"]);
    }

    #[test]
    fn custom_predicate_filters_nodes() {
        let doc = Html::parse_fragment("<div id=\"r\"><p>keep me</p><p>drop</p><p>keep too</p></div>");
        let root = first(&doc, "#r");
        let texts: Vec<&str> = text_nodes(root, |t| t.contains("keep")).collect();
        assert_eq!(texts, ["keep me", "keep too"]);
    }

    #[test]
    fn walk_is_restartable() {
        let doc = Html::parse_fragment("<div id=\"r\"><p>a</p><p>b</p></div>");
        let root = first(&doc, "#r");
        assert_eq!(collect_text(root), "a\nb");
        assert_eq!(collect_text(root), "a\nb");
    }

    #[test]
    fn whitespace_only_tree_collects_nothing() {
        let doc = Html::parse_fragment("<div id=\"r\">  <p> \n </p>\t</div>");
        assert_eq!(collect_text(first(&doc, "#r")), "");
    }

    #[test]
    fn text_content_joins_descendants() {
        let doc = Html::parse_fragment("<div id=\"r\">  An <em>intro</em> course  </div>");
        assert_eq!(text_content(first(&doc, "#r")), "An intro course");
    }
}
