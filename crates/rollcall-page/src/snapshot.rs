use rollcall_core::error::{PageError, Result};
use rollcall_core::page::{Document, Element, ElementHandle};
use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

const SKIPPED_TAGS: &[&str] = &["script", "style", "noscript", "template", "head"];

const BLOCK_TAGS: &[&str] = &[
    "address",
    "article",
    "aside",
    "blockquote",
    "body",
    "dd",
    "details",
    "div",
    "dl",
    "dt",
    "fieldset",
    "figcaption",
    "figure",
    "footer",
    "form",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "header",
    "hr",
    "html",
    "li",
    "main",
    "nav",
    "ol",
    "p",
    "pre",
    "section",
    "summary",
    "table",
    "tbody",
    "td",
    "tfoot",
    "th",
    "thead",
    "tr",
    "ul",
];

pub fn check_selector(selector: &str) -> Result<()> {
    parse_selector(selector).map(|_| ())
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|err| PageError::InvalidSelector {
        selector: selector.to_string(),
        reason: err.to_string(),
    })
}

/// Handles are element positions in document order.
pub struct SnapshotDocument {
    label: String,
    html: Html,
    activated: Vec<ElementHandle>,
}

impl SnapshotDocument {
    pub fn parse(markup: &str) -> Self {
        Self::with_label("snapshot", markup)
    }

    pub fn with_label(label: impl Into<String>, markup: &str) -> Self {
        let html = Html::parse_document(markup);
        let label = label.into();
        debug!(label = %label, nodes = html.tree.nodes().count(), "parsed snapshot");
        Self {
            label,
            html,
            activated: Vec::new(),
        }
    }

    pub fn activated(&self) -> &[ElementHandle] {
        &self.activated
    }

    fn elements(&self) -> impl Iterator<Item = ElementRef<'_>> {
        self.html.root_element().descendants().filter_map(ElementRef::wrap)
    }
}

impl Document for SnapshotDocument {
    fn backend_name(&self) -> &str {
        &self.label
    }

    fn query_all(&mut self, selector: &str) -> Result<Vec<Element>> {
        let parsed = parse_selector(selector)?;

        let elements = self
            .elements()
            .enumerate()
            .filter(|(_, el)| parsed.matches(el))
            .map(|(index, el)| Element {
                handle: ElementHandle(index),
                text: el.text().collect(),
                title: el.value().attr("title").map(str::to_string),
            })
            .collect();
        Ok(elements)
    }

    fn visible_text(&mut self) -> Result<String> {
        let mut buffer = TextBuffer::default();
        collect_visible(self.html.root_element(), &mut buffer);
        Ok(buffer.finish())
    }

    fn activate(&mut self, element: &Element) -> Result<()> {
        if self.elements().nth(element.handle.0).is_none() {
            return Err(PageError::StaleHandle(element.handle.0));
        }
        self.activated.push(element.handle);
        Ok(())
    }

    fn is_static(&self) -> bool {
        true
    }
}

#[derive(Default)]
struct TextBuffer {
    lines: Vec<String>,
    current: String,
}

impl TextBuffer {
    fn push(&mut self, text: &str) {
        self.current.push_str(text);
    }

    fn break_line(&mut self) {
        let line = self.current.split_whitespace().collect::<Vec<_>>().join(" ");
        if !line.is_empty() {
            self.lines.push(line);
        }
        self.current.clear();
    }

    fn finish(mut self) -> String {
        self.break_line();
        self.lines.join("\n")
    }
}

fn collect_visible(element: ElementRef<'_>, buffer: &mut TextBuffer) {
    let value = element.value();
    let name = value.name();
    if SKIPPED_TAGS.contains(&name) || is_hidden(element) {
        return;
    }

    let block = BLOCK_TAGS.contains(&name);
    if block {
        buffer.break_line();
    }

    for child in element.children() {
        match child.value() {
            Node::Text(text) => buffer.push(text),
            Node::Element(el) if el.name() == "br" => buffer.break_line(),
            Node::Element(_) => {
                if let Some(child) = ElementRef::wrap(child) {
                    collect_visible(child, buffer);
                }
            }
            _ => {}
        }
    }

    if block {
        buffer.break_line();
    }
}

fn is_hidden(element: ElementRef<'_>) -> bool {
    let value = element.value();
    if value.attr("hidden").is_some() {
        return true;
    }
    value.attr("style").is_some_and(|style| {
        let compact: String = style
            .chars()
            .filter(|ch| !ch.is_whitespace())
            .collect::<String>()
            .to_ascii_lowercase();
        compact.split(';').any(|decl| decl == "display:none")
    })
}

#[cfg(test)]
mod tests {
    use super::{check_selector, SnapshotDocument};
    use rollcall_core::error::PageError;
    use rollcall_core::page::{Document, Element, ElementHandle};

    #[test]
    fn query_all_returns_document_order() {
        let mut doc = SnapshotDocument::parse(
            r#"<ul><li class="p">+1 555 0100</li><li class="p" title="+44 20">x</li></ul>"#,
        );
        let found = doc.query_all("li.p").expect("query");
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].text, "+1 555 0100");
        assert_eq!(found[1].title.as_deref(), Some("+44 20"));
        assert!(found[0].handle.0 < found[1].handle.0);
    }

    #[test]
    fn query_all_follows_document_order_for_foster_parented_content() {
        let mut doc = SnapshotDocument::parse(
            r#"<table><tr><td>+44 20 7946 0958</td></tr><span>+1 555 0100</span></table>"#,
        );
        let found = doc.query_all("td, span").expect("query");
        let texts: Vec<&str> = found.iter().map(|el| el.text.as_str()).collect();
        assert_eq!(texts, vec!["+1 555 0100", "+44 20 7946 0958"]);
        assert!(found[0].handle.0 < found[1].handle.0);
    }

    #[test]
    fn exists_checks_for_any_match() {
        let mut doc = SnapshotDocument::parse(r#"<div role="listitem">Alice</div>"#);
        assert!(doc.exists(r#"div[role="listitem"]"#).expect("exists"));
        assert!(!doc.exists("#missing").expect("exists"));
    }

    #[test]
    fn invalid_selector_is_reported() {
        let mut doc = SnapshotDocument::parse("<p>hi</p>");
        let err = doc.query_all("[[nope").unwrap_err();
        assert!(matches!(err, PageError::InvalidSelector { .. }));
        assert!(check_selector("[[nope").is_err());
        assert!(check_selector(r#"span[title*="+"]"#).is_ok());
    }

    #[test]
    fn visible_text_skips_hidden_and_scripts() {
        let mut doc = SnapshotDocument::parse(
            r#"<html><head><title>+99 999 999 999</title></head><body>
                <div>Alice   +1 555</div>
                <script>var n = "+7 000";</script>
                <div hidden>+2 222</div>
                <div style="display: none">+3 333</div>
                <p>one<br>two <span>three</span></p>
            </body></html>"#,
        );
        let text = doc.visible_text().expect("text");
        assert_eq!(text, "Alice +1 555\none\ntwo three");
    }

    #[test]
    fn activate_records_handle_and_rejects_unknown() {
        let mut doc = SnapshotDocument::parse(r#"<button id="b">info</button>"#);
        let button = doc.query_first("#b").expect("query").expect("button");
        doc.activate(&button).expect("activate");
        assert_eq!(doc.activated(), &[button.handle]);

        let bogus = Element {
            handle: ElementHandle(10_000),
            text: String::new(),
            title: None,
        };
        assert_eq!(doc.activate(&bogus), Err(PageError::StaleHandle(10_000)));
    }
}
