//! Site-agnostic HTML → text extraction.

use lazy_static::lazy_static;
use scraper::{Html, Selector};
use serde::Serialize;

lazy_static! {
    static ref TITLE: Selector = Selector::parse("title").unwrap();
    static ref BLOCKS: Selector = Selector::parse("p, li").unwrap();
}

/// A fetched document reduced to what the pipelines match against.
///
/// Transient: built per candidate link, discarded after filtering.
#[derive(Debug, Clone, Serialize)]
pub struct Page {
    /// Source URL.
    pub url: String,

    /// `<title>` text, or the URL when the page has no title.
    pub title: String,

    /// Whitespace-joined text of the whole document, lowercased for
    /// substring matching.
    pub text: String,
}

impl Page {
    /// Extract title and plain text from raw HTML.
    pub fn from_html(url: &str, html: &str) -> Self {
        let document = Html::parse_document(html);

        let title = document
            .select(&TITLE)
            .next()
            .map(|el| join_text(el.text()))
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| url.to_string());

        let text = join_text(document.root_element().text()).to_lowercase();

        Self {
            url: url.to_string(),
            title,
            text,
        }
    }
}

/// Original-case text of every paragraph and list item, one string per
/// element. Input for the tip-sentence heuristics.
pub fn block_texts(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    document
        .select(&BLOCKS)
        .map(|el| join_text(el.text()))
        .filter(|t| !t.is_empty())
        .collect()
}

fn join_text<'a>(parts: impl Iterator<Item = &'a str>) -> String {
    parts
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_title_and_lowercased_text() {
        let html = "<html><head><title> Kurczak z ryżem </title></head>\
                    <body><p>Chicken AND Rice.</p></body></html>";
        let page = Page::from_html("https://example.com", html);

        assert_eq!(page.title, "Kurczak z ryżem");
        assert!(page.text.contains("chicken and rice."));
        assert!(!page.text.contains("Chicken"));
    }

    #[test]
    fn falls_back_to_url_when_title_missing() {
        let page = Page::from_html("https://example.com/p", "<html><body>x</body></html>");
        assert_eq!(page.title, "https://example.com/p");
    }

    #[test]
    fn block_texts_takes_paragraphs_and_list_items() {
        let html = "<div>ignored</div><p>First paragraph.</p>\
                    <ul><li>Item one</li><li>Item two</li></ul>";
        let blocks = block_texts(html);
        assert_eq!(blocks, vec!["First paragraph.", "Item one", "Item two"]);
    }

    #[test]
    fn joins_fragmented_text_with_spaces() {
        let html = "<p>Eat <b>more</b> vegetables.</p>";
        let blocks = block_texts(html);
        assert_eq!(blocks, vec!["Eat more vegetables."]);
    }
}
