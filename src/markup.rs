/// HTML document wrapper for the Water Office pages.
///
/// Parsing goes through html5ever's tree builder, which recovers from
/// unclosed tags and stray markup the same way a browser does, so a
/// truncated or sloppy page still yields a queryable tree.

use scraper::{ElementRef, Html, Selector};

use crate::model::WaterOfficeError;

/// A parsed HTML page.
pub struct Document {
    html: Html,
}

impl Document {
    /// Parses a full HTML document. Never fails.
    pub fn parse(html: &str) -> Self {
        Self {
            html: Html::parse_document(html),
        }
    }

    /// All elements matching `selector`, in document order.
    pub fn select<'a, 'b>(&'a self, selector: &'b Selector) -> impl Iterator<Item = ElementRef<'a>> + 'b
    where
        'a: 'b,
    {
        self.html.select(selector)
    }
}

/// Compiles a CSS selector.
pub fn selector(css: &str) -> Result<Selector, WaterOfficeError> {
    Selector::parse(css)
        .map_err(|e| WaterOfficeError::Malformed(format!("invalid CSS selector '{}': {:?}", css, e)))
}

/// Text nodes that are immediate children of `element`, concatenated.
/// Text inside nested elements is ignored.
pub fn direct_text(element: ElementRef<'_>) -> String {
    element
        .children()
        .filter_map(|node| node.value().as_text())
        .map(|text| &**text)
        .collect()
}

/// All descendant text with runs of whitespace collapsed to single spaces.
pub fn full_text(element: ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<String>())
}

pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Element children of `element` with the given tag name.
pub fn child_elements<'a>(element: ElementRef<'a>, tag: &'a str) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    element
        .children()
        .filter_map(ElementRef::wrap)
        .filter(move |child| child.value().name() == tag)
}
