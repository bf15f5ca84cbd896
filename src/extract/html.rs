//! HTML to plain text extraction
//!
//! Only text nested under the configured selector is rendered. Every
//! non-blank text node becomes one trimmed line; link targets and image
//! sources never appear because only text nodes are emitted.

use crate::error::ConfigError;
use scraper::{ElementRef, Html, Node, Selector};

/// Content region watched when no selector is configured
pub const DEFAULT_SELECTOR: &str = "div.thb-text";

/// Elements whose text content is never rendered
const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Extracts normalized text from a content region of an HTML page
#[derive(Debug, Clone)]
pub struct TextExtractor {
    selector: Selector,
    source: String,
}

impl TextExtractor {
    /// Create an extractor for the given CSS selector
    pub fn new(selector: &str) -> Result<Self, ConfigError> {
        let parsed = Selector::parse(selector).map_err(|e| ConfigError::Selector {
            selector: selector.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            selector: parsed,
            source: selector.to_string(),
        })
    }

    /// The selector this extractor was built from
    pub fn selector(&self) -> &str {
        &self.source
    }

    /// Extract the watched text from raw markup
    ///
    /// Malformed markup is parsed best-effort. A page without the selector
    /// yields an empty string.
    pub fn extract(&self, markup: &str) -> String {
        let document = Html::parse_document(markup);
        let regions = self.regions(&document);

        let mut out = String::new();
        for region in regions {
            for node in region.descendants() {
                let Node::Text(text) = node.value() else {
                    continue;
                };

                let hidden = node
                    .ancestors()
                    .take_while(|a| ElementRef::wrap(*a) != Some(region))
                    .filter_map(|a| a.value().as_element())
                    .any(|e| SKIPPED_ELEMENTS.contains(&e.name()));
                if hidden {
                    continue;
                }

                out.push_str(&render_text_node(text));
            }
        }

        out
    }

    /// Matched regions in document order, without regions nested in another match
    fn regions<'a>(&self, document: &'a Html) -> Vec<ElementRef<'a>> {
        let matched: Vec<ElementRef<'a>> = document.select(&self.selector).collect();

        matched
            .iter()
            .copied()
            .filter(|e| {
                !e.ancestors()
                    .filter_map(ElementRef::wrap)
                    .any(|a| matched.contains(&a))
            })
            .collect()
    }
}

/// Render one text node: blank nodes vanish, others become a single line
///
/// Character references were already decoded by the parser.
fn render_text_node(text: &str) -> String {
    // U+FEFF counts as whitespace for JavaScript-style trimming
    let trimmed = text.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("{}\n", trimmed)
    }
}
