use scraper::{ElementRef, Html};

/// A markup element reduced to what the extractor looks at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub classes: Vec<String>,
    /// All descendant text, untrimmed.
    pub text: String,
}

impl Element {
    #[cfg(test)]
    pub fn new(tag: &str, classes: &[&str], text: &str) -> Self {
        Element {
            tag: tag.to_string(),
            classes: classes.iter().map(|c| c.to_string()).collect(),
            text: text.to_string(),
        }
    }

    pub fn is_span(&self) -> bool {
        self.tag.eq_ignore_ascii_case("span")
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

/// Parse a document and return every element in document (pre-order) order.
pub fn flatten(html: &str) -> Vec<Element> {
    let document = Html::parse_document(html);
    document
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .map(|el| Element {
            tag: el.value().name().to_string(),
            classes: el.value().classes().map(str::to_string).collect(),
            text: el.text().collect(),
        })
        .collect()
}
