use scraper::{ElementRef, Html, Node, Selector};

/// Elements whose text never counts as page content. Analytics snippets and
/// inlined timestamps live here and would otherwise churn the fingerprint.
const STRIPPED_TAGS: &[&str] = &["script", "style", "link", "meta", "noscript", "iframe"];

/// Which part of the document is reduced to stable text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentRegion {
    #[default]
    Body,
    /// `main`, then `article`, then `body`.
    MainContent,
}

impl ContentRegion {
    pub fn for_source(prefer_main_content: bool) -> Self {
        if prefer_main_content {
            ContentRegion::MainContent
        } else {
            ContentRegion::Body
        }
    }
}

#[derive(Clone)]
pub struct Normalizer {
    main_selectors: Vec<Selector>,
    body_selector: Option<Selector>,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalizer {
    pub fn new() -> Self {
        let main_selectors = ["main", "article"]
            .iter()
            .filter_map(|s| Selector::parse(s).ok())
            .collect();

        Self {
            main_selectors,
            body_selector: Selector::parse("body").ok(),
        }
    }

    /// Reduce HTML to whitespace-collapsed visible text.
    pub fn stable_text(&self, html: &str, region: ContentRegion) -> String {
        let document = Html::parse_document(html);

        if region == ContentRegion::MainContent {
            for selector in &self.main_selectors {
                let text = Self::select_text(&document, selector);
                if !text.trim().is_empty() {
                    return collapse_whitespace(&text);
                }
            }
        }

        let text = match &self.body_selector {
            Some(selector) => Self::select_text(&document, selector),
            None => String::new(),
        };

        collapse_whitespace(&text)
    }

    fn select_text(document: &Html, selector: &Selector) -> String {
        let mut text = String::new();
        for element in document.select(selector) {
            collect_text(element, &mut text);
        }
        text
    }
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) => {
                if STRIPPED_TAGS.contains(&el.name()) {
                    continue;
                }
                if let Some(child_element) = ElementRef::wrap(child) {
                    collect_text(child_element, out);
                }
            }
            _ => {}
        }
    }
}

pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
