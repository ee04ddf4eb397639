// src/core/html.rs
// DOM helpers over `scraper`. Portal pages are table soup; these keep the
// per-page specs down to "which cells, which order".

use scraper::{ ElementRef, Html, Selector };

/// Compile a selector literal. Only for fixed strings in this crate.
pub fn sel(css: &'static str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("bad built-in selector {css:?}: {e}"))
}

/// `table > * td` nested `depth` tables deep (1 = any table's cells).
///
/// Mirrors how the portal nests its layout tables; data sits at a fixed depth.
pub fn nested_cells(depth: usize) -> Selector {
    let mut css = String::from("table > *");
    for _ in 1..depth {
        css.push_str(" table > *");
    }
    css.push_str(" td");
    Selector::parse(&css).unwrap_or_else(|e| panic!("bad nested selector {css:?}: {e}"))
}

pub fn parse(doc: &str) -> Html {
    Html::parse_document(doc)
}

/// All descendant text, trimmed. Inner whitespace is kept as the page has it.
pub fn text_of(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// `href` of the first anchor inside `el`.
pub fn first_href(el: ElementRef<'_>) -> Option<String> {
    use std::sync::LazyLock;
    static ANCHOR: LazyLock<Selector> = LazyLock::new(|| sel("a[href]"));
    el.select(&ANCHOR)
        .next()
        .and_then(|a| a.value().attr("href"))
        .map(str::to_string)
}

/// Position among element siblings (0-based).
pub fn sibling_index(el: ElementRef<'_>) -> usize {
    el.prev_siblings().filter(|n| n.value().is_element()).count()
}

/// Previous element sibling.
pub fn prev_element(el: ElementRef<'_>) -> Option<ElementRef<'_>> {
    el.prev_siblings().find_map(ElementRef::wrap)
}

pub fn has_class_exact(el: ElementRef<'_>, class: &str) -> bool {
    el.value().attr("class") == Some(class)
}

/// Text of the page `<title>`, for diagnostics.
pub fn title(doc: &Html) -> Option<String> {
    use std::sync::LazyLock;
    static TITLE: LazyLock<Selector> = LazyLock::new(|| sel("title"));
    doc.select(&TITLE).next().map(text_of)
}
