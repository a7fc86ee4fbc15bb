//! InoSMI article sanitizer.
//!
//! Extracts the text of a single article page from [InoSMI](https://inosmi.ru).
//! The article body is the one `article.article` element on the page; the
//! headline (`h1.article-header__title`) is prepended when present.
//!
//! Disclaimers, footers, asides and embedded scripts inside the body are
//! dropped. Block elements are separated by line breaks so that words from
//! adjacent paragraphs never run together.

use super::Sanitizer;
use crate::error::SanitizeError;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Node, Selector};
use tracing::{debug, warn};

pub const DOMAIN_KEY: &str = "inosmi_ru";

static ARTICLE: Lazy<Selector> = Lazy::new(|| Selector::parse("article.article").unwrap());
static TITLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("h1.article-header__title").unwrap());
static BLANK_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t\u{a0}]+").unwrap());
static LINE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*\n\s*").unwrap());

const SKIPPED_TAGS: &[&str] = &["footer", "aside", "script", "style", "noscript", "template"];
const SKIPPED_CLASSES: &[&str] = &["article-disclaimer"];
const BLOCK_TAGS: &[&str] = &[
    "p", "div", "section", "header", "h1", "h2", "h3", "h4", "h5", "h6", "li", "ul", "ol",
    "blockquote", "figure", "figcaption", "table", "tr", "br",
];

#[derive(Debug, Clone, Copy, Default)]
pub struct InosmiRu;

impl Sanitizer for InosmiRu {
    fn sanitize(&self, html: &str) -> Result<String, SanitizeError> {
        let document = Html::parse_document(html);

        let mut articles = document.select(&ARTICLE);
        let article = match (articles.next(), articles.next()) {
            (Some(article), None) => article,
            (None, _) => {
                debug!("No article element on page");
                return Err(SanitizeError::ArticleNotFound);
            }
            (Some(_), Some(_)) => {
                warn!("Several article elements on page; refusing to guess");
                return Err(SanitizeError::ArticleNotFound);
            }
        };

        let mut raw = String::new();
        if let Some(title) = document.select(&TITLE).next() {
            push_text(title, &mut raw);
            raw.push('\n');
        }
        push_text(article, &mut raw);

        let text = collapse_whitespace(&raw);
        if text.is_empty() {
            return Err(SanitizeError::ArticleNotFound);
        }
        Ok(text)
    }
}

fn is_skipped(element: &ElementRef<'_>) -> bool {
    let value = element.value();
    SKIPPED_TAGS.contains(&value.name()) || value.classes().any(|class| SKIPPED_CLASSES.contains(&class))
}

fn push_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(_) => {
                let Some(child) = ElementRef::wrap(child) else {
                    continue;
                };
                if is_skipped(&child) {
                    continue;
                }
                let block = BLOCK_TAGS.contains(&child.value().name());
                if block {
                    out.push('\n');
                }
                push_text(child, out);
                if block {
                    out.push('\n');
                }
            }
            _ => {}
        }
    }
}

fn collapse_whitespace(raw: &str) -> String {
    let spaced = BLANK_RUN.replace_all(raw, " ");
    LINE_RUN.replace_all(&spaced, "\n").trim().to_string()
}
