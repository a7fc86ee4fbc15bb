//! Site-specific article sanitizers.
//!
//! A sanitizer turns a news site's raw article HTML into plain body text.
//! Sanitizers are looked up by a domain key derived from the article URL:
//! the host with every `.` replaced by `_` (`inosmi.ru` -> `inosmi_ru`).
//!
//! # Supported Sites
//!
//! | Site | Module | Key |
//! |------|--------|-----|
//! | InoSMI | [`inosmi_ru`] | `inosmi_ru` |
//!
//! # Failure Kinds
//!
//! - [`SanitizeError::AdapterNotImplemented`]: nothing registered for the key
//! - [`SanitizeError::ArticleNotFound`]: the adapter ran, but the page has no
//!   article markup (a section index, a landing page, ...)
//!
//! Both are parsing failures for the caller, but they stay separate kinds.

pub mod inosmi_ru;

use crate::error::SanitizeError;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, instrument};
use url::Url;

/// Extracts plain article text from one site's HTML.
pub trait Sanitizer: Send + Sync {
    /// Return the article text, or [`SanitizeError::ArticleNotFound`] when
    /// the page does not carry the expected markup.
    fn sanitize(&self, html: &str) -> Result<String, SanitizeError>;
}

/// Domain key for a URL: the host with dots replaced by underscores.
///
/// Returns `None` when the URL does not parse or has no host.
///
/// # Examples
///
/// ```
/// use jaundice_rate::sanitizers::convert_domain_name;
///
/// assert_eq!(convert_domain_name("https://inosmi.ru/a.html").as_deref(), Some("inosmi_ru"));
/// assert_eq!(convert_domain_name("not a url"), None);
/// ```
pub fn convert_domain_name(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?;
    Some(host.replace('.', "_"))
}

/// Domain key to sanitizer mapping.
#[derive(Clone, Default)]
pub struct SanitizerRegistry {
    sanitizers: HashMap<String, Arc<dyn Sanitizer>>,
}

impl fmt::Debug for SanitizerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&String> = self.sanitizers.keys().collect();
        keys.sort();
        f.debug_struct("SanitizerRegistry").field("keys", &keys).finish()
    }
}

impl SanitizerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every site adapter shipped in this crate.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register(inosmi_ru::DOMAIN_KEY, inosmi_ru::InosmiRu);
        registry
    }

    /// Register `sanitizer` under `key`, replacing any previous entry.
    pub fn register(&mut self, key: impl Into<String>, sanitizer: impl Sanitizer + 'static) {
        self.register_shared(key, Arc::new(sanitizer));
    }

    /// Register an already shared sanitizer, e.g. one instance under several keys.
    pub fn register_shared(&mut self, key: impl Into<String>, sanitizer: Arc<dyn Sanitizer>) {
        self.sanitizers.insert(key.into(), sanitizer);
    }

    pub fn get(&self, key: &str) -> Option<&Arc<dyn Sanitizer>> {
        self.sanitizers.get(key)
    }

    pub fn len(&self) -> usize {
        self.sanitizers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sanitizers.is_empty()
    }

    /// Resolve the sanitizer for `url` and extract the article text.
    #[instrument(level = "debug", skip(self, html), fields(bytes = html.len()))]
    pub fn sanitize_html(&self, html: &str, url: &str) -> Result<String, SanitizeError> {
        let domain = convert_domain_name(url).unwrap_or_default();
        let sanitizer = self
            .get(&domain)
            .ok_or_else(|| SanitizeError::AdapterNotImplemented {
                domain: domain.clone(),
            })?;
        let text = sanitizer.sanitize(html)?;
        debug!(%domain, chars = text.chars().count(), "Sanitized article");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(&'static str);

    impl Sanitizer for Fixed {
        fn sanitize(&self, _html: &str) -> Result<String, SanitizeError> {
            Ok(self.0.to_string())
        }
    }

    #[test]
    fn test_convert_domain_name() {
        assert_eq!(
            convert_domain_name("https://inosmi.ru/social/20191129/246343400.html").as_deref(),
            Some("inosmi_ru")
        );
        assert_eq!(
            convert_domain_name("http://127.0.0.1:8000/").as_deref(),
            Some("127_0_0_1")
        );
        assert_eq!(
            convert_domain_name("http://example.com").as_deref(),
            Some("example_com")
        );
        assert_eq!(convert_domain_name("inosmi.ru/no-scheme"), None);
    }

    #[test]
    fn test_unregistered_domain() {
        let registry = SanitizerRegistry::with_builtin();
        let err = registry
            .sanitize_html("<html></html>", "http://example.com")
            .unwrap_err();
        match err {
            SanitizeError::AdapterNotImplemented { domain } => assert_eq!(domain, "example_com"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_register_and_dispatch() {
        let mut registry = SanitizerRegistry::new();
        registry.register("example_com", Fixed("body"));
        assert_eq!(registry.len(), 1);
        assert_eq!(
            registry.sanitize_html("<p>x</p>", "https://example.com/a").unwrap(),
            "body"
        );
    }

    #[test]
    fn test_shared_registration() {
        let shared: Arc<dyn Sanitizer> = Arc::new(Fixed("same"));
        let mut registry = SanitizerRegistry::new();
        registry.register_shared("a_ru", Arc::clone(&shared));
        registry.register_shared("b_ru", shared);
        assert_eq!(registry.sanitize_html("", "https://a.ru/").unwrap(), "same");
        assert_eq!(registry.sanitize_html("", "https://b.ru/").unwrap(), "same");
        assert!(format!("{registry:?}").contains("a_ru"));
    }

    #[test]
    fn test_builtin_registry_has_inosmi() {
        let registry = SanitizerRegistry::with_builtin();
        assert!(registry.get("inosmi_ru").is_some());
    }
}
