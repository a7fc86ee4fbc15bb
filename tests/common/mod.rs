// tests/common/mod.rs
//
// Local fixture site for pipeline tests. Serves inosmi-style pages on an
// ephemeral 127.0.0.1 port; the host key `127_0_0_1` is registered with the
// InoSMI sanitizer so fixture URLs go through the real extraction code.

#![allow(dead_code)]

use axum::{Router, http::StatusCode, response::Html, routing::get};
use jaundice_rate::error::SanitizeError;
use jaundice_rate::lexicon::Lexicon;
use jaundice_rate::morph::{DictionaryMorph, Morph};
use jaundice_rate::sanitizers::inosmi_ru::InosmiRu;
use jaundice_rate::sanitizers::{Sanitizer, SanitizerRegistry};
use jaundice_rate::{Context, Timeouts};
use std::net::SocketAddr;
use std::sync::{Arc, Barrier};
use std::time::Duration;

pub const ARTICLE_HTML: &str = r#"<!DOCTYPE html>
<html>
<head><title>ИноСМИ</title></head>
<body>
  <h1 class="article-header__title">Аутсайдер объявил о банкротстве</h1>
  <article class="article">
    <div class="article-disclaimer">Материалы ИноСМИ содержат оценки исключительно зарубежных СМИ</div>
    <p>«Удивительно, но это стало началом!» Во-первых, он хочет, чтобы все знали про скандал.</p>
    <p>Компания не смогла избежать банкротства, и побег владельца стал новостью.</p>
    <footer>Подписывайтесь на наш канал</footer>
  </article>
</body>
</html>"#;

pub const PLAIN_HTML: &str =
    "<html><body><h1>Example Domain</h1><p>This domain is for use in illustrative examples.</p></body></html>";

pub fn long_article_html() -> String {
    let paragraph = "<p>Длинная статья про очередной громкий скандал и его последствия.</p>";
    format!(
        r#"<html><body><article class="article">{}</article></body></html>"#,
        paragraph.repeat(400)
    )
}

pub struct Fixture {
    pub addr: SocketAddr,
}

impl Fixture {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn localhost_url(&self, path: &str) -> String {
        format!("http://localhost:{}{}", self.addr.port(), path)
    }
}

/// Start the fixture site on an ephemeral port.
pub async fn spawn_site() -> Fixture {
    let long = long_article_html();
    let app = Router::new()
        .route("/article", get(|| async { Html(ARTICLE_HTML) }))
        .route("/long", get(move || async move { Html(long) }))
        .route("/plain", get(|| async { Html(PLAIN_HTML) }))
        .route("/missing", get(|| async { (StatusCode::NOT_FOUND, "gone") }))
        .route("/broken", get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "oops") }))
        .route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Html(ARTICLE_HTML)
            }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    Fixture { addr }
}

/// A port nothing listens on.
pub async fn closed_port_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/")
}

pub fn russian_morph() -> DictionaryMorph {
    DictionaryMorph::from_pairs([
        ("хочет", "хотеть"),
        ("стало", "стать"),
        ("стал", "стать"),
        ("началом", "начало"),
        ("банкротстве", "банкротство"),
        ("банкротства", "банкротство"),
        ("объявил", "объявить"),
        ("смогла", "смочь"),
        ("знали", "знать"),
        ("владельца", "владелец"),
        ("новостью", "новость"),
    ])
}

pub fn charged_words() -> Lexicon {
    Lexicon::from_words(["аутсайдер", "банкротство", "скандал", "побег"])
}

/// Registry with the InoSMI sanitizer also answering for the fixture host.
pub fn fixture_registry() -> SanitizerRegistry {
    let mut registry = SanitizerRegistry::with_builtin();
    registry.register("127_0_0_1", InosmiRu);
    registry
}

pub fn context_with(morph: Arc<dyn Morph>, sanitizers: SanitizerRegistry) -> Arc<Context> {
    Arc::new(Context::new(
        reqwest::Client::new(),
        morph,
        charged_words(),
        sanitizers,
    ))
}

pub fn context() -> Arc<Context> {
    context_with(Arc::new(russian_morph()), fixture_registry())
}

pub fn timeouts(processing: Duration) -> Timeouts {
    Timeouts {
        response: Duration::from_secs(2),
        processing,
    }
}

/// Normalizer that takes a millisecond per token.
pub struct SlowMorph;

impl Morph for SlowMorph {
    fn normal_form(&self, word: &str) -> String {
        std::thread::sleep(Duration::from_millis(1));
        word.to_lowercase()
    }
}

/// Sanitizer with a bug: reports an internal failure for every page.
pub struct BrokenSanitizer;

impl Sanitizer for BrokenSanitizer {
    fn sanitize(&self, _html: &str) -> Result<String, SanitizeError> {
        Err(SanitizeError::Internal(anyhow::anyhow!("selector table corrupted")))
    }
}

/// Sanitizer that panics.
pub struct PanickingSanitizer;

impl Sanitizer for PanickingSanitizer {
    fn sanitize(&self, _html: &str) -> Result<String, SanitizeError> {
        panic!("sanitizer exploded")
    }
}

/// Sanitizer whose callers all fail together: each call waits until
/// `parties` calls are in flight, then reports an internal failure.
///
/// Needs a multi-thread runtime; the wait moves off the worker with
/// `block_in_place`.
pub struct RendezvousSanitizer {
    barrier: Barrier,
}

impl RendezvousSanitizer {
    pub fn new(parties: usize) -> Self {
        Self {
            barrier: Barrier::new(parties),
        }
    }
}

impl Sanitizer for RendezvousSanitizer {
    fn sanitize(&self, _html: &str) -> Result<String, SanitizeError> {
        tokio::task::block_in_place(|| self.barrier.wait());
        Err(SanitizeError::Internal(anyhow::anyhow!("selector table corrupted")))
    }
}
