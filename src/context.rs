//! Shared, read-only state for article processing.
//!
//! One [`Context`] is built at startup and handed to every article task
//! behind an `Arc`. Nothing in it is mutated after construction.

use crate::config::Settings;
use crate::lexicon::Lexicon;
use crate::morph::{DictionaryMorph, Morph, RussianMorph};
use crate::sanitizers::SanitizerRegistry;
use anyhow::Context as _;
use reqwest::Client;
use std::fmt;
use std::sync::Arc;
use tracing::{info, instrument};

pub struct Context {
    /// HTTP client shared by every fetch; its connection pool is reused.
    pub client: Client,
    /// Word normalizer applied to every token before scoring.
    pub morph: Arc<dyn Morph>,
    /// Normal forms counted as charged.
    pub charged_words: Lexicon,
    /// Site-specific article extractors, keyed by domain.
    pub sanitizers: SanitizerRegistry,
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("charged_words", &self.charged_words.len())
            .field("sanitizers", &self.sanitizers)
            .finish_non_exhaustive()
    }
}

impl Context {
    pub fn new(
        client: Client,
        morph: Arc<dyn Morph>,
        charged_words: Lexicon,
        sanitizers: SanitizerRegistry,
    ) -> Self {
        Self {
            client,
            morph,
            charged_words,
            sanitizers,
        }
    }

    /// Load the lexicon and the normalizer named in `settings` and register
    /// the built-in sanitizers. Without a word-form dictionary the bundled
    /// OpenCorpora analyzer is used.
    #[instrument(level = "info", skip_all)]
    pub async fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let charged_words = Lexicon::load_dir(&settings.charged_dict).await?;

        let morph: Arc<dyn Morph> = match &settings.lemma_dict {
            Some(path) => Arc::new(
                DictionaryMorph::load(path)
                    .await
                    .with_context(|| format!("failed to load word-form dictionary {}", path.display()))?,
            ),
            None => Arc::new(RussianMorph::load().await?),
        };

        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build HTTP client")?;

        let sanitizers = SanitizerRegistry::with_builtin();
        info!(
            charged_words = charged_words.len(),
            sanitizers = sanitizers.len(),
            "Context ready"
        );
        Ok(Self::new(client, morph, charged_words, sanitizers))
    }
}
