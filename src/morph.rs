//! Morphological normalizers.
//!
//! A [`Morph`] turns one cleaned token into its canonical word-form. The
//! normalizer is shared by all concurrent article tasks, so implementations
//! must be safe to call from several tasks at once; every implementation
//! here is immutable after construction.
//!
//! | Normalizer | Source of lemmas |
//! |------------|------------------|
//! | [`RussianMorph`] | OpenCorpora dictionary shipped with `rsmorphy-dict-ru` (default) |
//! | [`DictionaryMorph`] | a `form lemma` text file (`--lemma-dict`) |
//! | [`LowercaseMorph`] | none, lower-cases only |

use anyhow::Context as _;
use rsmorphy::MorphAnalyzer;
use rsmorphy::prelude::*;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use tracing::{info, instrument};

/// Maps a raw token to its canonical (lemma) form.
pub trait Morph: Send + Sync {
    fn normal_form(&self, word: &str) -> String;
}

/// Lower-cases the token and keeps it otherwise unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct LowercaseMorph;

impl Morph for LowercaseMorph {
    fn normal_form(&self, word: &str) -> String {
        word.to_lowercase()
    }
}

/// Russian morphological analyzer backed by the OpenCorpora dictionary.
///
/// The normal form of the most probable parse is used. Tokens the analyzer
/// has no parse for are lower-cased.
pub struct RussianMorph {
    analyzer: MorphAnalyzer,
}

impl fmt::Debug for RussianMorph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RussianMorph").finish_non_exhaustive()
    }
}

impl RussianMorph {
    /// Open the dictionary bundled with `rsmorphy-dict-ru`. Blocks while the
    /// dictionary is decoded.
    pub fn bundled() -> Self {
        Self {
            analyzer: MorphAnalyzer::from_file(rsmorphy_dict_ru::DICT_PATH),
        }
    }

    /// [`RussianMorph::bundled`] on the blocking pool.
    #[instrument(level = "info")]
    pub async fn load() -> anyhow::Result<Self> {
        let morph = tokio::task::spawn_blocking(Self::bundled)
            .await
            .context("failed to open the OpenCorpora dictionary")?;
        info!("Loaded OpenCorpora dictionary");
        Ok(morph)
    }
}

impl Morph for RussianMorph {
    fn normal_form(&self, word: &str) -> String {
        let lower = word.to_lowercase();
        if lower.is_empty() {
            return lower;
        }
        let parses = self.analyzer.parse(&lower);
        match parses.first() {
            Some(parsed) => parsed.lex.get_normal_form(&self.analyzer).to_lowercase(),
            None => lower,
        }
    }
}

/// Word-form dictionary lookup with a lower-casing fallback.
///
/// The dictionary file holds one `form lemma` pair per line, separated by
/// whitespace. Blank lines and lines starting with `#` are skipped. Keys and
/// values are lower-cased on load.
///
/// ```text
/// # form    lemma
/// хочет     хотеть
/// началом   начало
/// ```
#[derive(Debug, Clone, Default)]
pub struct DictionaryMorph {
    forms: HashMap<String, String>,
}

impl DictionaryMorph {
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        Self {
            forms: pairs
                .into_iter()
                .map(|(form, lemma)| (form.as_ref().to_lowercase(), lemma.as_ref().to_lowercase()))
                .collect(),
        }
    }

    /// Parse dictionary text. Lines with a single column are ignored.
    pub fn parse(text: &str) -> Self {
        let pairs = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .filter_map(|line| {
                let mut columns = line.split_whitespace();
                Some((columns.next()?, columns.next()?))
            });
        Self::from_pairs(pairs)
    }

    #[instrument(level = "info", skip_all, fields(path = %path.display()))]
    pub async fn load(path: &Path) -> std::io::Result<Self> {
        let text = tokio::fs::read_to_string(path).await?;
        let morph = Self::parse(&text);
        info!(forms = morph.len(), "Loaded word-form dictionary");
        Ok(morph)
    }

    pub fn len(&self) -> usize {
        self.forms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forms.is_empty()
    }
}

impl Morph for DictionaryMorph {
    fn normal_form(&self, word: &str) -> String {
        let lower = word.to_lowercase();
        match self.forms.get(&lower) {
            Some(lemma) => lemma.clone(),
            None => lower,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use once_cell::sync::Lazy;

    static RUSSIAN: Lazy<RussianMorph> = Lazy::new(RussianMorph::bundled);

    #[test]
    fn test_russian_morph_lemmatizes() {
        assert_eq!(RUSSIAN.normal_form("хочет"), "хотеть");
        assert_eq!(RUSSIAN.normal_form("Стало"), "стать");
        assert_eq!(RUSSIAN.normal_form("началом"), "начало");
        assert_eq!(RUSSIAN.normal_form("банкротства"), "банкротство");
    }

    #[test]
    fn test_russian_morph_keeps_unparsed_tokens() {
        assert_eq!(RUSSIAN.normal_form(""), "");
    }

    #[tokio::test]
    async fn test_russian_morph_loads_off_the_runtime() {
        let morph = RussianMorph::load().await.unwrap();
        assert_eq!(morph.normal_form("скандалы"), "скандал");
    }

    #[test]
    fn test_lowercase_morph() {
        assert_eq!(LowercaseMorph.normal_form("Удивительно"), "удивительно");
        assert_eq!(LowercaseMorph.normal_form(""), "");
    }

    #[test]
    fn test_dictionary_lookup_is_case_insensitive() {
        let morph = DictionaryMorph::from_pairs([("Хочет", "хотеть")]);
        assert_eq!(morph.normal_form("хочет"), "хотеть");
        assert_eq!(morph.normal_form("ХОЧЕТ"), "хотеть");
        assert_eq!(morph.normal_form("Чтобы"), "чтобы");
    }

    #[test]
    fn test_parse_skips_comments_and_short_lines() {
        let morph = DictionaryMorph::parse("# form lemma\n\nстало стать\nодинокий\n началом  начало \n");
        assert_eq!(morph.len(), 2);
        assert_eq!(morph.normal_form("стало"), "стать");
        assert_eq!(morph.normal_form("началом"), "начало");
        assert_eq!(morph.normal_form("одинокий"), "одинокий");
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lemmas.txt");
        std::fs::write(&path, "стало стать\n").unwrap();

        let morph = DictionaryMorph::load(&path).await.unwrap();
        assert_eq!(morph.normal_form("Стало"), "стать");
    }
}
