//! Charged-word lexicon.
//!
//! A lexicon is loaded once at startup from a directory of `.txt` word lists
//! (whitespace separated, any number of words per line) and then shared
//! read-only by every article task.

use crate::error::LexiconError;
use futures::stream::{self, StreamExt, TryStreamExt};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, instrument};

/// Immutable set of charged words.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lexicon {
    words: HashSet<String>,
}

impl Lexicon {
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            words: words.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Load every `*.txt` file in `dir` into one lexicon.
    ///
    /// Files with other extensions and subdirectories are ignored. A
    /// directory without any words is an error, since every score computed
    /// against it would be zero.
    #[instrument(level = "info", skip_all, fields(dir = %dir.display()))]
    pub async fn load_dir(dir: &Path) -> Result<Self, LexiconError> {
        let io_err = |source| LexiconError::Io {
            path: dir.to_path_buf(),
            source,
        };

        let mut entries = fs::read_dir(dir).await.map_err(io_err)?;
        let mut files: Vec<PathBuf> = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(io_err)? {
            let path = entry.path();
            let is_txt = path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.ends_with(".txt"));
            if is_txt && entry.file_type().await.map_err(io_err)?.is_file() {
                files.push(path);
            }
        }
        files.sort();

        let contents: Vec<String> = stream::iter(files)
            .then(|path| async move {
                let text = fs::read_to_string(&path)
                    .await
                    .map_err(|source| LexiconError::Io {
                        path: path.clone(),
                        source,
                    })?;
                debug!(path = %path.display(), bytes = text.len(), "Read word list");
                Ok::<_, LexiconError>(text)
            })
            .try_collect()
            .await?;

        let lexicon = Self::from_words(contents.iter().flat_map(|text| text.split_whitespace()));
        if lexicon.is_empty() {
            return Err(LexiconError::Empty {
                path: dir.to_path_buf(),
            });
        }

        info!(files = contents.len(), words = lexicon.len(), "Loaded charged words");
        Ok(lexicon)
    }
}
