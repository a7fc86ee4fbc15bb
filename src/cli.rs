//! Command-line interface definitions.
//!
//! Global options override the YAML settings file; every option can also be
//! given through the environment variable named in its help text.

use crate::config::Settings;
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Command-line arguments.
///
/// # Examples
///
/// ```sh
/// # Serve the HTTP interface
/// jaundice_rate --charged-dict ./charged_dict serve --bind 0.0.0.0:8080
///
/// # Rate two articles once and print JSON
/// jaundice_rate check https://inosmi.ru/a.html https://inosmi.ru/b.html --pretty
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML settings file
    #[arg(short, long, env = "JAUNDICE_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Directory of charged-word lists (*.txt)
    #[arg(long, env = "CHARGED_DICT_DIR", global = true)]
    pub charged_dict: Option<PathBuf>,

    /// Word-form dictionary, one `form lemma` pair per line
    #[arg(long, env = "LEMMA_DICT", global = true)]
    pub lemma_dict: Option<PathBuf>,

    /// Fetch budget per article, in seconds
    #[arg(long, env = "RESPONSE_TIMEOUT", global = true)]
    pub response_timeout: Option<f64>,

    /// Normalization budget per article, in seconds
    #[arg(long, env = "PROCESSING_TIMEOUT", global = true)]
    pub processing_timeout: Option<f64>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the HTTP interface
    Serve {
        /// Listen address
        #[arg(short, long, env = "JAUNDICE_BIND")]
        bind: Option<SocketAddr>,

        /// Maximum number of URLs accepted per request
        #[arg(long, env = "MAX_URLS")]
        max_urls: Option<usize>,
    },
    /// Rate the given article URLs once and print the results as JSON
    Check {
        /// Article URLs
        #[arg(required = true)]
        urls: Vec<String>,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
}

impl Cli {
    /// Apply command-line overrides on top of file or default settings.
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(dir) = &self.charged_dict {
            settings.charged_dict = dir.clone();
        }
        if let Some(path) = &self.lemma_dict {
            settings.lemma_dict = Some(path.clone());
        }
        if let Some(secs) = self.response_timeout {
            settings.response_timeout_secs = secs;
        }
        if let Some(secs) = self.processing_timeout {
            settings.processing_timeout_secs = secs;
        }
        if let Command::Serve { bind, max_urls } = &self.command {
            if let Some(bind) = bind {
                settings.bind = *bind;
            }
            if let Some(max) = max_urls {
                settings.max_urls = *max;
            }
        }
    }
}
