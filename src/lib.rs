//! # Jaundice Rate
//!
//! Estimates how sensationalist a news article is: the share of its
//! normalized words that appear in a curated list of charged words.
//!
//! ## Pipeline
//!
//! For every URL, concurrently:
//! 1. **Fetching** ([`fetch`]): download the page under a response budget
//! 2. **Sanitizing** ([`sanitizers`]): extract article text with the site adapter
//! 3. **Normalizing** ([`text`], [`morph`]): split into canonical word-forms
//!    under a processing budget
//! 4. **Scoring** ([`text::calculate_jaundice_rate`]): percentage of charged words
//!
//! Each URL ends with one [`models::ProcessingStatus`]; the batch
//! ([`batch`]) returns the results in input order.

pub mod api;
pub mod batch;
pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod fetch;
pub mod lexicon;
pub mod models;
pub mod morph;
pub mod process;
pub mod sanitizers;
pub mod text;

pub use batch::{process_all, process_all_until};
pub use config::{Settings, Timeouts};
pub use context::Context;
pub use models::{ArticleResult, ProcessingStatus};
pub use process::process_article;
