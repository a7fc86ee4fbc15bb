//! Text normalization and jaundice scoring.

use crate::lexicon::Lexicon;
use crate::morph::Morph;
use tokio::task::yield_now;

/// Short forms that are kept despite being two characters or less.
const KEPT_SHORT_WORDS: &[&str] = &["не"];

/// Quote and ellipsis marks removed anywhere in a token.
const STRIPPED_MARKS: &[char] = &['«', '»', '…'];

/// Strip quote marks and surrounding ASCII punctuation from a token.
///
/// Inner punctuation is kept, so hyphenated words stay whole.
pub fn clean_word(word: &str) -> String {
    let unquoted: String = word.chars().filter(|c| !STRIPPED_MARKS.contains(c)).collect();
    unquoted
        .trim_matches(|c: char| c.is_ascii_punctuation())
        .to_string()
}

fn is_kept(form: &str) -> bool {
    form.chars().count() > 2 || KEPT_SHORT_WORDS.contains(&form)
}

/// Split text into normalized word-forms, in input order.
///
/// Yields to the scheduler after every token, so a caller-side deadline
/// can interrupt a long article between tokens. Cancellation drops the
/// partially built list; callers only ever see the complete result.
pub async fn split_by_words(morph: &dyn Morph, text: &str) -> Vec<String> {
    let mut words = Vec::new();
    for token in text.split_whitespace() {
        let form = morph.normal_form(&clean_word(token));
        if is_kept(&form) {
            words.push(form);
        }
        yield_now().await;
    }
    words
}

/// Percentage of `words` found in `charged_words`, rounded to 2 places.
/// An empty article scores exactly `0.0`.
///
/// Rounding works on the exact decimal value of the double, so `0.025`
/// (stored as `0.02500000000000000138..`) rounds up to `0.03`.
pub fn calculate_jaundice_rate<S: AsRef<str>>(words: &[S], charged_words: &Lexicon) -> f64 {
    if words.is_empty() {
        return 0.0;
    }
    let charged = words
        .iter()
        .filter(|word| charged_words.contains(word.as_ref()))
        .count();
    let score = charged as f64 / words.len() as f64 * 100.0;
    round_to_hundredths(score)
}

fn round_to_hundredths(value: f64) -> f64 {
    format!("{value:.2}").parse().unwrap_or(value)
}
