//! Tweet-style tokenizer for short reviews
//!
//! Splits text into word-like units while keeping emoticons, arrows,
//! emails and hyphenated or apostrophised words intact. Optionally
//! case-folds, strips `@handle` mentions and shortens elongated words.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

/// Handles longer than this only lose their first 15 characters
const MAX_HANDLE_LEN: usize = 15;

/// Scheme-less domains such as `www.shop.com`, with an optional path
const DOMAIN_PATTERN: &str = r"(?i:(?:www\.)?[a-z0-9][a-z0-9\-]*(?:\.[a-z0-9\-]+)*\.(?:com|net|org|edu|gov|info|biz|io|co|ly|tv|uk|ca|de|fr|nl|au|jp)\b(?:/\S*)?)";

/// Token patterns, tried left to right at each position
const TOKEN_PATTERNS: &[&str] = &[
    // phone numbers
    r"(?:\+?[01][ *\-.)]*)?(?:\(?\d{3}[ *\-.)]*)?\d{3}[ *\-.)]*\d{4}",
    // emoticons
    r"[<>]?[:;=8][\-o*']?[)\](\[dDpP/:}{@|\\]",
    r"[)\](\[dDpP/:}{@|\\][\-o*']?[:;=8][<>]?",
    r"</?3",
    // html tags
    r"<[^>\s]+>",
    // ascii arrows
    r"-+>|<-+",
    // handles and hashtags
    r"@\w+",
    r"\#+\w+[\w'\-]*\w+",
    // email addresses
    r"[\w.+\-]+@[\w\-]+\.(?:[\w\-]\.?)+[\w\-]",
    // bare domains
    DOMAIN_PATTERN,
    // words with apostrophes or dashes
    r"[^\W\d_](?:[^\W\d_]|['\-_])+[^\W\d_]",
    // numbers with separators
    r"[+\-]?\d+[,/.:\-]\d+[+\-]?",
    r"\w+",
    // ellipsis
    r"\.(?:\s*\.)+",
    r"\S",
];

static TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    let pattern = TOKEN_PATTERNS
        .iter()
        .map(|p| format!("(?:{p})"))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&pattern).expect("token pattern is valid")
});

static DOMAIN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(DOMAIN_PATTERN).expect("domain pattern is valid"));

static HANDLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"@[A-Za-z0-9_]+").expect("handle pattern is valid"));

static ENTITY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&(?:#(\d+)|#[xX]([0-9a-fA-F]+)|(amp|lt|gt|quot|apos|nbsp));")
        .expect("entity pattern is valid")
});

/// Tokenizer behaviour toggles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenizerOptions {
    /// Keep original casing (default: false)
    pub preserve_case: bool,
    /// Drop `@handle` mentions (default: true)
    pub strip_handles: bool,
    /// Shorten runs of 3+ repeated characters (default: true)
    pub reduce_len: bool,
    /// Run length kept when shortening (default: 2, "sooo" -> "soo")
    pub max_repeat: usize,
}

impl Default for TokenizerOptions {
    fn default() -> Self {
        Self {
            preserve_case: false,
            strip_handles: true,
            reduce_len: true,
            max_repeat: 2,
        }
    }
}

/// Tokenizer that understands the noise found in user-written reviews
#[derive(Debug, Clone, Default)]
pub struct Tokenizer {
    pub options: TokenizerOptions,
}

impl Tokenizer {
    /// Create a new tokenizer with custom options
    pub fn new(options: TokenizerOptions) -> Self {
        Self { options }
    }

    /// Tokenize text into terms
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let mut text = decode_entities(text);
        if self.options.strip_handles {
            text = Cow::Owned(strip_handles(&text));
        }
        if self.options.reduce_len {
            text = Cow::Owned(reduce_lengthening(&text, self.options.max_repeat));
        }

        TOKEN_RE
            .find_iter(&text)
            .map(|m| {
                if self.options.preserve_case {
                    m.as_str().to_string()
                } else {
                    m.as_str().to_lowercase()
                }
            })
            .collect()
    }
}

/// Replace the common named and numeric HTML entities
fn decode_entities(text: &str) -> Cow<'_, str> {
    ENTITY_RE.replace_all(text, |caps: &Captures| {
        let decoded = if let Some(dec) = caps.get(1) {
            dec.as_str().parse::<u32>().ok().and_then(char::from_u32)
        } else if let Some(hex) = caps.get(2) {
            u32::from_str_radix(hex.as_str(), 16).ok().and_then(char::from_u32)
        } else {
            match caps.get(3).map(|m| m.as_str()) {
                Some("amp") => Some('&'),
                Some("lt") => Some('<'),
                Some("gt") => Some('>'),
                Some("quot") => Some('"'),
                Some("apos") => Some('\''),
                Some("nbsp") => Some(' '),
                _ => None,
            }
        };
        match decoded {
            Some(c) => c.to_string(),
            None => caps[0].to_string(),
        }
    })
}

/// Blank out `@handle` mentions that are not part of a larger word or email
fn strip_handles(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;

    for m in HANDLE_RE.find_iter(text) {
        let blocked = text[..m.start()]
            .chars()
            .next_back()
            .map_or(false, |c| c.is_ascii_alphanumeric() || "_!@#$%&*".contains(c));
        let name_len = m.len() - 1;
        let followed_by_at = text[m.end()..].starts_with('@');
        if blocked || (name_len <= MAX_HANDLE_LEN && followed_by_at) {
            continue;
        }

        let end = m.start() + 1 + name_len.min(MAX_HANDLE_LEN);
        out.push_str(&text[last..m.start()]);
        out.push(' ');
        last = end;
    }

    out.push_str(&text[last..]);
    out
}

/// Collapse runs of 3 or more identical graphemes down to `max_repeat`,
/// leaving bare domains (`www.`) untouched
fn reduce_lengthening(text: &str, max_repeat: usize) -> String {
    let max_repeat = max_repeat.max(1);
    let mut out = String::with_capacity(text.len());
    let mut last = 0;

    for m in DOMAIN_RE.find_iter(text) {
        collapse_runs(&text[last..m.start()], max_repeat, &mut out);
        out.push_str(m.as_str());
        last = m.end();
    }
    collapse_runs(&text[last..], max_repeat, &mut out);
    out
}

fn collapse_runs(text: &str, max_repeat: usize, out: &mut String) {
    let mut graphemes = text.graphemes(true).peekable();

    while let Some(g) = graphemes.next() {
        let mut run = 1;
        while graphemes.peek() == Some(&g) {
            graphemes.next();
            run += 1;
        }
        let keep = if run >= 3 { run.min(max_repeat) } else { run };
        for _ in 0..keep {
            out.push_str(g);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_tokenization() {
        let tokenizer = Tokenizer::default();
        let tokens = tokenizer.tokenize("Hello World! This is a test.");
        assert_eq!(tokens, vec!["hello", "world", "!", "this", "is", "a", "test", "."]);
    }

    #[test]
    fn test_preserve_case() {
        let tokenizer = Tokenizer::new(TokenizerOptions {
            preserve_case: true,
            ..Default::default()
        });
        assert_eq!(tokenizer.tokenize("Great Movie"), vec!["Great", "Movie"]);
    }

    #[test]
    fn test_strip_handles() {
        let tokenizer = Tokenizer::default();
        let tokens = tokenizer.tokenize("@alice loved it");
        assert_eq!(tokens, vec!["loved", "it"]);
    }

    #[test]
    fn test_keep_handles() {
        let tokenizer = Tokenizer::new(TokenizerOptions {
            strip_handles: false,
            ..Default::default()
        });
        assert_eq!(tokenizer.tokenize("@alice hi"), vec!["@alice", "hi"]);
    }

    #[test]
    fn test_email_is_not_a_handle() {
        let tokenizer = Tokenizer::default();
        let tokens = tokenizer.tokenize("mail bob@example.com");
        assert_eq!(tokens, vec!["mail", "bob@example.com"]);
    }

    #[test]
    fn test_long_handle_keeps_tail() {
        assert_eq!(strip_handles("@abcdefghijklmnopq x"), " pq x");
    }

    #[test]
    fn test_reduce_lengthening() {
        let tokenizer = Tokenizer::default();
        assert_eq!(tokenizer.tokenize("Sooo goood"), vec!["soo", "good"]);
        assert_eq!(reduce_lengthening("sooooo", 3), "sooo");
        assert_eq!(reduce_lengthening("good", 1), "good");
    }

    #[test]
    fn test_reduce_len_disabled() {
        let tokenizer = Tokenizer::new(TokenizerOptions {
            reduce_len: false,
            ..Default::default()
        });
        assert_eq!(tokenizer.tokenize("sooooo"), vec!["sooooo"]);
    }

    #[test]
    fn test_contractions_and_hyphens() {
        let tokenizer = Tokenizer::default();
        let tokens = tokenizer.tokenize("Don't buy this low-quality item");
        assert_eq!(tokens, vec!["don't", "buy", "this", "low-quality", "item"]);
    }

    #[test]
    fn test_emoticons_and_ellipsis() {
        let tokenizer = Tokenizer::default();
        let tokens = tokenizer.tokenize("meh :( ... ok");
        assert_eq!(tokens, vec!["meh", ":(", "..", "ok"]);
    }

    #[test]
    fn test_ellipsis_kept_without_reduce_len() {
        let tokenizer = Tokenizer::new(TokenizerOptions {
            reduce_len: false,
            ..Default::default()
        });
        assert_eq!(tokenizer.tokenize("meh :( ... ok"), vec!["meh", ":(", "...", "ok"]);
    }

    #[test]
    fn test_bare_domains() {
        let tokenizer = Tokenizer::default();
        assert_eq!(tokenizer.tokenize("ordered from www.shop.com"), vec!["ordered", "from", "www.shop.com"]);
        assert_eq!(tokenizer.tokenize("Shop.example.co.uk/deals rocks"), vec!["shop.example.co.uk/deals", "rocks"]);
        assert_eq!(tokenizer.tokenize("rated 4.5 stars"), vec!["rated", "4.5", "stars"]);
        assert_eq!(reduce_lengthening("wooow www.shop.com", 2), "woow www.shop.com");
    }

    #[test]
    fn test_html_entities() {
        let tokenizer = Tokenizer::default();
        assert_eq!(tokenizer.tokenize("fast &amp; cheap"), vec!["fast", "&", "cheap"]);
        assert_eq!(decode_entities("&#39;&#x41;&bogus;"), "'A&bogus;");
    }

    #[test]
    fn test_numbers() {
        let tokenizer = Tokenizer::default();
        assert_eq!(tokenizer.tokenize("rated 4.5 of 5"), vec!["rated", "4.5", "of", "5"]);
    }

    #[test]
    fn test_unicode() {
        let tokenizer = Tokenizer::default();
        let tokens = tokenizer.tokenize("Café résumé naïve");
        assert_eq!(tokens, vec!["café", "résumé", "naïve"]);
    }

    #[test]
    fn test_empty() {
        assert!(Tokenizer::default().tokenize("").is_empty());
        assert!(Tokenizer::default().tokenize("   \n\t").is_empty());
    }
}
