// lucy/src/tokenizer.rs
//! Regex tokenizer
//!
//! Splits text into the non-overlapping matches of a pattern. The same
//! tokenizer can be plugged into the engine as the analyzer of a full-text
//! field, where it is registered under [`RegexTokenizer::engine_name`].

use once_cell::sync::Lazy;
use regex::Regex;
use tantivy::tokenizer::{Token, TokenStream, Tokenizer};

use crate::error::{Error, Result};

/// Word characters, optionally joined by apostrophes ("don't", "o’clock").
pub const DEFAULT_PATTERN: &str = r"\w+(?:[\x{2019}']\w+)*";

/// Prefix of the engine-side tokenizer name; the pattern follows it.
pub const ENGINE_NAME_PREFIX: &str = "lucy_regex:";

static DEFAULT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(DEFAULT_PATTERN).expect("default tokenizer pattern compiles"));

#[derive(Debug, Clone)]
pub struct RegexTokenizer {
    regex: Regex,
}

impl RegexTokenizer {
    /// Compile `pattern`.
    ///
    /// Patterns that match the empty string (`a*`, `\s*`) are rejected, as
    /// they would produce a token at every position of the input.
    pub fn new(pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern).map_err(|e| Error::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;
        if regex.is_match("") {
            return Err(Error::InvalidPattern {
                pattern: pattern.to_string(),
                reason: "pattern matches the empty string".to_string(),
            });
        }
        tracing::debug!(pattern, "compiled regex tokenizer");
        Ok(Self { regex })
    }

    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    /// Split `text` into tokens, in order of occurrence.
    ///
    /// Zero-width matches (possible with lookaround-style assertions such
    /// as `\b`) are skipped, so no token is ever empty.
    pub fn split(&self, text: &str) -> Vec<String> {
        self.regex
            .find_iter(text)
            .filter(|m| !m.is_empty())
            .map(|m| m.as_str().to_string())
            .collect()
    }

    /// Name under which this tokenizer is registered with the engine.
    pub fn engine_name(&self) -> String {
        format!("{}{}", ENGINE_NAME_PREFIX, self.pattern())
    }

    /// Rebuild a tokenizer from an engine tokenizer name.
    ///
    /// Returns `None` if the name was not produced by [`Self::engine_name`].
    pub fn from_engine_name(name: &str) -> Option<Result<Self>> {
        name.strip_prefix(ENGINE_NAME_PREFIX).map(Self::new)
    }
}

impl Default for RegexTokenizer {
    fn default() -> Self {
        Self {
            regex: DEFAULT_REGEX.clone(),
        }
    }
}

impl PartialEq for RegexTokenizer {
    fn eq(&self, other: &Self) -> bool {
        self.pattern() == other.pattern()
    }
}

impl Eq for RegexTokenizer {}

impl Tokenizer for RegexTokenizer {
    type TokenStream<'a> = RegexTokenStream<'a>;

    fn token_stream<'a>(&'a mut self, text: &'a str) -> RegexTokenStream<'a> {
        RegexTokenStream {
            matches: self.regex.find_iter(text),
            token: Token::default(),
        }
    }
}

pub struct RegexTokenStream<'a> {
    matches: regex::Matches<'a, 'a>,
    token: Token,
}

impl TokenStream for RegexTokenStream<'_> {
    fn advance(&mut self) -> bool {
        for m in self.matches.by_ref() {
            if m.is_empty() {
                continue;
            }
            self.token.text.clear();
            self.token.text.push_str(m.as_str());
            self.token.offset_from = m.start();
            self.token.offset_to = m.end();
            self.token.position = self.token.position.wrapping_add(1);
            return true;
        }
        false
    }

    fn token(&self) -> &Token {
        &self.token
    }

    fn token_mut(&mut self) -> &mut Token {
        &mut self.token
    }
}
