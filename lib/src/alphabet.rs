//! Symbol alphabets
//!
//! An alphabet is the ordered set of symbols a luminance rendering may draw
//! from. Order matters: it breaks ties when two glyphs cover the same area.

use crate::error::{Error, Result};
use std::collections::HashSet;

/// Printable ASCII in `string.printable` order (digits, lowercase, uppercase,
/// punctuation, space) with `_` and control whitespace left out.
pub const DEFAULT_SYMBOLS: &str = concat!(
    "0123456789",
    "abcdefghijklmnopqrstuvwxyz",
    "ABCDEFGHIJKLMNOPQRSTUVWXYZ",
    "!\"#$%&'()*+,-./:;<=>?@[\\]^`{|}~",
    " ",
);

/// An ordered sequence of unique, non-empty symbols
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    symbols: Vec<String>,
}

impl Alphabet {
    /// Build an alphabet from symbols, keeping their order.
    ///
    /// Fails if the list is empty, contains an empty symbol or repeats one.
    pub fn new<I, S>(symbols: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let symbols: Vec<String> = symbols.into_iter().map(Into::into).collect();
        if symbols.is_empty() {
            return Err(Error::config("alphabet must contain at least one symbol"));
        }

        let mut seen = HashSet::with_capacity(symbols.len());
        for symbol in &symbols {
            if symbol.is_empty() {
                return Err(Error::config("alphabet symbols must not be empty"));
            }
            if !seen.insert(symbol.as_str()) {
                return Err(Error::config(format!(
                    "alphabet contains '{}' more than once",
                    symbol
                )));
            }
        }

        Ok(Self { symbols })
    }

    /// One symbol per character of `chars`
    pub fn from_chars(chars: &str) -> Result<Self> {
        Self::new(chars.chars().map(String::from))
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.symbols.iter().any(|s| s == symbol)
    }

    /// True if every symbol of `self` appears in `other`
    pub fn is_subset_of<S: AsRef<str>>(&self, other: &[S]) -> bool {
        let other: HashSet<&str> = other.iter().map(AsRef::as_ref).collect();
        self.symbols.iter().all(|s| other.contains(s.as_str()))
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self {
            symbols: DEFAULT_SYMBOLS.chars().map(String::from).collect(),
        }
    }
}
