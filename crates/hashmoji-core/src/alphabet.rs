//! The ordered emoji alphabet used to display digest bytes.
//!
//! The alphabet is built by walking a fixed list of pictographic code-point
//! ranges in declared order and keeping every scalar value that carries the
//! Unicode `Emoji` property. Encoding and decoding both index into this list,
//! so its contents and order must be identical on every run.

use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;
use std::ops::RangeInclusive;
use unicode_properties::UnicodeEmoji;

use crate::error::{CoreError, Result};

/// Code-point ranges scanned for alphabet symbols, in order.
pub const SYMBOL_RANGES: [RangeInclusive<u32>; 8] = [
    0x1F300..=0x1F5FF, // Miscellaneous Symbols and Pictographs
    0x1F600..=0x1F64F, // Emoticons
    0x1F680..=0x1F6FF, // Transport and Map Symbols
    0x1F700..=0x1F77F, // Alchemical Symbols
    0x1F780..=0x1F7FF, // Geometric Shapes Extended
    0x1F800..=0x1F8FF, // Supplemental Arrows-C
    0x1F900..=0x1F9FF, // Supplemental Symbols and Pictographs
    0x1FA70..=0x1FAFF, // Symbols and Pictographs Extended-A
];

static GLOBAL: Lazy<SymbolAlphabet> = Lazy::new(|| {
    let alphabet = SymbolAlphabet::build();
    tracing::debug!(symbols = alphabet.len(), "Built symbol alphabet");
    alphabet
});

/// An ordered, deduplicated list of single-scalar display symbols.
///
/// Never empty.
#[derive(Clone, PartialEq, Eq)]
pub struct SymbolAlphabet {
    symbols: Vec<char>,
    positions: HashMap<char, usize>,
}

impl SymbolAlphabet {
    /// Returns the process-wide alphabet, building it on first use.
    ///
    /// Concurrent first callers block until a single build completes and
    /// then all observe the same value.
    #[must_use]
    pub fn global() -> &'static Self {
        &GLOBAL
    }

    /// Builds a fresh alphabet from [`SYMBOL_RANGES`].
    #[must_use]
    pub fn build() -> Self {
        Self::collect(&SYMBOL_RANGES)
    }

    /// Builds an alphabet from custom ranges, keeping only emoji scalars.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidInput`] if no code point in the ranges is
    /// an emoji.
    pub fn from_ranges(ranges: &[RangeInclusive<u32>]) -> Result<Self> {
        let alphabet = Self::collect(ranges);
        if alphabet.is_empty() {
            return Err(CoreError::invalid_input("alphabet ranges contain no emoji"));
        }
        Ok(alphabet)
    }

    fn collect(ranges: &[RangeInclusive<u32>]) -> Self {
        let mut symbols = Vec::new();
        let mut positions = HashMap::new();

        for range in ranges {
            for c in range.clone().filter_map(char::from_u32) {
                if c.is_emoji_char() && !positions.contains_key(&c) {
                    positions.insert(c, symbols.len());
                    symbols.push(c);
                }
            }
        }

        Self { symbols, positions }
    }

    /// Returns the number of symbols.
    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Returns whether the alphabet has no symbols.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Returns the symbol at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<char> {
        self.symbols.get(index).copied()
    }

    /// Returns the first index of `symbol`.
    #[must_use]
    pub fn position(&self, symbol: char) -> Option<usize> {
        self.positions.get(&symbol).copied()
    }

    /// Returns whether `symbol` belongs to the alphabet.
    #[must_use]
    pub fn contains(&self, symbol: char) -> bool {
        self.positions.contains_key(&symbol)
    }

    /// Iterates the symbols in alphabet order.
    pub fn iter(&self) -> impl Iterator<Item = char> + '_ {
        self.symbols.iter().copied()
    }

    /// Returns the symbols as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[char] {
        &self.symbols
    }
}

impl fmt::Debug for SymbolAlphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SymbolAlphabet")
            .field("len", &self.symbols.len())
            .finish_non_exhaustive()
    }
}
