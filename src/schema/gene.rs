//! The gene type: a fixed-length quaternary symbol string, the unit of search.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Number of symbol positions in every gene.
pub const GENE_LENGTH: usize = 50;

/// Size of the symbol alphabet; valid symbols are `0..SYMBOL_COUNT`.
pub const SYMBOL_COUNT: u8 = 4;

/// An immutable ordered sequence of `GENE_LENGTH` symbols over `{0,1,2,3}`.
///
/// Equality is by content; the text form is a string of `GENE_LENGTH` decimal
/// digits, one per position, with the digit value equal to the symbol.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Gene {
    symbols: [u8; GENE_LENGTH],
}

impl Gene {
    /// The all-1s gene, the canonical weak baseline anchor.
    pub const ALL_ONES: Gene = Gene {
        symbols: [1; GENE_LENGTH],
    };

    /// The all-3s gene, the canonical strong baseline anchor.
    pub const ALL_THREES: Gene = Gene {
        symbols: [3; GENE_LENGTH],
    };

    /// Create a gene from a full symbol array, validating the alphabet.
    pub fn new(symbols: [u8; GENE_LENGTH]) -> Result<Self, GeneError> {
        for (position, &value) in symbols.iter().enumerate() {
            if value >= SYMBOL_COUNT {
                return Err(GeneError::InvalidSymbol { position, value });
            }
        }
        Ok(Self { symbols })
    }

    /// Create a gene from a slice, validating both length and alphabet.
    pub fn from_symbols(symbols: &[u8]) -> Result<Self, GeneError> {
        let symbols: [u8; GENE_LENGTH] =
            symbols.try_into().map_err(|_| GeneError::WrongLength {
                expected: GENE_LENGTH,
                got: symbols.len(),
            })?;
        Self::new(symbols)
    }

    /// Create a gene with every position set to the same symbol.
    pub fn uniform(symbol: u8) -> Result<Self, GeneError> {
        Self::new([symbol; GENE_LENGTH])
    }

    /// View the symbol array.
    #[inline]
    pub fn symbols(&self) -> &[u8; GENE_LENGTH] {
        &self.symbols
    }

    /// Mutable access for the stochastic operators; writers must keep every
    /// symbol inside the alphabet.
    #[inline]
    pub(crate) fn symbols_mut(&mut self) -> &mut [u8; GENE_LENGTH] {
        &mut self.symbols
    }

    /// Construct from symbols already known to be in-alphabet.
    #[inline]
    pub(crate) fn from_raw(symbols: [u8; GENE_LENGTH]) -> Self {
        debug_assert!(symbols.iter().all(|&value| value < SYMBOL_COUNT));
        Self { symbols }
    }
}

impl fmt::Display for Gene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &symbol in &self.symbols {
            write!(f, "{symbol}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Gene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Gene(\"{self}\")")
    }
}

impl FromStr for Gene {
    type Err = GeneError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let length = text.chars().count();
        if length != GENE_LENGTH {
            return Err(GeneError::WrongLength {
                expected: GENE_LENGTH,
                got: length,
            });
        }
        let mut symbols = [0u8; GENE_LENGTH];
        for (position, character) in text.chars().enumerate() {
            let value = character
                .to_digit(10)
                .filter(|&digit| digit < u32::from(SYMBOL_COUNT))
                .ok_or(GeneError::InvalidCharacter {
                    position,
                    character,
                })?;
            symbols[position] = value as u8;
        }
        Ok(Self { symbols })
    }
}

impl Serialize for Gene {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Gene {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// Gene construction and parsing errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GeneError {
    #[error("gene must have exactly {expected} symbols, got {got}")]
    WrongLength { expected: usize, got: usize },
    #[error("symbol {value} at position {position} is outside the 0..=3 alphabet")]
    InvalidSymbol { position: usize, value: u8 },
    #[error("character {character:?} at position {position} is not a digit in 0..=3")]
    InvalidCharacter { position: usize, character: char },
}
