use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Width of a gene's external hexadecimal token form.
pub const GENE_HEX_WIDTH: usize = 8;

/// A malformed gene token. Raised at parse time so that a constructed
/// [`Gene`] always decodes; a genome containing a bad token is rejected
/// wholesale rather than silently defaulted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Token is not exactly [`GENE_HEX_WIDTH`] characters.
    #[error("gene token must be {GENE_HEX_WIDTH} hex digits, got {0}")]
    BadLength(usize),
    /// Token contains a character outside `[0-9a-fA-F]`.
    #[error("gene token contains non-hexadecimal character {0:?}")]
    BadCharacter(char),
}

/// One gene: a 32-bit packed connection descriptor.
///
/// The external form is an 8-hex-digit token; the bit layout (source byte,
/// sink byte, 16-bit weight field) is interpreted by `petri_core`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Gene(u32);

impl Gene {
    /// Wraps a raw 32-bit pattern. Every pattern is a valid gene.
    #[must_use]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// The raw 32-bit pattern.
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Parses an 8-hex-digit token.
    pub fn from_hex(token: &str) -> Result<Self, DecodeError> {
        if token.len() != GENE_HEX_WIDTH {
            return Err(DecodeError::BadLength(token.len()));
        }
        let mut bits = 0u32;
        for c in token.chars() {
            let digit = c.to_digit(16).ok_or(DecodeError::BadCharacter(c))?;
            bits = (bits << 4) | digit;
        }
        Ok(Self(bits))
    }

    /// Renders the lowercase zero-padded token form.
    #[must_use]
    pub fn to_hex(self) -> String {
        format!("{:08x}", self.0)
    }
}

impl Serialize for Gene {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Gene {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let token = String::deserialize(deserializer)?;
        Self::from_hex(&token).map_err(de::Error::custom)
    }
}

/// An agent's complete genetic blueprint: an ordered gene sequence of fixed
/// configured length. Immutable in practice; only replaced wholesale on
/// reproduction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Genome(pub Vec<Gene>);

impl Genome {
    /// Number of genes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The genes in genome order.
    #[must_use]
    pub fn genes(&self) -> &[Gene] {
        &self.0
    }

    /// Parses a sequence of hex tokens, one per gene.
    pub fn from_tokens<'a, I>(tokens: I) -> Result<Self, DecodeError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        tokens
            .into_iter()
            .map(Gene::from_hex)
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }

    /// Renders the serialized token form, one token per gene.
    #[must_use]
    pub fn to_tokens(&self) -> Vec<String> {
        self.0.iter().map(|g| g.to_hex()).collect()
    }
}
