//! Favorite currency pairs.

use crate::core::currency::CurrencyCode;
use crate::core::error::FxError;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FavoritePair {
    pub from: CurrencyCode,
    pub to: CurrencyCode,
}

impl Display for FavoritePair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.from, self.to)
    }
}

/// Ordered list of distinct pairs, each between two different currencies.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Favorites {
    pairs: Vec<FavoritePair>,
}

impl Favorites {
    /// Builds the list, keeping the first occurrence of duplicated pairs.
    pub fn from_pairs(pairs: impl IntoIterator<Item = FavoritePair>) -> Result<Self, FxError> {
        let mut favorites = Self::default();
        for pair in pairs {
            favorites.add(pair)?;
        }
        Ok(favorites)
    }

    /// Returns `false` when the pair was already present.
    pub fn add(&mut self, pair: FavoritePair) -> Result<bool, FxError> {
        if pair.from == pair.to {
            return Err(FxError::invalid(format!(
                "favorite pair needs two different currencies, got {pair}"
            )));
        }
        if self.pairs.contains(&pair) {
            return Ok(false);
        }
        self.pairs.push(pair);
        Ok(true)
    }

    /// Returns `false` when the pair was not present.
    pub fn remove(&mut self, pair: &FavoritePair) -> bool {
        let before = self.pairs.len();
        self.pairs.retain(|p| p != pair);
        self.pairs.len() != before
    }

    pub fn pairs(&self) -> &[FavoritePair] {
        &self.pairs
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}
