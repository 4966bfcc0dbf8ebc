//! Memoization cache for recursive projections

use crate::run::CacheStats;
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Identity of one recursive projection: `F(base, rate, periods_ahead)`.
///
/// The rate participates at full decimal precision, so rates that differ
/// only in trailing digits are distinct keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    base: Decimal,
    rate: Decimal,
    periods_ahead: usize,
}

impl CacheKey {
    pub fn new(base: Decimal, rate: Decimal, periods_ahead: usize) -> Self {
        Self {
            base,
            rate,
            periods_ahead,
        }
    }
}

/// Projected values computed during one memoized forecast.
///
/// Entries are final once written: there is no eviction, and a second
/// insert under the same key keeps the first value.
#[derive(Debug, Default)]
pub struct MemoizationCache {
    entries: HashMap<CacheKey, Decimal>,
    hits: u64,
    misses: u64,
}

impl MemoizationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a key, recording the hit or miss
    pub fn get(&mut self, key: &CacheKey) -> Option<Decimal> {
        match self.entries.get(key) {
            Some(value) => {
                self.hits += 1;
                Some(*value)
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Store a computed value; returns the value held for the key
    pub fn insert(&mut self, key: CacheKey, value: Decimal) -> Decimal {
        *self.entries.entry(key).or_insert(value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Hit, miss and size counters
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            entries: self.entries.len(),
        }
    }
}
