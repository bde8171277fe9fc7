//! The inventory ledger: an ordered time-series of net quantity changes for
//! one product-location.
//!
//! Backed by a `BTreeMap` keyed by timestamp, so iteration is always
//! ascending and no timestamp appears twice: `add` and `remove` accumulate
//! into the existing slot, `update` overwrites it.

use std::collections::BTreeMap;

use crate::fixed::{Fixed64, Timestamp};

/// Errors from ledger mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    /// `add` and `remove` take strictly positive quantities; use `update`
    /// to set an arbitrary net change.
    #[error("quantity must be positive")]
    NonPositiveQuantity,
}

/// Ordered map from timestamp to signed net quantity change.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct InventoryLedger {
    changes: BTreeMap<Timestamp, Fixed64>,
}

impl InventoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an arrival of `qty` at `time`, accumulating into any existing
    /// entry.
    pub fn add(&mut self, time: Timestamp, qty: Fixed64) -> Result<(), LedgerError> {
        if qty <= Fixed64::ZERO {
            return Err(LedgerError::NonPositiveQuantity);
        }
        *self.changes.entry(time).or_insert(Fixed64::ZERO) += qty;
        Ok(())
    }

    /// Record a departure of `qty` at `time`. Creates a negative entry when
    /// none exists -- symmetric accumulation with [`add`](Self::add).
    pub fn remove(&mut self, time: Timestamp, qty: Fixed64) -> Result<(), LedgerError> {
        if qty <= Fixed64::ZERO {
            return Err(LedgerError::NonPositiveQuantity);
        }
        *self.changes.entry(time).or_insert(Fixed64::ZERO) -= qty;
        Ok(())
    }

    /// Overwrite (or create) the net change at `time`. The only mutation
    /// that accepts zero or negative values directly.
    pub fn update(&mut self, time: Timestamp, net_change: Fixed64) {
        self.changes.insert(time, net_change);
    }

    /// Net change recorded at exactly `time`, zero when none.
    pub fn change_at(&self, time: Timestamp) -> Fixed64 {
        self.changes.get(&time).copied().unwrap_or(Fixed64::ZERO)
    }

    /// Inclusive prefix sum: every change with timestamp `<= time`.
    pub fn cumulative(&self, time: Timestamp) -> Fixed64 {
        self.changes
            .range(..=time)
            .fold(Fixed64::ZERO, |acc, (_, &change)| acc + change)
    }

    /// All changes, ascending by timestamp.
    pub fn changes(&self) -> impl Iterator<Item = (Timestamp, Fixed64)> + '_ {
        self.changes.iter().map(|(&t, &c)| (t, c))
    }

    /// Changes with `start <= timestamp <= end`, ascending. Empty when
    /// `start > end`.
    pub fn changes_in_range(&self, start: Timestamp, end: Timestamp) -> Vec<(Timestamp, Fixed64)> {
        if start > end {
            return Vec::new();
        }
        self.changes
            .range(start..=end)
            .map(|(&t, &c)| (t, c))
            .collect()
    }

    /// Timestamp of the earliest recorded change.
    pub fn first_change_at(&self) -> Option<Timestamp> {
        self.changes.keys().next().copied()
    }

    /// Timestamp of the latest recorded change.
    pub fn last_change_at(&self) -> Option<Timestamp> {
        self.changes.keys().next_back().copied()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
