//! Rate tables
//!
//! Every PRO rate table is an ordered list of contiguous, non-overlapping
//! tiers keyed on a whole-number facility attribute (locations, weekly
//! participants, square feet). Tables hold at most a handful of entries, so
//! lookup is a linear scan returning `Option`.

mod schedule;

pub use schedule::{AscapRates, BmiRates, GmrRates, RateSchedule, SesacRates};

use crate::{Error, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A contiguous numeric band mapped to a value
///
/// Both bounds are inclusive. `max: None` means the band is unbounded above.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tier<V> {
    pub min: u64,
    #[serde(default)]
    pub max: Option<u64>,
    pub value: V,
}

impl<V> Tier<V> {
    pub fn new(min: u64, max: Option<u64>, value: V) -> Self {
        Self { min, max, value }
    }

    pub fn contains(&self, key: u64) -> bool {
        key >= self.min && self.max.map_or(true, |max| key <= max)
    }

    pub fn is_unbounded(&self) -> bool {
        self.max.is_none()
    }
}

/// ASCAP group-class tier value
///
/// Every band but the top one is a flat fee; the top, unbounded band charges
/// per weekly participant instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupClassCharge {
    Flat(Decimal),
    PerParticipant(Decimal),
}

impl GroupClassCharge {
    /// Annual charge for the given participant count
    pub fn charge_for(&self, participants: u64) -> Decimal {
        match self {
            GroupClassCharge::Flat(fee) => *fee,
            GroupClassCharge::PerParticipant(rate) => *rate * Decimal::from(participants),
        }
    }

    /// The flat fee or per-participant rate
    pub fn amount(&self) -> Decimal {
        match self {
            GroupClassCharge::Flat(amount) | GroupClassCharge::PerParticipant(amount) => *amount,
        }
    }
}

/// Ordered tier table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TierTable<V>(Vec<Tier<V>>);

impl<V> TierTable<V> {
    pub fn new(tiers: Vec<Tier<V>>) -> Self {
        Self(tiers)
    }

    pub fn tiers(&self) -> &[Tier<V>] {
        &self.0
    }

    /// Find the tier containing `key`
    ///
    /// Returns `None` when the key falls outside every tier. Callers treat
    /// that as a zero fee with a note, not as an error.
    pub fn lookup(&self, key: u64) -> Option<&Tier<V>> {
        let found = self.0.iter().find(|tier| tier.contains(key));
        tracing::trace!(key, matched = found.is_some(), "tier lookup");
        found
    }

    /// Structural validation
    ///
    /// Checks the table is non-empty, starts at `floor`, has `min <= max`
    /// in every tier, is contiguous (`next.min == prev.max + 1`) and that
    /// only the last tier is unbounded.
    pub fn validate(&self, name: &str, floor: u64) -> Result<()> {
        let first = self
            .0
            .first()
            .ok_or_else(|| Error::InvalidRateSchedule(format!("{}: table is empty", name)))?;

        if first.min != floor {
            return Err(Error::InvalidRateSchedule(format!(
                "{}: first tier starts at {}, expected {}",
                name, first.min, floor
            )));
        }

        let last_index = self.0.len() - 1;
        for (index, tier) in self.0.iter().enumerate() {
            match tier.max {
                Some(max) if max < tier.min => {
                    return Err(Error::InvalidRateSchedule(format!(
                        "{}: tier {} has max {} below min {}",
                        name, index, max, tier.min
                    )));
                }
                None if index != last_index => {
                    return Err(Error::InvalidRateSchedule(format!(
                        "{}: tier {} is unbounded but is not the last tier",
                        name, index
                    )));
                }
                _ => {}
            }

            if let Some(next) = self.0.get(index + 1) {
                // Unbounded tiers can only be last, checked above
                let max = tier.max.unwrap_or(u64::MAX);
                if next.min != max.saturating_add(1) {
                    return Err(Error::InvalidRateSchedule(format!(
                        "{}: tier {} ends at {} but tier {} starts at {} (gap or overlap)",
                        name,
                        index,
                        max,
                        index + 1,
                        next.min
                    )));
                }
            }
        }

        Ok(())
    }
}

/// Validate that every value in a percentage table lies within 0-100
pub(crate) fn validate_percentages(name: &str, table: &TierTable<Decimal>) -> Result<()> {
    for (index, tier) in table.tiers().iter().enumerate() {
        if tier.value < Decimal::ZERO || tier.value > Decimal::ONE_HUNDRED {
            return Err(Error::InvalidRateSchedule(format!(
                "{}: tier {} percentage {} out of range [0, 100]",
                name, index, tier.value
            )));
        }
    }
    Ok(())
}

/// Reject any tier whose amount is below zero
pub(crate) fn validate_non_negative<V>(
    name: &str,
    table: &TierTable<V>,
    amount: impl Fn(&V) -> Decimal,
) -> Result<()> {
    for (index, tier) in table.tiers().iter().enumerate() {
        let value = amount(&tier.value);
        if value < Decimal::ZERO {
            return Err(Error::InvalidRateSchedule(format!(
                "{}: tier {} amount {} is negative",
                name, index, value
            )));
        }
    }
    Ok(())
}
