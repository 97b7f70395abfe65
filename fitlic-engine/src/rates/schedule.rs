//! Published PRO rate schedules
//!
//! [`RateSchedule::current`] is the built-in 2025 schedule. A schedule for
//! another year can be loaded from TOML and is validated before use, so a
//! malformed table is rejected up front instead of silently producing zero
//! fees.

use super::{validate_non_negative, validate_percentages, GroupClassCharge, Tier, TierTable};
use crate::{Error, Result};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// SESAC rates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SesacRates {
    /// Flat fee per location, keyed by location count
    ///
    /// Decreases as location count grows (implicit volume discount).
    pub per_location: TierTable<Decimal>,
}

/// ASCAP rates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AscapRates {
    /// Keyed by total weekly participant capacity
    pub group_class: TierTable<GroupClassCharge>,

    /// Keyed by square footage, charged only for ambient-only facilities
    pub square_footage: TierTable<Decimal>,

    /// Discount percentage keyed by location count
    pub chain_discount: TierTable<Decimal>,

    /// Smallest location count eligible for a chain discount
    pub chain_discount_min_locations: u32,
}

/// BMI rates
///
/// Only the highest applicable per-member rate is charged, then the result
/// is clamped to `[minimum_fee, maximum_fee]` before discounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BmiRates {
    pub group_rate: Decimal,
    pub ambient_rate: Decimal,
    pub minimum_fee: Decimal,
    pub maximum_fee: Decimal,

    /// Discount percentage keyed by location count; lowest band is 0%
    pub chain_discount: TierTable<Decimal>,
}

/// GMR rates
///
/// GMR licenses are custom-negotiated; the schedule carries a flat
/// estimate rather than a tiered table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GmrRates {
    pub annual_fee: Decimal,
}

/// Complete rate schedule for one year
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateSchedule {
    pub year: u16,
    pub sesac: SesacRates,
    pub ascap: AscapRates,
    pub bmi: BmiRates,
    pub gmr: GmrRates,

    /// Trade association member discount (ASCAP and BMI)
    pub association_discount_percentage: Decimal,
}

impl Default for RateSchedule {
    fn default() -> Self {
        Self::current()
    }
}

impl RateSchedule {
    /// The built-in 2025 schedule
    pub fn current() -> Self {
        Self {
            year: 2025,
            sesac: SesacRates {
                per_location: TierTable::new(vec![
                    Tier::new(1, Some(9), dec!(413.00)),
                    Tier::new(10, Some(99), dec!(384.00)),
                    Tier::new(100, Some(250), dec!(342.00)),
                    Tier::new(251, Some(499), dec!(298.00)),
                    Tier::new(500, None, dec!(261.00)),
                ]),
            },
            ascap: AscapRates {
                group_class: TierTable::new(vec![
                    Tier::new(1, Some(500), GroupClassCharge::Flat(dec!(529))),
                    Tier::new(501, Some(1000), GroupClassCharge::Flat(dec!(687))),
                    Tier::new(1001, Some(1500), GroupClassCharge::Flat(dec!(805))),
                    Tier::new(1501, Some(2000), GroupClassCharge::Flat(dec!(923))),
                    Tier::new(2001, Some(3000), GroupClassCharge::Flat(dec!(1242))),
                    Tier::new(3001, Some(4000), GroupClassCharge::Flat(dec!(1398))),
                    Tier::new(4001, None, GroupClassCharge::PerParticipant(dec!(0.34))),
                ]),
                square_footage: TierTable::new(vec![
                    Tier::new(0, Some(3750), dec!(329)),
                    Tier::new(3751, Some(10000), dec!(435)),
                    Tier::new(10001, None, dec!(499)),
                ]),
                chain_discount: TierTable::new(vec![
                    Tier::new(10, Some(500), dec!(5)),
                    Tier::new(501, None, dec!(10)),
                ]),
                chain_discount_min_locations: 10,
            },
            bmi: BmiRates {
                group_rate: dec!(0.3670),
                ambient_rate: dec!(0.2570),
                minimum_fee: dec!(410),
                maximum_fee: dec!(2790),
                chain_discount: TierTable::new(vec![
                    Tier::new(1, Some(6), dec!(0)),
                    Tier::new(7, Some(50), dec!(5)),
                    Tier::new(51, Some(250), dec!(10)),
                    Tier::new(251, Some(750), dec!(15)),
                    Tier::new(751, None, dec!(20)),
                ]),
            },
            gmr: GmrRates {
                annual_fee: dec!(500),
            },
            association_discount_percentage: dec!(5),
        }
    }

    /// Parse and validate a schedule from a TOML document
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let schedule: RateSchedule = toml::from_str(s)?;
        schedule.validate()?;
        Ok(schedule)
    }

    /// Load and validate a schedule from a TOML file
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read rate schedule {}: {}", path.display(), e))
        })?;
        let schedule = Self::from_toml_str(&content)?;
        info!("Loaded {} rate schedule from {}", schedule.year, path.display());
        Ok(schedule)
    }

    /// Check every table is well-formed
    ///
    /// # Errors
    ///
    /// [`Error::InvalidRateSchedule`] naming the first offending table.
    pub fn validate(&self) -> Result<()> {
        self.sesac.per_location.validate("sesac.per_location", 1)?;
        validate_non_negative("sesac.per_location", &self.sesac.per_location, |fee| *fee)?;

        self.ascap.group_class.validate("ascap.group_class", 1)?;
        validate_non_negative("ascap.group_class", &self.ascap.group_class, GroupClassCharge::amount)?;
        let group_tiers = self.ascap.group_class.tiers();
        let last_index = group_tiers.len() - 1;
        for (index, tier) in group_tiers.iter().enumerate() {
            if let GroupClassCharge::PerParticipant(_) = tier.value {
                if index != last_index || !tier.is_unbounded() {
                    return Err(Error::InvalidRateSchedule(format!(
                        "ascap.group_class: tier {} charges per participant but is not the top unbounded tier",
                        index
                    )));
                }
            }
        }

        self.ascap.square_footage.validate("ascap.square_footage", 0)?;
        validate_non_negative("ascap.square_footage", &self.ascap.square_footage, |fee| *fee)?;
        self.ascap.chain_discount.validate(
            "ascap.chain_discount",
            u64::from(self.ascap.chain_discount_min_locations),
        )?;
        validate_percentages("ascap.chain_discount", &self.ascap.chain_discount)?;

        self.bmi.chain_discount.validate("bmi.chain_discount", 1)?;
        validate_percentages("bmi.chain_discount", &self.bmi.chain_discount)?;

        if self.bmi.minimum_fee > self.bmi.maximum_fee {
            return Err(Error::InvalidRateSchedule(format!(
                "bmi: minimum fee {} exceeds maximum fee {}",
                self.bmi.minimum_fee, self.bmi.maximum_fee
            )));
        }

        let non_negative = [
            ("bmi.group_rate", self.bmi.group_rate),
            ("bmi.ambient_rate", self.bmi.ambient_rate),
            ("bmi.minimum_fee", self.bmi.minimum_fee),
            ("gmr.annual_fee", self.gmr.annual_fee),
        ];
        for (name, value) in non_negative {
            if value < Decimal::ZERO {
                return Err(Error::InvalidRateSchedule(format!("{}: {} is negative", name, value)));
            }
        }

        let association = self.association_discount_percentage;
        if association < Decimal::ZERO || association > Decimal::ONE_HUNDRED {
            return Err(Error::InvalidRateSchedule(format!(
                "association_discount_percentage: {} out of range [0, 100]",
                association
            )));
        }

        Ok(())
    }
}
