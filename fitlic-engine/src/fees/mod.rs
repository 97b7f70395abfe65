//! Per-organization fee calculators and the aggregator
//!
//! Each calculator is an independent pure function of a
//! [`FacilityDescription`] and a [`RateSchedule`]. They share nothing but
//! the [`OrganizationFeeResult`] shape, which is only ever built through
//! [`FeeBreakdown`] so that `per_location_fee` is always the exact sum of
//! the line items.

mod ascap;
mod bmi;
mod gmr;
mod sesac;

pub use ascap::calculate_ascap_fee;
pub use bmi::calculate_bmi_fee;
pub use gmr::calculate_gmr_fee;
pub use sesac::calculate_sesac_fee;

use crate::facility::FacilityDescription;
use crate::rates::RateSchedule;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Performing rights organizations covered by the estimate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Organization {
    Sesac,
    Ascap,
    Bmi,
    Gmr,
}

impl Organization {
    pub fn display_name(&self) -> &'static str {
        match self {
            Organization::Sesac => "SESAC",
            Organization::Ascap => "ASCAP",
            Organization::Bmi => "BMI",
            Organization::Gmr => "GMR",
        }
    }

    /// All organizations in aggregator order
    pub fn all_variants() -> &'static [Organization] {
        &[
            Organization::Sesac,
            Organization::Ascap,
            Organization::Bmi,
            Organization::Gmr,
        ]
    }
}

impl std::fmt::Display for Organization {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// One line of an itemized fee
///
/// Negative amounts are discounts or downward adjustments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeLineItem {
    pub description: String,
    pub amount: Decimal,
}

/// Itemized annual fee owed to one organization, per location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationFeeResult {
    pub organization: Organization,
    pub line_items: Vec<FeeLineItem>,
    pub per_location_fee: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl OrganizationFeeResult {
    /// Annual fee across `location_count` locations
    pub fn total_for_locations(&self, location_count: u32) -> Decimal {
        self.per_location_fee * Decimal::from(location_count)
    }

    /// Sum of line item amounts
    ///
    /// Always equal to `per_location_fee`; exposed for callers that want to
    /// assert it.
    pub fn line_item_total(&self) -> Decimal {
        self.line_items.iter().map(|item| item.amount).sum()
    }
}

/// A percentage reduction applied to the running total
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct DiscountStep {
    pub description: String,
    pub percentage: Decimal,
}

impl DiscountStep {
    pub fn new(description: impl Into<String>, percentage: Decimal) -> Self {
        Self {
            description: description.into(),
            percentage,
        }
    }
}

/// Accumulates line items and their running total in lockstep
#[derive(Debug)]
pub(crate) struct FeeBreakdown {
    organization: Organization,
    line_items: Vec<FeeLineItem>,
    total: Decimal,
    note: Option<String>,
}

impl FeeBreakdown {
    pub fn new(organization: Organization) -> Self {
        Self {
            organization,
            line_items: Vec::new(),
            total: Decimal::ZERO,
            note: None,
        }
    }

    pub fn push(&mut self, description: impl Into<String>, amount: Decimal) {
        self.line_items.push(FeeLineItem {
            description: description.into(),
            amount,
        });
        self.total += amount;
    }

    pub fn set_note(&mut self, note: impl Into<String>) {
        self.note = Some(note.into());
    }

    /// Apply discounts in order, each against the total left by the previous
    ///
    /// Discounts compound: 5% then 5% is 9.75%, not 10%. Zero-percentage
    /// steps add no line item.
    pub fn apply_discounts<I>(self, steps: I) -> Self
    where
        I: IntoIterator<Item = DiscountStep>,
    {
        steps.into_iter().fold(self, |mut breakdown, step| {
            if step.percentage > Decimal::ZERO {
                let discount = breakdown.total * (step.percentage / Decimal::ONE_HUNDRED);
                breakdown.push(step.description, -discount);
            }
            breakdown
        })
    }

    pub fn finish(self) -> OrganizationFeeResult {
        OrganizationFeeResult {
            organization: self.organization,
            line_items: self.line_items,
            per_location_fee: self.total,
            note: self.note,
        }
    }
}

/// Fees for every organization, in fixed order SESAC, ASCAP, BMI, GMR
pub fn calculate_total_fees(
    facility: &FacilityDescription,
    rates: &RateSchedule,
) -> Vec<OrganizationFeeResult> {
    let fees = vec![
        calculate_sesac_fee(facility, rates),
        calculate_ascap_fee(facility, rates),
        calculate_bmi_fee(facility, rates),
        calculate_gmr_fee(facility.location_count, rates),
    ];
    debug!(
        total = %sum_per_location_fees(&fees),
        "Calculated fees for all organizations"
    );
    fees
}

/// Sum of per-location fees
pub fn sum_per_location_fees(fees: &[OrganizationFeeResult]) -> Decimal {
    fees.iter().map(|fee| fee.per_location_fee).sum()
}
