//! BMI fee calculation
//!
//! Per-member pricing: only the highest rate among the selected music uses
//! is charged. The raw charge is clamped to the schedule's minimum and
//! maximum before either discount, and both discounts compound against the
//! clamped total (association first, then chain).

use super::{DiscountStep, FeeBreakdown, Organization, OrganizationFeeResult};
use crate::facility::{FacilityDescription, MusicUse};
use crate::rates::{BmiRates, RateSchedule};
use rust_decimal::Decimal;
use tracing::debug;

/// BMI annual fee per location
pub fn calculate_bmi_fee(facility: &FacilityDescription, rates: &RateSchedule) -> OrganizationFeeResult {
    let bmi = &rates.bmi;
    let mut breakdown = FeeBreakdown::new(Organization::Bmi);

    let driver = applicable_rate(facility, bmi);
    let rate = driver.map_or(Decimal::ZERO, |(_, rate)| rate);
    let category = driver.map_or("No music type selected", |(music_use, _)| music_use.display_name());
    let raw = rate * Decimal::from(facility.total_members);

    breakdown.push(
        format!(
            "{} members @ ${:.4} per member ({})",
            facility.total_members, rate, category
        ),
        raw,
    );

    if raw < bmi.minimum_fee {
        breakdown.push(
            format!("Adjusted to minimum fee (${} minimum applies)", bmi.minimum_fee),
            bmi.minimum_fee - raw,
        );
    } else if raw > bmi.maximum_fee {
        breakdown.push(
            format!("Adjusted to maximum fee (${} maximum applies)", bmi.maximum_fee),
            bmi.maximum_fee - raw,
        );
    }

    let mut discounts = Vec::new();

    if facility.is_association_member {
        let percentage = rates.association_discount_percentage;
        discounts.push(DiscountStep::new(
            format!("Association Member Discount ({}%)", percentage),
            percentage,
        ));
    }

    // Lowest band covers 1-6 locations at 0%, which adds no line item
    if let Some(tier) = bmi.chain_discount.lookup(u64::from(facility.location_count)) {
        discounts.push(DiscountStep::new(
            format!("Chain Discount ({}%)", tier.value),
            tier.value,
        ));
    }

    let result = breakdown.apply_discounts(discounts).finish();
    debug!(
        fee = %result.per_location_fee,
        raw = %raw,
        category,
        "BMI fee calculated"
    );
    result
}

/// Highest per-member rate among the selected music uses
///
/// Ties go to the first use in [`MusicUse`] order (Group). `None` when no
/// music use is selected.
fn applicable_rate(facility: &FacilityDescription, bmi: &BmiRates) -> Option<(MusicUse, Decimal)> {
    facility
        .music_use_types
        .iter()
        .map(|music_use| {
            let rate = match music_use {
                MusicUse::Group => bmi.group_rate,
                MusicUse::Ambient => bmi.ambient_rate,
            };
            (*music_use, rate)
        })
        .fold(None, |best, candidate| match best {
            Some((_, best_rate)) if best_rate >= candidate.1 => best,
            _ => Some(candidate),
        })
}
