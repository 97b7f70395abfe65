//! GMR fee estimate

use super::{FeeBreakdown, Organization, OrganizationFeeResult};
use crate::rates::RateSchedule;
use tracing::debug;

/// GMR annual fee per location
///
/// GMR licenses are negotiated case by case, so this is a flat estimate
/// regardless of facility size, music use or bundling. `location_count` is
/// taken for parity with the other calculators and only traced.
pub fn calculate_gmr_fee(location_count: u32, rates: &RateSchedule) -> OrganizationFeeResult {
    let mut breakdown = FeeBreakdown::new(Organization::Gmr);
    breakdown.push(
        "Estimated annual fee per location (custom-negotiated license)",
        rates.gmr.annual_fee,
    );
    breakdown.set_note("Estimate only; actual GMR fees are negotiated directly");

    let result = breakdown.finish();
    debug!(location_count, fee = %result.per_location_fee, "GMR estimate");
    result
}
