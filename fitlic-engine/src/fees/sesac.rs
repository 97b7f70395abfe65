//! SESAC fee calculation

use super::{FeeBreakdown, Organization, OrganizationFeeResult};
use crate::facility::FacilityDescription;
use crate::rates::RateSchedule;
use rust_decimal::Decimal;
use tracing::{debug, warn};

/// SESAC annual fee per location
///
/// Bundled platform users owe nothing: the platform's own license already
/// covers SESAC's ambient repertoire. Everyone else pays the flat fee of
/// their location-count tier, with no further modifiers.
pub fn calculate_sesac_fee(facility: &FacilityDescription, rates: &RateSchedule) -> OrganizationFeeResult {
    let mut breakdown = FeeBreakdown::new(Organization::Sesac);

    if facility.is_bundled_platform_user {
        breakdown.push("Not required for bundled platform users", Decimal::ZERO);
        breakdown.set_note("Not required with bundled platform");
        debug!("SESAC waived for bundled platform user");
        return breakdown.finish();
    }

    match rates.sesac.per_location.lookup(u64::from(facility.location_count)) {
        Some(tier) => {
            breakdown.push(
                format!("Per location fee for {} location tier", facility.location_count),
                tier.value,
            );
        }
        None => {
            warn!(
                "SESAC: location count {} outside rate tiers, reporting zero fee",
                facility.location_count
            );
            breakdown.push("Number of locations out of range", Decimal::ZERO);
            breakdown.set_note(format!(
                "No SESAC tier covers {} locations",
                facility.location_count
            ));
        }
    }

    let result = breakdown.finish();
    debug!(fee = %result.per_location_fee, "SESAC fee calculated");
    result
}
