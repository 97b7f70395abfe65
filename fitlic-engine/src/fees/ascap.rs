//! ASCAP fee calculation
//!
//! Charges, in order:
//! 1. Group-class fee by weekly participant capacity (Group use only)
//! 2. Ambient fee by square footage (Ambient use without Group; the group
//!    license subsumes ambient use)
//! 3. Chain discount for 10+ locations
//! 4. Association member discount on the already-discounted total

use super::{DiscountStep, FeeBreakdown, Organization, OrganizationFeeResult};
use crate::facility::FacilityDescription;
use crate::rates::RateSchedule;
use rust_decimal::Decimal;
use tracing::{debug, warn};

/// ASCAP annual fee per location
pub fn calculate_ascap_fee(facility: &FacilityDescription, rates: &RateSchedule) -> OrganizationFeeResult {
    let mut breakdown = FeeBreakdown::new(Organization::Ascap);

    if facility.has_group() {
        add_group_class_charge(facility, rates, &mut breakdown);
    }

    if facility.has_ambient() && !facility.has_group() && facility.square_footage > 0 {
        match rates.ascap.square_footage.lookup(u64::from(facility.square_footage)) {
            Some(tier) => breakdown.push("Ambient Uses Fee", tier.value),
            None => {
                warn!(
                    "ASCAP: {} sq ft outside ambient tiers, no ambient charge",
                    facility.square_footage
                );
                breakdown.set_note(format!(
                    "No ASCAP ambient tier covers {} sq ft",
                    facility.square_footage
                ));
            }
        }
    }

    let mut discounts = Vec::new();

    if facility.location_count >= rates.ascap.chain_discount_min_locations {
        if let Some(tier) = rates.ascap.chain_discount.lookup(u64::from(facility.location_count)) {
            discounts.push(DiscountStep::new(
                format!("Chain Discount ({}%)", tier.value),
                tier.value,
            ));
        }
    }

    if facility.is_association_member {
        let percentage = rates.association_discount_percentage;
        discounts.push(DiscountStep::new(
            format!("Association Member Discount ({}%)", percentage),
            percentage,
        ));
    }

    let result = breakdown.apply_discounts(discounts).finish();
    debug!(fee = %result.per_location_fee, "ASCAP fee calculated");
    result
}

/// Add the group-class line item, if it comes to more than zero
fn add_group_class_charge(
    facility: &FacilityDescription,
    rates: &RateSchedule,
    breakdown: &mut FeeBreakdown,
) {
    let participants = facility.total_weekly_participants();

    let fee = match rates.ascap.group_class.lookup(participants) {
        Some(tier) => tier.value.charge_for(participants),
        None => {
            // 0 participants lands below the first tier, which is expected
            if participants > 0 {
                warn!("ASCAP: {} weekly participants outside group tiers", participants);
                breakdown.set_note(format!(
                    "No ASCAP group class tier covers {} weekly participants",
                    participants
                ));
            }
            Decimal::ZERO
        }
    };

    if fee <= Decimal::ZERO {
        return;
    }

    let description = if facility.has_ambient() {
        format!(
            "{} participant capacity (Group Fitness Classes – covers ambient use)",
            participants
        )
    } else {
        format!("{} participant capacity (Group Fitness Classes)", participants)
    };
    breakdown.push(description, fee);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facility::{MusicUse, Room};
    use rust_decimal_macros::dec;

    fn group_facility(rooms: Vec<Room>) -> FacilityDescription {
        FacilityDescription {
            rooms,
            music_use_types: [MusicUse::Group].into_iter().collect(),
            ..Default::default()
        }
    }

    fn ambient_facility(square_footage: u32) -> FacilityDescription {
        FacilityDescription {
            square_footage,
            music_use_types: [MusicUse::Ambient].into_iter().collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_group_flat_tier() {
        let result = calculate_ascap_fee(&group_facility(vec![Room::new(10, 25)]), &RateSchedule::current());
        assert_eq!(result.per_location_fee, dec!(529));
        assert_eq!(result.line_items.len(), 1);
        assert_eq!(
            result.line_items[0].description,
            "250 participant capacity (Group Fitness Classes)"
        );
    }

    #[test]
    fn test_group_tier_boundaries() {
        let rates = RateSchedule::current();
        let cases = [
            (500, dec!(529)),
            (501, dec!(687)),
            (1000, dec!(687)),
            (1001, dec!(805)),
            (2000, dec!(923)),
            (3000, dec!(1242)),
            (4000, dec!(1398)),
            (4001, dec!(1360.34)),
        ];
        for (participants, expected) in cases {
            let result = calculate_ascap_fee(&group_facility(vec![Room::new(1, participants)]), &rates);
            assert_eq!(result.per_location_fee, expected, "{} participants", participants);
        }
    }

    #[test]
    fn test_group_per_participant_top_tier() {
        let result = calculate_ascap_fee(&group_facility(vec![Room::new(50, 100)]), &RateSchedule::current());
        assert_eq!(result.per_location_fee, dec!(1700));
    }

    #[test]
    fn test_group_without_rooms_charges_nothing() {
        let result = calculate_ascap_fee(&group_facility(vec![]), &RateSchedule::current());
        assert!(result.line_items.is_empty());
        assert_eq!(result.per_location_fee, Decimal::ZERO);
        assert!(result.note.is_none());
    }

    #[test]
    fn test_group_covers_ambient() {
        let mut facility = group_facility(vec![Room::new(10, 25)]);
        facility.music_use_types.insert(MusicUse::Ambient);
        facility.square_footage = 20_000;

        let result = calculate_ascap_fee(&facility, &RateSchedule::current());
        assert_eq!(result.line_items.len(), 1);
        assert!(result.line_items[0].description.ends_with("– covers ambient use)"));
        assert!(!result.line_items.iter().any(|item| item.description == "Ambient Uses Fee"));
        assert_eq!(result.per_location_fee, dec!(529));
    }

    #[test]
    fn test_ambient_square_footage_tiers() {
        let rates = RateSchedule::current();
        let cases = [(1, dec!(329)), (3750, dec!(329)), (3751, dec!(435)), (10000, dec!(435)), (10001, dec!(499))];
        for (square_footage, expected) in cases {
            let result = calculate_ascap_fee(&ambient_facility(square_footage), &rates);
            assert_eq!(result.per_location_fee, expected, "{} sq ft", square_footage);
            assert_eq!(result.line_items[0].description, "Ambient Uses Fee");
        }
    }

    #[test]
    fn test_ambient_zero_square_footage_charges_nothing() {
        let result = calculate_ascap_fee(&ambient_facility(0), &RateSchedule::current());
        assert!(result.line_items.is_empty());
        assert_eq!(result.per_location_fee, Decimal::ZERO);
    }

    #[test]
    fn test_rooms_ignored_without_group() {
        let mut facility = ambient_facility(5000);
        facility.rooms = vec![Room::new(40, 40)];
        let result = calculate_ascap_fee(&facility, &RateSchedule::current());
        assert_eq!(result.per_location_fee, dec!(435));
    }

    #[test]
    fn test_chain_then_association_discount_compound() {
        let mut facility = group_facility(vec![Room::new(10, 25)]);
        facility.location_count = 10;
        facility.is_association_member = true;

        let result = calculate_ascap_fee(&facility, &RateSchedule::current());
        let amounts: Vec<Decimal> = result.line_items.iter().map(|item| item.amount).collect();
        assert_eq!(amounts, vec![dec!(529), dec!(-26.45), dec!(-25.1275)]);
        assert_eq!(result.line_items[1].description, "Chain Discount (5%)");
        assert_eq!(result.line_items[2].description, "Association Member Discount (5%)");
        assert_eq!(result.per_location_fee, dec!(477.4225));
    }

    #[test]
    fn test_large_chain_discount() {
        let mut facility = ambient_facility(2000);
        facility.location_count = 501;
        let result = calculate_ascap_fee(&facility, &RateSchedule::current());
        assert_eq!(result.line_items[1].description, "Chain Discount (10%)");
        assert_eq!(result.per_location_fee, dec!(296.1));
    }

    #[test]
    fn test_no_chain_discount_below_ten_locations() {
        let mut facility = ambient_facility(2000);
        facility.location_count = 9;
        let result = calculate_ascap_fee(&facility, &RateSchedule::current());
        assert_eq!(result.line_items.len(), 1);
    }

    #[test]
    fn test_no_music_use_is_zero() {
        let facility = FacilityDescription {
            square_footage: 8000,
            rooms: vec![Room::new(10, 10)],
            ..Default::default()
        };
        let result = calculate_ascap_fee(&facility, &RateSchedule::current());
        assert_eq!(result.per_location_fee, Decimal::ZERO);
        assert!(result.line_items.is_empty());
    }
}
