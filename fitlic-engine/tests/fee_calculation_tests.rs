//! Integration tests for the fee calculators and aggregator
//!
//! Covers:
//! - The reference facility walk-throughs (ambient-only single site,
//!   group classes, per-participant top tier, chain + association stacking)
//! - Additivity of line items for every organization
//! - BMI clamp bounds, ASCAP ambient exclusion, SESAC bundled exemption
//! - Discount non-negativity and idempotence
//! - Zero-valued input everywhere

use fitlic_engine::fees::{calculate_ascap_fee, calculate_bmi_fee, calculate_sesac_fee};
use fitlic_engine::{
    calculate_total_fees, FacilityDescription, MusicUse, Organization, OrganizationFeeResult,
    RateSchedule, Room,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::BTreeSet;

fn uses(list: &[MusicUse]) -> BTreeSet<MusicUse> {
    list.iter().copied().collect()
}

/// A spread of facilities exercising every branch
fn facility_matrix() -> Vec<FacilityDescription> {
    let use_sets = [
        uses(&[]),
        uses(&[MusicUse::Group]),
        uses(&[MusicUse::Ambient]),
        uses(&[MusicUse::Group, MusicUse::Ambient]),
    ];
    let room_sets = [
        vec![],
        vec![Room::new(10, 25)],
        vec![Room::new(30, 40), Room::new(20, 35)],
        vec![Room::new(100, 60)],
    ];

    let mut facilities = Vec::new();
    for music_use_types in &use_sets {
        for rooms in &room_sets {
            for &location_count in &[0u32, 1, 7, 10, 60, 501, 800] {
                for &total_members in &[0u32, 500, 3000, 12_000] {
                    for &square_footage in &[0u32, 3750, 12_000] {
                        for &is_association_member in &[false, true] {
                            facilities.push(FacilityDescription {
                                location_count,
                                total_members,
                                rooms: rooms.clone(),
                                square_footage,
                                music_use_types: music_use_types.clone(),
                                is_association_member,
                                is_bundled_platform_user: location_count % 2 == 0,
                            });
                        }
                    }
                }
            }
        }
    }
    facilities
}

fn find(fees: &[OrganizationFeeResult], organization: Organization) -> &OrganizationFeeResult {
    fees.iter()
        .find(|fee| fee.organization == organization)
        .expect("every organization is present")
}

#[test]
fn test_single_site_ambient_only_walkthrough() {
    let facility = FacilityDescription {
        location_count: 1,
        total_members: 500,
        rooms: vec![],
        square_footage: 0,
        music_use_types: uses(&[MusicUse::Ambient]),
        is_association_member: false,
        is_bundled_platform_user: false,
    };
    let fees = calculate_total_fees(&facility, &RateSchedule::current());

    let sesac = find(&fees, Organization::Sesac);
    assert_eq!(sesac.per_location_fee, dec!(413.00));

    let ascap = find(&fees, Organization::Ascap);
    assert!(ascap.line_items.is_empty(), "zero sq ft adds no ambient line");
    assert_eq!(ascap.per_location_fee, Decimal::ZERO);

    let bmi = find(&fees, Organization::Bmi);
    assert_eq!(bmi.line_items[0].amount, dec!(128.50));
    assert_eq!(bmi.per_location_fee, dec!(410));

    let gmr = find(&fees, Organization::Gmr);
    assert_eq!(gmr.per_location_fee, dec!(500));
}

#[test]
fn test_group_classes_flat_tier_without_ambient_line() {
    let facility = FacilityDescription {
        rooms: vec![Room::new(10, 25)],
        square_footage: 9000,
        music_use_types: uses(&[MusicUse::Group]),
        ..Default::default()
    };
    let ascap = calculate_ascap_fee(&facility, &RateSchedule::current());

    assert_eq!(ascap.per_location_fee, dec!(529));
    assert!(ascap.line_items[0].description.starts_with("250 participant capacity"));
    assert!(!ascap.line_items.iter().any(|item| item.description == "Ambient Uses Fee"));
}

#[test]
fn test_group_classes_per_participant_tier() {
    let facility = FacilityDescription {
        rooms: vec![Room::new(25, 100), Room::new(25, 100)],
        music_use_types: uses(&[MusicUse::Group]),
        ..Default::default()
    };
    assert_eq!(facility.total_weekly_participants(), 5000);

    let ascap = calculate_ascap_fee(&facility, &RateSchedule::current());
    assert_eq!(ascap.per_location_fee, dec!(1700));
}

#[test]
fn test_chain_and_association_discounts_compound() {
    let facility = FacilityDescription {
        location_count: 10,
        rooms: vec![Room::new(10, 25)],
        music_use_types: uses(&[MusicUse::Group]),
        is_association_member: true,
        ..Default::default()
    };
    let ascap = calculate_ascap_fee(&facility, &RateSchedule::current());

    // 10% of 529 would be 476.10; compounding gives 477.4225
    assert_eq!(ascap.per_location_fee, dec!(477.4225));
    assert_ne!(ascap.per_location_fee, dec!(476.10));
}

#[test]
fn test_bundled_platform_zeroes_sesac_regardless_of_other_fields() {
    for facility in facility_matrix() {
        let bundled = facility.with_bundled_platform(true);
        let sesac = calculate_sesac_fee(&bundled, &RateSchedule::current());
        assert_eq!(sesac.per_location_fee, Decimal::ZERO);
        assert!(sesac.note.is_some());
    }
}

#[test]
fn test_line_items_sum_exactly_to_fee() {
    let rates = RateSchedule::current();
    for facility in facility_matrix() {
        for fee in calculate_total_fees(&facility, &rates) {
            assert_eq!(
                fee.line_item_total(),
                fee.per_location_fee,
                "{} additivity broken for {:?}",
                fee.organization,
                facility
            );
        }
    }
}

#[test]
fn test_bmi_pre_discount_total_within_bounds() {
    let rates = RateSchedule::current();
    for total_members in [0u32, 1, 1000, 1117, 1118, 1595, 7602, 7603, 50_000, u32::MAX] {
        for music_use_types in [
            uses(&[]),
            uses(&[MusicUse::Ambient]),
            uses(&[MusicUse::Group]),
            uses(&[MusicUse::Group, MusicUse::Ambient]),
        ] {
            let facility = FacilityDescription {
                total_members,
                music_use_types,
                ..Default::default()
            };
            let bmi = calculate_bmi_fee(&facility, &rates);
            assert!(bmi.per_location_fee >= rates.bmi.minimum_fee, "{} members", total_members);
            assert!(bmi.per_location_fee <= rates.bmi.maximum_fee, "{} members", total_members);
        }
    }
}

#[test]
fn test_ascap_never_charges_ambient_alongside_group() {
    let rates = RateSchedule::current();
    for facility in facility_matrix().into_iter().filter(|f| f.has_group()) {
        let ascap = calculate_ascap_fee(&facility, &rates);
        assert!(
            !ascap.line_items.iter().any(|item| item.description == "Ambient Uses Fee"),
            "ambient charged with group for {:?}",
            facility
        );
    }
}

#[test]
fn test_discounts_never_increase_or_go_negative() {
    let rates = RateSchedule::current();
    for facility in facility_matrix() {
        let undiscounted = FacilityDescription {
            location_count: 1,
            is_association_member: false,
            ..facility.clone()
        };

        for (discounted, base) in [
            (calculate_ascap_fee(&facility, &rates), calculate_ascap_fee(&undiscounted, &rates)),
            (calculate_bmi_fee(&facility, &rates), calculate_bmi_fee(&undiscounted, &rates)),
        ] {
            assert!(discounted.per_location_fee >= Decimal::ZERO);
            assert!(
                discounted.per_location_fee <= base.per_location_fee,
                "{} discount increased fee for {:?}",
                discounted.organization,
                facility
            );
            for item in discounted.line_items.iter().filter(|item| item.description.contains("Discount")) {
                assert!(item.amount <= Decimal::ZERO);
            }
        }
    }
}

#[test]
fn test_repeated_calculation_is_identical() {
    let rates = RateSchedule::current();
    for facility in facility_matrix().into_iter().step_by(7) {
        let first = calculate_total_fees(&facility, &rates);
        let second = calculate_total_fees(&facility, &rates);
        assert_eq!(first, second);
    }
}

#[test]
fn test_all_zero_input_does_not_panic() {
    let facility = FacilityDescription {
        location_count: 0,
        total_members: 0,
        rooms: vec![Room::new(0, 0)],
        square_footage: 0,
        music_use_types: uses(&[MusicUse::Group, MusicUse::Ambient]),
        is_association_member: true,
        is_bundled_platform_user: false,
    };
    let fees = calculate_total_fees(&facility, &RateSchedule::current());
    assert_eq!(fees.len(), 4);
    assert_eq!(find(&fees, Organization::Sesac).per_location_fee, Decimal::ZERO);
    assert_eq!(find(&fees, Organization::Ascap).per_location_fee, Decimal::ZERO);
}

#[test]
fn test_fee_results_serialize_to_json() {
    let facility = FacilityDescription {
        total_members: 500,
        music_use_types: uses(&[MusicUse::Ambient]),
        ..Default::default()
    };
    let fees = calculate_total_fees(&facility, &RateSchedule::current());
    let json = serde_json::to_value(&fees).unwrap();

    assert_eq!(json[0]["organization"], "SESAC");
    assert_eq!(json[0]["per_location_fee"], "413.00");
    assert!(json[0].get("note").is_none());
    assert_eq!(json[3]["organization"], "GMR");
}
