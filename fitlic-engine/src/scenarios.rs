//! Scenario comparison: direct licensing vs. a bundled music subscription
//!
//! The baseline is always computed as if the facility licensed directly,
//! whatever its actual bundled-platform flag says, so the comparison is
//! apples to apples. Bundled scenarios are priced against that baseline.
//!
//! Scenario totals obey
//! `total_per_location_fee == subscription_fee.unwrap_or(0) + Σ organization_fees`.

use crate::facility::FacilityDescription;
use crate::fees::{calculate_total_fees, sum_per_location_fees, OrganizationFeeResult};
use crate::rates::RateSchedule;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Months billed per year for the bundled subscription
const MONTHS_PER_YEAR: u32 = 12;

/// Scenario identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScenarioId {
    /// Direct licensing with every PRO, no bundling
    Baseline,

    /// Bundled subscription replacing the whole PRO fee stack
    BundledAmbient,

    /// Bundled subscription plus direct licensing for instructor-led classes
    BundledInstructed,
}

impl ScenarioId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScenarioId::Baseline => "baseline",
            ScenarioId::BundledAmbient => "bundled-ambient",
            ScenarioId::BundledInstructed => "bundled-instructed",
        }
    }
}

impl std::fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Bundled music subscription pricing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundledOffer {
    pub monthly_price: Decimal,
}

impl Default for BundledOffer {
    /// $29.99 per month, $359.88 per year
    fn default() -> Self {
        Self {
            monthly_price: dec!(29.99),
        }
    }
}

impl BundledOffer {
    pub fn new(monthly_price: Decimal) -> Self {
        Self { monthly_price }
    }

    pub fn annual_price(&self) -> Decimal {
        self.monthly_price * Decimal::from(MONTHS_PER_YEAR)
    }
}

/// One priced licensing scenario
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub id: ScenarioId,
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub organization_fees: Vec<OrganizationFeeResult>,

    /// Annual bundled subscription cost, if this scenario includes one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription_fee: Option<Decimal>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_price: Option<Decimal>,

    pub total_per_location_fee: Decimal,

    /// Baseline total minus this total; present only when positive
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comparison_savings: Option<Decimal>,

    /// Savings as a percentage of the baseline total
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub savings_percentage: Option<Decimal>,

    pub recommendations: Vec<String>,

    /// Whether this is the scenario that fits the facility's music use
    pub is_primary: bool,
}

impl ScenarioResult {
    /// Annual total across `location_count` locations
    pub fn total_for_locations(&self, location_count: u32) -> Decimal {
        self.total_per_location_fee * Decimal::from(location_count)
    }
}

/// The full comparison for one facility
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioSet {
    pub baseline: ScenarioResult,
    pub bundled_ambient: ScenarioResult,
    pub bundled_instructed: ScenarioResult,
}

impl ScenarioSet {
    /// All scenarios in display order
    pub fn all(&self) -> [&ScenarioResult; 3] {
        [&self.baseline, &self.bundled_ambient, &self.bundled_instructed]
    }

    /// The bundled scenario matching the facility's music use
    pub fn recommended(&self) -> &ScenarioResult {
        if self.bundled_instructed.is_primary {
            &self.bundled_instructed
        } else {
            &self.bundled_ambient
        }
    }
}

/// Savings against the baseline and their percentage
///
/// Both are `None` unless savings are strictly positive; the percentage is
/// also `None` when the baseline total is zero.
fn compute_savings(baseline_total: Decimal, total: Decimal) -> (Option<Decimal>, Option<Decimal>) {
    let savings = baseline_total - total;
    if savings <= Decimal::ZERO {
        return (None, None);
    }

    let percentage = if baseline_total > Decimal::ZERO {
        (savings * Decimal::ONE_HUNDRED).checked_div(baseline_total)
    } else {
        None
    };

    (Some(savings), percentage)
}

/// Direct-licensing baseline
///
/// Runs the aggregator on a copy with the bundled-platform flag cleared.
pub fn calculate_baseline_scenario(facility: &FacilityDescription, rates: &RateSchedule) -> ScenarioResult {
    let direct = facility.with_bundled_platform(false);
    let organization_fees = calculate_total_fees(&direct, rates);
    let total_per_location_fee = sum_per_location_fees(&organization_fees);

    let mut description = String::from(
        "What facilities typically pay when licensing directly through each PRO \
         (ASCAP, BMI, SESAC, GMR) and sourcing their own music. For comparison only.",
    );
    if facility.has_group() {
        description.push_str(" Includes instructor-led group fitness licensing costs.");
    }

    debug!(total = %total_per_location_fee, "Baseline scenario");

    ScenarioResult {
        id: ScenarioId::Baseline,
        title: "What Facilities Often Pay When Licensing Directly".to_string(),
        subtitle: "For comparison only".to_string(),
        description,
        organization_fees,
        subscription_fee: None,
        monthly_price: None,
        total_per_location_fee,
        comparison_savings: None,
        savings_percentage: None,
        recommendations: vec![
            "Requires managing 4 separate PRO relationships".to_string(),
            "Complex renewal and compliance tracking".to_string(),
            "Separate music service costs not included here".to_string(),
            "Potential for over-licensing or gaps in coverage".to_string(),
        ],
        is_primary: false,
    }
}

/// Bundled subscription covering all ambient licensing
///
/// The flat subscription price stands in for the entire PRO fee stack.
/// Primary when the facility has no group classes.
pub fn calculate_bundled_ambient_scenario(
    facility: &FacilityDescription,
    baseline: &ScenarioResult,
    offer: &BundledOffer,
) -> ScenarioResult {
    let annual_price = offer.annual_price();
    let (comparison_savings, savings_percentage) =
        compute_savings(baseline.total_per_location_fee, annual_price);

    debug!(total = %annual_price, savings = ?comparison_savings, "Bundled ambient scenario");

    ScenarioResult {
        id: ScenarioId::BundledAmbient,
        title: "Bundled Music Subscription".to_string(),
        subtitle: "Includes all ambient music licensing".to_string(),
        description: "Unlimited commercial music for the facility with all required ambient \
                      music licensing included. No separate PRO contracts to manage."
            .to_string(),
        organization_fees: Vec::new(),
        subscription_fee: Some(annual_price),
        monthly_price: Some(offer.monthly_price),
        total_per_location_fee: annual_price,
        comparison_savings,
        savings_percentage,
        recommendations: vec![
            "All required ambient music licensing included (ASCAP, BMI, SESAC, GMR)".to_string(),
            "No separate PRO licensing contracts to manage".to_string(),
            "Covers gym floor, lobby and common areas".to_string(),
            "Cancel anytime with no long-term contract".to_string(),
        ],
        is_primary: !facility.has_group(),
    }
}

/// Bundled subscription plus instructor-led licensing
///
/// The subscription covers ambient obligations, which zeroes SESAC; the
/// ASCAP, BMI and GMR charges are still owed directly and are added on top.
/// Primary when the facility runs group classes.
pub fn calculate_bundled_instructed_scenario(
    facility: &FacilityDescription,
    rates: &RateSchedule,
    baseline: &ScenarioResult,
    offer: &BundledOffer,
) -> ScenarioResult {
    let bundled = facility.with_bundled_platform(true);
    let organization_fees = calculate_total_fees(&bundled, rates);
    let annual_price = offer.annual_price();
    let total_per_location_fee = annual_price + sum_per_location_fees(&organization_fees);
    let (comparison_savings, savings_percentage) =
        compute_savings(baseline.total_per_location_fee, total_per_location_fee);

    debug!(
        total = %total_per_location_fee,
        savings = ?comparison_savings,
        "Bundled instructed scenario"
    );

    ScenarioResult {
        id: ScenarioId::BundledInstructed,
        title: "Bundled Subscription + Direct Licensing for Instructor-Led Classes".to_string(),
        subtitle: "Instructor-led licensing handled separately".to_string(),
        description: "One music subscription for the entire facility. Instructor-led fitness \
                      licensing (ASCAP, BMI, GMR) is obtained separately to ensure correct \
                      coverage without overpaying."
            .to_string(),
        organization_fees,
        subscription_fee: Some(annual_price),
        monthly_price: Some(offer.monthly_price),
        total_per_location_fee,
        comparison_savings,
        savings_percentage,
        recommendations: vec![
            format!(
                "Same music subscription across the facility (${}/month)",
                offer.monthly_price
            ),
            "Instructor-led fitness licensing obtained directly".to_string(),
            "One platform for all zones (studio, floor, lobby)".to_string(),
            "Simplified compliance management".to_string(),
        ],
        is_primary: facility.has_group(),
    }
}

/// Baseline plus both bundled alternatives
pub fn calculate_all_scenarios(
    facility: &FacilityDescription,
    rates: &RateSchedule,
    offer: &BundledOffer,
) -> ScenarioSet {
    let baseline = calculate_baseline_scenario(facility, rates);
    let bundled_ambient = calculate_bundled_ambient_scenario(facility, &baseline, offer);
    let bundled_instructed = calculate_bundled_instructed_scenario(facility, rates, &baseline, offer);

    ScenarioSet {
        baseline,
        bundled_ambient,
        bundled_instructed,
    }
}
