//! Report rendering
//!
//! The engine returns raw decimals; currency formatting and layout live
//! here.

use fitlic_engine::{FacilityDescription, OrganizationFeeResult, ScenarioResult, ScenarioSet};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use std::fmt::Write;

/// Column where amounts are right-aligned
const AMOUNT_WIDTH: usize = 14;
const LABEL_WIDTH: usize = 64;

/// Format an amount as US dollars, negatives in parentheses
///
/// `1234.5` → `$1,234.50`, `-26.45` → `($26.45)`
pub fn format_currency(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let text = format!("{:.2}", rounded.abs());

    let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (index, digit) in whole.chars().enumerate() {
        if index > 0 && (whole.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    if negative {
        format!("(${}.{})", grouped, cents)
    } else {
        format!("${}.{}", grouped, cents)
    }
}

fn line(out: &mut String, indent: usize, label: &str, amount: Decimal) {
    let label = format!("{}{}", " ".repeat(indent), label);
    let _ = writeln!(
        out,
        "{:<label_width$}{:>amount_width$}",
        label,
        format_currency(amount),
        label_width = LABEL_WIDTH,
        amount_width = AMOUNT_WIDTH
    );
}

fn render_fee(out: &mut String, fee: &OrganizationFeeResult) {
    line(out, 0, fee.organization.display_name(), fee.per_location_fee);
    for item in &fee.line_items {
        line(out, 2, &item.description, item.amount);
    }
    if let Some(note) = &fee.note {
        let _ = writeln!(out, "  note: {}", note);
    }
}

/// Render the per-organization breakdown
pub fn render_fees(facility: &FacilityDescription, rate_year: u16, fees: &[OrganizationFeeResult]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Music licensing estimate ({} rates), per location", rate_year);
    let _ = writeln!(out);

    for fee in fees {
        render_fee(&mut out, fee);
        let _ = writeln!(out);
    }

    let total: Decimal = fees.iter().map(|fee| fee.per_location_fee).sum();
    line(&mut out, 0, "Total per location", total);
    if facility.location_count > 1 {
        line(
            &mut out,
            0,
            &format!("Total across {} locations", facility.location_count),
            total * Decimal::from(facility.location_count),
        );
    }
    out
}

fn render_scenario(out: &mut String, scenario: &ScenarioResult, location_count: u32, recommended: bool) {
    let marker = if recommended { " [recommended]" } else { "" };
    let _ = writeln!(out, "{}{}", scenario.title, marker);
    let _ = writeln!(out, "  {}", scenario.subtitle);

    if let Some(monthly) = scenario.monthly_price {
        line(out, 2, "Subscription (monthly)", monthly);
    }
    if let Some(subscription) = scenario.subscription_fee {
        line(out, 2, "Subscription (annual)", subscription);
    }
    for fee in &scenario.organization_fees {
        line(out, 2, fee.organization.display_name(), fee.per_location_fee);
    }
    line(out, 2, "Total per location", scenario.total_per_location_fee);
    if location_count > 1 {
        line(
            out,
            2,
            &format!("Total across {} locations", location_count),
            scenario.total_for_locations(location_count),
        );
    }
    if let Some(savings) = scenario.comparison_savings {
        let label = match scenario.savings_percentage {
            Some(percentage) => format!(
                "Savings vs. direct licensing ({}%)",
                percentage.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
            ),
            None => "Savings vs. direct licensing".to_string(),
        };
        line(out, 2, &label, savings);
    }
    for recommendation in &scenario.recommendations {
        let _ = writeln!(out, "  - {}", recommendation);
    }
}

/// Render the scenario comparison
pub fn render_scenarios(facility: &FacilityDescription, scenarios: &ScenarioSet) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Licensing scenarios, per location");
    let recommended = scenarios.recommended().id;

    for scenario in scenarios.all() {
        let _ = writeln!(out);
        render_scenario(
            &mut out,
            scenario,
            facility.location_count,
            scenario.id == recommended,
        );
    }
    out
}

/// JSON report body
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub rate_year: u16,
    pub facility: &'a FacilityDescription,
    pub fees: &'a [OrganizationFeeResult],
    pub total_per_location_fee: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scenarios: Option<&'a ScenarioSet>,
}
