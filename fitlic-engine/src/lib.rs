//! # FITLIC Engine
//!
//! Music licensing fee estimation for fitness facilities:
//! - Facility description input and sanitising
//! - Year-versioned PRO rate schedules (SESAC, ASCAP, BMI, GMR)
//! - Per-organization fee calculators and the aggregator
//! - Direct-licensing vs. bundled-subscription scenario comparison
//! - Configuration loading
//!
//! All monetary amounts are exact [`rust_decimal::Decimal`] values. The
//! calculators are pure: identical inputs always produce identical results.
//!
//! ```
//! use fitlic_engine::{calculate_total_fees, FacilityDescription, MusicUse, RateSchedule};
//! use rust_decimal_macros::dec;
//!
//! let facility = FacilityDescription {
//!     total_members: 500,
//!     music_use_types: [MusicUse::Ambient].into_iter().collect(),
//!     ..Default::default()
//! };
//! let fees = calculate_total_fees(&facility, &RateSchedule::current());
//!
//! assert_eq!(fees[0].per_location_fee, dec!(413.00)); // SESAC
//! assert_eq!(fees[2].per_location_fee, dec!(410));    // BMI minimum
//! ```

pub mod config;
pub mod error;
pub mod facility;
pub mod fees;
pub mod rates;
pub mod scenarios;

pub use error::{Error, Result};
pub use facility::{FacilityDescription, MusicUse, RawFacilityInput, Room};
pub use fees::{calculate_total_fees, FeeLineItem, Organization, OrganizationFeeResult};
pub use rates::RateSchedule;
pub use scenarios::{calculate_all_scenarios, BundledOffer, ScenarioId, ScenarioResult, ScenarioSet};
