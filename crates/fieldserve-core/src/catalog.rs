//! # Installation Catalog
//!
//! Parameterized installation templates and the adjusted-price calculator.
//!
//! ## Pricing Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │              Template Adjusted Price                                    │
//! │                                                                         │
//! │  base_price × complexity × timing × location × quantity                 │
//! │       │           │          │         │                                │
//! │       │      ┌────┴────┐ ┌───┴────┐ ┌──┴─────┐                          │
//! │       │      │ simple  │ │business│ │ local  │   Each bucket that is    │
//! │       │      │ standard│ │ evening│ │regional│   absent from its map    │
//! │       │      │ complex │ │ weekend│ │distant │   multiplies by ×1.0     │
//! │       │      │ custom  │ │emergcy.│ └────────┘   (never an error).      │
//! │       │      └─────────┘ └────────┘                                     │
//! │       ▼                                                                 │
//! │  then clamp into [min_price, max_price] when the template sets them     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The catalog itself is an immutable, injected registry: constructed once
//! and passed by reference, so tests substitute fixture catalogs freely.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use crate::error::CoreResult;
use crate::money::{Money, BPS_ONE};
use crate::validation::validate_quantity;

// =============================================================================
// Buckets
// =============================================================================

/// How a template's installation work is billed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum InstallStyle {
    Fixed,
    Hourly,
    Diagnostic,
}

/// Job difficulty class for a template.
///
/// Distinct from [`crate::types::InstallComplexity`]: templates price
/// one-off `Custom` work, products flag `Expert` installs as quote-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum JobComplexity {
    Simple,
    Standard,
    Complex,
    Custom,
}

/// When the job is scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum TimingBucket {
    BusinessHours,
    Evening,
    Weekend,
    Emergency,
}

/// How far the job site is from the service area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum LocationBucket {
    Local,
    Regional,
    Distant,
}

// =============================================================================
// Installation Template
// =============================================================================

/// A named installation offering for one trade, with its multiplier tables.
///
/// All multiplier values are basis points (10000 = ×1.0).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InstallationTemplate {
    /// Unique identifier (also the catalog key).
    pub id: String,

    /// Trade this template belongs to ("plumbing", "electrical", ...).
    pub trade: String,

    /// Billing style.
    pub style: InstallStyle,

    /// Base price in cents before any adjustment.
    pub base_price_cents: i64,

    /// Estimated on-site hours at standard complexity.
    pub estimated_hours: f64,

    /// Equivalent hourly rate in cents (reporting only).
    pub hourly_equivalent_cents: i64,

    /// Multiplier per job complexity. Missing key = ×1.0.
    pub complexity_multipliers: HashMap<JobComplexity, u32>,

    /// Multiplier per scheduling bucket. Missing key = ×1.0.
    pub timing_multipliers: HashMap<TimingBucket, u32>,

    /// Multiplier per travel bucket. Missing key = ×1.0.
    pub location_multipliers: HashMap<LocationBucket, u32>,

    /// What the job includes, in presentation order.
    pub included: Vec<String>,

    /// Prerequisites the customer must arrange.
    pub requirements: Vec<String>,

    /// Lower clamp on the adjusted price, in cents.
    pub min_price_cents: Option<i64>,

    /// Upper clamp on the adjusted price, in cents.
    pub max_price_cents: Option<i64>,

    /// Whether the trade requires a municipal permit.
    pub requires_permit: bool,

    /// Whether the finished job requires inspection.
    pub requires_inspection: bool,
}

impl InstallationTemplate {
    /// Complexity multiplier for a bucket, ×1.0 when unlisted.
    #[inline]
    pub fn complexity_multiplier(&self, complexity: JobComplexity) -> u32 {
        self.complexity_multipliers
            .get(&complexity)
            .copied()
            .unwrap_or(BPS_ONE)
    }

    /// Timing multiplier for a bucket, ×1.0 when unlisted.
    #[inline]
    pub fn timing_multiplier(&self, timing: TimingBucket) -> u32 {
        self.timing_multipliers
            .get(&timing)
            .copied()
            .unwrap_or(BPS_ONE)
    }

    /// Location multiplier for a bucket, ×1.0 when unlisted.
    #[inline]
    pub fn location_multiplier(&self, location: LocationBucket) -> u32 {
        self.location_multipliers
            .get(&location)
            .copied()
            .unwrap_or(BPS_ONE)
    }

    /// Computes the adjusted price for this template.
    ///
    /// `base × complexity × timing × location × quantity`, rounded half-up
    /// to the cent once after the full multiplication, then clamped into
    /// the template's price band. Pure function of its inputs.
    ///
    /// ## Errors
    /// Rejects `quantity < 1` (or above the system maximum). Unlisted
    /// buckets are never an error.
    pub fn adjusted_price(
        &self,
        complexity: JobComplexity,
        timing: TimingBucket,
        location: LocationBucket,
        quantity: i64,
    ) -> CoreResult<Money> {
        validate_quantity(quantity)?;

        let c = self.complexity_multiplier(complexity) as i128;
        let t = self.timing_multiplier(timing) as i128;
        let l = self.location_multiplier(location) as i128;

        // Single rounding step: scale by all three bps factors at once so
        // intermediate truncation cannot accumulate.
        let denom = (BPS_ONE as i128).pow(3);
        let numer = self.base_price_cents as i128 * c * t * l * quantity as i128;
        let rounded = (numer + denom / 2) / denom;

        let clamped = Money::from_cents(rounded as i64).clamp_optional(
            self.min_price_cents.map(Money::from_cents),
            self.max_price_cents.map(Money::from_cents),
        );

        debug!(
            template = %self.id,
            ?complexity,
            ?timing,
            ?location,
            quantity,
            price_cents = clamped.cents(),
            "adjusted installation price"
        );

        Ok(clamped)
    }
}

/// Free-function form of [`InstallationTemplate::adjusted_price`], matching
/// the call contract the HTTP layer exposes.
#[inline]
pub fn adjust_price(
    template: &InstallationTemplate,
    complexity: JobComplexity,
    timing: TimingBucket,
    location: LocationBucket,
    quantity: i64,
) -> CoreResult<Money> {
    template.adjusted_price(complexity, timing, location, quantity)
}

// =============================================================================
// Installation Catalog
// =============================================================================

/// Immutable registry of installation templates.
///
/// Constructed once from a template list and passed by reference. There is
/// deliberately no mutation API and no module-level global.
#[derive(Debug, Clone)]
pub struct InstallationCatalog {
    templates: HashMap<String, InstallationTemplate>,
}

impl InstallationCatalog {
    /// Builds a catalog from a list of templates. Later duplicates of an id
    /// replace earlier ones.
    pub fn new(templates: Vec<InstallationTemplate>) -> Self {
        let templates = templates
            .into_iter()
            .map(|t| (t.id.clone(), t))
            .collect::<HashMap<_, _>>();
        InstallationCatalog { templates }
    }

    /// Looks up a template by id.
    pub fn get(&self, id: &str) -> Option<&InstallationTemplate> {
        self.templates.get(id)
    }

    /// Finds the first template for a trade and billing style.
    pub fn find(&self, trade: &str, style: InstallStyle) -> Option<&InstallationTemplate> {
        self.templates
            .values()
            .find(|t| t.trade == trade && t.style == style)
    }

    /// Iterates all templates (unordered).
    pub fn iter(&self) -> impl Iterator<Item = &InstallationTemplate> {
        self.templates.values()
    }

    /// Number of templates in the catalog.
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Checks whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// The stock trade catalog shipped with the system.
    ///
    /// Production deployments construct their own from tenant data; this
    /// seeds demos and tests with realistic entries.
    pub fn standard() -> Self {
        InstallationCatalog::new(vec![
            InstallationTemplate {
                id: "plumbing-fixture-swap".to_string(),
                trade: "plumbing".to_string(),
                style: InstallStyle::Fixed,
                base_price_cents: 18_500,
                estimated_hours: 2.0,
                hourly_equivalent_cents: 9_250,
                complexity_multipliers: HashMap::from([
                    (JobComplexity::Simple, 8_000),
                    (JobComplexity::Standard, BPS_ONE),
                    (JobComplexity::Complex, 13_500),
                    (JobComplexity::Custom, 17_500),
                ]),
                timing_multipliers: HashMap::from([
                    (TimingBucket::BusinessHours, BPS_ONE),
                    (TimingBucket::Evening, 12_500),
                    (TimingBucket::Weekend, 15_000),
                    (TimingBucket::Emergency, 20_000),
                ]),
                location_multipliers: HashMap::from([
                    (LocationBucket::Local, BPS_ONE),
                    (LocationBucket::Regional, 11_500),
                    (LocationBucket::Distant, 13_000),
                ]),
                included: vec![
                    "Removal of existing fixture".to_string(),
                    "Supply line connection".to_string(),
                    "Leak test".to_string(),
                ],
                requirements: vec!["Water shutoff access".to_string()],
                min_price_cents: Some(12_500),
                max_price_cents: None,
                requires_permit: false,
                requires_inspection: false,
            },
            InstallationTemplate {
                id: "electrical-circuit-add".to_string(),
                trade: "electrical".to_string(),
                style: InstallStyle::Fixed,
                base_price_cents: 32_500,
                estimated_hours: 3.5,
                hourly_equivalent_cents: 9_286,
                complexity_multipliers: HashMap::from([
                    (JobComplexity::Simple, 9_000),
                    (JobComplexity::Standard, BPS_ONE),
                    (JobComplexity::Complex, 14_000),
                    (JobComplexity::Custom, 20_000),
                ]),
                timing_multipliers: HashMap::from([
                    (TimingBucket::Evening, 12_000),
                    (TimingBucket::Weekend, 14_000),
                    (TimingBucket::Emergency, 22_500),
                ]),
                location_multipliers: HashMap::from([
                    (LocationBucket::Regional, 11_000),
                    (LocationBucket::Distant, 12_500),
                ]),
                included: vec![
                    "Breaker and wiring to one outlet".to_string(),
                    "Load calculation".to_string(),
                ],
                requirements: vec!["Panel access".to_string()],
                min_price_cents: Some(25_000),
                max_price_cents: Some(250_000),
                requires_permit: true,
                requires_inspection: true,
            },
            InstallationTemplate {
                id: "hvac-system-diagnostic".to_string(),
                trade: "hvac".to_string(),
                style: InstallStyle::Diagnostic,
                base_price_cents: 12_900,
                estimated_hours: 1.5,
                hourly_equivalent_cents: 8_600,
                complexity_multipliers: HashMap::new(),
                timing_multipliers: HashMap::from([
                    (TimingBucket::Weekend, 13_000),
                    (TimingBucket::Emergency, 17_500),
                ]),
                location_multipliers: HashMap::from([(LocationBucket::Distant, 12_000)]),
                included: vec![
                    "Full system inspection".to_string(),
                    "Written findings report".to_string(),
                ],
                requirements: vec![],
                min_price_cents: None,
                max_price_cents: Some(45_000),
                requires_permit: false,
                requires_inspection: false,
            },
        ])
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
