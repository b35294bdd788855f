//! # Domain Types
//!
//! Core domain types used throughout FieldServe pricing.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌──────────────────┐  ┌─────────────────────┐  ┌──────────────────┐   │
//! │  │   ProductInfo    │  │ InstallationOption  │  │  MembershipTier  │   │
//! │  │  ──────────────  │  │  ─────────────────  │  │  ──────────────  │   │
//! │  │  id, sku, name   │  │  id, name           │  │  Residential     │   │
//! │  │  unit_price      │  │  base_price         │  │  Commercial      │   │
//! │  │  complexity      │  │  tier overrides     │  │  Premium         │   │
//! │  │  tax override    │  │  requirements       │  └──────────────────┘   │
//! │  └──────────────────┘  └─────────────────────┘                         │
//! │                                                                         │
//! │  ┌─────────────────┐                                                    │
//! │  │    TaxRate      │   All are read-only snapshots supplied per call:  │
//! │  │  ─────────────  │   the repositories that resolve them live        │
//! │  │  bps (u32)      │   outside this crate.                             │
//! │  │  825 = 8.25%    │                                                    │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::{Money, BPS_ONE};

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 825 bps = 8.25% (the system fallback rate)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// System fallback rate used when neither the caller nor the product
    /// supplies one: 8.25%.
    pub const SYSTEM_DEFAULT: TaxRate = TaxRate(825);

    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a percentage (for convenience).
    pub fn from_percentage(pct: f64) -> Self {
        TaxRate((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }

    /// Checks if tax rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::SYSTEM_DEFAULT
    }
}

// =============================================================================
// Membership Tiers
// =============================================================================

/// A named customer discount program.
///
/// Each tier carries independent discount rates for product and installation
/// charges, looked up from [`DISCOUNT_RATE_TABLE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum MembershipTier {
    Residential,
    Commercial,
    Premium,
}

/// Discount rates for one membership tier, in basis points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscountRates {
    /// Rate applied to the product subtotal.
    pub product_bps: u32,
    /// Rate applied to the installation subtotal.
    pub installation_bps: u32,
}

impl MembershipTier {
    /// This tier's discount rates.
    ///
    /// Exhaustive match: adding a tier without rates fails to compile.
    pub const fn discount_rates(self) -> DiscountRates {
        match self {
            MembershipTier::Residential => DiscountRates {
                product_bps: 1_000,      // 10%
                installation_bps: 1_500, // 15%
            },
            MembershipTier::Commercial => DiscountRates {
                product_bps: 1_500,      // 15%
                installation_bps: 2_000, // 20%
            },
            MembershipTier::Premium => DiscountRates {
                product_bps: 2_000,      // 20%
                installation_bps: 2_500, // 25%
            },
        }
    }
}

/// The membership discount policy as one auditable, iterable table,
/// derived from [`MembershipTier::discount_rates`].
pub const DISCOUNT_RATE_TABLE: [(MembershipTier, DiscountRates); 3] = [
    (
        MembershipTier::Residential,
        MembershipTier::Residential.discount_rates(),
    ),
    (
        MembershipTier::Commercial,
        MembershipTier::Commercial.discount_rates(),
    ),
    (
        MembershipTier::Premium,
        MembershipTier::Premium.discount_rates(),
    ),
];

// =============================================================================
// Install Complexity
// =============================================================================

/// How involved a product's professional installation is.
///
/// `Expert` jobs are never auto-priced: the engine classifies them as
/// quote-required regardless of the computed total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum InstallComplexity {
    Simple,
    Standard,
    Complex,
    Expert,
}

impl Default for InstallComplexity {
    fn default() -> Self {
        InstallComplexity::Standard
    }
}

// =============================================================================
// Product Info
// =============================================================================

/// A product snapshot handed to the pricing engine.
///
/// Immutable per calculation call. Resolving one from storage is the job of
/// the (excluded) product repository.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductInfo {
    /// Unique identifier.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Stock Keeping Unit - business identifier.
    pub sku: String,

    /// Unit price in cents. Must be non-negative.
    pub unit_price_cents: i64,

    /// Cost in cents (for margin reporting; not used in pricing).
    pub cost_price_cents: Option<i64>,

    /// Whether the product requires professional installation.
    pub requires_professional_install: bool,

    /// Installation complexity class.
    pub install_complexity: InstallComplexity,

    /// Warranty length in years.
    pub warranty_years: u32,

    /// Whether the product is subject to sales tax.
    pub is_taxable: bool,

    /// Per-product tax rate override in basis points.
    pub tax_rate_bps: Option<u32>,
}

impl ProductInfo {
    /// Returns the unit price as a Money type.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Returns the product-level tax rate override, if any.
    #[inline]
    pub fn tax_rate(&self) -> Option<TaxRate> {
        self.tax_rate_bps.map(TaxRate::from_bps)
    }
}

// =============================================================================
// Installation Option
// =============================================================================

/// Requirement keys that force "from $N" display: the real price depends on
/// a site condition we cannot know up front.
pub const SITE_REVIEW_REQUIREMENTS: [&str; 3] = ["permit", "electrical_upgrade", "special_access"];

/// An installation service offered alongside a product.
///
/// Like [`ProductInfo`], a read-only snapshot supplied per call.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InstallationOption {
    pub id: String,
    pub name: String,
    pub description: Option<String>,

    /// Base installation price in cents.
    pub base_price_cents: i64,

    /// Complexity multiplier in basis points (10000 = ×1.0).
    pub complexity_multiplier_bps: u32,

    /// Estimated on-site time.
    pub estimated_duration_hours: f64,

    /// Per-tier override prices in cents. When an override is cheaper than
    /// the computed installation subtotal, the member pays the override.
    pub residential_price_cents: Option<i64>,
    pub commercial_price_cents: Option<i64>,
    pub premium_price_cents: Option<i64>,

    /// Requirement key → detail value (e.g. "permit" → "city electrical").
    pub requirements: HashMap<String, String>,

    /// What the installation includes, in presentation order.
    pub included: Vec<String>,
}

impl InstallationOption {
    /// Returns the base price as Money.
    #[inline]
    pub fn base_price(&self) -> Money {
        Money::from_cents(self.base_price_cents)
    }

    /// Per-unit installation price: base price scaled by the option's
    /// complexity multiplier.
    pub fn per_unit_price(&self) -> Money {
        self.base_price().scale_bps(self.complexity_multiplier_bps)
    }

    /// The override price for a tier, if the option carries one.
    pub fn tier_price(&self, tier: MembershipTier) -> Option<Money> {
        let cents = match tier {
            MembershipTier::Residential => self.residential_price_cents,
            MembershipTier::Commercial => self.commercial_price_cents,
            MembershipTier::Premium => self.premium_price_cents,
        };
        cents.map(Money::from_cents)
    }

    /// True when any requirement key forces a site review before the final
    /// price is known ("from $N" display).
    pub fn needs_site_review(&self) -> bool {
        SITE_REVIEW_REQUIREMENTS
            .iter()
            .any(|key| self.requirements.contains_key(*key))
    }
}

impl Default for InstallationOption {
    fn default() -> Self {
        InstallationOption {
            id: String::new(),
            name: String::new(),
            description: None,
            base_price_cents: 0,
            complexity_multiplier_bps: BPS_ONE,
            estimated_duration_hours: 0.0,
            residential_price_cents: None,
            commercial_price_cents: None,
            premium_price_cents: None,
            requirements: HashMap::new(),
            included: Vec::new(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
