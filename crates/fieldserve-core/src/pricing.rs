//! # Pricing Engine
//!
//! The combined product + installation pricing calculator.
//!
//! ## Calculation Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                 calculate_combined_pricing                              │
//! │                                                                         │
//! │  1. Base subtotals     product: unit_price × qty                        │
//! │                        install: per-unit × qty × volume factor          │
//! │  2. Membership         tier rate table, or tier override price          │
//! │  3. Bundle             5% over $500 combined, split by pre-discount     │
//! │                        share, stacked on top of membership              │
//! │  4. Tax                override → product rate → system 8.25%           │
//! │  5. Display            quote_required / from / free / fixed             │
//! │  6. Totals             after-discount + tax, savings percentage         │
//! │                                                                         │
//! │  The step order is fixed: the bundle split depends on the               │
//! │  PRE-discount proportions, so reordering changes the answer.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Pure and synchronous: same inputs always produce the same breakdown, and
//! missing optional inputs (installation, tier, tax override) get neutral
//! defaults rather than errors.

use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use crate::error::CoreResult;
use crate::money::{Money, BPS_ONE};
use crate::types::{InstallComplexity, InstallationOption, MembershipTier, ProductInfo, TaxRate};
use crate::validation::{validate_price_cents, validate_quantity, validate_tax_rate_bps};

// =============================================================================
// Policy Tables
// =============================================================================

/// Combined subtotal at which the bundle discount kicks in: $500.00.
pub const BUNDLE_THRESHOLD_CENTS: i64 = 50_000;

/// Bundle discount rate: 5%.
pub const BUNDLE_RATE_BPS: u32 = 500;

/// Volume factors for installation labor, highest tier first.
///
/// `(minimum quantity, factor in bps)`: one unit pays full rate, two or
/// three units get 10% off the installation labor, four or more get 20%.
/// A data table rather than branches so the policy reads at a glance.
pub const INSTALL_VOLUME_TIERS: [(i64, u32); 3] = [(4, 8_000), (2, 9_000), (1, BPS_ONE)];

/// Looks up the installation volume factor for a quantity.
pub fn install_volume_factor_bps(quantity: i64) -> u32 {
    INSTALL_VOLUME_TIERS
        .iter()
        .find(|(min_qty, _)| quantity >= *min_qty)
        .map(|(_, bps)| *bps)
        .unwrap_or(BPS_ONE)
}

// =============================================================================
// Display Classification
// =============================================================================

/// How a computed price should be presented to the end customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PriceDisplayType {
    /// Exact amount is known.
    Fixed,
    /// Site conditions may raise the price: show "from $N".
    From,
    /// Expert-complexity install, never auto-priced.
    QuoteRequired,
    /// Product and installation are both free.
    Free,
}

fn classify_display(
    product: &ProductInfo,
    installation: Option<&InstallationOption>,
) -> PriceDisplayType {
    if product.install_complexity == InstallComplexity::Expert {
        return PriceDisplayType::QuoteRequired;
    }
    if installation.is_some_and(|opt| opt.needs_site_review()) {
        return PriceDisplayType::From;
    }
    if product.unit_price_cents == 0 && installation.map_or(true, |opt| opt.base_price_cents == 0) {
        return PriceDisplayType::Free;
    }
    PriceDisplayType::Fixed
}

fn format_display(display_type: PriceDisplayType, total: Money) -> String {
    // Display strings drop cents; the underlying totals keep them.
    match display_type {
        PriceDisplayType::Free => "FREE".to_string(),
        PriceDisplayType::QuoteRequired => "Quote Required".to_string(),
        PriceDisplayType::From => format!("from ${}", total.round_to_dollars()),
        PriceDisplayType::Fixed => format!("${}", total.round_to_dollars()),
    }
}

// =============================================================================
// Pricing Calculation (engine output)
// =============================================================================

/// Full pricing breakdown for one product + installation combination.
///
/// This is the one wire contract the core owns: HTTP handlers serialize it
/// verbatim. All monetary fields are cents.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PricingCalculation {
    // Echoed inputs
    pub unit_price_cents: i64,
    pub base_install_price_cents: i64,
    pub quantity: i64,
    pub membership_tier: Option<MembershipTier>,

    // Subtotals before discounts
    pub product_subtotal_cents: i64,
    pub installation_subtotal_cents: i64,
    pub subtotal_before_discounts_cents: i64,

    // Discounts. Bundle shares are folded into the product / installation
    // amounts and also reported separately.
    pub product_discount_cents: i64,
    pub installation_discount_cents: i64,
    pub bundle_discount_cents: i64,
    pub total_discount_cents: i64,

    // After discounts
    pub subtotal_after_discounts_cents: i64,

    // Tax
    pub tax_rate_bps: u32,
    pub tax_cents: i64,

    // Final
    pub total_cents: i64,
    pub total_savings_cents: i64,
    /// Savings as a percentage of the pre-discount subtotal, one decimal.
    pub savings_percentage: f64,

    pub price_display_type: PriceDisplayType,
    pub display_price: String,
}

// =============================================================================
// Engine
// =============================================================================

/// Computes the combined pricing breakdown.
///
/// Steps run in a fixed order (subtotals, membership, bundle, tax, display,
/// totals) because the bundle split uses the pre-discount proportions.
///
/// ## Errors
/// Rejects `quantity < 1`, negative prices, and an out-of-range tax
/// override before any computation. Absent installation, tier, or tax
/// override are neutral defaults, never errors.
pub fn calculate_combined_pricing(
    product: &ProductInfo,
    installation: Option<&InstallationOption>,
    quantity: i64,
    membership_tier: Option<MembershipTier>,
    tax_rate_override: Option<TaxRate>,
    apply_bundle_discount: bool,
) -> CoreResult<PricingCalculation> {
    validate_quantity(quantity)?;
    validate_price_cents(product.unit_price_cents)?;
    if let Some(opt) = installation {
        validate_price_cents(opt.base_price_cents)?;
    }
    if let Some(rate) = tax_rate_override {
        validate_tax_rate_bps(rate.bps())?;
    }

    // Step 1: base subtotals.
    let product_subtotal = product.unit_price().multiply_quantity(quantity);
    let installation_subtotal = installation
        .map(|opt| {
            opt.per_unit_price()
                .multiply_quantity(quantity)
                .scale_bps(install_volume_factor_bps(quantity))
        })
        .unwrap_or_else(Money::zero);
    let subtotal_before = product_subtotal + installation_subtotal;

    // Step 2: membership discounts.
    let (mut product_discount, mut installation_discount) = match membership_tier {
        Some(tier) => {
            let rates = tier.discount_rates();
            let product_discount = product_subtotal.scale_bps(rates.product_bps);

            // A tier override price beats the percentage rate only when it
            // is actually cheaper than the computed subtotal.
            let installation_discount = match installation.and_then(|opt| opt.tier_price(tier)) {
                Some(override_price) if override_price < installation_subtotal => {
                    installation_subtotal - override_price
                }
                _ => installation_subtotal.scale_bps(rates.installation_bps),
            };
            (product_discount, installation_discount)
        }
        None => (Money::zero(), Money::zero()),
    };

    // Step 3: bundle discount, split by pre-discount share. The installation
    // share is the remainder so the split is exact to the cent.
    let mut bundle_discount = Money::zero();
    if apply_bundle_discount && subtotal_before.cents() >= BUNDLE_THRESHOLD_CENTS {
        bundle_discount = subtotal_before.scale_bps(BUNDLE_RATE_BPS);
        let combined = subtotal_before.cents() as i128;
        let product_share = (bundle_discount.cents() as i128 * product_subtotal.cents() as i128
            + combined / 2)
            / combined;
        let product_share = Money::from_cents(product_share as i64);
        product_discount += product_share;
        installation_discount += bundle_discount - product_share;
    }

    let total_discount = product_discount + installation_discount;

    // Step 4: tax. Override wins, then the product's own rate, then the
    // system fallback.
    let tax_rate = tax_rate_override
        .or_else(|| product.tax_rate())
        .unwrap_or(TaxRate::SYSTEM_DEFAULT);
    let subtotal_after = (product_subtotal - product_discount)
        + (installation_subtotal - installation_discount);
    let tax = if product.is_taxable {
        subtotal_after.calculate_tax(tax_rate)
    } else {
        Money::zero()
    };

    // Step 5: display classification.
    let display_type = classify_display(product, installation);

    // Step 6: totals.
    let total = subtotal_after + tax;
    let savings_percentage = if subtotal_before.is_zero() {
        0.0
    } else {
        let ratio = total_discount.cents() as f64 / subtotal_before.cents() as f64;
        (ratio * 1000.0).round() / 10.0
    };

    debug!(
        product = %product.sku,
        quantity,
        tier = ?membership_tier,
        total_cents = total.cents(),
        savings_cents = total_discount.cents(),
        "combined pricing calculated"
    );

    Ok(PricingCalculation {
        unit_price_cents: product.unit_price_cents,
        base_install_price_cents: installation.map_or(0, |opt| opt.base_price_cents),
        quantity,
        membership_tier,
        product_subtotal_cents: product_subtotal.cents(),
        installation_subtotal_cents: installation_subtotal.cents(),
        subtotal_before_discounts_cents: subtotal_before.cents(),
        product_discount_cents: product_discount.cents(),
        installation_discount_cents: installation_discount.cents(),
        bundle_discount_cents: bundle_discount.cents(),
        total_discount_cents: total_discount.cents(),
        subtotal_after_discounts_cents: subtotal_after.cents(),
        tax_rate_bps: tax_rate.bps(),
        tax_cents: tax.cents(),
        total_cents: total.cents(),
        total_savings_cents: total_discount.cents(),
        savings_percentage,
        price_display_type: display_type,
        display_price: format_display(display_type, total),
    })
}

// =============================================================================
// Derived Operations
// =============================================================================

/// Runs the engine over a list of quantities (volume quote tables).
pub fn calculate_volume_pricing(
    product: &ProductInfo,
    installation: Option<&InstallationOption>,
    quantities: &[i64],
    membership_tier: Option<MembershipTier>,
) -> CoreResult<Vec<PricingCalculation>> {
    quantities
        .iter()
        .map(|&qty| {
            calculate_combined_pricing(product, installation, qty, membership_tier, None, true)
        })
        .collect()
}

/// What a membership would save on one purchase.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MembershipSavings {
    pub tier: MembershipTier,
    pub non_member_total_cents: i64,
    pub member_total_cents: i64,
    pub total_savings_cents: i64,
    /// Savings as a percentage of the non-member total, one decimal.
    pub percentage_savings: f64,
}

/// Runs the engine without and with a tier and reports the delta.
pub fn membership_savings(
    product: &ProductInfo,
    installation: Option<&InstallationOption>,
    quantity: i64,
    tier: MembershipTier,
) -> CoreResult<MembershipSavings> {
    let without = calculate_combined_pricing(product, installation, quantity, None, None, true)?;
    let with =
        calculate_combined_pricing(product, installation, quantity, Some(tier), None, true)?;

    let savings = without.total_cents - with.total_cents;
    let percentage_savings = if without.total_cents == 0 {
        0.0
    } else {
        let ratio = savings as f64 / without.total_cents as f64;
        (ratio * 1000.0).round() / 10.0
    };

    Ok(MembershipSavings {
        tier,
        non_member_total_cents: without.total_cents,
        member_total_cents: with.total_cents,
        total_savings_cents: savings,
        percentage_savings,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn test_product(unit_price_cents: i64) -> ProductInfo {
        ProductInfo {
            id: "prod-1".to_string(),
            name: "Tankless Water Heater".to_string(),
            sku: "TWH-199".to_string(),
            unit_price_cents,
            cost_price_cents: None,
            requires_professional_install: true,
            install_complexity: InstallComplexity::Standard,
            warranty_years: 5,
            is_taxable: true,
            tax_rate_bps: None,
        }
    }

    fn test_installation(base_price_cents: i64) -> InstallationOption {
        InstallationOption {
            id: "inst-1".to_string(),
            name: "Professional Installation".to_string(),
            base_price_cents,
            ..Default::default()
        }
    }

    #[test]
    fn test_worked_example_residential_bundle() {
        // $1000 product, $300 install, ×1.0, qty 1, residential, 8% tax.
        let product = test_product(100_000);
        let install = test_installation(30_000);

        let calc = calculate_combined_pricing(
            &product,
            Some(&install),
            1,
            Some(MembershipTier::Residential),
            Some(TaxRate::from_bps(800)),
            true,
        )
        .unwrap();

        assert_eq!(calc.product_subtotal_cents, 100_000);
        assert_eq!(calc.installation_subtotal_cents, 30_000);
        assert_eq!(calc.subtotal_before_discounts_cents, 130_000);

        // Membership: $100 product (10%), $45 install (15%).
        // Bundle: $65 (5% of $1300), split $50 / $15 by pre-discount share.
        assert_eq!(calc.product_discount_cents, 15_000);
        assert_eq!(calc.installation_discount_cents, 6_000);
        assert_eq!(calc.bundle_discount_cents, 6_500);
        assert_eq!(calc.total_discount_cents, 21_000);

        assert_eq!(calc.subtotal_after_discounts_cents, 109_000);
        assert_eq!(calc.tax_cents, 8_720); // 8% of $1090
        assert_eq!(calc.total_cents, 117_720);
        assert_eq!(calc.total_savings_cents, 21_000);
        assert_eq!(calc.savings_percentage, 16.2);

        assert_eq!(calc.price_display_type, PriceDisplayType::Fixed);
        assert_eq!(calc.display_price, "$1177");
    }

    #[test]
    fn test_additive_invariants() {
        let product = test_product(123_456);
        let install = test_installation(34_567);

        for qty in [1, 2, 3, 4, 7] {
            for tier in [
                None,
                Some(MembershipTier::Residential),
                Some(MembershipTier::Commercial),
                Some(MembershipTier::Premium),
            ] {
                let calc =
                    calculate_combined_pricing(&product, Some(&install), qty, tier, None, true)
                        .unwrap();

                assert_eq!(
                    calc.subtotal_after_discounts_cents,
                    calc.subtotal_before_discounts_cents - calc.total_discount_cents
                );
                assert_eq!(
                    calc.total_cents,
                    calc.subtotal_after_discounts_cents + calc.tax_cents
                );
                assert_eq!(
                    calc.total_discount_cents,
                    calc.product_discount_cents + calc.installation_discount_cents
                );
            }
        }
    }

    #[test]
    fn test_no_membership_no_installation() {
        let product = test_product(10_000);
        let calc = calculate_combined_pricing(&product, None, 2, None, None, true).unwrap();

        assert_eq!(calc.product_subtotal_cents, 20_000);
        assert_eq!(calc.installation_subtotal_cents, 0);
        assert_eq!(calc.total_discount_cents, 0);
        assert_eq!(calc.bundle_discount_cents, 0); // below $500
        assert_eq!(calc.tax_rate_bps, 825); // system fallback
        assert_eq!(calc.tax_cents, 1_650);
        assert_eq!(calc.total_cents, 21_650);
    }

    #[test]
    fn test_install_volume_factors() {
        assert_eq!(install_volume_factor_bps(1), 10_000);
        assert_eq!(install_volume_factor_bps(2), 9_000);
        assert_eq!(install_volume_factor_bps(3), 9_000);
        assert_eq!(install_volume_factor_bps(4), 8_000);
        assert_eq!(install_volume_factor_bps(50), 8_000);
    }

    #[test]
    fn test_volume_rule_reduces_per_unit_install_cost() {
        let product = test_product(0);
        let install = test_installation(30_000);

        let at = |qty: i64| {
            calculate_combined_pricing(&product, Some(&install), qty, None, None, false)
                .unwrap()
                .installation_subtotal_cents
        };

        assert_eq!(at(1), 30_000);
        assert_eq!(at(2), 54_000); // 600 × 0.9
        assert_eq!(at(3), 81_000);
        assert_eq!(at(4), 96_000); // 1200 × 0.8

        // Per-unit cost strictly drops past each threshold.
        assert!(at(2) / 2 < at(1));
        assert!(at(4) / 4 < at(3) / 3);
    }

    #[test]
    fn test_bundle_threshold() {
        // $300 + $199.99 = $499.99: just below the threshold.
        let below = calculate_combined_pricing(
            &test_product(30_000),
            Some(&test_installation(19_999)),
            1,
            None,
            None,
            true,
        )
        .unwrap();
        assert_eq!(below.bundle_discount_cents, 0);

        // One more cent crosses it.
        let at = calculate_combined_pricing(
            &test_product(30_000),
            Some(&test_installation(20_000)),
            1,
            None,
            None,
            true,
        )
        .unwrap();
        assert_eq!(at.subtotal_before_discounts_cents, 50_000);
        assert_eq!(at.bundle_discount_cents, 2_500);
    }

    #[test]
    fn test_bundle_disabled_flag() {
        let calc = calculate_combined_pricing(
            &test_product(100_000),
            Some(&test_installation(30_000)),
            1,
            None,
            None,
            false,
        )
        .unwrap();
        assert_eq!(calc.bundle_discount_cents, 0);
        assert_eq!(calc.total_discount_cents, 0);
    }

    #[test]
    fn test_tier_override_cheaper_than_subtotal() {
        let product = test_product(10_000);
        let mut install = test_installation(30_000);
        install.residential_price_cents = Some(20_000);

        let calc = calculate_combined_pricing(
            &product,
            Some(&install),
            1,
            Some(MembershipTier::Residential),
            None,
            false,
        )
        .unwrap();

        // Difference-based: $300 − $200 = $100, not the 15% rate ($45).
        assert_eq!(calc.installation_discount_cents, 10_000);
    }

    #[test]
    fn test_tier_override_not_cheaper_falls_back_to_rate() {
        let product = test_product(10_000);
        let mut install = test_installation(30_000);
        install.residential_price_cents = Some(35_000);

        let calc = calculate_combined_pricing(
            &product,
            Some(&install),
            1,
            Some(MembershipTier::Residential),
            None,
            false,
        )
        .unwrap();

        assert_eq!(calc.installation_discount_cents, 4_500); // 15% of $300
    }

    #[test]
    fn test_membership_tier_total_ordering() {
        let product = test_product(100_000);
        let install = test_installation(30_000);

        let total = |tier: Option<MembershipTier>| {
            calculate_combined_pricing(&product, Some(&install), 1, tier, None, true)
                .unwrap()
                .total_cents
        };

        let none = total(None);
        let residential = total(Some(MembershipTier::Residential));
        let commercial = total(Some(MembershipTier::Commercial));
        let premium = total(Some(MembershipTier::Premium));

        assert!(premium <= commercial);
        assert!(commercial <= residential);
        assert!(residential <= none);
    }

    #[test]
    fn test_display_quote_required_wins() {
        let mut product = test_product(0);
        product.install_complexity = InstallComplexity::Expert;

        // Expert beats both the site-review rule and the free rule.
        let mut install = test_installation(0);
        install
            .requirements
            .insert("permit".to_string(), "required".to_string());

        let calc =
            calculate_combined_pricing(&product, Some(&install), 1, None, None, true).unwrap();
        assert_eq!(calc.price_display_type, PriceDisplayType::QuoteRequired);
        assert_eq!(calc.display_price, "Quote Required");
    }

    #[test]
    fn test_display_from_on_site_review_requirement() {
        let product = test_product(100_000);
        let mut install = test_installation(30_000);
        install
            .requirements
            .insert("electrical_upgrade".to_string(), "200A panel".to_string());

        let calc = calculate_combined_pricing(
            &product,
            Some(&install),
            1,
            Some(MembershipTier::Residential),
            Some(TaxRate::from_bps(800)),
            true,
        )
        .unwrap();
        assert_eq!(calc.price_display_type, PriceDisplayType::From);
        assert_eq!(calc.display_price, "from $1177");
    }

    #[test]
    fn test_display_free_for_zero_priced_bundle() {
        let product = test_product(0);

        let calc = calculate_combined_pricing(&product, None, 4, None, None, true).unwrap();
        assert_eq!(calc.price_display_type, PriceDisplayType::Free);
        assert_eq!(calc.display_price, "FREE");
        assert_eq!(calc.total_cents, 0);
        assert_eq!(calc.savings_percentage, 0.0);

        // A zero-price install option still counts as free.
        let install = test_installation(0);
        let calc =
            calculate_combined_pricing(&product, Some(&install), 1, None, None, true).unwrap();
        assert_eq!(calc.price_display_type, PriceDisplayType::Free);
    }

    #[test]
    fn test_display_not_free_when_install_costs() {
        let product = test_product(0);
        let install = test_installation(5_000);

        let calc =
            calculate_combined_pricing(&product, Some(&install), 1, None, None, true).unwrap();
        assert_eq!(calc.price_display_type, PriceDisplayType::Fixed);
    }

    #[test]
    fn test_non_taxable_product() {
        let mut product = test_product(10_000);
        product.is_taxable = false;

        let calc = calculate_combined_pricing(&product, None, 1, None, None, true).unwrap();
        assert_eq!(calc.tax_cents, 0);
        assert_eq!(calc.total_cents, 10_000);
    }

    #[test]
    fn test_tax_rate_precedence() {
        let mut product = test_product(10_000);
        product.tax_rate_bps = Some(600);

        // Product override beats the system default.
        let calc = calculate_combined_pricing(&product, None, 1, None, None, true).unwrap();
        assert_eq!(calc.tax_rate_bps, 600);
        assert_eq!(calc.tax_cents, 600);

        // Caller override beats the product rate.
        let calc = calculate_combined_pricing(
            &product,
            None,
            1,
            None,
            Some(TaxRate::from_bps(700)),
            true,
        )
        .unwrap();
        assert_eq!(calc.tax_rate_bps, 700);
        assert_eq!(calc.tax_cents, 700);
    }

    #[test]
    fn test_invalid_inputs_rejected() {
        let product = test_product(10_000);
        assert!(calculate_combined_pricing(&product, None, 0, None, None, true).is_err());
        assert!(calculate_combined_pricing(&product, None, -2, None, None, true).is_err());

        let negative = test_product(-100);
        assert!(calculate_combined_pricing(&negative, None, 1, None, None, true).is_err());

        let bad_rate = Some(TaxRate::from_bps(20_000));
        assert!(calculate_combined_pricing(&product, None, 1, None, bad_rate, true).is_err());
    }

    #[test]
    fn test_option_complexity_multiplier_feeds_subtotal() {
        let product = test_product(0);
        let mut install = test_installation(30_000);
        install.complexity_multiplier_bps = 15_000; // ×1.5

        let calc =
            calculate_combined_pricing(&product, Some(&install), 1, None, None, false).unwrap();
        assert_eq!(calc.installation_subtotal_cents, 45_000);
    }

    #[test]
    fn test_volume_pricing_maps_engine() {
        let product = test_product(50_000);
        let install = test_installation(20_000);
        let quantities = [1, 2, 5];

        let table = calculate_volume_pricing(
            &product,
            Some(&install),
            &quantities,
            Some(MembershipTier::Commercial),
        )
        .unwrap();

        assert_eq!(table.len(), 3);
        for (calc, &qty) in table.iter().zip(quantities.iter()) {
            let single = calculate_combined_pricing(
                &product,
                Some(&install),
                qty,
                Some(MembershipTier::Commercial),
                None,
                true,
            )
            .unwrap();
            assert_eq!(calc.quantity, qty);
            assert_eq!(calc.total_cents, single.total_cents);
        }
    }

    #[test]
    fn test_membership_savings_delta() {
        let product = test_product(100_000);
        let install = test_installation(30_000);

        let savings =
            membership_savings(&product, Some(&install), 1, MembershipTier::Premium).unwrap();

        let without =
            calculate_combined_pricing(&product, Some(&install), 1, None, None, true).unwrap();
        let with = calculate_combined_pricing(
            &product,
            Some(&install),
            1,
            Some(MembershipTier::Premium),
            None,
            true,
        )
        .unwrap();

        assert_eq!(savings.non_member_total_cents, without.total_cents);
        assert_eq!(savings.member_total_cents, with.total_cents);
        assert_eq!(
            savings.total_savings_cents,
            without.total_cents - with.total_cents
        );
        assert!(savings.total_savings_cents > 0);
        assert!(savings.percentage_savings > 0.0);
    }

    #[test]
    fn test_pricing_calculation_wire_field_names() {
        let product = test_product(10_000);
        let calc = calculate_combined_pricing(&product, None, 1, None, None, true).unwrap();

        let json = serde_json::to_value(&calc).unwrap();
        assert_eq!(json["price_display_type"], "fixed");
        assert_eq!(json["total_cents"], 10_825);
        assert_eq!(json["quantity"], 1);
        assert!(json.get("subtotal_before_discounts_cents").is_some());

        // And it round-trips.
        let back: PricingCalculation = serde_json::from_value(json).unwrap();
        assert_eq!(back.total_cents, calc.total_cents);
    }

    #[test]
    fn test_engine_emits_debug_event() {
        use std::io;
        use std::sync::{Arc, Mutex};

        #[derive(Clone)]
        struct Capture(Arc<Mutex<Vec<u8>>>);

        impl io::Write for Capture {
            fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
                self.0.lock().unwrap().extend_from_slice(buf);
                Ok(buf.len())
            }

            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let buffer = Arc::new(Mutex::new(Vec::new()));
        let writer = Capture(buffer.clone());
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            let product = test_product(10_000);
            calculate_combined_pricing(&product, None, 1, None, None, true).unwrap();
        });

        let output = String::from_utf8(buffer.lock().unwrap().clone()).unwrap();
        assert!(output.contains("combined pricing calculated"));
        assert!(output.contains("TWH-199"));
        assert!(output.contains("total_cents=10825"));
    }

    #[test]
    fn test_savings_percentage_rounded_to_one_decimal() {
        // 21000 / 130000 = 16.1538...% → 16.2
        let calc = calculate_combined_pricing(
            &test_product(100_000),
            Some(&test_installation(30_000)),
            1,
            Some(MembershipTier::Residential),
            None,
            true,
        )
        .unwrap();
        assert_eq!(calc.savings_percentage, 16.2);
    }
}
