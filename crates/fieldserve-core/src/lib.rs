//! # fieldserve-core: Pure Business Logic for FieldServe
//!
//! This crate is the **heart** of the FieldServe backend. It contains the
//! product + installation pricing engine, the installation catalog, and the
//! cart aggregate as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      FieldServe Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              HTTP API / Checkout / CRM (excluded)               │   │
//! │  │   resolves products & installs ──► quotes ──► persists carts    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ fieldserve-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │  ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌──────────┐  │   │
//! │  │  │  types  │ │  money  │ │ catalog │ │ pricing │ │   cart   │  │   │
//! │  │  │ Product │ │  Money  │ │Templates│ │ Engine  │ │   Cart   │  │   │
//! │  │  │ Install │ │ TaxRate │ │AdjPrice │ │Discounts│ │ CartItem │  │   │
//! │  │  └─────────┘ └─────────┘ └─────────┘ └─────────┘ └──────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain snapshots (ProductInfo, InstallationOption, tiers)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`catalog`] - Installation templates and the adjusted-price calculator
//! - [`pricing`] - The combined pricing engine and its breakdown output
//! - [`cart`] - Shopping cart aggregate with merge-on-add semantics
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation at the call boundary
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every calculation is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are cents (i64); all rates are
//!    basis points, applied with round-half-up in i128
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use fieldserve_core::pricing::calculate_combined_pricing;
//! use fieldserve_core::types::{InstallComplexity, MembershipTier, ProductInfo};
//!
//! let product = ProductInfo {
//!     id: "p1".into(),
//!     name: "Tankless Water Heater".into(),
//!     sku: "TWH-199".into(),
//!     unit_price_cents: 100_000,
//!     cost_price_cents: None,
//!     requires_professional_install: true,
//!     install_complexity: InstallComplexity::Standard,
//!     warranty_years: 5,
//!     is_taxable: true,
//!     tax_rate_bps: None,
//! };
//!
//! let quote = calculate_combined_pricing(
//!     &product,
//!     None,                               // no installation selected
//!     2,                                  // quantity
//!     Some(MembershipTier::Residential),  // membership
//!     None,                               // system default tax rate
//!     true,                               // bundle discount allowed
//! )
//! .unwrap();
//!
//! assert_eq!(quote.product_subtotal_cents, 200_000);
//! assert_eq!(quote.total_savings_cents, 30_000); // 10% member + 5% bundle
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod catalog;
pub mod error;
pub mod money;
pub mod pricing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use fieldserve_core::Money` instead of
// `use fieldserve_core::money::Money`

pub use cart::{CartItem, CartTotals, ShoppingCart};
pub use catalog::{InstallationCatalog, InstallationTemplate};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use pricing::{calculate_combined_pricing, PriceDisplayType, PricingCalculation};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum distinct line items allowed in a single cart
///
/// ## Business Reason
/// Prevents runaway carts and ensures reasonable transaction sizes.
/// Can be made configurable per-tenant in future versions.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single item in cart
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10)
/// Configurable per-tenant in future versions.
pub const MAX_ITEM_QUANTITY: i64 = 999;
