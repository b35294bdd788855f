//! # Shopping Cart
//!
//! Cart aggregate: line items, merge-on-add, and cart totals.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Cart Operations                                    │
//! │                                                                         │
//! │  Checkout Action          Core Operation           State Change         │
//! │  ───────────────          ──────────────           ────────────         │
//! │                                                                         │
//! │  Add product+install ───► add_item() ────────────► merge or append      │
//! │  Change quantity ───────► update_item_quantity() ► qty = n (0 removes)  │
//! │  Remove line ───────────► remove_item() ─────────► items.remove(i)      │
//! │  Empty cart ────────────► clear() ───────────────► items.clear()        │
//! │                                                                         │
//! │  INVARIANT: at most one line per (product_id, installation_option_id). │
//! │  Adding a duplicate combination increments quantity instead.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Items carry a pre-resolved flat `discount_bps`, typically produced by an
//! earlier pricing-engine call. The cart never re-derives membership or
//! bundle logic: its totals are the simple flat-percentage model.
//!
//! Concurrency: a cart is single-writer state. Serializing concurrent
//! mutations to the same cart (versioning, per-cart locks) is the
//! persistence layer's job, not this crate's.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{InstallationOption, ProductInfo, TaxRate};
use crate::validation::{
    validate_cart_size, validate_discount_bps, validate_quantity, validate_sku,
};
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

/// Default cart tax rate: 8%.
pub const DEFAULT_CART_TAX_RATE_BPS: u32 = 800;

// =============================================================================
// Cart Item
// =============================================================================

/// A line item in a shopping cart.
///
/// Uses the snapshot pattern: product and installation data are frozen at
/// the moment of adding, so later catalog edits don't change a live cart.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartItem {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Owning cart.
    pub cart_id: String,

    /// Product reference plus frozen display data.
    pub product_id: String,
    pub product_name: String,
    pub product_sku: String,

    /// Quantity in cart. Always >= 1.
    pub quantity: i64,

    /// Unit price in cents at time of adding (frozen).
    pub unit_price_cents: i64,

    /// Chosen installation, if any, with its frozen per-unit price.
    pub installation_option_id: Option<String>,
    pub installation_name: Option<String>,
    pub installation_price_cents: i64,

    /// Membership plan the discount was resolved under, if any.
    pub membership_plan_id: Option<String>,

    /// Flat discount in basis points (0..=10000), applied after product and
    /// installation are summed. Pre-resolved by the pricing engine.
    pub discount_bps: u32,

    /// When this item was added to the cart.
    #[ts(as = "String")]
    pub added_at: DateTime<Utc>,
}

impl CartItem {
    /// Creates a cart item from product and installation snapshots.
    ///
    /// The installation price is frozen as the option's per-unit price
    /// (base × complexity multiplier), matching the engine's step 1.
    pub fn new(
        cart_id: &str,
        product: &ProductInfo,
        installation: Option<&InstallationOption>,
        quantity: i64,
    ) -> Self {
        CartItem {
            id: Uuid::new_v4().to_string(),
            cart_id: cart_id.to_string(),
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            product_sku: product.sku.clone(),
            quantity,
            unit_price_cents: product.unit_price_cents,
            installation_option_id: installation.map(|opt| opt.id.clone()),
            installation_name: installation.map(|opt| opt.name.clone()),
            installation_price_cents: installation
                .map_or(0, |opt| opt.per_unit_price().cents()),
            membership_plan_id: None,
            discount_bps: 0,
            added_at: Utc::now(),
        }
    }

    /// Line total: `(unit + install) × qty`, minus the flat discount,
    /// rounded half-up to the cent.
    pub fn item_total(&self) -> Money {
        let gross = Money::from_cents(self.unit_price_cents + self.installation_price_cents)
            .multiply_quantity(self.quantity);
        gross - gross.scale_bps(self.discount_bps)
    }

    /// [`CartItem::item_total`] in raw cents.
    #[inline]
    pub fn item_total_cents(&self) -> i64 {
        self.item_total().cents()
    }

    /// Merge identity: two items merge when both references match.
    fn merge_key(&self) -> (&str, Option<&str>) {
        (&self.product_id, self.installation_option_id.as_deref())
    }
}

// =============================================================================
// Shopping Cart
// =============================================================================

/// A customer's shopping cart.
///
/// ## Invariants
/// - At most one line per `(product_id, installation_option_id)` pair
/// - Line quantity is always >= 1 (update to <= 0 removes the line)
/// - Maximum distinct lines: 100; maximum quantity per line: 999
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ShoppingCart {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Tenant the cart belongs to.
    pub business_id: String,

    /// Anonymous session, when no customer is signed in.
    pub session_id: Option<String>,

    /// Signed-in customer, when known.
    pub customer_id: Option<String>,

    /// Line items, in insertion order.
    pub items: Vec<CartItem>,

    /// Cart-level tax rate in basis points.
    pub tax_rate_bps: u32,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,

    /// Abandoned-cart expiry, when the tenant configures one.
    #[ts(as = "Option<String>")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl ShoppingCart {
    /// Creates a new empty cart for a tenant.
    pub fn new(business_id: &str) -> Self {
        let now = Utc::now();
        ShoppingCart {
            id: Uuid::new_v4().to_string(),
            business_id: business_id.to_string(),
            session_id: None,
            customer_id: None,
            items: Vec::new(),
            tax_rate_bps: DEFAULT_CART_TAX_RATE_BPS,
            created_at: now,
            updated_at: now,
            expires_at: None,
        }
    }

    /// Adds an item, merging with an existing line when the
    /// `(product_id, installation_option_id)` combination already exists.
    ///
    /// ## Errors
    /// - Invalid quantity, discount, or SKU snapshot on the incoming item
    /// - Merged quantity above the per-line maximum
    /// - Cart already at the distinct-line maximum
    pub fn add_item(&mut self, item: CartItem) -> CoreResult<()> {
        validate_quantity(item.quantity)?;
        validate_discount_bps(item.discount_bps)?;
        validate_sku(&item.product_sku)?;

        if let Some(existing) = self
            .items
            .iter_mut()
            .find(|i| i.merge_key() == item.merge_key())
        {
            let new_qty = existing.quantity + item.quantity;
            if new_qty > MAX_ITEM_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested: new_qty,
                    max: MAX_ITEM_QUANTITY,
                });
            }
            existing.quantity = new_qty;
            self.updated_at = Utc::now();
            debug!(cart = %self.id, product = %item.product_id, new_qty, "merged cart line");
            return Ok(());
        }

        validate_cart_size(self.items.len()).map_err(|_| CoreError::CartTooLarge {
            max: MAX_CART_ITEMS,
        })?;

        debug!(cart = %self.id, product = %item.product_id, qty = item.quantity, "added cart line");
        self.items.push(item);
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Removes a line by item id. Returns false when no such item exists.
    pub fn remove_item(&mut self, item_id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|i| i.id != item_id);

        if self.items.len() < before {
            self.updated_at = Utc::now();
            debug!(cart = %self.id, item = item_id, "removed cart line");
            true
        } else {
            false
        }
    }

    /// Sets a line's quantity. Quantity <= 0 removes the line.
    /// Returns false when no such item exists.
    ///
    /// A requested quantity above the per-line maximum is clamped to 999
    /// rather than rejected; the bool return carries no error channel.
    pub fn update_item_quantity(&mut self, item_id: &str, quantity: i64) -> bool {
        if quantity <= 0 {
            return self.remove_item(item_id);
        }

        let quantity = quantity.min(MAX_ITEM_QUANTITY);
        if let Some(item) = self.items.iter_mut().find(|i| i.id == item_id) {
            item.quantity = quantity;
            self.updated_at = Utc::now();
            true
        } else {
            false
        }
    }

    /// Empties the cart.
    pub fn clear(&mut self) {
        self.items.clear();
        self.updated_at = Utc::now();
    }

    /// Number of distinct lines.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Total quantity across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether the cart has passed its expiry, as of `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }

    /// Cart subtotal: sum of line totals (discounts already applied).
    pub fn subtotal(&self) -> Money {
        self.items.iter().map(|i| i.item_total()).sum()
    }

    /// Tax on the subtotal at the cart rate.
    pub fn tax(&self) -> Money {
        self.subtotal().calculate_tax(TaxRate::from_bps(self.tax_rate_bps))
    }

    /// Grand total: subtotal + tax.
    pub fn total(&self) -> Money {
        self.subtotal() + self.tax()
    }
}

/// Cart totals summary for API responses.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartTotals {
    pub item_count: usize,
    pub total_quantity: i64,
    pub subtotal_cents: i64,
    pub tax_cents: i64,
    pub total_cents: i64,
}

impl From<&ShoppingCart> for CartTotals {
    fn from(cart: &ShoppingCart) -> Self {
        CartTotals {
            item_count: cart.item_count(),
            total_quantity: cart.total_quantity(),
            subtotal_cents: cart.subtotal().cents(),
            tax_cents: cart.tax().cents(),
            total_cents: cart.total().cents(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
