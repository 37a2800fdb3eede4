//! Variant resolution and the stock guard.
//!
//! Adding to the cart always targets a variant, never a bare product. The
//! functions here decide which variant an add targets, and how much of it
//! may still be added once the quantity already sitting in the cart is
//! accounted for.

use crate::domain::catalog::models::{ListingCard, Product, Variant, VariantId};

/// What an "add to cart" on a listing or product resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddTarget {
    /// A concrete variant; the cart call may fire.
    Variant(VariantId),
    /// No unambiguous variant; ask the user to pick a shade. The cart call
    /// must not fire.
    NeedsSelection,
}

/// Resolves the add target for a listing card.
#[must_use]
pub fn add_target(listing: &ListingCard) -> AddTarget {
    match listing.variant_hint {
        Some(id) => AddTarget::Variant(id),
        None => AddTarget::NeedsSelection,
    }
}

/// Resolves the add target on a product detail, honoring an explicit
/// choice.
///
/// A chosen id must name an active variant of this product. Without a
/// choice, a product with exactly one active shade is unambiguous;
/// anything else needs a selection.
#[must_use]
pub fn resolve_variant(product: &Product, chosen: Option<VariantId>) -> AddTarget {
    if let Some(id) = chosen {
        return product
            .active_variants()
            .find(|variant| variant.id == id)
            .map_or(AddTarget::NeedsSelection, |variant| {
                AddTarget::Variant(variant.id)
            });
    }

    let mut active = product.active_variants();

    match (active.next(), active.next()) {
        (Some(only), None) => AddTarget::Variant(only.id),
        _ => AddTarget::NeedsSelection,
    }
}

/// How much of a variant may still be added on top of what the cart
/// already holds.
#[must_use]
pub const fn addable_quantity(stock_qty: i64, in_cart: i64) -> i64 {
    let left = stock_qty - in_cart;

    if left < 0 { 0 } else { left }
}

/// Outcome of the stock guard for a requested quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddDecision {
    /// The full requested quantity fits.
    Allowed { qty: i64 },
    /// The request exceeds what is still addable; offer `addable` with a
    /// limited-stock notice instead of silently succeeding.
    Clamped { addable: i64 },
    /// Nothing can be added, even when the raw stock figure is positive.
    OutOfStock,
}

/// Checks a requested quantity against the variant's stock minus what the
/// cart already holds.
#[must_use]
pub fn check_add(variant: &Variant, in_cart: i64, requested: i64) -> AddDecision {
    let addable = addable_quantity(variant.stock_qty, in_cart);

    if addable <= 0 {
        return AddDecision::OutOfStock;
    }

    if requested > addable {
        return AddDecision::Clamped { addable };
    }

    AddDecision::Allowed { qty: requested }
}
