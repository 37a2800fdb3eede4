//! Cart models.

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;

use crate::{
    domain::{
        carts::records::{CartItemRecord, CartSnapshotRecord, CartSummaryRecord},
        catalog::models::VariantId,
    },
    ids::TypedId,
};

/// Cart item id
pub type CartItemId = TypedId<CartItem>;

/// The server's cart as of the last response; the only authoritative copy
/// lives server-side.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CartSnapshot {
    pub items: Vec<CartItem>,
    pub summary: CartSummary,
}

impl CartSnapshot {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Quantity of one variant across all lines that reference it.
    #[must_use]
    pub fn quantity_of(&self, variant: VariantId) -> i64 {
        self.items
            .iter()
            .filter(|item| item.variant_id == Some(variant))
            .map(|item| item.qty)
            .sum()
    }

    /// Per-variant quantities for all lines that carry a variant
    /// reference.
    #[must_use]
    pub fn variant_quantities(&self) -> FxHashMap<VariantId, i64> {
        let mut totals = FxHashMap::default();

        for item in &self.items {
            if let Some(variant) = item.variant_id {
                *totals.entry(variant).or_default() += item.qty;
            }
        }

        totals
    }
}

impl From<CartSnapshotRecord> for CartSnapshot {
    fn from(record: CartSnapshotRecord) -> Self {
        Self {
            items: record.items.into_iter().map(CartItem::from).collect(),
            summary: record.summary.map(CartSummary::from).unwrap_or_default(),
        }
    }
}

/// One line of the cart, as the server last reported it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItem {
    pub id: CartItemId,
    pub variant_id: Option<VariantId>,
    pub qty: i64,
    pub name: Option<String>,
    pub sku: Option<String>,
    pub shade_name: Option<String>,
    pub shade_code: Option<String>,
    pub image_url: Option<String>,
    /// Unit price as of the last fetch.
    pub price_now: Option<Decimal>,
    /// Stock figure as of the last fetch.
    pub stock_qty: Option<i64>,
}

impl CartItem {
    /// Label for this line: product name, else SKU, else the line id.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .or_else(|| self.sku.clone())
            .unwrap_or_else(|| format!("#{}", self.id))
    }

    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price_now.unwrap_or_default() * Decimal::from(self.qty)
    }
}

impl From<CartItemRecord> for CartItem {
    fn from(record: CartItemRecord) -> Self {
        Self {
            id: record.id,
            variant_id: record.variant_id,
            qty: record.qty,
            name: record.name,
            sku: record.sku,
            shade_name: record.shade_name,
            shade_code: record.shade_code,
            image_url: record.image_url,
            price_now: record.price_now,
            stock_qty: record.stock_qty,
        }
    }
}

/// Server-computed totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CartSummary {
    pub total_qty: i64,
    pub subtotal: Decimal,
}

impl From<CartSummaryRecord> for CartSummary {
    fn from(record: CartSummaryRecord) -> Self {
        Self {
            total_qty: record.total_qty,
            subtotal: record.subtotal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: i64, variant: Option<i64>, qty: i64) -> CartItem {
        CartItem {
            id: CartItemId::new(id),
            variant_id: variant.map(VariantId::new),
            qty,
            name: None,
            sku: None,
            shade_name: None,
            shade_code: None,
            image_url: None,
            price_now: Some(Decimal::from(100)),
            stock_qty: None,
        }
    }

    #[test]
    fn quantity_of_sums_across_lines_for_the_same_variant() {
        let snapshot = CartSnapshot {
            items: vec![item(1, Some(42), 2), item(2, Some(42), 1), item(3, Some(7), 5)],
            summary: CartSummary::default(),
        };

        assert_eq!(snapshot.quantity_of(VariantId::new(42)), 3);
        assert_eq!(snapshot.quantity_of(VariantId::new(7)), 5);
        assert_eq!(snapshot.quantity_of(VariantId::new(99)), 0);
    }

    #[test]
    fn lines_without_a_variant_reference_count_for_nothing() {
        let snapshot = CartSnapshot {
            items: vec![item(1, None, 4)],
            summary: CartSummary::default(),
        };

        assert_eq!(snapshot.quantity_of(VariantId::new(4)), 0);
    }

    #[test]
    fn variant_quantities_groups_lines_by_variant() {
        let snapshot = CartSnapshot {
            items: vec![item(1, Some(42), 2), item(2, Some(42), 1), item(3, None, 9)],
            summary: CartSummary::default(),
        };

        let totals = snapshot.variant_quantities();

        assert_eq!(totals.get(&VariantId::new(42)), Some(&3));
        assert_eq!(totals.len(), 1);
    }

    #[test]
    fn line_total_multiplies_unit_price_by_quantity() {
        assert_eq!(item(1, Some(42), 3).line_total(), Decimal::from(300));
    }
}
