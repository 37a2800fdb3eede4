use clap::Args;

use iris_storefront::{
    context::StorefrontContext,
    domain::catalog::{
        AddDecision, AddTarget, check_add,
        models::{ProductId, VariantId},
        resolve_variant,
    },
};

use crate::cli::output;

#[derive(Debug, Args)]
pub(crate) struct AddArgs {
    /// Product ID
    product: ProductId,

    /// Shade (variant) ID; required when the product has several shades
    #[arg(long)]
    variant: Option<VariantId>,

    /// Quantity to add
    #[arg(long, default_value_t = 1)]
    qty: i64,
}

pub(crate) async fn run(context: &StorefrontContext, args: AddArgs) -> Result<(), String> {
    if args.qty < 1 {
        return Err("quantity must be at least 1".to_string());
    }

    let product = context
        .catalog
        .get_product(args.product)
        .await
        .map_err(|error| format!("failed to fetch product {}: {error}", args.product))?;

    // The stock guard counts what the cart already holds, so the snapshot
    // has to be current before any decision is made.
    context
        .carts
        .refresh()
        .await
        .map_err(|error| format!("failed to fetch the cart: {error}"))?;

    let variant_id = match resolve_variant(&product, args.variant) {
        AddTarget::Variant(id) => id,
        AddTarget::NeedsSelection => {
            println!("{} comes in several shades; pick one:", product.name);

            for variant in product.active_variants() {
                println!(
                    "  --variant {}  {} ({}, stock {})",
                    variant.id,
                    variant.label(),
                    output::money(variant.price),
                    variant.stock_qty
                );
            }

            return Err("no shade selected".to_string());
        }
    };

    let variant = product
        .variants
        .iter()
        .find(|variant| variant.id == variant_id)
        .ok_or_else(|| format!("product {} has no shade {variant_id}", product.id))?;

    let in_cart = context.carts.quantity_of(variant.id);

    let quantity = match check_add(variant, in_cart, args.qty) {
        AddDecision::Allowed { qty } => qty,
        AddDecision::Clamped { addable } => {
            println!(
                "only {addable} more of {} can be added; adding {addable}",
                variant.label()
            );

            addable
        }
        AddDecision::OutOfStock => return Err(format!("{} is out of stock", variant.label())),
    };

    let cart = context
        .carts
        .add(variant.id, quantity)
        .await
        .map_err(|error| format!("failed to add to the cart: {error}"))?;

    super::print_cart(&cart);

    Ok(())
}
