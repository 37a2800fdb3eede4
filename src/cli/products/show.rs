use clap::Args;
use tabled::builder::Builder;

use iris_storefront::{
    context::StorefrontContext,
    domain::catalog::models::{Product, ProductId},
};

use crate::cli::output;

/// The detail view footer shows at most this many related products.
const RELATED_LIMIT: usize = 4;

#[derive(Debug, Args)]
pub(crate) struct ShowProductArgs {
    /// Product ID
    product: ProductId,
}

pub(crate) async fn run(context: &StorefrontContext, args: ShowProductArgs) -> Result<(), String> {
    let product = context
        .catalog
        .get_product(args.product)
        .await
        .map_err(|error| format!("failed to fetch product {}: {error}", args.product))?;

    // Signed-in viewers see how many of each shade the cart already holds.
    if context.tokens.is_present() {
        if let Err(error) = context.carts.refresh().await {
            tracing::debug!(%error, "cart unavailable, shade table shows no held quantities");
        }
    }

    print_product(context, &product);

    match context
        .catalog
        .related_products(product.id, RELATED_LIMIT)
        .await
    {
        Ok(related) if !related.is_empty() => {
            println!();
            println!("related:");

            for card in related {
                println!("  #{} {} ({})", card.id, card.name, output::money(card.price));
            }
        }
        Ok(_) => {}
        Err(error) => tracing::debug!(%error, "related products unavailable"),
    }

    Ok(())
}

fn print_product(context: &StorefrontContext, product: &Product) {
    println!("{} (#{})", product.name, product.id);

    if let Some(description) = &product.description {
        println!("{description}");
    }

    println!("base price: {}", output::money(product.base_price));

    if product.variants.is_empty() {
        println!("no shades listed");
        return;
    }

    let held = context
        .carts
        .snapshot()
        .map(|cart| cart.variant_quantities())
        .unwrap_or_default();

    let mut builder = Builder::default();
    builder.push_record(["ID", "SHADE", "SKU", "PRICE", "STOCK", "IN CART"]);

    for variant in &product.variants {
        let stock = if variant.is_active {
            variant.stock_qty.to_string()
        } else {
            "off sale".to_string()
        };

        let in_cart = held.get(&variant.id).copied().unwrap_or(0);

        builder.push_record([
            variant.id.to_string(),
            variant.label().to_string(),
            variant.sku.clone(),
            output::money(variant.price),
            stock,
            if in_cart > 0 {
                in_cart.to_string()
            } else {
                String::new()
            },
        ]);
    }

    println!("{}", output::render_table(builder, &[3, 4, 5]));
}
