use clap::Args;

use iris_storefront::{context::StorefrontContext, domain::carts::models::CartItemId};

#[derive(Debug, Args)]
pub(crate) struct SetQtyArgs {
    /// Cart line ID (see `iris cart show`)
    item: CartItemId,

    /// New quantity, at least 1
    qty: i64,
}

pub(crate) async fn run(context: &StorefrontContext, args: SetQtyArgs) -> Result<(), String> {
    let cart = context
        .carts
        .set_quantity(args.item, args.qty)
        .await
        .map_err(|error| format!("failed to change the quantity: {error}"))?;

    super::print_cart(&cart);

    Ok(())
}
