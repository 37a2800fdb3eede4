use clap::Args;

use iris_storefront::{context::StorefrontContext, domain::carts::models::CartItemId};

#[derive(Debug, Args)]
pub(crate) struct RemoveArgs {
    /// Cart line ID (see `iris cart show`)
    item: CartItemId,
}

pub(crate) async fn run(context: &StorefrontContext, args: RemoveArgs) -> Result<(), String> {
    let cart = context
        .carts
        .remove(args.item)
        .await
        .map_err(|error| format!("failed to remove the line: {error}"))?;

    super::print_cart(&cart);

    Ok(())
}
