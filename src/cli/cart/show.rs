use iris_storefront::context::StorefrontContext;

pub(crate) async fn run(context: &StorefrontContext) -> Result<(), String> {
    let cart = context
        .carts
        .refresh()
        .await
        .map_err(|error| format!("failed to fetch the cart: {error}"))?;

    super::print_cart(&cart);

    Ok(())
}
