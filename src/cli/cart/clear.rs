use iris_storefront::context::StorefrontContext;

pub(crate) async fn run(context: &StorefrontContext) -> Result<(), String> {
    context
        .carts
        .clear()
        .await
        .map_err(|error| format!("failed to clear the cart: {error}"))?;

    println!("cart cleared");

    Ok(())
}
