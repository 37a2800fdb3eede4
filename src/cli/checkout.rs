use iris_storefront::context::StorefrontContext;

pub(crate) async fn run(context: &StorefrontContext) -> Result<(), String> {
    context
        .carts
        .refresh()
        .await
        .map_err(|error| format!("failed to fetch the cart: {error}"))?;

    let receipt = context
        .place_order()
        .await
        .map_err(|error| format!("checkout failed: {error}"))?;

    println!("order #{} placed", receipt.order_id);
    println!("run `iris pay` to pay by QR");

    Ok(())
}
