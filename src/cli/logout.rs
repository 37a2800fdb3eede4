use iris_storefront::context::StorefrontContext;

pub(crate) async fn run(context: &StorefrontContext) -> Result<(), String> {
    context
        .auth
        .logout()
        .await
        .map_err(|error| format!("failed to sign out: {error}"))?;

    context.carts.sync_session(None).await;

    println!("signed out");

    Ok(())
}
