use iris_storefront::context::StorefrontContext;

pub(crate) async fn run(context: &StorefrontContext) -> Result<(), String> {
    let user = context
        .auth
        .me()
        .await
        .map_err(|error| format!("failed to fetch the signed-in account: {error}"))?;

    println!("id: {}", user.id);
    println!("email: {}", user.email);
    println!("name: {}", user.name.as_deref().unwrap_or("-"));
    println!("role: {}", user.role.as_deref().unwrap_or("-"));

    Ok(())
}
