use clap::Args;

use iris_storefront::context::StorefrontContext;

#[derive(Debug, Args)]
pub(crate) struct LoginArgs {
    /// Account email
    #[arg(long, env = "IRIS_EMAIL")]
    email: String,

    /// Account password
    #[arg(long, env = "IRIS_PASSWORD", hide_env_values = true)]
    password: String,
}

pub(crate) async fn run(context: &StorefrontContext, args: LoginArgs) -> Result<(), String> {
    let user = context
        .auth
        .login(&args.email, &args.password)
        .await
        .map_err(|error| format!("failed to sign in: {error}"))?;

    context.carts.sync_session(Some(&user)).await;

    println!("signed in as {} <{}>", user.display_name(), user.email);

    let held = context.carts.total_quantity();

    if held > 0 {
        println!("your cart holds {held} item(s)");
    }

    Ok(())
}
