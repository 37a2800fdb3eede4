use clap::{Args, Subcommand};
use tabled::builder::Builder;

use iris_storefront::{context::StorefrontContext, domain::carts::models::CartSnapshot};

use super::output;

mod add;
mod clear;
mod remove;
mod set_qty;
mod show;

#[derive(Debug, Args)]
pub(crate) struct CartCommand {
    #[command(subcommand)]
    command: CartSubcommand,
}

#[derive(Debug, Subcommand)]
enum CartSubcommand {
    /// Show the cart
    Show,
    /// Add a product to the cart
    Add(add::AddArgs),
    /// Change the quantity of a cart line
    SetQty(set_qty::SetQtyArgs),
    /// Remove a cart line
    Remove(remove::RemoveArgs),
    /// Empty the cart
    Clear,
}

pub(crate) async fn run(context: &StorefrontContext, command: CartCommand) -> Result<(), String> {
    match command.command {
        CartSubcommand::Show => show::run(context).await,
        CartSubcommand::Add(args) => add::run(context, args).await,
        CartSubcommand::SetQty(args) => set_qty::run(context, args).await,
        CartSubcommand::Remove(args) => remove::run(context, args).await,
        CartSubcommand::Clear => clear::run(context).await,
    }
}

fn print_cart(cart: &CartSnapshot) {
    if cart.is_empty() {
        println!("your cart is empty");
        return;
    }

    let mut builder = Builder::default();
    builder.push_record(["LINE", "PRODUCT", "SHADE", "PRICE", "QTY", "TOTAL"]);

    for item in &cart.items {
        builder.push_record([
            item.id.to_string(),
            item.display_name(),
            item.shade_name.clone().unwrap_or_default(),
            item.price_now.map_or_else(|| "-".to_string(), output::money),
            item.qty.to_string(),
            output::money(item.line_total()),
        ]);
    }

    println!("{}", output::render_table(builder, &[3, 4, 5]));
    println!(
        "{} item(s), subtotal {}",
        cart.summary.total_qty,
        output::money(cart.summary.subtotal)
    );
}
