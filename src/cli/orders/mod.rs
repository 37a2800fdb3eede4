use clap::{Args, Subcommand};

use iris_storefront::context::StorefrontContext;

mod list;
mod show;

#[derive(Debug, Args)]
pub(crate) struct OrdersCommand {
    #[command(subcommand)]
    command: OrdersSubcommand,
}

#[derive(Debug, Subcommand)]
enum OrdersSubcommand {
    /// List placed orders
    List,
    /// Show one order with its lines
    Show(show::ShowOrderArgs),
}

pub(crate) async fn run(context: &StorefrontContext, command: OrdersCommand) -> Result<(), String> {
    match command.command {
        OrdersSubcommand::List => list::run(context).await,
        OrdersSubcommand::Show(args) => show::run(context, args).await,
    }
}
