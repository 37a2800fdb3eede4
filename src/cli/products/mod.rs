use clap::{Args, Subcommand};

use iris_storefront::context::StorefrontContext;

mod list;
mod show;

#[derive(Debug, Args)]
pub(crate) struct ProductsCommand {
    #[command(subcommand)]
    command: ProductsSubcommand,
}

#[derive(Debug, Subcommand)]
enum ProductsSubcommand {
    /// List the catalog
    List,
    /// Show one product and its shades
    Show(show::ShowProductArgs),
}

pub(crate) async fn run(
    context: &StorefrontContext,
    command: ProductsCommand,
) -> Result<(), String> {
    match command.command {
        ProductsSubcommand::List => list::run(context).await,
        ProductsSubcommand::Show(args) => show::run(context, args).await,
    }
}
