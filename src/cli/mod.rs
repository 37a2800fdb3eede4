use clap::{Parser, Subcommand};

use iris_storefront::{config::Config, context::StorefrontContext};

mod cart;
mod categories;
mod checkout;
mod login;
mod logout;
mod orders;
mod output;
mod pay;
mod products;
mod whoami;

#[derive(Debug, Parser)]
#[command(name = "iris", about = "Iris storefront console", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    pub(crate) config: Config,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Sign in and store the session
    Login(login::LoginArgs),
    /// Sign out and drop the stored session
    Logout,
    /// Show the signed-in account
    Whoami,
    /// Browse the catalog
    Products(products::ProductsCommand),
    /// List product categories
    Categories,
    /// Inspect and edit the cart
    Cart(cart::CartCommand),
    /// Place an order from the cart
    Checkout,
    /// Pay the open order by QR and wait for confirmation
    Pay(pay::PayArgs),
    /// Review placed orders
    Orders(orders::OrdersCommand),
}

impl Cli {
    pub(crate) async fn run(self, context: &StorefrontContext) -> Result<(), String> {
        match self.command {
            Commands::Login(args) => login::run(context, args).await,
            Commands::Logout => logout::run(context).await,
            Commands::Whoami => whoami::run(context).await,
            Commands::Products(command) => products::run(context, command).await,
            Commands::Categories => categories::run(context).await,
            Commands::Cart(command) => cart::run(context, command).await,
            Commands::Checkout => checkout::run(context).await,
            Commands::Pay(args) => pay::run(context, &self.config.watch, args).await,
            Commands::Orders(command) => orders::run(context, command).await,
        }
    }
}
