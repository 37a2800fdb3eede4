use clap::Args;
use tabled::builder::Builder;

use iris_storefront::{context::StorefrontContext, domain::orders::models::OrderId};

use crate::cli::output;

#[derive(Debug, Args)]
pub(crate) struct ShowOrderArgs {
    /// Order ID
    order: OrderId,
}

pub(crate) async fn run(context: &StorefrontContext, args: ShowOrderArgs) -> Result<(), String> {
    let order = context
        .orders
        .order_detail(args.order)
        .await
        .map_err(|error| format!("failed to fetch order {}: {error}", args.order))?;

    println!("order #{} ({})", order.id, order.status);

    if let Some(placed) = order.created_at {
        println!("placed: {}", output::local_time(placed));
    }

    if let Some(name) = &order.customer_name {
        println!("customer: {name}");
    }

    if !order.items.is_empty() {
        let mut builder = Builder::default();
        builder.push_record(["PRODUCT", "SHADE", "PRICE", "QTY", "TOTAL"]);

        for item in &order.items {
            builder.push_record([
                item.name.clone(),
                item.shade_name.clone().unwrap_or_default(),
                output::money(item.unit_price),
                item.qty.to_string(),
                output::money(item.line_total),
            ]);
        }

        println!("{}", output::render_table(builder, &[2, 3, 4]));
    }

    println!("subtotal: {}", output::money(order.subtotal));

    if order.shipping_fee.is_zero() {
        println!("shipping: free");
    } else {
        println!("shipping: {}", output::money(order.shipping_fee));
    }

    if !order.discount_total.is_zero() {
        println!("discount: -{}", output::money(order.discount_total));
    }

    println!("total: {}", output::money(order.grand_total));

    if order.status.is_payable() {
        println!("run `iris pay` to pay by QR");
    }

    Ok(())
}
