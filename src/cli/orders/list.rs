use tabled::builder::Builder;

use iris_storefront::context::StorefrontContext;

use crate::cli::output;

pub(crate) async fn run(context: &StorefrontContext) -> Result<(), String> {
    let orders = context
        .orders
        .my_orders()
        .await
        .map_err(|error| format!("failed to list orders: {error}"))?;

    if orders.is_empty() {
        println!("no orders yet");
        return Ok(());
    }

    let mut builder = Builder::default();
    builder.push_record(["ID", "STATUS", "TOTAL", "PLACED"]);

    for order in &orders {
        builder.push_record([
            order.id.to_string(),
            order.status.to_string(),
            output::money(order.grand_total),
            order
                .created_at
                .map_or_else(|| "-".to_string(), output::local_time),
        ]);
    }

    println!("{}", output::render_table(builder, &[2]));

    Ok(())
}
