use std::time::Duration;

use clap::Args;
use humanize_duration::{Truncate, prelude::DurationExt};
use jiff::Timestamp;
use tabled::builder::Builder;

use iris_storefront::{
    config::WatchConfig,
    context::StorefrontContext,
    domain::{
        orders::models::OrderStatus,
        payments::{
            PaymentWatch,
            models::{PaymentOutcome, PaymentSummary, QrCode},
        },
    },
};

use super::output;

#[derive(Debug, Args)]
pub(crate) struct PayArgs {
    /// Settle through the sandbox endpoint instead of a real scan
    #[arg(long)]
    simulate: bool,
}

pub(crate) async fn run(
    context: &StorefrontContext,
    watch: &WatchConfig,
    args: PayArgs,
) -> Result<(), String> {
    let summary = context
        .payments
        .payment_me()
        .await
        .map_err(|error| format!("failed to fetch the order awaiting payment: {error}"))?;

    print_summary(&summary);

    if summary.status == OrderStatus::Paid {
        println!("order #{} is already paid", summary.order_id);
        return Ok(());
    }

    if !summary.status.is_payable() {
        return Err(format!(
            "order #{} is {}; nothing to pay",
            summary.order_id, summary.status
        ));
    }

    let qr = context
        .payments
        .create_qr()
        .await
        .map_err(|error| format!("failed to create a payment QR: {error}"))?;

    match &qr.code {
        Some(QrCode::Image { url }) => println!("QR image: {url}"),
        Some(QrCode::Raw { payload }) => println!("QR payload: {payload}"),
        None => return Err("the gateway returned no QR code".to_string()),
    }

    println!("amount due: {}", output::money(qr.amount));

    if let Some(expires_at) = qr.expires_at {
        let left = expires_at.duration_since(Timestamp::now());

        if left.is_positive() {
            let left = Duration::from_secs(left.as_secs().unsigned_abs());
            println!("expires in {}", left.human(Truncate::Second));
        }
    }

    if args.simulate {
        context
            .payments
            .simulate_paid(qr.order_id)
            .await
            .map_err(|error| format!("failed to simulate the payment: {error}"))?;
    }

    println!("waiting for payment...");

    let outcome = PaymentWatch::new(context.payments.clone(), qr.order_id)
        .with_poll_interval(watch.poll_interval())
        .run()
        .await;

    match outcome {
        PaymentOutcome::Paid { via } => {
            println!("payment confirmed ({via})");

            match context.orders.order_detail(qr.order_id).await {
                Ok(order) => {
                    println!("order #{} is {}", order.id, order.status);
                    println!("total: {}", output::money(order.grand_total));
                }
                Err(error) => tracing::debug!(%error, "order detail unavailable after payment"),
            }

            Ok(())
        }
        PaymentOutcome::Expired { status } => {
            tracing::debug!(%status, "payment watch ended without settlement");

            Err("QR code expired. Please try again.".to_string())
        }
    }
}

fn print_summary(summary: &PaymentSummary) {
    println!("order #{} ({})", summary.order_id, summary.status);

    if !summary.items.is_empty() {
        let mut builder = Builder::default();
        builder.push_record(["PRODUCT", "SHADE", "PRICE", "QTY", "TOTAL"]);

        for line in &summary.items {
            builder.push_record([
                line.name.clone().unwrap_or_else(|| "-".to_string()),
                line.shade_name.clone().unwrap_or_default(),
                output::money(line.unit_price),
                line.qty.to_string(),
                output::money(line.line_total),
            ]);
        }

        println!("{}", output::render_table(builder, &[2, 3, 4]));
    }

    println!("subtotal: {}", output::money(summary.subtotal));

    if summary.shipping_fee.is_zero() {
        println!("shipping: free");
    } else {
        println!("shipping: {}", output::money(summary.shipping_fee));
    }

    println!("total: {}", output::money(summary.grand_total));
}
