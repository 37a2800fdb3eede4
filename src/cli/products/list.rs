use tabled::builder::Builder;

use iris_storefront::context::StorefrontContext;

use crate::cli::output;

pub(crate) async fn run(context: &StorefrontContext) -> Result<(), String> {
    let listings = context
        .catalog
        .list_products()
        .await
        .map_err(|error| format!("failed to list products: {error}"))?;

    if listings.is_empty() {
        println!("no products");
        return Ok(());
    }

    let mut builder = Builder::default();
    builder.push_record(["ID", "NAME", "PRICE", "BADGES", "STOCK"]);

    for listing in &listings {
        let stock = if listing.is_out_of_stock() {
            "sold out".to_string()
        } else {
            listing
                .stock
                .map_or_else(|| "-".to_string(), |stock| stock.to_string())
        };

        builder.push_record([
            listing.id.to_string(),
            listing.name.clone(),
            output::money(listing.price),
            listing.badges.join(", "),
            stock,
        ]);
    }

    println!("{}", output::render_table(builder, &[2, 4]));

    Ok(())
}
