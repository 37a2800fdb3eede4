use tabled::builder::Builder;

use iris_storefront::context::StorefrontContext;

use super::output;

pub(crate) async fn run(context: &StorefrontContext) -> Result<(), String> {
    let categories = context
        .catalog
        .list_categories()
        .await
        .map_err(|error| format!("failed to list categories: {error}"))?;

    if categories.is_empty() {
        println!("no categories");
        return Ok(());
    }

    let mut builder = Builder::default();
    builder.push_record(["ID", "NAME"]);

    for category in &categories {
        builder.push_record([category.id.to_string(), category.name.clone()]);
    }

    println!("{}", output::render_table(builder, &[]));

    Ok(())
}
