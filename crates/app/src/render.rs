//! Plain-text catalog summary.

use std::fmt::Write;

use storefront_catalog::CatalogHandle;

/// One section per category, one line per product.
pub fn catalog_summary(catalog: &CatalogHandle) -> String {
    let mut out = String::new();
    for category in catalog.with_store(|store| store.categories()) {
        let products = catalog.products_by_category(category.label());
        if products.is_empty() {
            continue;
        }
        let _ = writeln!(out, "{category} ({})", products.len());
        for product in products {
            let stock = if product.in_stock { "" } else { " [out of stock]" };
            let _ = writeln!(
                out,
                "  {:<14} {:<28} {:>14}{stock}",
                product.id.as_str(),
                product.name,
                product.price.to_string()
            );
        }
    }
    if let Some(err) = catalog.error() {
        let _ = writeln!(out, "! {err}");
    }
    out
}
