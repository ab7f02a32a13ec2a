//! Storefront catalog entry point.

use storefront_app::{App, AppConfig, render};
use storefront_catalog::expect_catalog;

fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env();
    storefront_observability::init(config.log_format);

    let app = App::build(config)?;
    let summary = app.run(|| render::catalog_summary(&expect_catalog()));
    print!("{summary}");
    Ok(())
}
