//! Route table listing command

use crate::config::CliConfigLoader;
use crate::output::{format_table, print_json};
use anyhow::Result;
use serde_json::json;
use sheetnav_core::RouteTarget;
use tracing::info;

/// List the compiled route table in match order
pub async fn routes_command(loader: CliConfigLoader, json: bool) -> Result<()> {
    let loaded = loader.load().await?;
    info!("Listing routes from {}", loaded.source);

    let router = loaded.site.into_router()?;
    let records = router.table().records();

    if json {
        let rows: Vec<_> = records
            .iter()
            .map(|record| {
                let (kind, target) = match &record.target {
                    RouteTarget::Page(page) => ("page", page.to_string()),
                    RouteTarget::Redirect(to) => ("redirect", to.clone()),
                };
                json!({
                    "name": record.name,
                    "pattern": record.pattern.to_string(),
                    kind: target,
                    "chain": record.chain,
                    "meta": record.meta,
                })
            })
            .collect();
        return print_json(&rows);
    }

    println!("{}", format_table(records));
    Ok(())
}
