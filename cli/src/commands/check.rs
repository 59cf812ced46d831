//! Configuration check command

use crate::config::CliConfigLoader;
use anyhow::Result;
use tracing::info;

/// Load and validate the site configuration
pub async fn check_command(loader: CliConfigLoader) -> Result<()> {
    info!("Checking configuration");

    let loaded = loader.load().await?;
    let router = loaded.site.clone().into_router()?;

    println!("✅ Configuration is valid ({})", loaded.source);
    println!("   Routes:    {}", router.table().len());

    let redirects = router
        .table()
        .records()
        .iter()
        .filter(|record| record.is_redirect())
        .count();
    println!("   Redirects: {}", redirects);

    let analytics = &loaded.site.analytics;
    match (&analytics.measurement_id, analytics.enabled) {
        (Some(id), true) => println!("   Analytics: enabled ({})", id),
        _ => println!("   Analytics: disabled"),
    }

    Ok(())
}
