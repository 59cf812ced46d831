//! Reverse URL command

use crate::config::CliConfigLoader;
use anyhow::Result;
use sheetnav_core::Params;
use tracing::info;

/// Print the path of a named route with the given parameters
pub async fn href_command(
    loader: CliConfigLoader,
    name: String,
    params: Vec<(String, String)>,
) -> Result<()> {
    let loaded = loader.load().await?;
    let router = loaded.site.into_router()?;

    let params: Params = params.into_iter().collect();
    info!("Building path for route '{}'", name);

    let path = router.href_for(&name, &params)?;
    println!("{}", path);

    Ok(())
}
