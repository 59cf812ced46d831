//! Resolve command

use crate::config::CliConfigLoader;
use crate::output::{format_failure, format_resolution, print_json};
use anyhow::{anyhow, Result};
use serde_json::json;
use tracing::info;

/// Resolve each path against the route table without navigating
pub async fn resolve_command(loader: CliConfigLoader, paths: Vec<String>, json: bool) -> Result<()> {
    let loaded = loader.load().await?;
    info!("Resolving {} path(s) using {}", paths.len(), loaded.source);

    let router = loaded.site.into_router()?;
    let mut failures = 0;
    let mut results = Vec::with_capacity(paths.len());

    for path in &paths {
        match router.resolve(path) {
            Ok(route) => {
                if json {
                    results.push(json!({ "input": path, "route": route }));
                } else {
                    println!("{}", format_resolution(path, &route));
                }
            }
            Err(error) => {
                failures += 1;
                if json {
                    results.push(json!({
                        "input": path,
                        "error": error.to_string(),
                        "not_found": error.is_not_found(),
                    }));
                } else {
                    println!("{}", format_failure(path, &error));
                }
            }
        }
    }

    if json {
        print_json(&results)?;
    }

    if failures > 0 {
        return Err(anyhow!("{} of {} path(s) did not resolve", failures, paths.len()));
    }

    Ok(())
}
