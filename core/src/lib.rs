//! # sheetnav Core
//!
//! Core library for sheetnav - the navigation model of a game cheat-sheet
//! site.
//!
//! This library provides an immutable, eagerly validated route table,
//! path and named-route resolution with redirects, a router holding the
//! current route, and best-effort observers such as page-view analytics.

// Core modules
pub mod analytics;
pub mod config;
pub mod error;
pub mod integration;
pub mod observer;
pub mod router;

// Re-export commonly used types
pub use analytics::{AnalyticsConfig, PageViewTracker};
pub use config::SiteConfig;
pub use error::{ConfigError, Error, NavigationError, Result};
pub use integration::{RenderStatus, Rendered, RouterHandle, SiteShell, SiteShellBuilder};
pub use observer::{NavigationEvent, NavigationKind, NavigationObserver};
pub use router::{
    PageRef, Params, ResolvedRoute, RouteDefinition, RouteTable, RouteTarget, Router,
    RouterOptions,
};

/// Current version of the sheetnav-core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize tracing on stderr
///
/// `RUST_LOG` wins when set; otherwise `debug` selects the debug level.
pub fn init_tracing_with_debug(debug: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(if debug { "debug" } else { "info" })
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
