//! Minimal configuration module for sheetnav core
//!
//! Only exports pure data types. All loading logic is in CLI layer.

pub mod types;

pub use types::{pages, SiteConfig};
