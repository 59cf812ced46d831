//! Error types and handling for sheetnav core

use thiserror::Error;

/// Result type alias for sheetnav operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for sheetnav core
#[derive(Error, Debug)]
pub enum Error {
    /// Route table or site configuration errors (fatal at startup)
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Route table construction errors.
///
/// These are only produced while building a [`crate::RouteTable`]; a table
/// that exists has passed every check below.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("No routes configured")]
    NoRoutes,

    #[error("Duplicate route name: {name}")]
    DuplicateName { name: String },

    #[error("Route '{route}' redirects to unknown route '{target}'")]
    UnknownRedirectTarget { route: String, target: String },

    #[error("Redirect chain does not terminate: {}", .chain.join(" -> "))]
    RedirectLoop { chain: Vec<String> },

    #[error("Route '{route}' redirects to '{target}' which requires parameter '{param}'")]
    RedirectParameter {
        route: String,
        target: String,
        param: String,
    },

    #[error("Invalid path pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Invalid value for field '{field}': {value}")]
    InvalidValue { field: String, value: String },
}

/// Errors returned from a single navigation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    #[error("No route matches path '{path}'")]
    NotFound { path: String },

    #[error("Route '{name}' not found")]
    UnknownRoute { name: String },

    #[error("Route '{route}' requires parameter '{param}'")]
    MissingParameter { route: String, param: String },
}

impl NavigationError {
    /// Whether the error means "show the not-found page"
    pub fn is_not_found(&self) -> bool {
        matches!(self, NavigationError::NotFound { .. })
    }
}
