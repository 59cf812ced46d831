//! Router module for route tables, resolution and navigation
//!
//! Route definitions are compiled once into an immutable [`RouteTable`];
//! the [`Router`] resolves paths or names against it and keeps the single
//! current-route slot.

pub mod location;
pub mod pattern;
pub mod resolved;
pub mod route;
#[allow(clippy::module_inception)]
pub mod router;
pub mod table;

// Re-export commonly used types
pub use location::Location;
pub use pattern::{Params, PathPattern, Segment};
pub use resolved::ResolvedRoute;
pub use route::{PageRef, RouteDefinition, RouteTarget};
pub use router::{NavigationResult, NavigationStatus, Router, RouterOptions, RouterState};
pub use table::{RouteRecord, RouteTable, DEFAULT_MAX_REDIRECT_HOPS};
