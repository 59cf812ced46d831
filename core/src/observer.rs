//! Navigation observers
//!
//! Observers are told about every committed navigation. They are
//! best-effort: an observer that fails or panics is logged and skipped,
//! and the navigation result is unaffected.

use crate::router::{PageRef, Params, ResolvedRoute};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tracing::warn;

/// How the current route was reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationKind {
    /// A new path or named navigation
    Push,
    /// Returning to a route from history
    Back,
}

/// Notification sent to observers after a navigation is committed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigationEvent {
    pub kind: NavigationKind,
    /// Normalized path
    pub path: String,
    /// Path with query and fragment
    pub full_path: String,
    pub route_name: String,
    pub page: PageRef,
    pub params: Params,
    /// Page title from route metadata
    pub title: Option<String>,
    pub at: DateTime<Utc>,
}

impl NavigationEvent {
    /// Build an event for a freshly committed route
    pub fn new(route: &ResolvedRoute, kind: NavigationKind) -> Self {
        Self {
            kind,
            path: route.path.clone(),
            full_path: route.full_path.clone(),
            route_name: route.name.clone(),
            page: route.page.clone(),
            params: route.params.clone(),
            title: route.title().map(str::to_string),
            at: Utc::now(),
        }
    }
}

/// Something that wants to hear about navigations
pub trait NavigationObserver: Send + Sync {
    /// Name used in log lines
    fn name(&self) -> &str {
        "observer"
    }

    /// Called once per committed navigation
    fn on_navigate(&self, event: &NavigationEvent) -> anyhow::Result<()>;
}

impl<F> NavigationObserver for F
where
    F: Fn(&NavigationEvent) -> anyhow::Result<()> + Send + Sync,
{
    fn on_navigate(&self, event: &NavigationEvent) -> anyhow::Result<()> {
        self(event)
    }
}

/// Ordered list of observers; clones share the registered observers
#[derive(Default, Clone)]
pub struct ObserverList {
    observers: Vec<Arc<dyn NavigationObserver>>,
}

impl ObserverList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer; observers are notified in registration order
    pub fn register(&mut self, observer: Box<dyn NavigationObserver>) {
        self.observers.push(Arc::from(observer));
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// Notify every observer. Returns how many of them failed.
    pub fn notify(&self, event: &NavigationEvent) -> usize {
        let mut failures = 0;

        for observer in &self.observers {
            match catch_unwind(AssertUnwindSafe(|| observer.on_navigate(event))) {
                Ok(Ok(())) => {}
                Ok(Err(error)) => {
                    failures += 1;
                    warn!(
                        observer = observer.name(),
                        path = %event.path,
                        "Navigation observer failed: {:#}",
                        error
                    );
                }
                Err(payload) => {
                    failures += 1;
                    let message = payload
                        .downcast_ref::<&str>()
                        .map(|s| s.to_string())
                        .or_else(|| payload.downcast_ref::<String>().cloned())
                        .unwrap_or_else(|| "unknown panic".to_string());
                    warn!(
                        observer = observer.name(),
                        path = %event.path,
                        "Navigation observer panicked: {}",
                        message
                    );
                }
            }
        }

        failures
    }
}

impl fmt::Debug for ObserverList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.observers.iter().map(|o| o.name()))
            .finish()
    }
}
