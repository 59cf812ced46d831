//! Router implementation for managing navigation state
//!
//! This module provides the core router functionality including
//! state management, navigation, and route resolution.

use super::location::Location;
use super::pattern::Params;
use super::resolved::ResolvedRoute;
use super::route::RouteDefinition;
use super::table::{RouteRecord, RouteTable, DEFAULT_MAX_REDIRECT_HOPS};
use crate::error::{ConfigError, NavigationError};
use crate::observer::{NavigationEvent, NavigationKind, NavigationObserver, ObserverList};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

/// Type alias for navigation results
pub type NavigationResult<T> = Result<T, NavigationError>;

/// Matching and history options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterOptions {
    /// Compare literal segments case-sensitively
    pub case_sensitive: bool,
    /// Longest redirect chain accepted when the table is built
    pub max_redirect_hops: usize,
    /// Maximum number of history entries to keep
    pub history_limit: usize,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            case_sensitive: false,
            max_redirect_hops: DEFAULT_MAX_REDIRECT_HOPS,
            history_limit: 50,
        }
    }
}

/// Outcome of the most recent navigation
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum NavigationStatus {
    /// Nothing has been navigated yet
    #[default]
    Idle,
    /// Matching and redirect-following in progress
    Resolving { target: String },
    /// The current route holds the result
    Resolved,
    /// The last navigation failed; the current route is unchanged
    Failed(NavigationError),
}

/// Current state of the router
#[derive(Debug, Clone)]
pub struct RouterState {
    /// Last successfully resolved route
    pub current: Option<ResolvedRoute>,
    /// Navigation history (most recent first)
    pub history: Vec<ResolvedRoute>,
    /// Maximum number of history entries to keep
    pub max_history: usize,
    /// Outcome of the most recent navigation
    pub status: NavigationStatus,
}

impl RouterState {
    /// Create an empty router state
    pub fn new(max_history: usize) -> Self {
        Self {
            current: None,
            history: Vec::new(),
            max_history,
            status: NavigationStatus::Idle,
        }
    }

    /// Make a route current
    pub fn navigate_to(&mut self, route: ResolvedRoute) {
        // Add current route to history if it's different
        if let Some(previous) = self.current.take() {
            if !previous.same_destination(&route) && self.max_history > 0 {
                self.history.insert(0, previous);

                // Trim history if it exceeds max size
                if self.history.len() > self.max_history {
                    self.history.truncate(self.max_history);
                }
            }
        }

        self.current = Some(route);
        self.status = NavigationStatus::Resolved;
    }

    /// Go back to the previous route in history
    pub fn go_back(&mut self) -> Option<&ResolvedRoute> {
        if self.history.is_empty() {
            return None;
        }
        let previous = self.history.remove(0);
        self.current = Some(previous);
        self.status = NavigationStatus::Resolved;
        self.current.as_ref()
    }

    /// Check if we can go back
    pub fn can_go_back(&self) -> bool {
        !self.history.is_empty()
    }

    /// Get the navigation history
    pub fn history(&self) -> &[ResolvedRoute] {
        &self.history
    }
}

/// Main router: an immutable table plus a single current-route slot
#[derive(Debug)]
pub struct Router {
    table: Arc<RouteTable>,
    options: RouterOptions,
    state: RouterState,
    observers: ObserverList,
}

impl Router {
    /// Build the table from definitions and create a router over it
    pub fn new(definitions: &[RouteDefinition], options: RouterOptions) -> Result<Self, ConfigError> {
        let table = RouteTable::with_max_redirect_hops(definitions, options.max_redirect_hops)?;
        Ok(Self::with_table(Arc::new(table), options))
    }

    /// Create a router over an already validated table
    pub fn with_table(table: Arc<RouteTable>, options: RouterOptions) -> Self {
        let state = RouterState::new(options.history_limit);
        Self {
            table,
            options,
            state,
            observers: ObserverList::new(),
        }
    }

    /// Register an observer notified after every committed navigation
    pub fn subscribe(&mut self, observer: Box<dyn NavigationObserver>) {
        self.observers.register(observer);
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Shared handle to the immutable table
    pub fn shared_table(&self) -> Arc<RouteTable> {
        Arc::clone(&self.table)
    }

    pub fn options(&self) -> &RouterOptions {
        &self.options
    }

    /// Get the current router state
    pub fn state(&self) -> &RouterState {
        &self.state
    }

    /// Get the current route
    pub fn current_route(&self) -> Option<&ResolvedRoute> {
        self.state.current.as_ref()
    }

    /// Resolve a path (with optional query and fragment) without navigating
    pub fn resolve(&self, input: &str) -> NavigationResult<ResolvedRoute> {
        let location = Location::parse(input).ok_or_else(|| NavigationError::NotFound {
            path: input.to_string(),
        })?;

        let (record, params) = self
            .table
            .find(&location.segments, self.options.case_sensitive)
            .ok_or_else(|| NavigationError::NotFound {
                path: location.path.clone(),
            })?;

        debug!(path = %location.path, route = %record.name, "Path matched");
        self.finish(record, params, location)
    }

    /// Resolve a named route with parameters without navigating
    pub fn resolve_name(&self, name: &str, params: &Params) -> NavigationResult<ResolvedRoute> {
        let record = self
            .table
            .get(name)
            .ok_or_else(|| NavigationError::UnknownRoute {
                name: name.to_string(),
            })?;

        let path = build_path(record, params)?;
        let location = Location::parse(&path).ok_or_else(|| NavigationError::NotFound {
            path: path.clone(),
        })?;

        debug!(route = %name, path = %path, "Named route built");
        self.finish(record, carried_params(record, params), location)
    }

    /// Reverse a named route into a path, without following redirects
    pub fn href_for(&self, name: &str, params: &Params) -> NavigationResult<String> {
        let record = self
            .table
            .get(name)
            .ok_or_else(|| NavigationError::UnknownRoute {
                name: name.to_string(),
            })?;
        build_path(record, params)
    }

    /// Resolve a path and make it the current route
    pub fn navigate(&mut self, input: &str) -> NavigationResult<ResolvedRoute> {
        let (route, event) = self.commit_path(input)?;
        self.observers.notify(&event);
        Ok(route)
    }

    /// Resolve a named route and make it the current route
    pub fn navigate_by_name(
        &mut self,
        name: &str,
        params: &Params,
    ) -> NavigationResult<ResolvedRoute> {
        let (route, event) = self.commit_name(name, params)?;
        self.observers.notify(&event);
        Ok(route)
    }

    /// Go back to the previous route
    pub fn go_back(&mut self) -> bool {
        match self.commit_back() {
            Some(event) => {
                self.observers.notify(&event);
                true
            }
            None => false,
        }
    }

    /// Check if we can go back
    pub fn can_go_back(&self) -> bool {
        self.state.can_go_back()
    }

    /// Snapshot of the registered observers
    pub(crate) fn observers(&self) -> ObserverList {
        self.observers.clone()
    }

    /// Commit a path navigation; the caller notifies observers
    pub(crate) fn commit_path(
        &mut self,
        input: &str,
    ) -> NavigationResult<(ResolvedRoute, NavigationEvent)> {
        self.state.status = NavigationStatus::Resolving {
            target: input.to_string(),
        };
        let outcome = self.resolve(input);
        self.settle(outcome)
    }

    /// Commit a named navigation; the caller notifies observers
    pub(crate) fn commit_name(
        &mut self,
        name: &str,
        params: &Params,
    ) -> NavigationResult<(ResolvedRoute, NavigationEvent)> {
        self.state.status = NavigationStatus::Resolving {
            target: name.to_string(),
        };
        let outcome = self.resolve_name(name, params);
        self.settle(outcome)
    }

    /// Step back in history; the caller notifies observers
    pub(crate) fn commit_back(&mut self) -> Option<NavigationEvent> {
        let route = self.state.go_back()?;
        let event = NavigationEvent::new(route, NavigationKind::Back);
        info!(path = %event.full_path, route = %event.route_name, "Navigated back");
        Some(event)
    }

    fn settle(
        &mut self,
        outcome: NavigationResult<ResolvedRoute>,
    ) -> NavigationResult<(ResolvedRoute, NavigationEvent)> {
        match outcome {
            Ok(route) => {
                let event = NavigationEvent::new(&route, NavigationKind::Push);
                info!(path = %route.full_path, route = %route.name, page = %route.page, "Navigated");
                self.state.navigate_to(route.clone());
                Ok((route, event))
            }
            Err(error) => {
                debug!("Navigation failed: {}", error);
                self.state.status = NavigationStatus::Failed(error.clone());
                Err(error)
            }
        }
    }

    /// Follow redirects from the matched record and assemble the result
    fn finish(
        &self,
        matched: &RouteRecord,
        params: Params,
        location: Location,
    ) -> NavigationResult<ResolvedRoute> {
        let (target, page) = self.table.destination(matched);

        let (params, location, redirected_from) = if target.name == matched.name {
            (params, location, None)
        } else {
            let params = carried_params(target, &params);
            let path = build_path(target, &params)?;
            let location = location
                .with_path(&path)
                .ok_or(NavigationError::NotFound { path })?;
            debug!(from = %matched.name, to = %target.name, "Redirect followed");
            (params, location, Some(matched.name.clone()))
        };

        Ok(ResolvedRoute {
            name: target.name.clone(),
            page: page.clone(),
            params,
            matched: target.chain.clone(),
            full_path: location.full_path(),
            path: location.path,
            query: location.query,
            hash: location.hash,
            meta: target.meta.clone(),
            redirected_from,
        })
    }
}

fn build_path(record: &RouteRecord, params: &Params) -> NavigationResult<String> {
    record
        .pattern
        .build(params)
        .map_err(|param| NavigationError::MissingParameter {
            route: record.name.clone(),
            param,
        })
}

/// Keep only the parameters the record declares, dropping empty values
fn carried_params(record: &RouteRecord, params: &Params) -> Params {
    record
        .pattern
        .param_names()
        .filter_map(|name| {
            params
                .get(name)
                .map(|value| value.trim_matches('/'))
                .filter(|value| !value.is_empty())
                .map(|value| (name.to_string(), value.to_string()))
        })
        .collect()
}
