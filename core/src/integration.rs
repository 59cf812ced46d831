//! Rendering integration for the router
//!
//! Bridges the router with whatever draws pages. The router never renders
//! anything itself; it hands `{ page, params }` to a renderer registered for
//! that page, and asks the fallback renderer for unmatched paths.

use crate::error::NavigationError;
use crate::observer::NavigationObserver;
use crate::router::{
    NavigationResult, PageRef, Params, ResolvedRoute, RouteTable, Router as CoreRouter,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Renders a resolved route into markup
pub type PageRenderer = Box<dyn Fn(&ResolvedRoute) -> String + Send + Sync>;

/// Renders the not-found page for a path
pub type FallbackRenderer = Box<dyn Fn(&str) -> String + Send + Sync>;

/// A shareable handle to control the router.
///
/// Navigations through one handle are serialized: a navigation issued while
/// another is in flight waits for it to finish. Observers run after the
/// lock is released, so they may call back into the handle.
#[derive(Clone)]
pub struct RouterHandle(Arc<Mutex<CoreRouter>>);

impl RouterHandle {
    /// Create a new router handle
    pub fn new(router: CoreRouter) -> Self {
        Self(Arc::new(Mutex::new(router)))
    }

    fn lock(&self) -> MutexGuard<'_, CoreRouter> {
        // State is only written after resolution succeeds, so a poisoned
        // lock still guards a consistent router.
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Navigate to a path
    pub fn navigate(&self, path: &str) -> NavigationResult<ResolvedRoute> {
        let (committed, observers) = {
            let mut router = self.lock();
            (router.commit_path(path)?, router.observers())
        };
        let (route, event) = committed;
        observers.notify(&event);
        Ok(route)
    }

    /// Navigate to a named route
    pub fn navigate_by_name(&self, name: &str, params: &Params) -> NavigationResult<ResolvedRoute> {
        let (committed, observers) = {
            let mut router = self.lock();
            (router.commit_name(name, params)?, router.observers())
        };
        let (route, event) = committed;
        observers.notify(&event);
        Ok(route)
    }

    /// Resolve a path without navigating
    pub fn resolve(&self, path: &str) -> NavigationResult<ResolvedRoute> {
        self.lock().resolve(path)
    }

    /// Reverse a named route
    pub fn href_for(&self, name: &str, params: &Params) -> NavigationResult<String> {
        self.lock().href_for(name, params)
    }

    /// The router's route table
    pub fn table(&self) -> Arc<RouteTable> {
        self.lock().shared_table()
    }

    /// Get the current route
    pub fn current_route(&self) -> Option<ResolvedRoute> {
        self.lock().current_route().cloned()
    }

    /// Check if we can go back
    pub fn can_go_back(&self) -> bool {
        self.lock().can_go_back()
    }

    /// Go back to the previous route
    pub fn go_back(&self) -> bool {
        let (event, observers) = {
            let mut router = self.lock();
            (router.commit_back(), router.observers())
        };
        match event {
            Some(event) => {
                observers.notify(&event);
                true
            }
            None => false,
        }
    }

    /// Register an observer on the underlying router
    pub fn subscribe(&self, observer: Box<dyn NavigationObserver>) {
        self.lock().subscribe(observer);
    }
}

/// Whether a render shows the requested page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStatus {
    Ok,
    NotFound,
}

/// Output of one visit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub status: RenderStatus,
    /// Page that was rendered; `None` for the fallback page
    pub page: Option<PageRef>,
    pub title: String,
    pub body: String,
}

/// Router plus the page renderers for a site
pub struct SiteShell {
    handle: RouterHandle,
    title: String,
    pages: HashMap<PageRef, PageRenderer>,
    fallback_page: Option<FallbackRenderer>,
}

impl SiteShell {
    /// Router handle for navigation control
    pub fn handle(&self) -> &RouterHandle {
        &self.handle
    }

    /// Navigate to a path and render the result.
    ///
    /// An unmatched path renders the fallback page instead of failing.
    pub fn visit(&self, path: &str) -> Rendered {
        match self.handle.navigate(path) {
            Ok(route) => self.render(&route),
            Err(NavigationError::NotFound { path }) => self.render_not_found(&path),
            Err(other) => self.render_not_found(&other.to_string()),
        }
    }

    /// Navigate to a named route and render the result
    pub fn open(&self, name: &str, params: &Params) -> NavigationResult<Rendered> {
        match self.handle.navigate_by_name(name, params) {
            Ok(route) => Ok(self.render(&route)),
            Err(NavigationError::NotFound { path }) => Ok(self.render_not_found(&path)),
            Err(other) => Err(other),
        }
    }

    /// Go back and render the previous route
    pub fn back(&self) -> Option<Rendered> {
        if !self.handle.go_back() {
            return None;
        }
        self.handle.current_route().map(|route| self.render(&route))
    }

    /// Render a resolved route with its page renderer
    pub fn render(&self, route: &ResolvedRoute) -> Rendered {
        match self.pages.get(&route.page) {
            Some(renderer) => Rendered {
                status: RenderStatus::Ok,
                page: Some(route.page.clone()),
                title: route.title().unwrap_or(self.title.as_str()).to_string(),
                body: renderer(route),
            },
            // A page without a renderer is as good as missing
            None => self.render_not_found(&route.full_path),
        }
    }

    fn render_not_found(&self, path: &str) -> Rendered {
        let body = match &self.fallback_page {
            Some(fallback) => fallback(path),
            None => format!("Route Not Found\nUnknown route: {}", path),
        };
        Rendered {
            status: RenderStatus::NotFound,
            page: None,
            title: self.title.clone(),
            body,
        }
    }
}

/// Builder for a [`SiteShell`]
pub struct SiteShellBuilder {
    router: CoreRouter,
    title: String,
    pages: HashMap<PageRef, PageRenderer>,
    fallback_page: Option<FallbackRenderer>,
}

impl SiteShellBuilder {
    /// Start from a configured router
    pub fn new(router: CoreRouter) -> Self {
        Self {
            router,
            title: String::new(),
            pages: HashMap::new(),
            fallback_page: None,
        }
    }

    /// Site title used when a route has none
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Register the renderer for a page
    pub fn page<F>(mut self, page: impl Into<PageRef>, renderer: F) -> Self
    where
        F: Fn(&ResolvedRoute) -> String + Send + Sync + 'static,
    {
        self.pages.insert(page.into(), Box::new(renderer));
        self
    }

    /// Set a fallback page for unknown routes
    pub fn fallback<F>(mut self, renderer: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.fallback_page = Some(Box::new(renderer));
        self
    }

    /// Attach a navigation observer
    pub fn observe(mut self, observer: Box<dyn NavigationObserver>) -> Self {
        self.router.subscribe(observer);
        self
    }

    pub fn build(self) -> SiteShell {
        SiteShell {
            handle: RouterHandle::new(self.router),
            title: self.title,
            pages: self.pages,
            fallback_page: self.fallback_page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::{AnalyticsConfig, MemorySink, PageViewTracker};
    use crate::observer::NavigationEvent;
    use crate::router::{RouteDefinition, RouterOptions};

    fn router() -> CoreRouter {
        let routes = vec![
            RouteDefinition::redirect("/", "home", "sheets"),
            RouteDefinition::page("/sheets", "sheets", "SheetIndex").with_title("All sheets"),
            RouteDefinition::page("/sheets/:sheetid", "sheet", "Sheet"),
            RouteDefinition::page("/orphan", "orphan", "NoRenderer"),
        ];
        CoreRouter::new(&routes, RouterOptions::default()).expect("Failed to create router")
    }

    fn shell() -> SiteShell {
        SiteShellBuilder::new(router())
            .title("Cheat Sheets")
            .page("SheetIndex", |_route| "index".to_string())
            .page("Sheet", |route| {
                format!("sheet {}", route.param("sheetid").unwrap_or("?"))
            })
            .fallback(|path| format!("404 {}", path))
            .build()
    }

    #[test]
    fn test_visit_renders_page() {
        let shell = shell();
        let rendered = shell.visit("/sheets/pets");
        assert_eq!(rendered.status, RenderStatus::Ok);
        assert_eq!(rendered.body, "sheet pets");
        assert_eq!(rendered.title, "Cheat Sheets");

        let rendered = shell.visit("/");
        assert_eq!(rendered.body, "index");
        assert_eq!(rendered.title, "All sheets");
    }

    #[test]
    fn test_visit_unknown_renders_fallback() {
        let shell = shell();
        shell.visit("/sheets");
        let rendered = shell.visit("/nope");
        assert_eq!(rendered.status, RenderStatus::NotFound);
        assert_eq!(rendered.body, "404 /nope");
        assert_eq!(rendered.page, None);
        assert_eq!(shell.handle().current_route().unwrap().name, "sheets");
    }

    #[test]
    fn test_page_without_renderer() {
        let shell = shell();
        let rendered = shell.visit("/orphan");
        assert_eq!(rendered.status, RenderStatus::NotFound);
    }

    #[test]
    fn test_default_fallback() {
        let shell = SiteShellBuilder::new(router()).build();
        let rendered = shell.visit("/missing");
        assert_eq!(rendered.body, "Route Not Found\nUnknown route: /missing");
    }

    #[test]
    fn test_open_by_name() {
        let shell = shell();
        let mut params = Params::new();
        params.insert("sheetid".into(), "food".into());
        assert_eq!(shell.open("sheet", &params).unwrap().body, "sheet food");

        assert!(matches!(
            shell.open("sheet", &Params::new()),
            Err(NavigationError::MissingParameter { .. })
        ));
        assert!(matches!(
            shell.open("missing", &Params::new()),
            Err(NavigationError::UnknownRoute { .. })
        ));
    }

    #[test]
    fn test_back() {
        let shell = shell();
        assert!(shell.back().is_none());
        shell.visit("/sheets");
        shell.visit("/sheets/pets");
        assert_eq!(shell.back().unwrap().body, "index");
        assert!(!shell.handle().can_go_back());
    }

    #[test]
    fn test_analytics_sees_successful_visits() {
        let sink = MemorySink::new();
        let tracker = PageViewTracker::from_config(
            &AnalyticsConfig::with_measurement_id("G-71G27SVGCV"),
            Box::new(sink.clone()),
        )
        .unwrap()
        .unwrap();

        let shell = SiteShellBuilder::new(router())
            .page("SheetIndex", |_route| "index".to_string())
            .observe(Box::new(tracker))
            .build();

        shell.visit("/");
        shell.visit("/nope");

        let views = sink.views();
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].page_path, "/sheets");
        assert_eq!(views[0].route_name, "sheets");
    }

    #[test]
    fn test_observer_can_use_the_handle() {
        let shell = shell();
        let handle = shell.handle().clone();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&seen);
        shell.handle().subscribe(Box::new(
            move |event: &NavigationEvent| -> anyhow::Result<()> {
                let current = handle.current_route().map(|route| route.name);
                log.lock().unwrap().push((event.route_name.clone(), current));
                Ok(())
            },
        ));

        shell.visit("/sheets/pets");
        shell.visit("/sheets");
        assert!(shell.back().is_some());

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[0], ("sheet".to_string(), Some("sheet".to_string())));
        assert_eq!(seen[2], ("sheet".to_string(), Some("sheet".to_string())));
    }

    #[test]
    fn test_handle_is_shared() {
        let shell = shell();
        let other = shell.handle().clone();
        other.navigate("/sheets/pets").unwrap();
        assert_eq!(
            shell.handle().current_route().unwrap().param("sheetid"),
            Some("pets")
        );
        assert_eq!(
            shell.handle().href_for("sheets", &Params::new()).unwrap(),
            "/sheets"
        );
        assert!(shell.handle().resolve("/sheets").is_ok());
        assert_eq!(shell.handle().table().len(), 4);
    }
}
