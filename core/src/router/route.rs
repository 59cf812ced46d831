//! Route definitions and utilities
//!
//! This module defines the declarative route types the route table is
//! compiled from.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;

/// Opaque reference to a page the rendering layer knows how to display
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageRef(pub String);

impl PageRef {
    /// Create a new page reference
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PageRef {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for PageRef {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for PageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PageRef {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for PageRef {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Where a route leads
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteTarget {
    /// Display a page
    Page(PageRef),
    /// Continue resolution at another route, by name
    Redirect(String),
}

/// Declarative route definition, as written in the site configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteDefinition {
    /// Path pattern, relative to the parent for nested routes
    pub path: String,
    /// Unique logical name
    pub name: String,
    /// Page or redirect
    #[serde(flatten)]
    pub target: RouteTarget,
    /// Nested routes inheriting this route's path
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RouteDefinition>,
    /// Free-form metadata such as the page title
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub meta: BTreeMap<String, String>,
}

impl RouteDefinition {
    /// Create a route that displays a page
    pub fn page(
        path: impl Into<String>,
        name: impl Into<String>,
        page: impl Into<PageRef>,
    ) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            target: RouteTarget::Page(page.into()),
            children: Vec::new(),
            meta: BTreeMap::new(),
        }
    }

    /// Create a route that redirects to another named route
    pub fn redirect(
        path: impl Into<String>,
        name: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            target: RouteTarget::Redirect(target.into()),
            children: Vec::new(),
            meta: BTreeMap::new(),
        }
    }

    /// Add a nested route
    pub fn with_child(mut self, child: RouteDefinition) -> Self {
        self.children.push(child);
        self
    }

    /// Add metadata to this route
    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.meta.insert(key.into(), value.into());
        self
    }

    /// Set the `title` metadata
    pub fn with_title(self, title: impl Into<String>) -> Self {
        self.with_meta("title", title)
    }
}
