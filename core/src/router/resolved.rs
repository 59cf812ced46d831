//! Result of a successful resolution

use super::pattern::Params;
use super::route::PageRef;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A concrete page plus everything extracted from the URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedRoute {
    /// Name of the final route after following redirects
    pub name: String,
    /// Page to display
    pub page: PageRef,
    /// Path parameters
    pub params: Params,
    /// Names of the matched definitions, outermost first
    pub matched: Vec<String>,
    /// Normalized path without query or fragment
    pub path: String,
    /// Path plus the original query and fragment
    pub full_path: String,
    /// Query parameters in order of appearance
    #[serde(default)]
    pub query: Vec<(String, String)>,
    /// Fragment without the leading `#`
    #[serde(default)]
    pub hash: Option<String>,
    /// Metadata of the final route
    #[serde(default)]
    pub meta: BTreeMap<String, String>,
    /// Name of the route that was originally matched, when a redirect was followed
    #[serde(default)]
    pub redirected_from: Option<String>,
}

impl ResolvedRoute {
    /// Look up a path parameter
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// First value of a query parameter
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Page title from metadata, if set
    pub fn title(&self) -> Option<&str> {
        self.meta.get("title").map(String::as_str)
    }

    /// Whether two resolutions point at the same page with the same parameters
    pub fn same_destination(&self, other: &ResolvedRoute) -> bool {
        self.name == other.name
            && self.page == other.page
            && self.params == other.params
            && self.path == other.path
    }
}
