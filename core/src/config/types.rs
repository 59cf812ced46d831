//! Site configuration types
//!
//! Core only accepts the parsed configuration. File discovery and
//! environment overrides live in the CLI layer.

use crate::analytics::AnalyticsConfig;
use crate::error::{ConfigError, Result};
use crate::router::{RouteDefinition, Router, RouterOptions};
use serde::{Deserialize, Serialize};

/// Page references used by the builtin route table
pub mod pages {
    pub const SHEET_INDEX: &str = "SheetIndex";
    pub const SHEET: &str = "Sheet";
    pub const NOT_FOUND: &str = "NotFound";
}

/// Everything needed to stand up the site's router
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Site title, used when a route has no title of its own
    #[serde(default = "default_title")]
    pub title: String,
    /// Route table in match order
    pub routes: Vec<RouteDefinition>,
    /// Matching and history options
    #[serde(default)]
    pub router: RouterOptions,
    /// Page-view analytics
    #[serde(default)]
    pub analytics: AnalyticsConfig,
}

fn default_title() -> String {
    "Cheat Sheets".to_string()
}

impl SiteConfig {
    /// The cheat-sheet site's own route table
    pub fn builtin() -> Self {
        Self {
            title: default_title(),
            routes: vec![
                RouteDefinition::redirect("/", "home", "sheets"),
                RouteDefinition::page("/sheets", "sheets", pages::SHEET_INDEX)
                    .with_title("All sheets"),
                RouteDefinition::page("/sheets/:sheetid", "sheet", pages::SHEET)
                    .with_title("Sheet")
                    .with_child(
                        RouteDefinition::page(":section", "sheet-section", pages::SHEET)
                            .with_title("Sheet section"),
                    ),
                RouteDefinition::page("/*path", "not-found", pages::NOT_FOUND)
                    .with_title("Not found"),
            ],
            router: RouterOptions::default(),
            analytics: AnalyticsConfig::default(),
        }
    }

    /// Parse a JSON configuration
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Validate everything that can be checked without navigating
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        self.check_settings()?;
        Router::new(&self.routes, self.router.clone()).map(|_| ())
    }

    /// Validate and build the router
    pub fn into_router(self) -> Result<Router> {
        self.check_settings()?;
        Ok(Router::new(&self.routes, self.router)?)
    }

    fn check_settings(&self) -> std::result::Result<(), ConfigError> {
        if self.router.history_limit > 10_000 {
            return Err(ConfigError::InvalidValue {
                field: "router.history_limit".into(),
                value: self.router.history_limit.to_string(),
            });
        }
        self.analytics.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::router::Params;

    #[test]
    fn test_builtin_is_valid() {
        let config = SiteConfig::builtin();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builtin_scenario() {
        let router = SiteConfig::builtin().into_router().unwrap();

        let root = router.resolve("/").unwrap();
        assert_eq!(root.name, "sheets");
        assert_eq!(root.page.as_str(), pages::SHEET_INDEX);

        let sheet = router.resolve("/sheets/xyz").unwrap();
        assert_eq!(sheet.name, "sheet");
        assert_eq!(sheet.param("sheetid"), Some("xyz"));

        let unknown = router.resolve("/unknown").unwrap();
        assert_eq!(unknown.page.as_str(), pages::NOT_FOUND);
        assert_eq!(unknown.param("path"), Some("unknown"));

        assert!(router.resolve_name("sheet", &Params::new()).is_err());
    }

    #[test]
    fn test_from_json_with_defaults() {
        let config = SiteConfig::from_json(
            r#"{
                "routes": [
                    { "path": "/", "name": "home", "redirect": "sheets" },
                    { "path": "/sheets", "name": "sheets", "page": "SheetIndex" }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(config.title, "Cheat Sheets");
        assert_eq!(config.router, RouterOptions::default());
        assert!(!config.analytics.enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(
            SiteConfig::from_json("{ not json"),
            Err(Error::Serialization(_))
        ));
    }

    #[test]
    fn test_validate_reports_table_errors() {
        let mut config = SiteConfig::builtin();
        config
            .routes
            .push(RouteDefinition::page("/again", "sheets", "SheetIndex"));
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DuplicateName { .. })
        ));
    }

    #[test]
    fn test_validate_reports_analytics_errors() {
        let mut config = SiteConfig::builtin();
        config.analytics = AnalyticsConfig::with_measurement_id("nope");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_into_router_reports_config_errors() {
        let mut config = SiteConfig::builtin();
        config.routes = vec![
            RouteDefinition::redirect("/a", "a", "b"),
            RouteDefinition::redirect("/b", "b", "a"),
        ];
        assert!(matches!(
            config.into_router(),
            Err(Error::Config(ConfigError::RedirectLoop { .. }))
        ));

        let mut config = SiteConfig::builtin();
        config.router.history_limit = 20_000;
        assert!(matches!(
            config.into_router(),
            Err(Error::Config(ConfigError::InvalidValue { .. }))
        ));
    }

    #[test]
    fn test_round_trip_builtin_json() {
        let json = serde_json::to_string_pretty(&SiteConfig::builtin()).unwrap();
        assert_eq!(SiteConfig::from_json(&json).unwrap(), SiteConfig::builtin());
    }
}
