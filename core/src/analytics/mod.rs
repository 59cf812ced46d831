//! Page-view analytics
//!
//! A [`PageViewTracker`] is a navigation observer that turns committed
//! navigations into [`PageView`] hits and hands them to a sink. Delivering
//! hits to an analytics vendor is left to whoever implements the sink.

pub mod sink;

pub use sink::{MemorySink, PageViewSink, TracingSink};

use crate::error::ConfigError;
use crate::observer::{NavigationEvent, NavigationObserver};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Analytics settings from the site configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Whether page views are tracked at all
    pub enabled: bool,
    /// Measurement id of the analytics property, e.g. `G-71G27SVGCV`
    pub measurement_id: Option<String>,
    /// Send a hit for every navigation
    pub send_page_view: bool,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            measurement_id: None,
            send_page_view: true,
        }
    }
}

impl AnalyticsConfig {
    /// Enabled configuration for a measurement id
    pub fn with_measurement_id(id: impl Into<String>) -> Self {
        Self {
            enabled: true,
            measurement_id: Some(id.into()),
            send_page_view: true,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.enabled {
            return Ok(());
        }

        let id = self
            .measurement_id
            .as_deref()
            .ok_or_else(|| ConfigError::InvalidValue {
                field: "analytics.measurement_id".into(),
                value: "<missing>".into(),
            })?;

        let valid = id
            .strip_prefix("G-")
            .map(|rest| !rest.is_empty() && rest.chars().all(|c| c.is_ascii_alphanumeric()))
            .unwrap_or(false);

        if !valid {
            return Err(ConfigError::InvalidValue {
                field: "analytics.measurement_id".into(),
                value: id.to_string(),
            });
        }

        Ok(())
    }
}

/// One page-view hit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageView {
    pub measurement_id: String,
    /// Stable for the lifetime of one tracker
    pub client_id: Uuid,
    pub page_path: String,
    pub page_title: Option<String>,
    pub route_name: String,
    pub at: DateTime<Utc>,
}

/// Navigation observer producing page-view hits
pub struct PageViewTracker {
    measurement_id: String,
    client_id: Uuid,
    send_page_view: bool,
    sink: Box<dyn PageViewSink>,
}

impl PageViewTracker {
    /// Create a tracker from configuration. Returns `None` when analytics is disabled.
    pub fn from_config(
        config: &AnalyticsConfig,
        sink: Box<dyn PageViewSink>,
    ) -> Result<Option<Self>, ConfigError> {
        config.validate()?;

        let Some(measurement_id) = config.measurement_id.clone().filter(|_| config.enabled) else {
            return Ok(None);
        };

        Ok(Some(Self {
            measurement_id,
            client_id: Uuid::new_v4(),
            send_page_view: config.send_page_view,
            sink,
        }))
    }

    pub fn client_id(&self) -> Uuid {
        self.client_id
    }
}

impl NavigationObserver for PageViewTracker {
    fn name(&self) -> &str {
        "analytics"
    }

    fn on_navigate(&self, event: &NavigationEvent) -> anyhow::Result<()> {
        if !self.send_page_view {
            return Ok(());
        }

        let view = PageView {
            measurement_id: self.measurement_id.clone(),
            client_id: self.client_id,
            page_path: event.full_path.clone(),
            page_title: event.title.clone(),
            route_name: event.route_name.clone(),
            at: event.at,
        };
        self.sink.send(&view)
    }
}
