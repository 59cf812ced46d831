//! Page-view sinks

use super::PageView;
use anyhow::anyhow;
use std::sync::{Arc, Mutex};
use tracing::info;

/// Destination for page-view hits
pub trait PageViewSink: Send + Sync {
    fn send(&self, view: &PageView) -> anyhow::Result<()>;
}

/// Writes every hit as a structured log line
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl PageViewSink for TracingSink {
    fn send(&self, view: &PageView) -> anyhow::Result<()> {
        info!(
            target: "sheetnav::analytics",
            measurement_id = %view.measurement_id,
            client_id = %view.client_id,
            page_path = %view.page_path,
            page_title = view.page_title.as_deref().unwrap_or(""),
            route = %view.route_name,
            "page_view"
        );
        Ok(())
    }
}

/// Keeps hits in memory; clones share the same buffer
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    views: Arc<Mutex<Vec<PageView>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the recorded hits
    pub fn views(&self) -> Vec<PageView> {
        self.views
            .lock()
            .map(|views| views.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    pub fn len(&self) -> usize {
        self.views
            .lock()
            .map(|views| views.len())
            .unwrap_or_else(|poisoned| poisoned.into_inner().len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PageViewSink for MemorySink {
    fn send(&self, view: &PageView) -> anyhow::Result<()> {
        self.views
            .lock()
            .map_err(|_| anyhow!("page view buffer poisoned"))?
            .push(view.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn view(path: &str) -> PageView {
        PageView {
            measurement_id: "G-71G27SVGCV".into(),
            client_id: uuid::Uuid::new_v4(),
            page_path: path.into(),
            page_title: None,
            route_name: "sheet".into(),
            at: Utc::now(),
        }
    }

    #[test]
    fn test_memory_sink_counts_shared_buffer() {
        let sink = MemorySink::new();
        let clone = sink.clone();
        assert!(sink.is_empty());

        sink.send(&view("/sheets/pets")).unwrap();
        clone.send(&view("/sheets/food")).unwrap();

        assert_eq!(sink.len(), 2);
        assert_eq!(clone.len(), 2);
        assert_eq!(sink.views()[1].page_path, "/sheets/food");
    }
}
