//! Shared handler state

use clearflow_quality::{Clock, IngestionGateway, QueryGateway, ReadingStore, SystemClock};
use std::path::PathBuf;
use std::sync::Arc;

/// State handed to every handler; cheap to clone
#[derive(Clone)]
pub struct AppState {
    pub ingest: IngestionGateway,
    pub query: QueryGateway,
    pub service_name: Arc<str>,
    /// Dashboard build served for unmatched paths
    pub static_dir: Option<PathBuf>,
}

impl AppState {
    pub fn new(service_name: &str) -> Self {
        Self::with_clock(service_name, Arc::new(SystemClock))
    }

    /// Both gateways share one store and one clock
    pub fn with_clock(service_name: &str, clock: Arc<dyn Clock>) -> Self {
        let store = Arc::new(ReadingStore::new());
        Self {
            ingest: IngestionGateway::with_clock(store.clone(), clock.clone()),
            query: QueryGateway::with_clock(store, clock),
            service_name: Arc::from(service_name),
            static_dir: None,
        }
    }

    pub fn with_static_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.static_dir = dir;
        self
    }
}
