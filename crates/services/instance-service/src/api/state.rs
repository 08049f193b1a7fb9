//! Application state for dependency injection.

use std::sync::Arc;

use crate::infra::Database;
use crate::search::InstanceInfoSearchIndex;
use crate::service::InstanceInfoService;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub instance_infos: Arc<dyn InstanceInfoService>,
    pub database: Database,
    pub search_index: Arc<dyn InstanceInfoSearchIndex>,
}

impl AppState {
    /// Create new app state.
    pub fn new(
        instance_infos: Arc<dyn InstanceInfoService>,
        database: Database,
        search_index: Arc<dyn InstanceInfoSearchIndex>,
    ) -> Self {
        Self {
            instance_infos,
            database,
            search_index,
        }
    }
}
