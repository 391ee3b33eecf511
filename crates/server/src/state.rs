use std::sync::Arc;

use reelscope_catalog::{CatalogSettings, CatalogSource};

/// Shared application state passed to all handlers. Holds only
/// read-only configuration; nothing here changes between requests.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn CatalogSource>,
    pub settings: Arc<CatalogSettings>,
}

impl AppState {
    pub fn new(catalog: Arc<dyn CatalogSource>, settings: CatalogSettings) -> Self {
        Self {
            catalog,
            settings: Arc::new(settings),
        }
    }
}
