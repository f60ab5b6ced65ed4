use std::sync::Arc;

use crate::config::Config;
use crate::db::{CatalogBackend, CatalogReader};
use crate::ocr::OcrEngine;
use crate::recognition::RecognitionService;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db: Arc<dyn CatalogBackend>,
    pub engine: Arc<dyn OcrEngine>,
    pub recognition: Arc<RecognitionService>,
}

impl AppState {
    pub fn new(
        config: Config,
        db: Arc<dyn CatalogBackend>,
        catalog: Arc<dyn CatalogReader>,
        engine: Arc<dyn OcrEngine>,
    ) -> Self {
        let config = Arc::new(config);
        let recognition = Arc::new(RecognitionService::new(
            Arc::clone(&engine),
            catalog,
            config.ocr.clone(),
            config.matching.clone(),
        ));

        Self {
            config,
            db,
            engine,
            recognition,
        }
    }
}
