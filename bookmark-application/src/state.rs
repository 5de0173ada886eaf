use std::sync::Arc;

use bookmark_domain::ports::{AccessGate, CourseCatalog, ViewLogRepository};
use bookmark_domain::RuntimeConfig;

#[derive(Clone)]
pub struct AppState {
    pub config: RuntimeConfig,
    pub view_log: Arc<dyn ViewLogRepository>,
    pub catalog: Arc<dyn CourseCatalog>,
    pub access: Arc<dyn AccessGate>,
}
