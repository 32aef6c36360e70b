use sqlx::PgPool;
use std::sync::Arc;

use crate::config::ApiConfig;
use crate::database::CourseRepository;
use crate::storage::UploadSigner;

/// Shared handles injected into every handler
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub courses: CourseRepository,
    pub signer: Arc<dyn UploadSigner>,
    pub api: Arc<ApiConfig>,
}

impl AppState {
    pub fn new(pool: PgPool, signer: Arc<dyn UploadSigner>, api: ApiConfig) -> Self {
        Self {
            courses: CourseRepository::new(pool.clone()),
            pool,
            signer,
            api: Arc::new(api),
        }
    }
}
