use std::sync::Arc;

use common::{
    error::AppError,
    gallery::Gallery,
    storage::{db::DbPool, repository::SurrealImageRepository, store::ImageStore},
    utils::config::AppConfig,
};

#[derive(Clone)]
pub struct ApiState {
    pub db: DbPool,
    pub gallery: Gallery,
    pub config: AppConfig,
}

impl ApiState {
    pub async fn new(config: &AppConfig, storage: ImageStore) -> Result<Self, AppError> {
        let pool = DbPool::connect(
            &config.surrealdb_address,
            &config.surrealdb_username,
            &config.surrealdb_password,
            &config.surrealdb_namespace,
            &config.surrealdb_database,
            config.db_pool_size,
        )
        .await?;

        pool.ensure_initialized().await?;

        Ok(Self::with_pool(config, pool, storage))
    }

    /// Wires the gallery on top of an already connected pool.
    pub fn with_pool(config: &AppConfig, pool: DbPool, storage: ImageStore) -> Self {
        let repository = Arc::new(SurrealImageRepository::new(pool.clone()));
        let gallery = Gallery::new(config.upload_limits(), storage, repository);

        Self {
            db: pool,
            gallery,
            config: config.clone(),
        }
    }
}
