use std::{path::Path, sync::Arc};

use api_router::{api_routes, api_state::ApiState};
use async_trait::async_trait;
use axum_test::{
    multipart::{MultipartForm, Part},
    TestServer,
};
use common::{
    error::StorageError,
    gallery::Gallery,
    storage::{
        db::DbPool,
        repository::ImageRepository,
        store::ImageStore,
        types::image_record::{ImageDraft, ImageRecord},
    },
    utils::config::{AppConfig, RuntimeEnvironment, StorageKind},
};
use uuid::Uuid;

/// Sets up an in-memory test database with the schema applied
pub async fn setup_test_pool() -> DbPool {
    let namespace = "test_ns";
    let database = Uuid::new_v4().to_string();

    let pool = DbPool::memory(namespace, &database, 4)
        .await
        .expect("Failed to start in-memory surrealdb");

    pool.ensure_initialized()
        .await
        .expect("Failed to apply the schema");

    pool
}

/// Creates test configuration storing uploads below `upload_dir`
pub fn create_test_config(upload_dir: &Path) -> AppConfig {
    AppConfig {
        http_port: 0,
        upload_dir: upload_dir.to_string_lossy().into(),
        storage: StorageKind::Local,
        ..Default::default()
    }
}

/// Builds a test server backed by an in-memory database and a local image store
pub async fn create_test_server(config: &AppConfig) -> (TestServer, ApiState) {
    let pool = setup_test_pool().await;
    let storage = ImageStore::new(config)
        .await
        .expect("Failed to create image store");
    let state = ApiState::with_pool(config, pool, storage);

    (server_for(state.clone()), state)
}

/// Builds a test server whose repository always fails
pub async fn create_failing_server(environment: RuntimeEnvironment) -> TestServer {
    let config = AppConfig {
        storage: StorageKind::Memory,
        environment,
        ..Default::default()
    };
    let state = ApiState {
        db: setup_test_pool().await,
        gallery: Gallery::new(
            config.upload_limits(),
            ImageStore::memory(),
            Arc::new(UnavailableRepository),
        ),
        config,
    };

    server_for(state)
}

fn server_for(state: ApiState) -> TestServer {
    let app = axum::Router::new()
        .merge(api_routes(&state))
        .with_state(state);

    TestServer::new(app).expect("Failed to start test server")
}

/// Multipart form with an `image` part and the given text fields
pub fn image_form(
    bytes: Vec<u8>,
    file_name: &str,
    mime_type: &str,
    fields: &[(&str, &str)],
) -> MultipartForm {
    let part = Part::bytes(bytes).file_name(file_name).mime_type(mime_type);
    fields
        .iter()
        .fold(MultipartForm::new().add_part("image", part), |form, (key, value)| {
            form.add_text(*key, *value)
        })
}

/// Repository standing in for a database that is down
pub struct UnavailableRepository;

#[async_trait]
impl ImageRepository for UnavailableRepository {
    async fn insert(&self, _draft: ImageDraft) -> Result<String, StorageError> {
        Err(StorageError::PoolClosed)
    }

    async fn list_all(&self) -> Result<Vec<ImageRecord>, StorageError> {
        Err(StorageError::PoolClosed)
    }
}
