use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use super::upload_validation::UploadLimits;

#[derive(Clone, Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    Local,
    Memory,
}

#[derive(Clone, Copy, Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnvironment {
    Development,
    Production,
}

#[derive(Clone, Deserialize, Debug)]
#[serde(default)]
pub struct AppConfig {
    pub http_port: u16,
    pub environment: RuntimeEnvironment,
    pub surrealdb_address: String,
    pub surrealdb_username: String,
    pub surrealdb_password: String,
    pub surrealdb_namespace: String,
    pub surrealdb_database: String,
    pub db_pool_size: usize,
    pub upload_max_file_size: usize,
    pub upload_allowed_mime_types: Vec<String>,
    pub upload_dir: String,
    pub storage: StorageKind,
}

pub const DEFAULT_MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

pub const DEFAULT_POOL_SIZE: usize = 10;

pub fn default_allowed_mime_types() -> Vec<String> {
    vec![
        mime::IMAGE_JPEG.to_string(),
        "image/jpg".to_string(),
        mime::IMAGE_PNG.to_string(),
        mime::IMAGE_GIF.to_string(),
        "image/webp".to_string(),
    ]
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            http_port: 3000,
            environment: RuntimeEnvironment::Development,
            surrealdb_address: "ws://localhost:8000".to_string(),
            surrealdb_username: "root".to_string(),
            surrealdb_password: "root".to_string(),
            surrealdb_namespace: "gallery".to_string(),
            surrealdb_database: "db".to_string(),
            db_pool_size: DEFAULT_POOL_SIZE,
            upload_max_file_size: DEFAULT_MAX_FILE_SIZE,
            upload_allowed_mime_types: default_allowed_mime_types(),
            upload_dir: "./public/images".to_string(),
            storage: StorageKind::Local,
        }
    }
}

impl AppConfig {
    pub fn upload_limits(&self) -> UploadLimits {
        UploadLimits {
            max_file_size: self.upload_max_file_size,
            allowed_mime_types: self.upload_allowed_mime_types.clone(),
        }
    }

    /// Whether internal error details may be returned to clients.
    pub fn expose_error_details(&self) -> bool {
        self.environment == RuntimeEnvironment::Development
    }
}

pub fn get_config() -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::with_name("config").required(false))
        .add_source(
            Environment::default()
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("upload_allowed_mime_types"),
        )
        .build()?;

    config.try_deserialize()
}
