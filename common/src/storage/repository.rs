use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::error::StorageError;

use super::{
    db::DbPool,
    types::{
        image_record::{ImageDraft, ImageRecord, ImageRow},
        StoredObject,
    },
};

/// Persistence for image metadata.
#[async_trait]
pub trait ImageRepository: Send + Sync {
    /// Stores one record, assigning its id and timestamp. Returns the new id.
    async fn insert(&self, draft: ImageDraft) -> Result<String, StorageError>;

    /// Returns every record, newest first.
    async fn list_all(&self) -> Result<Vec<ImageRecord>, StorageError>;
}

pub struct SurrealImageRepository {
    pool: DbPool,
}

impl SurrealImageRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ImageRepository for SurrealImageRepository {
    async fn insert(&self, draft: ImageDraft) -> Result<String, StorageError> {
        let id = Uuid::new_v4().to_string();
        let row = ImageRow::stamped(draft, Utc::now());

        let conn = self.pool.acquire().await?;
        let created: Option<ImageRecord> = conn
            .create((ImageRecord::table_name(), id.as_str()))
            .content(row)
            .await?;

        created
            .map(|record| record.get_id().to_string())
            .ok_or(StorageError::NotCreated(id))
    }

    async fn list_all(&self) -> Result<Vec<ImageRecord>, StorageError> {
        let conn = self.pool.acquire().await?;
        let records: Vec<ImageRecord> = conn
            .query("SELECT * FROM image ORDER BY date DESC")
            .await?
            .take(0)?;

        Ok(records)
    }
}
