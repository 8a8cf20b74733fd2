use std::{collections::HashSet, sync::Arc};

use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    error::AppError,
    storage::{
        repository::ImageRepository,
        store::ImageStore,
        types::image_record::{ImageDraft, ImageRecord},
    },
    utils::{
        file_utils::{ensure_directory, resolve_extension},
        upload_validation::{validate_upload, UploadLimits, UploadedFile},
    },
};

/// One image submission: the file part (if any) and the optional text fields.
#[derive(Debug, Clone, Default)]
pub struct UploadRequest {
    pub file: Option<UploadedFile>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub author: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    pub id: String,
    pub file_name: String,
}

/// Disagreements between the image store and the metadata table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    /// Stored files no record points at, left behind by failed inserts.
    pub orphaned_files: Vec<String>,
    /// Record paths with no stored file.
    pub missing_files: Vec<String>,
}

impl Reconciliation {
    pub fn is_clean(&self) -> bool {
        self.orphaned_files.is_empty() && self.missing_files.is_empty()
    }
}

/// Coordinates the image store and the metadata repository. Owns neither's data.
#[derive(Clone)]
pub struct Gallery {
    limits: UploadLimits,
    store: ImageStore,
    repository: Arc<dyn ImageRepository>,
}

impl Gallery {
    pub fn new(
        limits: UploadLimits,
        store: ImageStore,
        repository: Arc<dyn ImageRepository>,
    ) -> Self {
        Self {
            limits,
            store,
            repository,
        }
    }

    pub fn store(&self) -> &ImageStore {
        &self.store
    }

    /// Validates and stores an upload, then records its metadata.
    ///
    /// Steps run in order and stop at the first failure. Validation failures
    /// happen before any write. A failed byte write means no metadata is
    /// written. A failed metadata insert leaves the written file in place.
    pub async fn upload(&self, request: UploadRequest) -> Result<UploadReceipt, AppError> {
        let file = validate_upload(request.file.as_ref(), &self.limits)?;

        let extension = resolve_extension(Some(&file.file_name));
        let file_name = format!("{}{extension}", Uuid::new_v4());

        if let Some(root) = self.store.local_base_path() {
            ensure_directory(root).await?;
        }

        self.store.put(&file_name, file.bytes.clone()).await?;

        let draft = ImageDraft::from_form(
            request.name.as_deref(),
            request.description.as_deref(),
            request.author.as_deref(),
            file_name.clone(),
        );

        let id = match self.repository.insert(draft).await {
            Ok(id) => id,
            Err(err) => {
                warn!(
                    file_name = %file_name,
                    error = %err,
                    "Metadata insert failed; stored file has no record"
                );
                return Err(err.into());
            }
        };

        info!(
            id = %id,
            file_name = %file_name,
            size = file.size,
            mime_type = %file.mime_type,
            "Stored uploaded image"
        );

        Ok(UploadReceipt { id, file_name })
    }

    /// All records, newest first.
    pub async fn list_images(&self) -> Result<Vec<ImageRecord>, AppError> {
        Ok(self.repository.list_all().await?)
    }

    /// Compares stored files against record paths. Reports only; nothing is deleted.
    pub async fn reconcile(&self) -> Result<Reconciliation, AppError> {
        let records = self.repository.list_all().await?;
        let known: HashSet<&str> = records.iter().map(|record| record.path.as_str()).collect();

        let mut orphaned_files: Vec<String> = self
            .store
            .list_file_names()
            .await?
            .into_iter()
            .filter(|name| !known.contains(name.as_str()))
            .collect();
        orphaned_files.sort();

        let mut missing_files = Vec::new();
        for record in &records {
            if !self.store.exists(&record.path).await? {
                missing_files.push(record.path.clone());
            }
        }

        Ok(Reconciliation {
            orphaned_files,
            missing_files,
        })
    }
}
