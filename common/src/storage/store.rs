use std::path::{Path, PathBuf};
use std::sync::Arc;

use bytes::Bytes;
use futures::TryStreamExt;
use object_store::local::LocalFileSystem;
use object_store::memory::InMemory;
use object_store::{path::Path as ObjPath, ObjectStore};

use crate::utils::{
    config::{AppConfig, StorageKind},
    file_utils::ensure_directory,
};

pub type DynStore = Arc<dyn ObjectStore>;

/// Byte storage for uploaded images, keyed by generated file name.
#[derive(Clone)]
pub struct ImageStore {
    store: DynStore,
    backend_kind: StorageKind,
    local_base: Option<PathBuf>,
}

impl ImageStore {
    /// Create an ImageStore for the configured backend.
    ///
    /// For the local backend the upload directory is created if missing.
    pub async fn new(cfg: &AppConfig) -> object_store::Result<Self> {
        match cfg.storage {
            StorageKind::Local => Self::local(&cfg.upload_dir).await,
            StorageKind::Memory => Ok(Self::memory()),
        }
    }

    /// Filesystem-backed store rooted at `root`.
    pub async fn local(root: impl AsRef<Path>) -> object_store::Result<Self> {
        let base = root.as_ref().to_path_buf();
        ensure_directory(&base)
            .await
            .map_err(|e| object_store::Error::Generic {
                store: "LocalFileSystem",
                source: e.into(),
            })?;
        let store = LocalFileSystem::new_with_prefix(&base)?;

        Ok(Self {
            store: Arc::new(store),
            backend_kind: StorageKind::Local,
            local_base: Some(base),
        })
    }

    pub fn memory() -> Self {
        Self::with_backend(Arc::new(InMemory::new()), StorageKind::Memory)
    }

    /// Create an ImageStore around an existing backend.
    pub fn with_backend(store: DynStore, backend_kind: StorageKind) -> Self {
        Self {
            store,
            backend_kind,
            local_base: None,
        }
    }

    pub fn backend_kind(&self) -> &StorageKind {
        &self.backend_kind
    }

    /// The root directory when using the local backend.
    pub fn local_base_path(&self) -> Option<&Path> {
        self.local_base.as_deref()
    }

    /// Write `data` under `file_name`, replacing any existing file of that name.
    pub async fn put(&self, file_name: &str, data: Bytes) -> object_store::Result<()> {
        let path = ObjPath::from(file_name);
        let payload = object_store::PutPayload::from_bytes(data);
        self.store.put(&path, payload).await.map(|_| ())
    }

    #[cfg(any(test, feature = "test-utils"))]
    pub async fn get(&self, file_name: &str) -> object_store::Result<Bytes> {
        let path = ObjPath::from(file_name);
        let result = self.store.get(&path).await?;
        result.bytes().await
    }

    /// Names of every stored file.
    pub async fn list_file_names(&self) -> object_store::Result<Vec<String>> {
        self.store
            .list(None)
            .map_ok(|meta| meta.location.to_string())
            .try_collect()
            .await
    }

    /// Whether `file_name` is stored. A missing file is `Ok(false)`, not an error.
    pub async fn exists(&self, file_name: &str) -> object_store::Result<bool> {
        let path = ObjPath::from(file_name);
        self.store
            .head(&path)
            .await
            .map(|_| true)
            .or_else(|e| match e {
                object_store::Error::NotFound { .. } => Ok(false),
                _ => Err(e),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_memory_put_get() {
        let store = ImageStore::memory();

        store
            .put("a.png", Bytes::from_static(b"png bytes"))
            .await
            .expect("put");

        assert_eq!(store.get("a.png").await.expect("get").as_ref(), b"png bytes");
        assert!(store.exists("a.png").await.expect("exists"));
        assert!(!store.exists("missing.png").await.expect("exists"));
        assert_eq!(
            store.list_file_names().await.expect("list"),
            vec!["a.png".to_string()]
        );
        assert!(store.local_base_path().is_none());
    }

    #[tokio::test]
    async fn test_local_store_creates_root_and_writes_file() {
        let tmp = tempdir().expect("tempdir");
        let root = tmp.path().join("public").join("images");

        let store = ImageStore::local(&root).await.expect("local store");
        store
            .put("b.jpg", Bytes::from_static(b"jpeg"))
            .await
            .expect("put");

        let on_disk = std::fs::read(root.join("b.jpg")).expect("file on disk");
        assert_eq!(on_disk, b"jpeg");
        assert_eq!(store.backend_kind(), &StorageKind::Local);
    }

    #[tokio::test]
    async fn test_put_overwrites_existing_name() {
        let tmp = tempdir().expect("tempdir");
        let store = ImageStore::local(tmp.path()).await.expect("local store");

        store.put("c.gif", Bytes::from_static(b"old")).await.expect("put");
        store.put("c.gif", Bytes::from_static(b"new")).await.expect("put");

        assert_eq!(store.get("c.gif").await.expect("get").as_ref(), b"new");
    }

    #[tokio::test]
    async fn test_new_from_config() {
        let tmp = tempdir().expect("tempdir");
        let cfg = AppConfig {
            upload_dir: tmp.path().join("images").to_string_lossy().into(),
            ..Default::default()
        };

        let store = ImageStore::new(&cfg).await.expect("store");
        assert!(store.local_base_path().is_some_and(Path::is_dir));

        let cfg = AppConfig {
            storage: StorageKind::Memory,
            ..Default::default()
        };
        let store = ImageStore::new(&cfg).await.expect("store");
        assert_eq!(store.backend_kind(), &StorageKind::Memory);
    }
}
