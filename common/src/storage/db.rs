use std::{ops::Deref, sync::Arc};

use surrealdb::{
    engine::any::{connect, Any},
    opt::auth::Root,
    Surreal,
};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::debug;

use crate::error::StorageError;

/// Schema for the image table. Every statement is idempotent.
const IMAGE_SCHEMA: &str = "
    DEFINE TABLE IF NOT EXISTS image SCHEMAFULL;
    DEFINE FIELD IF NOT EXISTS name ON TABLE image TYPE string;
    DEFINE FIELD IF NOT EXISTS description ON TABLE image TYPE string;
    DEFINE FIELD IF NOT EXISTS author ON TABLE image TYPE string;
    DEFINE FIELD IF NOT EXISTS path ON TABLE image TYPE string;
    DEFINE FIELD IF NOT EXISTS date ON TABLE image TYPE datetime;
    DEFINE INDEX IF NOT EXISTS image_path_unique ON TABLE image FIELDS path UNIQUE;
    DEFINE INDEX IF NOT EXISTS image_date ON TABLE image FIELDS date;
";

/// Database handle with a bounded number of concurrently checked-out connections.
///
/// Callers beyond `size` wait in FIFO order until a connection is returned.
/// There is no acquisition timeout.
#[derive(Clone)]
pub struct DbPool {
    client: Surreal<Any>,
    permits: Arc<Semaphore>,
    size: usize,
}

/// A connection checked out of a [`DbPool`]. Returned to the pool on drop.
pub struct PooledConnection {
    client: Surreal<Any>,
    _permit: OwnedSemaphorePermit,
}

impl Deref for PooledConnection {
    type Target = Surreal<Any>;

    fn deref(&self) -> &Self::Target {
        &self.client
    }
}

impl DbPool {
    /// # Initialize a new database pool
    ///
    /// # Arguments
    /// * `address` - SurrealDB endpoint, e.g. `ws://localhost:8000`
    /// * `pool_size` - Maximum number of connections handed out at once
    ///
    /// # Returns
    /// * `DbPool` signed in and scoped to `namespace`/`database`
    pub async fn connect(
        address: &str,
        username: &str,
        password: &str,
        namespace: &str,
        database: &str,
        pool_size: usize,
    ) -> Result<Self, StorageError> {
        let db = connect(address).await?;

        db.signin(Root { username, password }).await?;

        db.use_ns(namespace).use_db(database).await?;

        Ok(Self::from_client(db, pool_size))
    }

    fn from_client(client: Surreal<Any>, pool_size: usize) -> Self {
        let size = pool_size.max(1);
        Self {
            client,
            permits: Arc::new(Semaphore::new(size)),
            size,
        }
    }

    /// Waits for a free slot and checks out a connection.
    pub async fn acquire(&self) -> Result<PooledConnection, StorageError> {
        let permit = Arc::clone(&self.permits)
            .acquire_owned()
            .await
            .map_err(|_| StorageError::PoolClosed)?;

        Ok(PooledConnection {
            client: self.client.clone(),
            _permit: permit,
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of connections that can be acquired without waiting.
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }

    /// Applies the image table schema.
    pub async fn ensure_initialized(&self) -> Result<(), StorageError> {
        let conn = self.acquire().await?;
        conn.query(IMAGE_SCHEMA).await?.check()?;
        debug!("Image schema ensured");

        Ok(())
    }

    /// Round-trips a trivial query, used by readiness probes.
    pub async fn ping(&self) -> Result<(), StorageError> {
        let conn = self.acquire().await?;
        conn.query("RETURN true").await?.check()?;

        Ok(())
    }

    /// Stops handing out connections. Pending and future `acquire` calls fail.
    pub fn close(&self) {
        self.permits.close();
    }
}

#[cfg(any(test, feature = "test-utils"))]
impl DbPool {
    /// Create an in-memory pool for testing.
    pub async fn memory(
        namespace: &str,
        database: &str,
        pool_size: usize,
    ) -> Result<Self, StorageError> {
        let db = connect("mem://").await?;

        db.use_ns(namespace).use_db(database).await?;

        Ok(Self::from_client(db, pool_size))
    }
}
