use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::drivers::{MemoryStore, PostgresStore, memory, postgres};
use crate::models::{Song, SongPatch};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Song with id {0} already exists")]
    Conflict(i64),

    #[error("Song record must be a JSON object with an integer `id` field")]
    MissingId,

    #[error("Unsupported database url: {0}")]
    UnsupportedUrl(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

#[derive(Clone)]
enum Driver {
    Postgres(PostgresStore),
    Memory(MemoryStore),
}

/// Handle to the song collection, shared by every request as router state.
#[derive(Clone)]
pub struct Database {
    driver: Driver,
}

impl Database {
    /// Opens the store named by `url`; the scheme picks the driver.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let parsed = Url::parse(url).map_err(|e| StoreError::UnsupportedUrl(e.to_string()))?;
        debug!("Selecting database driver for scheme {}", parsed.scheme());

        let driver = match parsed.scheme() {
            postgres::DRIVER_NAME | postgres::DRIVER_ALIAS => {
                Driver::Postgres(PostgresStore::connect(url, max_connections).await?)
            }
            memory::DRIVER_NAME => return Ok(Self::memory()),
            other => return Err(StoreError::UnsupportedUrl(format!("unknown scheme: {}", other))),
        };

        Ok(Self { driver })
    }

    pub fn memory() -> Self {
        Self {
            driver: Driver::Memory(MemoryStore::new()),
        }
    }

    pub fn driver_name(&self) -> &'static str {
        match &self.driver {
            Driver::Postgres(_) => postgres::DRIVER_NAME,
            Driver::Memory(_) => memory::DRIVER_NAME,
        }
    }

    pub async fn migrate(&self) -> Result<(), StoreError> {
        match &self.driver {
            Driver::Postgres(store) => store.migrate().await,
            Driver::Memory(_) => Ok(()),
        }
    }

    pub async fn count_songs(&self) -> Result<i64, StoreError> {
        match &self.driver {
            Driver::Postgres(store) => store.count_songs().await,
            Driver::Memory(store) => store.count_songs().await,
        }
    }

    pub async fn list_songs(&self) -> Result<Vec<Song>, StoreError> {
        match &self.driver {
            Driver::Postgres(store) => store.list_songs().await,
            Driver::Memory(store) => store.list_songs().await,
        }
    }

    pub async fn get_song(&self, id: i64) -> Result<Option<Song>, StoreError> {
        debug!("get_song id={}", id);
        match &self.driver {
            Driver::Postgres(store) => store.get_song(id).await,
            Driver::Memory(store) => store.get_song(id).await,
        }
    }

    /// Inserts a new song; a duplicate `id` yields `StoreError::Conflict`.
    pub async fn insert_song(&self, song: Song) -> Result<Song, StoreError> {
        debug!("insert_song id={:?}", song.id());
        match &self.driver {
            Driver::Postgres(store) => store.insert_song(song).await,
            Driver::Memory(store) => store.insert_song(song).await,
        }
    }

    /// Merges `patch` into the song and returns it, or `None` if absent.
    pub async fn update_song(&self, id: i64, patch: &SongPatch) -> Result<Option<Song>, StoreError> {
        debug!("update_song id={} fields={}", id, patch.fields().len());
        match &self.driver {
            Driver::Postgres(store) => store.update_song(id, patch).await,
            Driver::Memory(store) => store.update_song(id, patch).await,
        }
    }

    /// Returns whether a song was removed.
    pub async fn delete_song(&self, id: i64) -> Result<bool, StoreError> {
        debug!("delete_song id={}", id);
        match &self.driver {
            Driver::Postgres(store) => store.delete_song(id).await,
            Driver::Memory(store) => store.delete_song(id).await,
        }
    }

    /// Swaps the whole collection for `songs`. Nothing changes on error.
    pub async fn replace_all(&self, songs: Vec<Song>) -> Result<usize, StoreError> {
        match &self.driver {
            Driver::Postgres(store) => store.replace_all(songs).await,
            Driver::Memory(store) => store.replace_all(songs).await,
        }
    }
}
