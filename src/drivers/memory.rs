use std::sync::Arc;

use tokio::sync::RwLock;

use crate::db::StoreError;
use crate::models::{Song, SongPatch};

pub const DRIVER_NAME: &str = "memory";

/// Songs held in process memory, in insertion order.
#[derive(Clone, Default)]
pub struct MemoryStore {
    songs: Arc<RwLock<Vec<Song>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn count_songs(&self) -> Result<i64, StoreError> {
        Ok(self.songs.read().await.len() as i64)
    }

    pub async fn list_songs(&self) -> Result<Vec<Song>, StoreError> {
        Ok(self.songs.read().await.clone())
    }

    pub async fn get_song(&self, id: i64) -> Result<Option<Song>, StoreError> {
        let songs = self.songs.read().await;
        Ok(songs.iter().find(|s| s.id() == Some(id)).cloned())
    }

    pub async fn insert_song(&self, song: Song) -> Result<Song, StoreError> {
        let id = song.id().ok_or(StoreError::MissingId)?;
        let mut songs = self.songs.write().await;
        if songs.iter().any(|s| s.id() == Some(id)) {
            return Err(StoreError::Conflict(id));
        }
        songs.push(song.clone());
        Ok(song)
    }

    pub async fn update_song(&self, id: i64, patch: &SongPatch) -> Result<Option<Song>, StoreError> {
        let mut songs = self.songs.write().await;
        match songs.iter_mut().find(|s| s.id() == Some(id)) {
            Some(song) => {
                song.merge(patch);
                Ok(Some(song.clone()))
            }
            None => Ok(None),
        }
    }

    pub async fn delete_song(&self, id: i64) -> Result<bool, StoreError> {
        let mut songs = self.songs.write().await;
        let before = songs.len();
        songs.retain(|s| s.id() != Some(id));
        Ok(songs.len() != before)
    }

    pub async fn replace_all(&self, seed: Vec<Song>) -> Result<usize, StoreError> {
        let mut fresh: Vec<Song> = Vec::with_capacity(seed.len());
        for song in seed {
            let id = song.id().ok_or(StoreError::MissingId)?;
            if fresh.iter().any(|s| s.id() == Some(id)) {
                return Err(StoreError::Conflict(id));
            }
            fresh.push(song);
        }

        let mut songs = self.songs.write().await;
        *songs = fresh;
        Ok(songs.len())
    }
}
