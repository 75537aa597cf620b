use sqlx::types::Json;
use sqlx::{PgPool, postgres::PgPoolOptions};
use tracing::debug;

use crate::db::StoreError;
use crate::models::{Song, SongPatch};

pub const DRIVER_NAME: &str = "postgres";
pub const DRIVER_ALIAS: &str = "postgresql";

/// Songs stored as JSONB documents, keyed by a primary-key `id` column.
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await?;

        Ok(Self { pool })
    }

    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    pub async fn count_songs(&self) -> Result<i64, StoreError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM songs")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn list_songs(&self) -> Result<Vec<Song>, StoreError> {
        let rows = sqlx::query_scalar::<_, Json<Song>>("SELECT doc FROM songs ORDER BY seq")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(|Json(song)| song).collect())
    }

    pub async fn get_song(&self, id: i64) -> Result<Option<Song>, StoreError> {
        let row = sqlx::query_scalar::<_, Json<Song>>("SELECT doc FROM songs WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|Json(song)| song))
    }

    pub async fn insert_song(&self, song: Song) -> Result<Song, StoreError> {
        let id = song.id().ok_or(StoreError::MissingId)?;
        sqlx::query("INSERT INTO songs (id, doc) VALUES ($1, $2)")
            .bind(id)
            .bind(Json(&song))
            .execute(&self.pool)
            .await
            .map_err(|e| insert_error(id, e))?;
        Ok(song)
    }

    pub async fn update_song(&self, id: i64, patch: &SongPatch) -> Result<Option<Song>, StoreError> {
        let row = sqlx::query_scalar::<_, Json<Song>>(
            "UPDATE songs SET doc = doc || $2 WHERE id = $1 RETURNING doc",
        )
        .bind(id)
        .bind(Json(patch))
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|Json(song)| song))
    }

    pub async fn delete_song(&self, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM songs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn replace_all(&self, seed: Vec<Song>) -> Result<usize, StoreError> {
        let mut tx = self.pool.begin().await?;

        let dropped = sqlx::query("DELETE FROM songs").execute(&mut *tx).await?;
        debug!("Dropped {} songs before seeding", dropped.rows_affected());

        let total = seed.len();
        for song in seed {
            let id = song.id().ok_or(StoreError::MissingId)?;
            sqlx::query("INSERT INTO songs (id, doc) VALUES ($1, $2)")
                .bind(id)
                .bind(Json(&song))
                .execute(&mut *tx)
                .await
                .map_err(|e| insert_error(id, e))?;
        }

        tx.commit().await?;
        Ok(total)
    }
}

// The primary key on `id` is what makes concurrent creates safe.
fn insert_error(id: i64, e: sqlx::Error) -> StoreError {
    let unique = e
        .as_database_error()
        .is_some_and(|db| db.is_unique_violation());
    if unique {
        StoreError::Conflict(id)
    } else {
        StoreError::Database(e)
    }
}
