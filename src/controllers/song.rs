use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use tracing::info;

use crate::controllers::ApiError;
use crate::db::Database;
use crate::models::{Song, SongPatch};

const SONG_NOT_FOUND: &str = "Song with the given ID not found";
const DELETE_NOT_FOUND: &str = "song not found";

pub struct SongController;

impl SongController {
    /// A path segment that is not a plain integer cannot name a song.
    pub fn parse_id(raw: &str) -> Result<i64, ApiError> {
        if raw.starts_with('+') {
            return Err(ApiError::NotFound(SONG_NOT_FOUND));
        }
        raw.parse::<i64>()
            .map_err(|_| ApiError::NotFound(SONG_NOT_FOUND))
    }

    pub async fn count(database: &Database) -> Result<Response, ApiError> {
        let count = database.count_songs().await?;
        Ok(Json(json!({ "count": count, "status": 200 })).into_response())
    }

    pub async fn list(database: &Database) -> Result<Response, ApiError> {
        let songs = database.list_songs().await?;
        Ok(Json(json!({ "songs": songs, "status": 200 })).into_response())
    }

    pub async fn get(database: &Database, id: i64) -> Result<Response, ApiError> {
        match database.get_song(id).await? {
            Some(song) => Ok(Json(json!({ "song": song, "status": 200 })).into_response()),
            None => Err(ApiError::NotFound(SONG_NOT_FOUND)),
        }
    }

    pub async fn create(database: &Database, payload: Value) -> Result<Response, ApiError> {
        let song = Song::from_value(payload)
            .ok_or_else(|| ApiError::Other("Song payload must be a JSON object".to_string()))?;

        let song = database.insert_song(song).await?;
        info!("Created song {:?}", song.id());
        Ok((
            StatusCode::CREATED,
            Json(json!({ "message": "Song created successfully", "song": song })),
        )
            .into_response())
    }

    pub async fn update(database: &Database, id: i64, payload: Value) -> Result<Response, ApiError> {
        let patch = SongPatch::from_value(payload)
            .ok_or_else(|| ApiError::Other("Update payload must be a JSON object".to_string()))?;

        match database.update_song(id, &patch).await? {
            Some(song) => Ok(Json(json!({ "updated_song": song, "status": 200 })).into_response()),
            None => Err(ApiError::NotFound(SONG_NOT_FOUND)),
        }
    }

    pub async fn delete(database: &Database, id: i64) -> Result<Response, ApiError> {
        if database.delete_song(id).await? {
            info!("Deleted song {}", id);
            Ok(StatusCode::NO_CONTENT.into_response())
        } else {
            Err(ApiError::NotFound(DELETE_NOT_FOUND))
        }
    }
}
