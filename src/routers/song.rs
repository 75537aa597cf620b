use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    response::Response,
};
use serde_json::Value;

use crate::controllers::{ApiError, SongController};
use crate::db::Database;

pub async fn count_route(State(database): State<Database>) -> Result<Response, ApiError> {
    SongController::count(&database).await
}

pub async fn list_songs_route(State(database): State<Database>) -> Result<Response, ApiError> {
    SongController::list(&database).await
}

pub async fn get_song_route(
    State(database): State<Database>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let id = SongController::parse_id(&id)?;
    SongController::get(&database, id).await
}

pub async fn create_song_route(
    State(database): State<Database>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(payload) = payload?;
    SongController::create(&database, payload).await
}

pub async fn update_song_route(
    State(database): State<Database>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Response, ApiError> {
    let id = SongController::parse_id(&id)?;
    let Json(payload) = payload?;
    SongController::update(&database, id, payload).await
}

pub async fn delete_song_route(
    State(database): State<Database>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let id = SongController::parse_id(&id)?;
    SongController::delete(&database, id).await
}
