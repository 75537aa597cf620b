pub mod root;
pub mod song;

use axum::{Router, routing::get};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::db::Database;
pub use root::health_check_route;
use song::{
    count_route, create_song_route, delete_song_route, get_song_route, list_songs_route,
    update_song_route,
};

pub fn song_routes() -> Router<Database> {
    Router::new()
        .route("/count", get(count_route))
        .route("/song", get(list_songs_route).post(create_song_route))
        .route(
            "/song/{id}",
            get(get_song_route)
                .put(update_song_route)
                .delete(delete_song_route),
        )
}

/// The full application with the store injected as state.
pub fn app(database: Database) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check_route))
        .merge(song_routes())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(database)
}

#[cfg(test)]
mod tests;
