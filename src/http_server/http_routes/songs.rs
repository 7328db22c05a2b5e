use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use axum_extra::extract::WithRejection;

use crate::entities::song;
use crate::http_server::{error::ApiError, state::AppState};
use crate::services::song::SongDetails;

pub async fn list_songs(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<song::Model>>, ApiError> {
    let songs = app_state.songs.get_all_songs().await?;
    Ok(Json(songs))
}

pub async fn get_song(
    State(app_state): State<Arc<AppState>>,
    WithRejection(Path(song_id), _): WithRejection<Path<i64>, ApiError>,
) -> Result<Json<song::Model>, ApiError> {
    app_state
        .songs
        .get_song_by_id(song_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Song not found with id: {}", song_id)))
}

pub async fn create_song(
    State(app_state): State<Arc<AppState>>,
    WithRejection(Json(details), _): WithRejection<Json<SongDetails>, ApiError>,
) -> Result<(StatusCode, Json<song::Model>), ApiError> {
    let created = app_state.songs.create_song(details).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_song(
    State(app_state): State<Arc<AppState>>,
    WithRejection(Path(song_id), _): WithRejection<Path<i64>, ApiError>,
    WithRejection(Json(details), _): WithRejection<Json<SongDetails>, ApiError>,
) -> Result<Json<song::Model>, ApiError> {
    let updated = app_state.songs.update_song(song_id, details).await?;
    Ok(Json(updated))
}

pub async fn delete_song(
    State(app_state): State<Arc<AppState>>,
    WithRejection(Path(song_id), _): WithRejection<Path<i64>, ApiError>,
) -> Result<StatusCode, ApiError> {
    app_state.songs.delete_song(song_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
