use std::io::ErrorKind;
use std::path::{Component, Path as FsPath, PathBuf};
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderValue, header},
    response::{IntoResponse, Response},
};
use axum_extra::{TypedHeader, extract::WithRejection, headers::Range};
use axum_range::{KnownSize, Ranged};
use color_eyre::eyre::Context;
use tokio::fs::File;
use url::Url;

use crate::http_server::{error::ApiError, state::AppState};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AudioSourceError {
    #[error("Remote audio is not streamed by this server: {0}")]
    RemoteUrl(String),
    #[error("Unsupported audio location: {0}")]
    UnsupportedLocation(String),
    #[error("Audio path escapes the media directory: {0}")]
    OutsideMediaDirectory(String),
}

/// Turns a song's `audioUrl` into a local file path.
///
/// `file://` URLs and plain paths are local; relative paths are joined onto
/// `media_directory` when one is configured and may not climb out of it
/// with `..`. Remote URLs are never fetched.
pub fn resolve_audio_path(
    audio_url: &str,
    media_directory: Option<&FsPath>,
) -> Result<PathBuf, AudioSourceError> {
    match Url::parse(audio_url) {
        Ok(url) if url.scheme() == "file" => url
            .to_file_path()
            .map_err(|_| AudioSourceError::UnsupportedLocation(audio_url.to_string())),
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {
            Err(AudioSourceError::RemoteUrl(audio_url.to_string()))
        }
        // `C:\music\a.mp3` parses with a one letter scheme
        Ok(url) if url.scheme().len() > 1 => {
            Err(AudioSourceError::UnsupportedLocation(audio_url.to_string()))
        }
        _ => {
            let path = PathBuf::from(audio_url);
            match media_directory {
                Some(media_directory) if path.is_relative() => {
                    if path
                        .components()
                        .any(|component| matches!(component, Component::ParentDir))
                    {
                        return Err(AudioSourceError::OutsideMediaDirectory(
                            audio_url.to_string(),
                        ));
                    }
                    Ok(media_directory.join(path))
                }
                _ => Ok(path),
            }
        }
    }
}

/// `inline; filename="<title>.mp3"`, replacing characters a quoted header value can't hold.
fn content_disposition(title: &str) -> HeaderValue {
    let file_name: String = title
        .chars()
        .map(|c| {
            if (c.is_ascii_graphic() && c != '"' && c != '\\') || c == ' ' {
                c
            } else {
                '_'
            }
        })
        .collect();

    HeaderValue::from_str(&format!("inline; filename=\"{}.mp3\"", file_name))
        .unwrap_or_else(|_| HeaderValue::from_static("inline"))
}

pub async fn stream_song(
    State(app_state): State<Arc<AppState>>,
    WithRejection(Path(song_id), _): WithRejection<Path<i64>, ApiError>,
    range: Option<TypedHeader<Range>>,
) -> Result<Response, ApiError> {
    let song = app_state
        .songs
        .get_song_by_id(song_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Song not found with id: {}", song_id)))?;

    let path = resolve_audio_path(&song.audio_url, app_state.media_directory.as_deref())
        .map_err(|e| {
            log::warn!("Cannot stream song {}: {}", song_id, e);
            ApiError::NotFound(e.to_string())
        })?;

    let unreadable = |e: std::io::Error| match e.kind() {
        ErrorKind::NotFound | ErrorKind::PermissionDenied => {
            log::warn!("Audio file for song {} unreadable: {}", song_id, e);
            ApiError::NotFound(format!("Audio file not found for song: {}", song_id))
        }
        _ => ApiError::Internal(
            color_eyre::Report::new(e)
                .wrap_err(format!("Failed to open audio file: {}", path.display())),
        ),
    };

    let metadata = tokio::fs::metadata(&path).await.map_err(&unreadable)?;
    if !metadata.is_file() {
        return Err(ApiError::NotFound(format!(
            "Audio file not found for song: {}",
            song_id
        )));
    }

    let file = File::open(&path).await.map_err(&unreadable)?;
    let body = KnownSize::file(file)
        .await
        .wrap_err("Failed to get file size")?;

    let range = range.map(|TypedHeader(range)| range);
    let mut response = Ranged::new(range, body).into_response();
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("audio/mpeg"));
    headers.insert(header::CONTENT_DISPOSITION, content_disposition(&song.title));

    Ok(response)
}
