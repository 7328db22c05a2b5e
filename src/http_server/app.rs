use std::{path::PathBuf, sync::Arc};

use axum::{
    Router,
    body::Body,
    http::{HeaderValue, Method, Request, header},
    routing::get,
};
use color_eyre::eyre::{Context, eyre};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    database::Database,
    http_server::{
        http_routes::{audio_file, songs},
        state::AppState,
    },
    services::{song::SongService, song_store::SeaOrmSongStore},
};

pub struct HttpServerConfig {
    pub port: u16,
    pub database: Arc<Database>,
    pub media_directory: Option<PathBuf>,
    pub allowed_origins: Vec<String>,
}

fn cors_layer(allowed_origins: &[String]) -> color_eyre::Result<CorsLayer> {
    let origins = allowed_origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .wrap_err_with(|| format!("Invalid allowed origin: {}", origin))
        })
        .collect::<color_eyre::Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::RANGE]))
}

pub fn router(app_state: Arc<AppState>, allowed_origins: &[String]) -> color_eyre::Result<Router> {
    let api = Router::new()
        .route("/songs", get(songs::list_songs).post(songs::create_song))
        .route(
            "/songs/{id}",
            get(songs::get_song)
                .put(songs::update_song)
                .delete(songs::delete_song),
        )
        .route("/songs/{id}/stream", get(audio_file::stream_song));

    Ok(Router::new()
        .nest("/api", api)
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                        tracing::info_span!(
                            "http_request",
                            method = %request.method(),
                            uri = %request.uri()
                        )
                    }),
                )
                .layer(cors_layer(allowed_origins)?),
        )
        .with_state(app_state))
}

pub async fn start(config: HttpServerConfig) -> color_eyre::Result<()> {
    let HttpServerConfig {
        port,
        database,
        media_directory,
        allowed_origins,
    } = config;

    let app_state = Arc::new(AppState {
        songs: SongService::new(SeaOrmSongStore::new(database)),
        media_directory,
    });
    let app = router(app_state, &allowed_origins)?;

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .wrap_err_with(|| eyre!("Failed to bind to port {}", port))?;
    log::info!("Listening on http://0.0.0.0:{}", port);
    axum::serve(listener, app)
        .await
        .wrap_err("Failed to start HTTP server")?;

    Ok(())
}
