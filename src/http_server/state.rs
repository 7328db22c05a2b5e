use std::path::PathBuf;

use crate::services::song::SongService;
use crate::services::song_store::SeaOrmSongStore;

pub struct AppState {
    pub songs: SongService<SeaOrmSongStore>,
    pub media_directory: Option<PathBuf>,
}
