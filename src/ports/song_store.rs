use color_eyre::eyre::Result;

use crate::entities::song;

/// A song as handed to the store for persistence.
///
/// `id` is `None` for a row that has not been stored yet; the store assigns
/// one on insert. A `Some` id overwrites the row with that id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongRecord {
    pub id: Option<i64>,
    pub title: String,
    pub artist: String,
    pub album: Option<String>,
    pub duration: Option<i32>,
    pub audio_url: String,
    pub cover_image_url: Option<String>,
}

/// Port trait over the persisted song rows.
///
/// Implementations live in `services::song_store` (production) or test mocks.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait SongStore: Send + Sync {
    /// All rows. Callers must not rely on any ordering.
    async fn find_all(&self) -> Result<Vec<song::Model>>;

    async fn find_by_id(&self, id: i64) -> Result<Option<song::Model>>;

    /// Inserts when `song.id` is unset, otherwise upserts the row with that id.
    async fn save(&self, song: SongRecord) -> Result<song::Model>;

    /// Removing an id that does not exist is not an error.
    async fn delete_by_id(&self, id: i64) -> Result<()>;

    async fn count(&self) -> Result<u64>;
}
