use sea_orm::DbErr;
use serde::Deserialize;

use crate::entities::song;
use crate::ports::song_store::{SongRecord, SongStore};

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Song not found with id: {0}")]
    NotFound(i64),
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
    #[error("Song store failure: {0:#}")]
    Store(color_eyre::Report),
}

impl From<color_eyre::Report> for CatalogError {
    fn from(err: color_eyre::Report) -> Self {
        CatalogError::Store(err)
    }
}

/// Incoming song attributes, as sent by clients on create and update.
///
/// Every field may be omitted. An omitted field is stored as null, so the
/// required ones (`title`, `artist`, `audioUrl`) are checked before saving.
/// Any `id` in the payload is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongDetails {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub duration: Option<i32>,
    pub audio_url: Option<String>,
    pub cover_image_url: Option<String>,
}

impl SongDetails {
    fn into_record(self, id: Option<i64>) -> Result<SongRecord, CatalogError> {
        Ok(SongRecord {
            id,
            title: self.title.ok_or(CatalogError::MissingField("title"))?,
            artist: self.artist.ok_or(CatalogError::MissingField("artist"))?,
            album: self.album,
            duration: self.duration,
            audio_url: self.audio_url.ok_or(CatalogError::MissingField("audioUrl"))?,
            cover_image_url: self.cover_image_url,
        })
    }
}

pub struct SongService<S: SongStore> {
    store: S,
}

impl<S: SongStore> SongService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn get_all_songs(&self) -> Result<Vec<song::Model>, CatalogError> {
        Ok(self.store.find_all().await?)
    }

    pub async fn get_song_by_id(&self, id: i64) -> Result<Option<song::Model>, CatalogError> {
        Ok(self.store.find_by_id(id).await?)
    }

    pub async fn create_song(&self, details: SongDetails) -> Result<song::Model, CatalogError> {
        let record = details.into_record(None)?;
        let created = self.store.save(record).await?;
        log::info!("Created song {} ('{}')", created.id, created.title);
        Ok(created)
    }

    /// Replaces every mutable field of song `id` with `details`, nulls included.
    ///
    /// A missing `id` is `NotFound`, also when the row is deleted between the
    /// lookup and the write. A null `title`, `artist` or `audioUrl` is
    /// `MissingField` (422 over HTTP) rather than folded into `NotFound`.
    pub async fn update_song(
        &self,
        id: i64,
        details: SongDetails,
    ) -> Result<song::Model, CatalogError> {
        let existing = self
            .store
            .find_by_id(id)
            .await?
            .ok_or(CatalogError::NotFound(id))?;

        let record = details.into_record(Some(existing.id))?;
        let updated = self.store.save(record).await.map_err(|err| {
            if matches!(err.downcast_ref::<DbErr>(), Some(DbErr::RecordNotUpdated)) {
                CatalogError::NotFound(id)
            } else {
                CatalogError::Store(err)
            }
        })?;
        log::info!("Updated song {}", updated.id);
        Ok(updated)
    }

    pub async fn delete_song(&self, id: i64) -> Result<(), CatalogError> {
        self.store.delete_by_id(id).await?;
        log::info!("Deleted song {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::song_store::MockSongStore;
    use crate::services::song_store::SeaOrmSongStore;
    use crate::test_utils::test_db;

    fn model(id: i64) -> song::Model {
        song::Model {
            id,
            title: "Imagine".to_string(),
            artist: "John Lennon".to_string(),
            album: Some("Imagine".to_string()),
            duration: Some(183),
            audio_url: "/music/imagine.mp3".to_string(),
            cover_image_url: Some("https://example.com/cover.jpg".to_string()),
        }
    }

    fn full_details() -> SongDetails {
        SongDetails {
            title: Some("Jealous Guy".to_string()),
            artist: Some("John Lennon".to_string()),
            album: Some("Imagine".to_string()),
            duration: Some(254),
            audio_url: Some("/music/jealous_guy.mp3".to_string()),
            cover_image_url: Some("https://example.com/jealous.jpg".to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_song_saves_without_id() {
        let mut store = MockSongStore::new();
        store
            .expect_save()
            .withf(|record| record.id.is_none() && record.title == "Jealous Guy")
            .times(1)
            .returning(|record| {
                Ok(song::Model {
                    id: 7,
                    title: record.title,
                    artist: record.artist,
                    album: record.album,
                    duration: record.duration,
                    audio_url: record.audio_url,
                    cover_image_url: record.cover_image_url,
                })
            });
        let service = SongService::new(store);

        let created = service.create_song(full_details()).await.unwrap();

        assert_eq!(created.id, 7);
        assert_eq!(created.duration, Some(254));
    }

    #[tokio::test]
    async fn test_create_song_missing_title() {
        let mut store = MockSongStore::new();
        store.expect_save().never();
        let service = SongService::new(store);

        let result = service
            .create_song(SongDetails {
                title: None,
                ..full_details()
            })
            .await;

        assert!(matches!(result, Err(CatalogError::MissingField("title"))));
    }

    #[tokio::test]
    async fn test_create_song_accepts_empty_strings() {
        let service = SongService::new(SeaOrmSongStore::new(test_db().await));

        let created = service
            .create_song(SongDetails {
                title: Some(String::new()),
                artist: Some(String::new()),
                audio_url: Some(String::new()),
                ..SongDetails::default()
            })
            .await
            .unwrap();

        assert_eq!(created.title, "");
        assert!(created.album.is_none());
    }

    #[tokio::test]
    async fn test_update_song_not_found() {
        let mut store = MockSongStore::new();
        store
            .expect_find_by_id()
            .withf(|id| *id == 999_999)
            .returning(|_| Ok(None));
        store.expect_save().never();
        let service = SongService::new(store);

        let result = service.update_song(999_999, full_details()).await;

        assert!(matches!(result, Err(CatalogError::NotFound(999_999))));
    }

    #[tokio::test]
    async fn test_update_song_overwrites_wholesale() {
        let mut store = MockSongStore::new();
        store
            .expect_find_by_id()
            .returning(|id| Ok(Some(model(id))));
        store
            .expect_save()
            .withf(|record| {
                *record
                    == SongRecord {
                        id: Some(3),
                        title: "Jealous Guy".to_string(),
                        artist: "John Lennon".to_string(),
                        album: None,
                        duration: None,
                        audio_url: "/music/jealous_guy.mp3".to_string(),
                        cover_image_url: None,
                    }
            })
            .times(1)
            .returning(|record| {
                Ok(song::Model {
                    id: 3,
                    title: record.title,
                    artist: record.artist,
                    album: record.album,
                    duration: record.duration,
                    audio_url: record.audio_url,
                    cover_image_url: record.cover_image_url,
                })
            });
        let service = SongService::new(store);

        let updated = service
            .update_song(
                3,
                SongDetails {
                    album: None,
                    duration: None,
                    cover_image_url: None,
                    ..full_details()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.id, 3);
        assert!(updated.album.is_none());
        assert!(updated.cover_image_url.is_none());
    }

    #[tokio::test]
    async fn test_update_song_deleted_concurrently() {
        let mut store = MockSongStore::new();
        store
            .expect_find_by_id()
            .returning(|id| Ok(Some(model(id))));
        store.expect_save().times(1).returning(|_| {
            Err(color_eyre::Report::new(DbErr::RecordNotUpdated)
                .wrap_err("Failed to update song 3"))
        });
        let service = SongService::new(store);

        let result = service.update_song(3, full_details()).await;

        assert!(matches!(result, Err(CatalogError::NotFound(3))));
    }

    #[tokio::test]
    async fn test_update_song_other_store_failure() {
        let mut store = MockSongStore::new();
        store
            .expect_find_by_id()
            .returning(|id| Ok(Some(model(id))));
        store
            .expect_save()
            .returning(|_| Err(color_eyre::eyre::eyre!("database is locked")));
        let service = SongService::new(store);

        let result = service.update_song(3, full_details()).await;

        assert!(matches!(result, Err(CatalogError::Store(_))));
    }

    #[tokio::test]
    async fn test_update_song_missing_audio_url_keeps_row() {
        let service = SongService::new(SeaOrmSongStore::new(test_db().await));
        let created = service.create_song(full_details()).await.unwrap();

        let result = service
            .update_song(
                created.id,
                SongDetails {
                    audio_url: None,
                    ..full_details()
                },
            )
            .await;

        assert!(matches!(result, Err(CatalogError::MissingField("audioUrl"))));
        let stored = service.get_song_by_id(created.id).await.unwrap();
        assert_eq!(stored, Some(created));
    }

    #[tokio::test]
    async fn test_delete_song_missing_id() {
        let mut store = MockSongStore::new();
        store
            .expect_delete_by_id()
            .withf(|id| *id == 12)
            .times(1)
            .returning(|_| Ok(()));
        let service = SongService::new(store);

        service.delete_song(12).await.unwrap();
    }

    #[tokio::test]
    async fn test_store_failure_is_propagated() {
        let mut store = MockSongStore::new();
        store
            .expect_find_all()
            .returning(|| Err(color_eyre::eyre::eyre!("disk on fire")));
        let service = SongService::new(store);

        let err = service.get_all_songs().await.unwrap_err();

        assert!(matches!(err, CatalogError::Store(_)));
        assert!(err.to_string().contains("disk on fire"));
    }

    #[tokio::test]
    async fn test_fetch_after_create_round_trip() {
        let service = SongService::new(SeaOrmSongStore::new(test_db().await));

        let created = service.create_song(full_details()).await.unwrap();
        let fetched = service.get_song_by_id(created.id).await.unwrap();

        assert_eq!(fetched, Some(created));
        assert_eq!(service.get_all_songs().await.unwrap().len(), 1);
    }
}
