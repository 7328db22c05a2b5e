use std::sync::Arc;

use color_eyre::eyre::{Context, Result};
use sea_orm::{ActiveModelTrait, EntityTrait, NotSet, PaginatorTrait, QueryOrder, Set};

use crate::database::Database;
use crate::entities::song;
use crate::ports::song_store::{SongRecord, SongStore};

/// `SongStore` backed by the `songs` table.
#[derive(Clone)]
pub struct SeaOrmSongStore {
    db: Arc<Database>,
}

impl SeaOrmSongStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }
}

fn to_active_model(record: SongRecord) -> song::ActiveModel {
    song::ActiveModel {
        id: record.id.map_or(NotSet, Set),
        title: Set(record.title),
        artist: Set(record.artist),
        album: Set(record.album),
        duration: Set(record.duration),
        audio_url: Set(record.audio_url),
        cover_image_url: Set(record.cover_image_url),
    }
}

#[async_trait::async_trait]
impl SongStore for SeaOrmSongStore {
    async fn find_all(&self) -> Result<Vec<song::Model>> {
        song::Entity::find()
            .order_by_asc(song::Column::Id)
            .all(&self.db.conn)
            .await
            .wrap_err("Failed to fetch songs")
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<song::Model>> {
        song::Entity::find_by_id(id)
            .one(&self.db.conn)
            .await
            .wrap_err_with(|| format!("Failed to fetch song {}", id))
    }

    async fn save(&self, record: SongRecord) -> Result<song::Model> {
        let existing = match record.id {
            Some(id) => self.find_by_id(id).await?,
            None => None,
        };
        let model = to_active_model(record);

        if let Some(existing) = existing {
            log::debug!("Overwriting song {}", existing.id);
            model
                .update(&self.db.conn)
                .await
                .wrap_err_with(|| format!("Failed to update song {}", existing.id))
        } else {
            let inserted = model
                .insert(&self.db.conn)
                .await
                .wrap_err("Failed to insert song")?;
            log::debug!("Inserted song {} ('{}')", inserted.id, inserted.title);
            Ok(inserted)
        }
    }

    async fn delete_by_id(&self, id: i64) -> Result<()> {
        let result = song::Entity::delete_by_id(id)
            .exec(&self.db.conn)
            .await
            .wrap_err_with(|| format!("Failed to delete song {}", id))?;

        if result.rows_affected == 0 {
            log::debug!("Delete of song {} matched no rows", id);
        }
        Ok(())
    }

    async fn count(&self) -> Result<u64> {
        song::Entity::find()
            .count(&self.db.conn)
            .await
            .wrap_err("Failed to count songs")
    }
}
