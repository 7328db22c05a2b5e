use color_eyre::eyre::{Context, Result};

use crate::ports::song_store::{SongRecord, SongStore};

struct SampleSong {
    title: &'static str,
    artist: &'static str,
    album: &'static str,
    duration: i32,
    audio_url: &'static str,
    cover_image_url: &'static str,
}

impl SampleSong {
    fn to_record(&self) -> SongRecord {
        SongRecord {
            id: None,
            title: self.title.to_string(),
            artist: self.artist.to_string(),
            album: Some(self.album.to_string()),
            duration: Some(self.duration),
            audio_url: self.audio_url.to_string(),
            cover_image_url: Some(self.cover_image_url.to_string()),
        }
    }
}

// Publicly available test audio
const SAMPLE_SONGS: [SampleSong; 5] = [
    SampleSong {
        title: "Bohemian Rhapsody",
        artist: "Queen",
        album: "A Night at the Opera",
        duration: 354,
        audio_url: "https://www.soundhelix.com/examples/mp3/SoundHelix-Song-1.mp3",
        cover_image_url: "https://picsum.photos/seed/queen/300/300",
    },
    SampleSong {
        title: "Stairway to Heaven",
        artist: "Led Zeppelin",
        album: "Led Zeppelin IV",
        duration: 482,
        audio_url: "https://www.soundhelix.com/examples/mp3/SoundHelix-Song-2.mp3",
        cover_image_url: "https://picsum.photos/seed/zeppelin/300/300",
    },
    SampleSong {
        title: "Hotel California",
        artist: "Eagles",
        album: "Hotel California",
        duration: 391,
        audio_url: "https://www.soundhelix.com/examples/mp3/SoundHelix-Song-3.mp3",
        cover_image_url: "https://picsum.photos/seed/eagles/300/300",
    },
    SampleSong {
        title: "Imagine",
        artist: "John Lennon",
        album: "Imagine",
        duration: 183,
        audio_url: "https://www.soundhelix.com/examples/mp3/SoundHelix-Song-4.mp3",
        cover_image_url: "https://picsum.photos/seed/lennon/300/300",
    },
    SampleSong {
        title: "Sweet Child O' Mine",
        artist: "Guns N' Roses",
        album: "Appetite for Destruction",
        duration: 356,
        audio_url: "https://www.soundhelix.com/examples/mp3/SoundHelix-Song-5.mp3",
        cover_image_url: "https://picsum.photos/seed/gnr/300/300",
    },
];

/// Inserts the sample songs when the store is empty.
///
/// Any existing row, related or not, skips seeding entirely.
/// Returns the number of rows inserted.
pub async fn seed_sample_songs<S: SongStore + ?Sized>(store: &S) -> Result<usize> {
    let existing = store.count().await?;
    if existing > 0 {
        log::debug!("Skipping sample songs, store already holds {} rows", existing);
        return Ok(0);
    }

    for sample in &SAMPLE_SONGS {
        store
            .save(sample.to_record())
            .await
            .wrap_err_with(|| format!("Failed to seed sample song '{}'", sample.title))?;
    }

    log::info!("Sample songs initialized ({} rows)", SAMPLE_SONGS.len());
    Ok(SAMPLE_SONGS.len())
}
