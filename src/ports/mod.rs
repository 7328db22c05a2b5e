pub mod song_store;
