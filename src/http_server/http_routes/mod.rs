pub mod audio_file;
pub mod songs;
