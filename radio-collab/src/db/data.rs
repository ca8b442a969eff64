use chrono::{DateTime, Utc};

/// A radio account
#[derive(Debug, Clone)]
pub struct UserData {
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Metadata for an uploaded song. The audio itself lives at `audio_url`.
#[derive(Debug, Clone, PartialEq)]
pub struct SongData {
    pub id: String,
    pub title: String,
    pub audio_url: String,
    /// Username of the account that uploaded the song
    pub uploader: String,
    pub created_at: DateTime<Utc>,
    /// Drawn uniformly from [0, 1) when the song is created, used for random selection
    pub random_index: f64,
}
