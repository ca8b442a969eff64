use chrono::Utc;
use log::info;
use thiserror::Error;

use crate::{
    util::random_string, DatabaseError, NewSong, RandomSelector, SharedDatabase, SongData,
};

#[derive(Debug, Error)]
pub enum SongError {
    /// A random song was requested but none have been uploaded
    #[error("No songs available")]
    NoSongsAvailable,
    #[error(transparent)]
    Db(#[from] DatabaseError),
}

/// Song metadata as submitted by an uploader
#[derive(Debug)]
pub struct NewUpload {
    pub title: String,
    pub audio_url: String,
}

/// Upload, listing and random selection of songs
pub struct Songs {
    db: SharedDatabase,
    selector: RandomSelector,
}

impl Songs {
    /// How many songs are listed when no limit is given
    pub const DEFAULT_LIMIT: usize = 20;
    /// The most songs that can be listed at once
    pub const MAX_LIMIT: usize = 50;

    const ID_LENGTH: usize = 20;

    pub fn new(db: &SharedDatabase) -> Self {
        Self {
            db: db.clone(),
            selector: RandomSelector::new(db),
        }
    }

    /// Stores a new song on behalf of `uploader`
    pub async fn upload(&self, uploader: &str, upload: NewUpload) -> Result<SongData, SongError> {
        let song = self
            .db
            .create_song(NewSong {
                id: random_string(Self::ID_LENGTH),
                title: upload.title,
                audio_url: upload.audio_url,
                uploader: uploader.to_string(),
                created_at: Utc::now(),
                random_index: RandomSelector::draw(),
            })
            .await?;

        info!("{} uploaded {} ({})", song.uploader, song.title, song.id);
        Ok(song)
    }

    /// Lists the most recently uploaded songs
    pub async fn recent(&self, limit: usize) -> Result<Vec<SongData>, SongError> {
        Ok(self.db.list_songs_by_recency(limit).await?)
    }

    /// Picks a song at random
    pub async fn random(&self) -> Result<SongData, SongError> {
        self.selector
            .pick()
            .await?
            .ok_or(SongError::NoSongsAvailable)
    }

    /// Turns a raw `limit` parameter into a usable limit.
    ///
    /// Anything missing, unparsable or below 1 falls back to [Self::DEFAULT_LIMIT],
    /// anything above [Self::MAX_LIMIT] is clamped to it.
    pub fn clamp_limit(raw: Option<&str>) -> usize {
        match raw.and_then(|x| x.trim().parse::<i64>().ok()) {
            Some(limit) if limit >= 1 => (limit as u64).min(Self::MAX_LIMIT as u64) as usize,
            _ => Self::DEFAULT_LIMIT,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::MemoryDatabase;

    fn songs() -> Songs {
        let db: SharedDatabase = Arc::new(MemoryDatabase::new());
        Songs::new(&db)
    }

    fn upload(title: &str) -> NewUpload {
        NewUpload {
            title: title.to_string(),
            audio_url: format!("https://example.com/{title}.mp3"),
        }
    }

    #[test]
    fn limit_falls_back_to_default() {
        for raw in [None, Some("0"), Some("-5"), Some("abc"), Some(""), Some("1.5")] {
            assert_eq!(Songs::clamp_limit(raw), Songs::DEFAULT_LIMIT, "{raw:?}");
        }
    }

    #[test]
    fn limit_is_clamped_to_max() {
        assert_eq!(Songs::clamp_limit(Some("51")), Songs::MAX_LIMIT);
        assert_eq!(Songs::clamp_limit(Some("99999999999")), Songs::MAX_LIMIT);
    }

    #[test]
    fn limit_within_range_is_kept() {
        assert_eq!(Songs::clamp_limit(Some("1")), 1);
        assert_eq!(Songs::clamp_limit(Some("50")), 50);
        assert_eq!(Songs::clamp_limit(Some(" 7 ")), 7);
    }

    #[tokio::test]
    async fn upload_records_uploader_and_draws_an_index() {
        let songs = songs();
        let song = songs.upload("alice", upload("intro")).await.unwrap();

        assert_eq!(song.uploader, "alice");
        assert_eq!(song.title, "intro");
        assert_eq!(song.id.len(), 20);
        assert!((0.0..1.0).contains(&song.random_index));
    }

    #[tokio::test]
    async fn recent_lists_newest_first() {
        let songs = songs();
        for title in ["one", "two", "three"] {
            songs.upload("alice", upload(title)).await.unwrap();
        }

        let titles: Vec<_> = songs
            .recent(Songs::DEFAULT_LIMIT)
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.title)
            .collect();

        assert_eq!(titles, vec!["three", "two", "one"]);
    }

    #[tokio::test]
    async fn random_without_songs_is_unavailable() {
        let result = songs().random().await;
        assert!(matches!(result, Err(SongError::NoSongsAvailable)));
    }

    #[tokio::test]
    async fn random_with_one_song_always_returns_it() {
        let songs = songs();
        let uploaded = songs.upload("alice", upload("only")).await.unwrap();

        for _ in 0..50 {
            assert_eq!(songs.random().await.unwrap(), uploaded);
        }
    }
}
