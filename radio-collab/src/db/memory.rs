use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::ops::Bound;

use crate::{Database, DatabaseError, NewSong, NewUser, Result, SongData, UserData};

/// Orders non-negative floats by their bit pattern, which sorts the same way as the floats do.
/// Song id breaks ties so equal indices can coexist.
type IndexKey = (u64, String);

/// An in-process database, for development and tests.
/// Nothing is persisted once the process exits.
#[derive(Debug, Default)]
pub struct MemoryDatabase {
    users: RwLock<HashMap<String, UserData>>,
    songs: RwLock<SongTable>,
}

#[derive(Debug, Default)]
struct SongTable {
    /// In insertion order, which is also creation order
    rows: Vec<SongData>,
    ids: HashSet<String>,
    by_random_index: BTreeMap<IndexKey, usize>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    fn index_key(r: f64) -> u64 {
        // -0.0 has the sign bit set and would sort after every positive value
        if r == 0.0 {
            0
        } else {
            r.to_bits()
        }
    }
}

#[async_trait]
impl Database for MemoryDatabase {
    async fn user_by_username(&self, username: &str) -> Result<UserData> {
        self.users
            .read()
            .get(username)
            .cloned()
            .ok_or(DatabaseError::NotFound {
                resource: "user",
                identifier: "username",
            })
    }

    async fn create_user(&self, new_user: NewUser) -> Result<UserData> {
        let mut users = self.users.write();

        if users.contains_key(&new_user.username) {
            return Err(DatabaseError::Conflict {
                resource: "user",
                field: "username",
                value: new_user.username,
            });
        }

        let user = UserData {
            username: new_user.username,
            password_hash: new_user.password_hash,
            created_at: new_user.created_at,
        };

        users.insert(user.username.clone(), user.clone());
        Ok(user)
    }

    async fn create_song(&self, new_song: NewSong) -> Result<SongData> {
        let mut songs = self.songs.write();

        if songs.ids.contains(&new_song.id) {
            return Err(DatabaseError::Conflict {
                resource: "song",
                field: "id",
                value: new_song.id,
            });
        }

        let song = SongData {
            id: new_song.id,
            title: new_song.title,
            audio_url: new_song.audio_url,
            uploader: new_song.uploader,
            created_at: new_song.created_at,
            random_index: new_song.random_index,
        };

        let key = (Self::index_key(song.random_index), song.id.clone());
        let position = songs.rows.len();

        songs.ids.insert(song.id.clone());
        songs.rows.push(song.clone());
        songs.by_random_index.insert(key, position);

        Ok(song)
    }

    async fn list_songs_by_recency(&self, limit: usize) -> Result<Vec<SongData>> {
        let songs = self.songs.read();
        Ok(songs.rows.iter().rev().take(limit).cloned().collect())
    }

    async fn song_with_index_at_least(&self, r: f64) -> Result<Option<SongData>> {
        let songs = self.songs.read();
        let lower = (Self::index_key(r), String::new());

        Ok(songs
            .by_random_index
            .range(lower..)
            .next()
            .map(|(_, &position)| songs.rows[position].clone()))
    }

    async fn song_with_index_below(&self, r: f64) -> Result<Option<SongData>> {
        let songs = self.songs.read();
        let upper = (Self::index_key(r), String::new());

        Ok(songs
            .by_random_index
            .range((Bound::Unbounded, Bound::Excluded(upper)))
            .next()
            .map(|(_, &position)| songs.rows[position].clone()))
    }
}
