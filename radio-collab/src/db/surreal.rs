use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::{
    engine::any::{self, Any},
    opt::auth::Root,
    sql::Thing,
    Surreal,
};

use crate::{
    Database, DatabaseError, DatabaseResult, IntoDatabaseError, NewSong, NewUser, Result,
    SongData, UserData,
};

/// Where and how to reach a SurrealDB instance
#[derive(Debug, Clone)]
pub struct SurrealOptions {
    /// Endpoint such as `ws://127.0.0.1:8000`
    pub url: String,
    pub username: String,
    pub password: String,
    pub namespace: String,
    pub database: String,
}

/// A SurrealDB implementation for radio.
///
/// Users live at `user:<username>`, songs at `song:<id>`.
pub struct SurrealDatabase {
    db: Surreal<Any>,
}

#[derive(Debug, Serialize, Deserialize)]
struct UserRecord {
    username: String,
    password_hash: String,
    /// Unix timestamp in milliseconds
    created_at: i64,
}

#[derive(Debug, Serialize)]
struct SongContent {
    title: String,
    audio_url: String,
    uploader: String,
    created_at: i64,
    random_index: f64,
}

#[derive(Debug, Deserialize)]
struct SongRecord {
    id: Thing,
    title: String,
    audio_url: String,
    uploader: String,
    created_at: i64,
    random_index: f64,
}

impl SurrealDatabase {
    const SCHEMA: &'static str = "
        DEFINE INDEX song_random_index ON TABLE song COLUMNS random_index;
        DEFINE INDEX song_created_at ON TABLE song COLUMNS created_at;
    ";

    /// Connects and signs in to a SurrealDB server
    pub async fn new(options: &SurrealOptions) -> Result<Self> {
        let db = any::connect(options.url.as_str())
            .await
            .map_err(|e| e.any())?;

        db.signin(Root {
            username: &options.username,
            password: &options.password,
        })
        .await
        .map_err(|e| e.any())?;

        Self::from_client(db, &options.namespace, &options.database).await
    }

    /// Selects the namespace and database on an already connected client and defines the indexes
    pub async fn from_client(db: Surreal<Any>, namespace: &str, database: &str) -> Result<Self> {
        db.use_ns(namespace)
            .use_db(database)
            .await
            .map_err(|e| e.any())?;

        db.query(Self::SCHEMA)
            .await
            .and_then(|r| r.check())
            .map_err(|e| e.any())?;

        Ok(Self { db })
    }

    async fn first_song(&self, query: &'static str, r: f64) -> Result<Option<SongData>> {
        let record: Option<SongRecord> = self
            .db
            .query(query)
            .bind(("r", r))
            .await
            .map_err(|e| e.any())?
            .take(0)
            .map_err(|e| e.any())?;

        Ok(record.map(Into::into))
    }
}

/// SurrealDB reports a duplicate record id through its error message only
fn is_duplicate_record(error: &surrealdb::Error) -> bool {
    error.to_string().contains("already exists")
}

fn from_millis(millis: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(millis).unwrap_or_default()
}

impl From<UserRecord> for UserData {
    fn from(record: UserRecord) -> Self {
        Self {
            username: record.username,
            password_hash: record.password_hash,
            created_at: from_millis(record.created_at),
        }
    }
}

impl From<SongRecord> for SongData {
    fn from(record: SongRecord) -> Self {
        Self {
            id: record.id.id.to_raw(),
            title: record.title,
            audio_url: record.audio_url,
            uploader: record.uploader,
            created_at: from_millis(record.created_at),
            random_index: record.random_index,
        }
    }
}

#[async_trait]
impl Database for SurrealDatabase {
    async fn user_by_username(&self, username: &str) -> Result<UserData> {
        let record: Option<UserRecord> = self
            .db
            .select(("user", username))
            .await
            .map_err(|e| e.any())?;

        record.map(Into::into).ok_or(DatabaseError::NotFound {
            resource: "user",
            identifier: "username",
        })
    }

    async fn create_user(&self, new_user: NewUser) -> Result<UserData> {
        self.user_by_username(&new_user.username)
            .await
            .conflict_or_ok("user", "username", &new_user.username)?;

        let conflict = || DatabaseError::Conflict {
            resource: "user",
            field: "username",
            value: new_user.username.clone(),
        };

        // CREATE on an existing record id fails, so a signup racing this one
        // between the check above and here still ends up as a conflict
        let record: Option<UserRecord> = self
            .db
            .create(("user", new_user.username.as_str()))
            .content(UserRecord {
                username: new_user.username.clone(),
                password_hash: new_user.password_hash.clone(),
                created_at: new_user.created_at.timestamp_millis(),
            })
            .await
            .map_err(|e| {
                if is_duplicate_record(&e) {
                    conflict()
                } else {
                    e.any()
                }
            })?;

        record
            .map(Into::into)
            .ok_or_else(|| DatabaseError::Internal("user record was not returned".into()))
    }

    async fn create_song(&self, new_song: NewSong) -> Result<SongData> {
        let record: Option<SongRecord> = self
            .db
            .create(("song", new_song.id.as_str()))
            .content(SongContent {
                title: new_song.title,
                audio_url: new_song.audio_url,
                uploader: new_song.uploader,
                created_at: new_song.created_at.timestamp_millis(),
                random_index: new_song.random_index,
            })
            .await
            .map_err(|e| {
                if is_duplicate_record(&e) {
                    DatabaseError::Conflict {
                        resource: "song",
                        field: "id",
                        value: new_song.id.clone(),
                    }
                } else {
                    e.any()
                }
            })?;

        record
            .map(Into::into)
            .ok_or_else(|| DatabaseError::Internal("song record was not returned".into()))
    }

    async fn list_songs_by_recency(&self, limit: usize) -> Result<Vec<SongData>> {
        let records: Vec<SongRecord> = self
            .db
            .query("SELECT * FROM song ORDER BY created_at DESC LIMIT $limit")
            .bind(("limit", limit as i64))
            .await
            .map_err(|e| e.any())?
            .take(0)
            .map_err(|e| e.any())?;

        Ok(records.into_iter().map(Into::into).collect())
    }

    async fn song_with_index_at_least(&self, r: f64) -> Result<Option<SongData>> {
        self.first_song(
            "SELECT * FROM song WHERE random_index >= $r ORDER BY random_index ASC LIMIT 1",
            r,
        )
        .await
    }

    async fn song_with_index_below(&self, r: f64) -> Result<Option<SongData>> {
        self.first_song(
            "SELECT * FROM song WHERE random_index < $r ORDER BY random_index ASC LIMIT 1",
            r,
        )
        .await
    }
}
