use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

mod data;
pub use data::*;

mod memory;
pub use memory::*;

mod surreal;
pub use surreal::*;

#[cfg(test)]
mod contract;

pub type Result<T> = std::result::Result<T, DatabaseError>;
pub type SharedDatabase = Arc<dyn Database>;

#[derive(Debug, Error)]
pub enum DatabaseError {
    /// An unknown or internal error happened with the database
    #[error(transparent)]
    Internal(Box<dyn std::error::Error + Send + Sync>),
    /// A resource already exists
    #[error("{resource} with {field} of value {value} already exists")]
    Conflict {
        /// The resource in question
        resource: &'static str,
        /// The field that is conflicting
        field: &'static str,
        /// The conflicting value
        value: String,
    },
    /// A resource in the database doesn't exist
    #[error("{resource}:{identifier} doesn't exist")]
    NotFound {
        resource: &'static str,
        identifier: &'static str,
    },
}

/// Helper trait to reduce boilerplate
pub trait IntoDatabaseError {
    fn any(self) -> DatabaseError;
}

impl<E> IntoDatabaseError for E
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn any(self) -> DatabaseError {
        DatabaseError::Internal(Box::new(self))
    }
}

/// Helper trait to reduce boilerplate
pub trait DatabaseResult {
    /// Turns the Result into a conflict error if it's Ok()
    fn conflict_or_ok(self, resource: &'static str, field: &'static str, value: &str)
        -> Result<()>;
}

impl<T> DatabaseResult for Result<T> {
    fn conflict_or_ok(
        self,
        resource: &'static str,
        field: &'static str,
        value: &str,
    ) -> Result<()> {
        match self {
            Ok(_) => Err(DatabaseError::Conflict {
                resource,
                field,
                value: value.to_string(),
            }),
            Err(DatabaseError::NotFound { .. }) => Ok(()),
            Err(e) => Err(e),
        }
    }
}

/// Represents a type that can store radio users and songs.
///
/// Implementations must answer both random index lookups from an ordered
/// index over `random_index`, never by walking every song.
#[async_trait]
pub trait Database: Send + Sync {
    async fn user_by_username(&self, username: &str) -> Result<UserData>;
    /// Creates a user, failing with [DatabaseError::Conflict] if the username is taken
    async fn create_user(&self, new_user: NewUser) -> Result<UserData>;

    async fn create_song(&self, new_song: NewSong) -> Result<SongData>;
    /// Returns at most `limit` songs, most recently created first
    async fn list_songs_by_recency(&self, limit: usize) -> Result<Vec<SongData>>;
    /// Returns the song with the smallest `random_index` that is `>= r`
    async fn song_with_index_at_least(&self, r: f64) -> Result<Option<SongData>>;
    /// Returns the song with the smallest `random_index` that is `< r`
    async fn song_with_index_below(&self, r: f64) -> Result<Option<SongData>>;
}

#[derive(Debug)]
pub struct NewUser {
    pub username: String,
    /// Must already be hashed
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewSong {
    pub id: String,
    pub title: String,
    pub audio_url: String,
    /// Username of the uploader
    pub uploader: String,
    pub created_at: DateTime<Utc>,
    pub random_index: f64,
}
