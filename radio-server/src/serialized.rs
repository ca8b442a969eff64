//! All schemas that are exposed from endpoints are defined here
//! along with the ToSerialized impls

use chrono::{DateTime, Utc};
use radio_collab::SongData;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    id: String,
    title: String,
    audio_url: String,
    /// Username of the uploader
    uploader: String,
    created_at: DateTime<Utc>,
    /// The song's position on the random selection circle, in [0, 1)
    random_index: f64,
}

/// Returned by endpoints that only confirm success
#[derive(Debug, Serialize, ToSchema)]
pub struct Confirmation {
    ok: bool,
}

impl Confirmation {
    pub fn ok() -> Self {
        Self { ok: true }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Created {
    ok: bool,
    /// Id of the new song
    id: String,
}

impl Created {
    pub fn new(id: String) -> Self {
        Self { ok: true, id }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResult {
    token: String,
}

impl LoginResult {
    pub fn new(token: String) -> Self {
        Self { token }
    }
}

/// Helper trait to convert any type into a serialized version
pub trait ToSerialized<T>
where
    T: Serialize,
{
    fn to_serialized(&self) -> T;
}

impl<I, O> ToSerialized<Vec<O>> for Vec<I>
where
    I: ToSerialized<O>,
    O: Serialize,
{
    fn to_serialized(&self) -> Vec<O> {
        self.iter().map(|x| x.to_serialized()).collect()
    }
}

impl ToSerialized<Song> for SongData {
    fn to_serialized(&self) -> Song {
        Song {
            id: self.id.clone(),
            title: self.title.clone(),
            audio_url: self.audio_url.clone(),
            uploader: self.uploader.clone(),
            created_at: self.created_at,
            random_index: self.random_index,
        }
    }
}
