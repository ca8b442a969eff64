//! Behaviour every [Database] implementation must share, run against each backend.

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::{Database, DatabaseError, NewSong, NewUser, SongData};

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

fn new_user(password_hash: &str) -> NewUser {
    NewUser {
        username: "alice".to_string(),
        password_hash: password_hash.to_string(),
        created_at: base_time() + Duration::milliseconds(123),
    }
}

/// Songs are created one second apart in the order they are given
pub fn song(id: &str, random_index: f64, offset_in_secs: i64) -> NewSong {
    NewSong {
        id: id.to_string(),
        title: format!("Song {id}"),
        audio_url: format!("https://example.com/{id}.mp3"),
        uploader: "alice".to_string(),
        created_at: base_time() + Duration::seconds(offset_in_secs),
        random_index,
    }
}

fn id_of(found: Option<SongData>) -> Option<String> {
    found.map(|s| s.id)
}

pub async fn created_user_can_be_read_back(db: &dyn Database) {
    let created = db.create_user(new_user("hash")).await.unwrap();
    let read = db.user_by_username("alice").await.unwrap();

    assert_eq!(read.username, "alice");
    assert_eq!(read.password_hash, "hash");
    assert_eq!(read.created_at, created.created_at);
    assert_eq!(read.created_at, base_time() + Duration::milliseconds(123));
}

pub async fn duplicate_username_is_a_conflict(db: &dyn Database) {
    db.create_user(new_user("first")).await.unwrap();
    let result = db.create_user(new_user("second")).await;

    assert!(matches!(
        result,
        Err(DatabaseError::Conflict { field: "username", .. })
    ));
    // The first account is untouched
    let user = db.user_by_username("alice").await.unwrap();
    assert_eq!(user.password_hash, "first");
}

pub async fn missing_user_is_not_found(db: &dyn Database) {
    let result = db.user_by_username("nobody").await;

    assert!(matches!(result, Err(DatabaseError::NotFound { .. })));
}

pub async fn created_song_keeps_its_fields(db: &dyn Database) {
    let new_song = song("abc", 0.25, 7);
    let created = db.create_song(new_song.clone()).await.unwrap();

    assert_eq!(created.id, "abc");
    assert_eq!(created.title, new_song.title);
    assert_eq!(created.audio_url, new_song.audio_url);
    assert_eq!(created.uploader, "alice");
    assert_eq!(created.created_at, new_song.created_at);
    assert_eq!(created.random_index, 0.25);

    let listed = db.list_songs_by_recency(10).await.unwrap();
    assert_eq!(listed, vec![created]);
}

pub async fn lists_most_recent_first(db: &dyn Database) {
    for (i, id) in ["a", "b", "c"].iter().enumerate() {
        db.create_song(song(id, i as f64 / 10.0, i as i64)).await.unwrap();
    }

    let ids: Vec<_> = db
        .list_songs_by_recency(2)
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.id)
        .collect();

    assert_eq!(ids, vec!["c", "b"]);
}

pub async fn index_lookups_respect_bounds(db: &dyn Database) {
    db.create_song(song("low", 0.1, 0)).await.unwrap();
    db.create_song(song("mid", 0.5, 1)).await.unwrap();
    db.create_song(song("high", 0.9, 2)).await.unwrap();

    assert_eq!(id_of(db.song_with_index_at_least(0.5).await.unwrap()).as_deref(), Some("mid"));
    assert_eq!(id_of(db.song_with_index_at_least(0.51).await.unwrap()).as_deref(), Some("high"));
    assert_eq!(id_of(db.song_with_index_at_least(0.0).await.unwrap()).as_deref(), Some("low"));
    assert!(db.song_with_index_at_least(0.95).await.unwrap().is_none());

    assert_eq!(id_of(db.song_with_index_below(0.95).await.unwrap()).as_deref(), Some("low"));
    assert!(db.song_with_index_below(0.1).await.unwrap().is_none());
    assert!(db.song_with_index_below(0.0).await.unwrap().is_none());
}
