//! Random song selection without reading the whole song set.
//!
//! Every song gets a `random_index` drawn uniformly from [0, 1) when it is
//! created. To pick a song, a fresh value `r` is drawn from the same range and
//! the song whose index comes first at or after `r` is returned. If `r` is
//! past every index, the search wraps around to the smallest index. Picture
//! the indices as points on a circle: the chosen song is the first one met
//! walking clockwise from `r`.
//!
//! A song's chance of being picked equals the gap between its index and the
//! previous one. Those gaps even out as the number of songs grows because the
//! indices are themselves uniform, so selection tends towards uniform.
//!
//! At most two index lookups are made per pick.

use rand::Rng;

use crate::{DatabaseError, SharedDatabase, SongData};

#[derive(Clone)]
pub struct RandomSelector {
    db: SharedDatabase,
}

impl RandomSelector {
    pub fn new(db: &SharedDatabase) -> Self {
        Self { db: db.clone() }
    }

    /// Draws a value for a new song's `random_index`
    pub fn draw() -> f64 {
        rand::thread_rng().gen_range(0.0..1.0)
    }

    /// Picks a song using a fresh draw. Returns [None] if there are no songs.
    pub async fn pick(&self) -> Result<Option<SongData>, DatabaseError> {
        self.pick_at(Self::draw()).await
    }

    /// Picks the first song at or after `r` on the index circle
    pub async fn pick_at(&self, r: f64) -> Result<Option<SongData>, DatabaseError> {
        if let Some(song) = self.db.song_with_index_at_least(r).await? {
            return Ok(Some(song));
        }

        // Wrap around past 1.0 to the smallest index
        self.db.song_with_index_below(r).await
    }
}
