mod auth;
mod db;
mod random;
mod songs;
mod tokens;
mod util;

use std::sync::Arc;

pub use auth::*;
pub use db::*;
pub use random::*;
pub use songs::*;
pub use tokens::*;

/// The radio collab system, facilitating authentication and song management.
pub struct Collab {
    pub auth: Auth,
    pub songs: Songs,
}

impl Collab {
    pub fn new<Db>(database: Db, tokens: Tokens) -> Self
    where
        Db: Database + 'static,
    {
        Self::from_shared(Arc::new(database), tokens)
    }

    pub fn from_shared(database: SharedDatabase, tokens: Tokens) -> Self {
        Self {
            auth: Auth::new(&database, tokens),
            songs: Songs::new(&database),
        }
    }
}
