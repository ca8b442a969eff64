use argon2::{
    password_hash::{Encoding, SaltString},
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};
use chrono::Utc;
use log::info;
use rand::rngs::OsRng;
use thiserror::Error;
use tokio::task::spawn_blocking;

use crate::{DatabaseError, NewUser, SharedDatabase, TokenError, Tokens, UserData};

pub struct Auth {
    db: SharedDatabase,
    tokens: Tokens,
}

#[derive(Debug, Error)]
pub enum AuthError {
    /// Username or password is incorrect
    #[error("Invalid credentials")]
    InvalidCredentials,
    /// The username is empty once surrounding whitespace is removed
    #[error("Invalid username")]
    InvalidUsername,
    #[error(transparent)]
    Token(#[from] TokenError),
    /// Something else went wrong with the database
    #[error(transparent)]
    Db(DatabaseError),
    #[error("HashError: {0}")]
    HashError(String),
}

impl Auth {
    pub fn new(db: &SharedDatabase, tokens: Tokens) -> Self {
        Self {
            db: db.clone(),
            tokens,
        }
    }

    /// Creates a new account. The username is trimmed before it is stored.
    pub async fn signup(&self, credentials: Credentials) -> Result<UserData, AuthError> {
        let username = credentials.username.trim().to_string();

        if username.is_empty() {
            return Err(AuthError::InvalidUsername);
        }

        let password_hash = hash_password(credentials.password).await?;

        // A conflict here is forwarded as is, the store decides whether
        // concurrent signups for the same name can both succeed
        let user = self
            .db
            .create_user(NewUser {
                username,
                password_hash,
                created_at: Utc::now(),
            })
            .await
            .map_err(AuthError::Db)?;

        info!("Registered user {}", user.username);
        Ok(user)
    }

    /// Checks a username and password, returning a bearer token
    pub async fn login(&self, credentials: Credentials) -> Result<String, AuthError> {
        let user = self
            .db
            .user_by_username(&credentials.username)
            .await
            .map_err(|e| match e {
                DatabaseError::NotFound { .. } => AuthError::InvalidCredentials,
                err => AuthError::Db(err),
            })?;

        if !verify_password(credentials.password, user.password_hash).await? {
            return Err(AuthError::InvalidCredentials);
        }

        Ok(self.tokens.issue(&user.username)?)
    }

    /// Returns the username a bearer token was issued for
    pub fn verify(&self, token: &str) -> Result<String, AuthError> {
        Ok(self.tokens.verify(token)?)
    }
}

async fn hash_password(password: String) -> Result<String, AuthError> {
    spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);

        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AuthError::HashError(e.to_string()))
    })
    .await
    .map_err(|e| AuthError::HashError(e.to_string()))?
}

async fn verify_password(password: String, stored: String) -> Result<bool, AuthError> {
    spawn_blocking(move || {
        let stored = PasswordHash::parse(&stored, Encoding::default())
            .map_err(|e| AuthError::HashError(e.to_string()))?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &stored)
            .is_ok())
    })
    .await
    .map_err(|e| AuthError::HashError(e.to_string()))?
}

#[derive(Debug)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}
