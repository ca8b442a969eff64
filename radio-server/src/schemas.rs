use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use serde::{de::DeserializeOwned, Deserialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationErrors};

use crate::errors::ServerError;

/// Body of both signup and login
#[derive(Debug, ToSchema, Validate, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialsSchema {
    #[serde(default)]
    #[validate(length(min = 1, message = "username and password required"))]
    pub username: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "username and password required"))]
    pub password: String,
}

#[derive(Debug, ToSchema, Validate, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSongSchema {
    #[serde(default)]
    #[validate(length(min = 1, message = "title and audioUrl required"))]
    pub title: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "title and audioUrl required"))]
    pub audio_url: String,
}

/// Query string of the song listing
#[derive(Debug, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListSongsQuery {
    /// How many songs to return, between 1 and 50. Defaults to 20.
    pub limit: Option<String>,
}

impl ListSongsQuery {
    /// Builds the query from decoded key/value pairs, the first `limit` wins
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let limit = pairs
            .into_iter()
            .find_map(|(key, value)| (key == "limit").then_some(value));

        Self { limit }
    }
}

pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ServerError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let extracted_json: Json<T> = Json::from_request(req, state)
            .await
            .map_err(|_| ServerError::Validation("JSON parse failed".to_string()))?;

        extracted_json
            .0
            .validate()
            .map_err(|e| ServerError::Validation(first_message(&e)))?;

        Ok(Self(extracted_json.0))
    }
}


fn first_message(errors: &ValidationErrors) -> String {
    errors
        .field_errors()
        .values()
        .flat_map(|errors| errors.iter())
        .find_map(|error| error.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| "Request body is invalid".to_string())
}
