use axum::{response::IntoResponse, Json};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

use crate::{
    errors::ErrorBody,
    schemas::{CredentialsSchema, NewSongSchema},
    serialized::{Confirmation, Created, LoginResult, Song},
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::auth::signup,
        crate::auth::login,
        crate::songs::upload_song,
        crate::songs::list_songs,
        crate::songs::random_song,
    ),
    components(schemas(
        CredentialsSchema,
        NewSongSchema,
        Confirmation,
        Created,
        LoginResult,
        Song,
        ErrorBody,
    )),
    modifiers(&Security),
    info(
        description = "radio-server exposes endpoints to sign up, upload songs and listen to a random one"
    )
)]
pub struct ApiDoc;

struct Security;

impl Modify for Security {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            let scheme = HttpBuilder::new()
                .scheme(HttpAuthScheme::Bearer)
                .bearer_format("JWT")
                .build();

            components.add_security_scheme("BearerAuth", SecurityScheme::Http(scheme))
        }
    }
}

pub async fn docs() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}
