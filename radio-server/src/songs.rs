use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json,
};
use radio_collab::{NewUpload, Songs};

use crate::{
    auth::Session,
    errors::{ErrorBody, ServerResult},
    schemas::{ListSongsQuery, NewSongSchema, ValidatedJson},
    serialized::{Created, Song, ToSerialized},
    Router, ServerContext,
};

#[utoipa::path(
    post,
    path = "/api/songs",
    tag = "songs",
    request_body = NewSongSchema,
    security(
        ("BearerAuth" = [])
    ),
    responses(
        (status = 201, body = Created, description = "Song was stored"),
        (status = 400, body = ErrorBody, description = "Missing title or audioUrl"),
        (status = 401, body = ErrorBody, description = "Missing, invalid or expired token")
    )
)]
pub(crate) async fn upload_song(
    session: Session,
    State(context): State<ServerContext>,
    ValidatedJson(body): ValidatedJson<NewSongSchema>,
) -> ServerResult<(StatusCode, Json<Created>)> {
    let song = context
        .collab
        .songs
        .upload(
            &session.username,
            NewUpload {
                title: body.title,
                audio_url: body.audio_url,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(Created::new(song.id))))
}

#[utoipa::path(
    get,
    path = "/api/songs",
    tag = "songs",
    params(ListSongsQuery),
    responses(
        (status = 200, body = Vec<Song>, description = "Most recent songs first")
    )
)]
pub(crate) async fn list_songs(
    State(context): State<ServerContext>,
    pairs: Option<Query<Vec<(String, String)>>>,
) -> ServerResult<Json<Vec<Song>>> {
    // An odd query string only affects the limit, which then falls back to the default
    let query = pairs
        .map(|Query(pairs)| ListSongsQuery::from_pairs(pairs))
        .unwrap_or_default();
    let limit = Songs::clamp_limit(query.limit.as_deref());
    let songs = context.collab.songs.recent(limit).await?;

    Ok(Json(songs.to_serialized()))
}

#[utoipa::path(
    get,
    path = "/api/random",
    tag = "songs",
    responses(
        (status = 200, body = Song),
        (status = 404, body = ErrorBody, description = "No songs have been uploaded")
    )
)]
pub(crate) async fn random_song(State(context): State<ServerContext>) -> ServerResult<Json<Song>> {
    let song = context.collab.songs.random().await?;

    Ok(Json(song.to_serialized()))
}

pub fn router() -> Router {
    Router::new()
        .route("/songs", get(list_songs).post(upload_song))
        .route("/random", get(random_song))
}
