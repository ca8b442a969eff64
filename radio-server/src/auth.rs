use axum::{
    async_trait,
    extract::{FromRequestParts, State},
    http::{header, request::Parts, StatusCode},
    routing::post,
    Json,
};
use radio_collab::Credentials;

use crate::{
    errors::{ErrorBody, ServerError, ServerResult},
    schemas::{CredentialsSchema, ValidatedJson},
    serialized::{Confirmation, LoginResult},
    Router, ServerContext,
};

/// The identity behind a verified bearer token.
///
/// Taking this as a handler argument makes the route require authentication.
#[derive(Debug, Clone)]
pub struct Session {
    pub username: String,
}

#[async_trait]
impl FromRequestParts<ServerContext> for Session {
    type Rejection = ServerError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerContext,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|x| x.to_str().ok())
            .ok_or(ServerError::Unauthorized("missing token"))?;

        let token = bearer_token(header).ok_or(ServerError::Unauthorized("missing token"))?;
        let username = state.collab.auth.verify(token)?;

        Ok(Self { username })
    }
}

/// Returns the token of a `Bearer <token>` header value, the scheme is case insensitive
fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(char::is_whitespace)?;
    let token = token.trim();

    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return None;
    }

    Some(token)
}

#[utoipa::path(
    post,
    path = "/api/signup",
    tag = "auth",
    request_body = CredentialsSchema,
    responses(
        (status = 201, body = Confirmation, description = "Account was created"),
        (status = 400, body = ErrorBody, description = "Missing username or password"),
        (status = 409, body = ErrorBody, description = "Username is taken")
    )
)]
pub(crate) async fn signup(
    State(context): State<ServerContext>,
    ValidatedJson(body): ValidatedJson<CredentialsSchema>,
) -> ServerResult<(StatusCode, Json<Confirmation>)> {
    context
        .collab
        .auth
        .signup(Credentials::new(body.username, body.password))
        .await?;

    Ok((StatusCode::CREATED, Json(Confirmation::ok())))
}

#[utoipa::path(
    post,
    path = "/api/login",
    tag = "auth",
    request_body = CredentialsSchema,
    responses(
        (status = 200, body = LoginResult),
        (status = 400, body = ErrorBody, description = "Missing username or password"),
        (status = 401, body = ErrorBody, description = "Invalid credentials")
    )
)]
pub(crate) async fn login(
    State(context): State<ServerContext>,
    ValidatedJson(body): ValidatedJson<CredentialsSchema>,
) -> ServerResult<Json<LoginResult>> {
    let token = context
        .collab
        .auth
        .login(Credentials::new(body.username, body.password))
        .await?;

    Ok(Json(LoginResult::new(token)))
}

pub fn router() -> Router {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
}

#[cfg(test)]
mod tests {
    use super::bearer_token;

    #[test]
    fn extracts_bearer_tokens() {
        assert_eq!(bearer_token("Bearer abc.def"), Some("abc.def"));
        assert_eq!(bearer_token("bearer   abc"), Some("abc"));
        assert_eq!(bearer_token("BEARER abc "), Some("abc"));
    }

    #[test]
    fn rejects_other_schemes_and_empty_tokens() {
        assert_eq!(bearer_token("Basic abc"), None);
        assert_eq!(bearer_token("Bearer"), None);
        assert_eq!(bearer_token("Bearer   "), None);
        assert_eq!(bearer_token("abc"), None);
        assert_eq!(bearer_token(""), None);
    }
}
