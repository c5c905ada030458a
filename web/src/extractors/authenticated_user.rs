use crate::error::{Error, WebErrorKind};
use crate::AppState;
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use domain::{identity, Id};
use log::*;
use std::convert::Infallible;

/// The raw application bearer token from the `Authorization` header, if any.
pub(crate) struct BearerToken(pub Option<String>);

impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(BearerToken(bearer_token(parts)))
    }
}

fn bearer_token(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split_once(' '))
        .filter(|(scheme, _)| scheme.eq_ignore_ascii_case("bearer"))
        .map(|(_, token)| token.trim())
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

/// The application user a request's bearer token belongs to, as resolved by the
/// identity service. Requests without a token are rejected with 401 before any remote
/// call.
pub(crate) struct AuthenticatedUser(pub Id);

impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = Error;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or_else(|| {
            debug!("Request to {} carried no bearer token", parts.uri.path());
            Error::Web(WebErrorKind::Auth)
        })?;

        let user_id = identity::resolve_caller(&state.config, &token).await?;
        Ok(AuthenticatedUser(user_id))
    }
}
