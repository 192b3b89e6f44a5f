//! JSON body extractor that reports malformed payloads the way every other
//! auth rejection is reported

use axum::{
    Json, async_trait,
    extract::{FromRequest, Request, rejection::JsonRejection},
};
use tracing::warn;

use crate::error::AuthError;

/// Like [`Json`], but a body that cannot be read becomes
/// [`AuthError::MalformedBody`]
pub struct AuthJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for AuthJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                warn!("Rejected request body: {}", rejection.body_text());
                Err(AuthError::MalformedBody)
            }
        }
    }
}
