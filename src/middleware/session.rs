use axum::{
    extract::FromRequestParts,
    http::{HeaderName, HeaderValue},
    response::{IntoResponseParts, ResponseParts},
};
use uuid::Uuid;

use crate::error::AppError;

pub const SESSION_HEADER: HeaderName = HeaderName::from_static("x-session-id");

/// Session identifier taken from `x-session-id`. A request without the header
/// starts a new session; the id is echoed back on the response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionId(pub Uuid);

impl<S> FromRequestParts<S> for SessionId
where
    S: Send + Sync,
{
    type Rejection = AppError;
    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        let Some(header) = parts.headers.get(&SESSION_HEADER) else {
            let id = Uuid::new_v4();
            tracing::debug!(session = %id, "starting new session");
            return Ok(SessionId(id));
        };

        let raw = header
            .to_str()
            .map_err(|_| AppError::BadRequest("Invalid x-session-id header".into()))?;
        let id = Uuid::parse_str(raw.trim())
            .map_err(|_| AppError::BadRequest("x-session-id must be a UUID".into()))?;
        Ok(SessionId(id))
    }
}

impl IntoResponseParts for SessionId {
    type Error = std::convert::Infallible;

    fn into_response_parts(self, mut res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        if let Ok(value) = HeaderValue::from_str(&self.0.to_string()) {
            res.headers_mut().insert(SESSION_HEADER, value);
        }
        Ok(res)
    }
}
