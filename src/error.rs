use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Every way a request can fail, mapped to a status code in exactly one
/// place. Services and extractors return these; the transport mapping lives
/// in the `IntoResponse` impl below and nowhere else.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// 400. Carries the aggregated field messages from the validators.
    #[error("{0}")]
    Validation(String),

    /// 401. Missing token, or wrong credentials on login. The login message
    /// is the same for unknown-username and wrong-password on purpose.
    #[error("{0}")]
    Unauthorized(String),

    /// 403. A token was presented but failed verification.
    #[error("Token invalid")]
    TokenInvalid,

    /// 404. The update/profile target does not exist.
    #[error("{0}")]
    NotFound(String),

    /// 409. Duplicate username on registration.
    #[error("{0}")]
    Conflict(String),

    /// 500. Database, hashing or signing faults. The cause gets logged,
    /// the client only ever sees the generic message.
    #[error("internal server error")]
    Internal(#[from] anyhow::Error),
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        ApiError::Internal(anyhow::Error::new(e))
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::TokenInvalid => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(ref cause) = self {
            tracing::error!(error = %cause, "request failed");
        }

        let status = self.status();
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_match_the_taxonomy() {
        assert_eq!(
            ApiError::Validation("bad".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Unauthorized("Unauthorized".into()).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ApiError::TokenInvalid.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            ApiError::NotFound("User is not found".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Conflict("User already exist".into()).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::Internal(anyhow::anyhow!("boom")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn internal_errors_hide_their_cause() {
        let error = ApiError::Internal(anyhow::anyhow!("connection refused on 10.0.0.3"));
        assert_eq!(error.to_string(), "internal server error");
    }

    #[tokio::test]
    async fn response_body_uses_the_error_key() {
        let response = ApiError::TokenInvalid.into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, json!({ "error": "Token invalid" }));
    }
}
