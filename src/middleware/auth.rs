use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::error::ApiError;
use crate::utils::token::TokenService;

/// An authenticated user, extracted from the bearer token.
///
/// Use this as a handler parameter and axum will automatically:
/// 1. Read the Authorization header
/// 2. Verify the token's signature and expiry
/// 3. Hand the handler an `AuthenticatedUser`, or reject the request
///
/// Rejection happens while extractors run, before the handler is ever
/// polled. A protected handler therefore cannot execute on a missing or
/// invalid token; there is no `next()` to forget to skip.
pub struct AuthenticatedUser {
    pub username: String,
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    TokenService: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // 1. Grab the Authorization header. No header at all is a 401;
        // the caller never even tried to authenticate.
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("Unauthorized".to_string()))?;

        // 2. The header value itself is the token. Clients following the
        // usual convention send "Bearer <token>"; accept that too.
        let token = header.strip_prefix("Bearer ").unwrap_or(header);

        // 3. Verify against the shared token service. Any failure here,
        // expiry included, is a 403: a token was presented, it just wasn't
        // good enough.
        let tokens = TokenService::from_ref(state);
        let claims = tokens.verify(token).map_err(|_| ApiError::TokenInvalid)?;

        Ok(AuthenticatedUser {
            username: claims.sub,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Router,
        body::Body,
        extract::State,
        http::{Request, StatusCode},
        routing::get,
    };
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tower::ServiceExt;

    const TEST_SECRET: &str = "middleware-test-secret-of-at-least-32-chars";

    #[derive(Clone)]
    struct TestState {
        tokens: TokenService,
        handler_ran: Arc<AtomicBool>,
    }

    impl FromRef<TestState> for TokenService {
        fn from_ref(state: &TestState) -> TokenService {
            state.tokens.clone()
        }
    }

    async fn protected(user: AuthenticatedUser, State(state): State<TestState>) -> String {
        state.handler_ran.store(true, Ordering::SeqCst);
        user.username
    }

    fn app() -> (Router, TokenService, Arc<AtomicBool>) {
        let tokens = TokenService::new(TEST_SECRET, 3600);
        let handler_ran = Arc::new(AtomicBool::new(false));
        let state = TestState {
            tokens: tokens.clone(),
            handler_ran: handler_ran.clone(),
        };
        let router = Router::new()
            .route("/me", get(protected))
            .with_state(state);
        (router, tokens, handler_ran)
    }

    async fn body_string(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn missing_header_is_401_and_never_reaches_the_handler() {
        let (router, _, handler_ran) = app();

        let response = router
            .oneshot(Request::builder().uri("/me").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(body_string(response).await.contains("Unauthorized"));
        assert!(!handler_ran.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn invalid_token_is_403_and_never_reaches_the_handler() {
        let (router, _, handler_ran) = app();

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/me")
                    .header("Authorization", "definitely.not.ajwt")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert!(body_string(response).await.contains("Token invalid"));
        assert!(!handler_ran.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn raw_token_reaches_the_handler_with_the_identity() {
        let (router, tokens, handler_ran) = app();
        let token = tokens.sign("alice").unwrap();

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/me")
                    .header("Authorization", token)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "alice");
        assert!(handler_ran.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn bearer_prefix_is_accepted_too() {
        let (router, tokens, _) = app();
        let token = tokens.sign("alice").unwrap();

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/me")
                    .header("Authorization", format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "alice");
    }

    #[tokio::test]
    async fn token_signed_with_another_secret_is_403() {
        let (router, _, handler_ran) = app();
        let foreign = TokenService::new("some-other-service-secret-32-chars-long!", 3600);
        let token = foreign.sign("alice").unwrap();

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/me")
                    .header("Authorization", token)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert!(!handler_ran.load(Ordering::SeqCst));
    }
}
