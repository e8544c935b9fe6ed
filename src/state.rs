use axum::extract::FromRef;
use sqlx::PgPool;

use crate::utils::token::TokenService;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub tokens: TokenService,
}

// Lets the auth extractor borrow just the token service without knowing
// about the rest of the state.
impl FromRef<AppState> for TokenService {
    fn from_ref(state: &AppState) -> TokenService {
        state.tokens.clone()
    }
}
