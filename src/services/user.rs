use sqlx::PgPool;

use crate::error::ApiError;
use crate::models::user::{
    LoginRequest, LoginResponse, RegisterRequest, UpdateProfileRequest, UpdateResponse, User,
    UserResponse,
};
use crate::utils::auth::{hash_password, verify_password};
use crate::utils::token::TokenService;
use crate::utils::validation;

/// One message for both unknown-username and wrong-password. Responding
/// differently would let a caller enumerate which usernames have accounts.
const BAD_CREDENTIALS: &str = "username or password wrong";

const USER_NOT_FOUND: &str = "User is not found";
const USER_EXISTS: &str = "User already exist";

/// What login needs from the store and nothing more. The full row, hash
/// included, never travels through this path.
#[derive(sqlx::FromRow)]
struct StoredCredentials {
    username: String,
    password_hash: String,
}

/// Registers a new user.
///
/// Validate, check the username is free, hash, insert. The returned
/// projection is name/username/email; the hash stays in the table.
pub async fn register(db: &PgPool, payload: RegisterRequest) -> Result<UserResponse, ApiError> {
    // 1. Validate shape first; nothing below runs on malformed input.
    validation::validate_register(&payload).map_err(ApiError::Validation)?;

    // 2. Best-effort duplicate check, for the friendly error. Two racing
    // registrations can both pass this; the UNIQUE constraint below is what
    // actually guarantees one row per username.
    let taken: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE username = $1")
        .bind(&payload.username)
        .fetch_one(db)
        .await?;
    if taken > 0 {
        return Err(ApiError::Conflict(USER_EXISTS.to_string()));
    }

    // 3. Hash the password. The plaintext goes no further than this call.
    let password_hash =
        hash_password(&payload.password).map_err(|e| ApiError::Internal(e.into()))?;

    // 4. Insert, projecting back only the public fields.
    let now = chrono::Utc::now().timestamp();
    let created = sqlx::query_as::<_, UserResponse>(
        r#"
        INSERT INTO users (username, name, email, password_hash, created_at)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING name, username, email
        "#,
    )
    .bind(&payload.username)
    .bind(payload.name.trim())
    .bind(&payload.email)
    .bind(&password_hash)
    .bind(now)
    .fetch_one(db)
    .await
    .map_err(|e| {
        // A unique violation here means we lost the race after the
        // pre-check. Same outcome for the caller either way.
        if e.as_database_error()
            .is_some_and(|d| d.is_unique_violation())
        {
            ApiError::Conflict(USER_EXISTS.to_string())
        } else {
            ApiError::from(e)
        }
    })?;

    tracing::info!(username = %created.username, "user registered");
    Ok(created)
}

/// Checks credentials and issues a token.
pub async fn login(
    db: &PgPool,
    tokens: &TokenService,
    payload: LoginRequest,
) -> Result<LoginResponse, ApiError> {
    validation::validate_login(&payload).map_err(ApiError::Validation)?;

    let stored: Option<StoredCredentials> =
        sqlx::query_as("SELECT username, password_hash FROM users WHERE username = $1")
            .bind(&payload.username)
            .fetch_optional(db)
            .await?;

    // Unknown username and wrong password take the same exit.
    let Some(stored) = stored else {
        return Err(ApiError::Unauthorized(BAD_CREDENTIALS.to_string()));
    };
    if verify_password(&payload.password, &stored.password_hash).is_err() {
        return Err(ApiError::Unauthorized(BAD_CREDENTIALS.to_string()));
    }

    let token = tokens
        .sign(&stored.username)
        .map_err(|e| ApiError::Internal(e.into()))?;

    tracing::info!(username = %stored.username, "user logged in");
    Ok(LoginResponse {
        username: stored.username,
        token,
    })
}

/// Fetches the profile of an (already authenticated) username.
pub async fn profile(db: &PgPool, username: &str) -> Result<UserResponse, ApiError> {
    let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE username = $1")
        .bind(username)
        .fetch_optional(db)
        .await?;

    // A valid token for a row that no longer exists can happen: tokens
    // outlive whatever deleted the user.
    let user = user.ok_or_else(|| ApiError::NotFound(USER_NOT_FOUND.to_string()))?;

    Ok(UserResponse {
        name: user.name,
        username: user.username,
        email: user.email,
    })
}

/// Applies a partial profile update.
///
/// Only supplied fields are written; a new password is re-hashed on the way
/// in. Returns the name/username projection.
pub async fn update(
    db: &PgPool,
    payload: UpdateProfileRequest,
) -> Result<UpdateResponse, ApiError> {
    validation::validate_update(&payload).map_err(ApiError::Validation)?;

    // Confirm the target exists so a bad username is a 404, not a silent
    // zero-row update.
    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE username = $1")
        .bind(&payload.username)
        .fetch_one(db)
        .await?;
    if existing != 1 {
        return Err(ApiError::NotFound(USER_NOT_FOUND.to_string()));
    }

    let name = payload.name.as_deref().map(str::trim);
    let password_hash = match payload.password.as_deref() {
        Some(plaintext) => {
            Some(hash_password(plaintext).map_err(|e| ApiError::Internal(e.into()))?)
        }
        None => None,
    };

    // COALESCE keeps whatever the caller didn't send.
    let updated = sqlx::query_as::<_, UpdateResponse>(
        r#"
        UPDATE users
        SET name = COALESCE($2, name),
            password_hash = COALESCE($3, password_hash)
        WHERE username = $1
        RETURNING name, username
        "#,
    )
    .bind(&payload.username)
    .bind(name)
    .bind(password_hash)
    .fetch_one(db)
    .await?;

    tracing::info!(username = %updated.username, "profile updated");
    Ok(updated)
}
