use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A full row from the users table. Not serializable: anything that leaves
/// the service goes through one of the response types below instead, none
/// of which has a password field to forget to strip.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Option<Uuid>,
    pub username: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: i64,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Partial update: only the fields that are present get written.
/// The username names the target row and cannot itself be changed.
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub username: String,
    pub name: Option<String>,
    pub password: Option<String>,
}

/// The public shape of a user. Deliberately has no password field of any
/// kind, so a hash can't leak through serialization by accident.
#[derive(Debug, Serialize, FromRow)]
pub struct UserResponse {
    pub name: String,
    pub username: String,
    pub email: String,
}

#[derive(Debug, Serialize, FromRow)]
pub struct UpdateResponse {
    pub name: String,
    pub username: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub username: String,
    pub token: String,
}

/// JWT payload. `sub` holds the username; tokens in this service carry
/// nothing else about the user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}
