use regex::Regex;
use std::sync::OnceLock;

use crate::models::user::{LoginRequest, RegisterRequest, UpdateProfileRequest};

/// Validates a username against strict rules.
///
/// Rules:
/// 1. Lowercase alphanumeric, with underscores and hyphens in the middle
/// 2. No leading or trailing separator
/// 3. Length between 3 and 30 characters
///
/// Usernames are immutable after registration and end up inside tokens,
/// so the cheapest place to keep them boring is right here.
pub fn validate_username(username: &str) -> Result<(), String> {
    if username.len() < 3 {
        return Err("must be at least 3 characters long".to_string());
    }
    if username.len() > 30 {
        return Err("must be at most 30 characters long".to_string());
    }

    // ^[a-z0-9]        starts alphanumeric
    // [a-z0-9_-]*      middle can contain underscores and hyphens
    // [a-z0-9]$        ends alphanumeric
    // OnceLock because compiling the regex once is enough.
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"^[a-z0-9][a-z0-9_-]*[a-z0-9]$").unwrap());

    if !re.is_match(username) {
        return Err(
            "must be lowercase alphanumeric and cannot start or end with a separator"
                .to_string(),
        );
    }

    Ok(())
}

/// Validates a plaintext password before it gets anywhere near the hasher.
///
/// Only length is checked. Composition rules (one digit, one symbol, a
/// blood sacrifice) mostly train people to write passwords on sticky notes.
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.len() < 8 {
        return Err("must be at least 8 characters long".to_string());
    }
    if password.len() > 128 {
        return Err("must be at most 128 characters long".to_string());
    }
    Ok(())
}

/// Validates a display name: non-blank, at most 100 characters.
pub fn validate_name(name: &str) -> Result<(), String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("must not be blank".to_string());
    }
    if trimmed.len() > 100 {
        return Err("must be at most 100 characters long".to_string());
    }
    Ok(())
}

/// Validates an email address shape: something@domain.tld, no whitespace.
///
/// This is deliberately a shape check, not an RFC 5322 parser. The only way
/// to know an address is real is to send mail to it.
pub fn validate_email(email: &str) -> Result<(), String> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

    if !re.is_match(email) {
        return Err("must be a valid email address".to_string());
    }
    Ok(())
}

/// Validates a registration payload, reporting every failing field at once.
/// One round trip per mistake would be an unfriendly way to sign up.
pub fn validate_register(payload: &RegisterRequest) -> Result<(), String> {
    let mut problems = Vec::new();

    collect(&mut problems, "username", validate_username(&payload.username));
    collect(&mut problems, "name", validate_name(&payload.name));
    collect(&mut problems, "email", validate_email(&payload.email));
    collect(&mut problems, "password", validate_password(&payload.password));

    finish(problems)
}

/// Validates a login payload. Presence only: the stored rules already held
/// at registration time, and rejecting a wrong-shaped password with a 400
/// here would leak which usernames have accounts with which policies.
pub fn validate_login(payload: &LoginRequest) -> Result<(), String> {
    let mut problems = Vec::new();

    if payload.username.is_empty() {
        problems.push("username: is required".to_string());
    }
    if payload.password.is_empty() {
        problems.push("password: is required".to_string());
    }

    finish(problems)
}

/// Validates an update payload. The username is required to pick the target
/// row; the optional fields are only checked when present.
pub fn validate_update(payload: &UpdateProfileRequest) -> Result<(), String> {
    let mut problems = Vec::new();

    collect(&mut problems, "username", validate_username(&payload.username));
    if let Some(name) = &payload.name {
        collect(&mut problems, "name", validate_name(name));
    }
    if let Some(password) = &payload.password {
        collect(&mut problems, "password", validate_password(password));
    }

    finish(problems)
}

fn collect(problems: &mut Vec<String>, field: &str, result: Result<(), String>) {
    if let Err(reason) = result {
        problems.push(format!("{}: {}", field, reason));
    }
}

fn finish(problems: Vec<String>) -> Result<(), String> {
    if problems.is_empty() {
        Ok(())
    } else {
        Err(problems.join("; "))
    }
}
