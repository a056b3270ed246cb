use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::info;

use crate::auth::password;
use crate::database::models::{NewUser, User, UserCandidate};
use crate::database::repository::UserRepository;
use crate::database::DatabaseError;
use crate::services::error::{ServiceError, ServiceResult};

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("email regex is valid")
});

pub struct UserService {
    users: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Validate, reject duplicate emails, hash the password and persist.
    pub async fn register(&self, candidate: UserCandidate) -> ServiceResult<User> {
        validate_candidate(&candidate)?;
        let email = normalize_email(&candidate.email);

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(ServiceError::DuplicateEmail);
        }

        let password_hash = password::hash_password(candidate.password).await?;
        let new_user = NewUser {
            username: candidate.username.trim().to_string(),
            first_name: candidate.first_name.trim().to_string(),
            last_name: candidate.last_name.trim().to_string(),
            email,
            password_hash,
        };

        // A concurrent registration can still win the race to the unique index
        let user = self.users.insert(new_user).await.map_err(|e| match e {
            DatabaseError::UniqueViolation(_) => ServiceError::DuplicateEmail,
            other => ServiceError::Database(other),
        })?;

        info!("Registered user {}", user.id);
        Ok(user)
    }
}

/// Emails are compared and stored lowercased
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn validate_candidate(candidate: &UserCandidate) -> ServiceResult<()> {
    if candidate.username.trim().chars().count() < 3 {
        return Err(ServiceError::validation(
            "username",
            "username must be at least 3 characters long",
        ));
    }
    if !EMAIL_REGEX.is_match(candidate.email.trim()) {
        return Err(ServiceError::validation("email", "email address is invalid"));
    }
    validate_password(&candidate.password)
}

fn validate_password(password: &str) -> ServiceResult<()> {
    if password.chars().count() < 8 {
        return Err(ServiceError::validation(
            "password",
            "password must be at least 8 characters long",
        ));
    }
    let has_letter = password.chars().any(|c| c.is_ascii_alphabetic());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    if !has_letter || !has_digit {
        return Err(ServiceError::validation(
            "password",
            "password must contain at least one letter and one digit",
        ));
    }
    Ok(())
}
