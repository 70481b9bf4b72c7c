use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::database::models::User;
use crate::database::repository::{NewUser, UserRepository};
use crate::journal::payload::SignupPayload;

#[derive(Debug, thiserror::Error)]
pub enum UserServiceError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("email address already registered")]
    EmailTaken,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("account disabled")]
    AccountDisabled,
    #[error("password hashing failed: {0}")]
    PasswordHash(String),
}

pub struct UserService {
    users: UserRepository,
}

impl UserService {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// Create a user with a hashed password and a globally unique slug.
    pub async fn signup(&self, payload: SignupPayload) -> Result<User, UserServiceError> {
        if self.users.find_by_email(&payload.email).await?.is_some() {
            return Err(UserServiceError::EmailTaken);
        }

        let password_hash = hash_password(&payload.password)?;
        let slug = self
            .generate_unique_slug(&payload.first_name, &payload.last_name)
            .await?;

        let user = self
            .users
            .insert(NewUser {
                email: payload.email,
                password_hash,
                first_name: payload.first_name,
                last_name: payload.last_name,
                slug,
            })
            .await?;

        tracing::info!(user_id = user.id, slug = %user.slug, "created user");
        Ok(user)
    }

    /// Slugified name plus a random token, regenerated until no existing user
    /// carries it. The unique index on users.slug is the actual race-breaker
    /// for concurrent signups; this loop resolves collisions before insert.
    async fn generate_unique_slug(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> Result<String, UserServiceError> {
        let base = slugify(&format!("{} {}", first_name, last_name));
        loop {
            let candidate = format!("{}-{}", base, Uuid::new_v4());
            if !self.users.slug_exists(&candidate).await? {
                return Ok(candidate);
            }
        }
    }

    /// Verify credentials for login. The caller receives the full user row
    /// on success.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, UserServiceError> {
        let user = match self.users.find_by_email(email).await? {
            Some(user) => user,
            None => return Err(UserServiceError::InvalidCredentials),
        };

        if !verify_password(password, &user.password_hash) {
            tracing::warn!(email = %email, "login failed: bad password");
            return Err(UserServiceError::InvalidCredentials);
        }

        if !user.is_active {
            tracing::warn!(email = %email, "login rejected: account disabled");
            return Err(UserServiceError::AccountDisabled);
        }

        Ok(user)
    }
}

/// Lowercased, hyphen-separated form of a display name. Non-alphanumeric
/// runs collapse into a single hyphen.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_hyphen = false;

    for c in input.chars() {
        if c.is_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            for lower in c.to_lowercase() {
                slug.push(lower);
            }
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

pub fn hash_password(password: &str) -> Result<String, UserServiceError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| UserServiceError::PasswordHash(e.to_string()))
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}
