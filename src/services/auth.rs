//! Authentication and profile service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::user::{LoginRequest, RegisterRequest, UpdateProfile, User, UserClaims},
    repository::{users::NewUser, Repository},
};

#[derive(Clone)]
pub struct AuthService {
    repository: Repository,
    config: AuthConfig,
}

impl AuthService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Register a new user and return a token plus the created account
    pub async fn register(&self, request: RegisterRequest) -> AppResult<(String, User)> {
        request
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        if self
            .repository
            .users
            .get_by_username(&request.username)
            .await?
            .is_some()
        {
            return Err(AppError::UsernameTaken);
        }

        if self
            .repository
            .users
            .get_by_email(&request.email)
            .await?
            .is_some()
        {
            return Err(AppError::EmailTaken);
        }

        let password_hash = self.hash_password(&request.password)?;

        let user = self
            .repository
            .users
            .create(NewUser {
                username: request.username,
                password_hash,
                email: request.email,
                phone: request.phone,
                user_type: request.user_type,
                code: request.code,
            })
            .await?;

        let token = self.create_token(&user)?;
        Ok((token, user))
    }

    /// Authenticate by username and password and return a token
    pub async fn login(&self, request: &LoginRequest) -> AppResult<(String, User)> {
        let user = self
            .repository
            .users
            .get_by_username(&request.username)
            .await?
            .ok_or_else(|| AppError::Unauthenticated("Invalid username or password".to_string()))?;

        if !self.verify_password(&user, &request.password)? {
            return Err(AppError::Unauthenticated(
                "Invalid username or password".to_string(),
            ));
        }

        let token = self.create_token(&user)?;
        Ok((token, user))
    }

    /// Resolve the authenticated user behind a token subject
    pub async fn current_user(&self, user_id: Uuid) -> AppResult<User> {
        self.repository
            .users
            .get_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::Unauthenticated("Unknown user".to_string()))
    }

    /// Update the caller's profile. The current password authorizes the change.
    pub async fn update_profile(&self, user_id: Uuid, update: UpdateProfile) -> AppResult<User> {
        let password = update.password.as_deref().ok_or(AppError::PasswordRequired)?;

        let user = self.current_user(user_id).await?;

        if !self.verify_password(&user, password)? {
            return Err(AppError::InvalidPassword);
        }

        self.repository.users.update_profile(user_id, &update).await
    }

    fn create_token(&self, user: &User) -> AppResult<String> {
        let now = Utc::now().timestamp();
        let exp = now + (self.config.jwt_expiration_hours as i64 * 3600);

        let claims = UserClaims {
            sub: user.id.to_string(),
            exp,
            iat: now,
        };

        claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
    }

    fn verify_password(&self, user: &User, password: &str) -> AppResult<bool> {
        let parsed = PasswordHash::new(&user.password_hash)
            .map_err(|e| AppError::Internal(format!("Stored password hash is invalid: {}", e)))?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }
}
