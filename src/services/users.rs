//! Authentication and user management service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::user::{CreateUser, Role, UpdateProfile, UpdateUser, User, UserClaims},
    repository::Repository,
};

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
    config: AuthConfig,
}

impl UsersService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Authenticate a user and return a JWT token.
    /// Wrong username and wrong password produce the same message.
    pub async fn authenticate(&self, username: &str, password: &str) -> AppResult<(String, User)> {
        let user = self
            .repository
            .users
            .find(username)
            .await?
            .ok_or_else(|| AppError::Authentication("Invalid username or password".to_string()))?;

        if !self.verify_password(&user, password)? {
            return Err(AppError::Authentication(
                "Invalid username or password".to_string(),
            ));
        }

        let token = self.create_token(&user)?;
        Ok((token, user))
    }

    /// Create a JWT token for a user
    fn create_token(&self, user: &User) -> AppResult<String> {
        let now = Utc::now().timestamp();
        let exp = now + (self.config.jwt_expiration_hours as i64 * 3600);

        let claims = UserClaims {
            sub: user.username.clone(),
            role: user.role,
            exp,
            iat: now,
        };

        claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    /// Verify a user's password against the stored argon2 hash
    fn verify_password(&self, user: &User, password: &str) -> AppResult<bool> {
        let parsed_hash = PasswordHash::new(&user.password)
            .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash a password using Argon2
    pub fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
        Ok(hash.to_string())
    }

    /// Create the initial admin account when the user table is empty, so a
    /// fresh install always satisfies the at-least-one-admin invariant.
    pub async fn ensure_initial_admin(&self) -> AppResult<()> {
        if self.repository.users.count().await? > 0 {
            return Ok(());
        }

        let admin = User {
            username: self.config.initial_admin_username.clone(),
            first_name: "Administrator".to_string(),
            last_name: String::new(),
            password: self.hash_password(&self.config.initial_admin_password)?,
            role: Role::Admin,
        };
        self.repository.users.create(&admin).await?;

        tracing::warn!(
            "Created initial admin account '{}' with the configured default password; change it",
            admin.username
        );
        Ok(())
    }

    /// Get a user by username
    pub async fn get_user(&self, username: &str) -> AppResult<User> {
        self.repository.users.get(username).await
    }

    /// List all users
    pub async fn list_users(&self) -> AppResult<Vec<User>> {
        self.repository.users.get_all().await
    }

    /// Create a new user (admin only at the command surface)
    pub async fn create_user(&self, user: CreateUser) -> AppResult<User> {
        let user = User {
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            password: self.hash_password(&user.password)?,
            role: user.role,
        };
        self.repository.users.create(&user).await
    }

    /// Update a user as an administrator. Demoting the last admin would
    /// leave the system without one, so it is rejected.
    pub async fn update_user(&self, username: &str, update: UpdateUser) -> AppResult<User> {
        let current = self.repository.users.get(username).await?;

        if current.role == Role::Admin
            && update.role == Some(Role::User)
            && self.repository.users.count_admins().await? <= 1
        {
            return Err(AppError::Conflict(
                "Cannot demote the last administrator account".to_string(),
            ));
        }

        let password = match &update.password {
            Some(p) => Some(self.hash_password(p)?),
            None => None,
        };

        self.repository
            .users
            .update(
                username,
                &update.first_name,
                &update.last_name,
                password.as_deref(),
                update.role,
            )
            .await
    }

    /// Update one's own profile; requires the current password
    pub async fn update_profile(&self, username: &str, profile: UpdateProfile) -> AppResult<User> {
        let user = self.repository.users.get(username).await?;

        if !self.verify_password(&user, &profile.current_password)? {
            return Err(AppError::Authentication(
                "Current password is incorrect".to_string(),
            ));
        }

        let password = match &profile.new_password {
            Some(p) => Some(self.hash_password(p)?),
            None => None,
        };

        self.repository
            .users
            .update(
                username,
                &profile.first_name,
                &profile.last_name,
                password.as_deref(),
                None,
            )
            .await
    }

    /// Delete a user. Self-deletion is rejected here; the last-admin guard
    /// lives in the store.
    pub async fn delete_user(&self, username: &str, acting_username: &str) -> AppResult<()> {
        if username == acting_username {
            return Err(AppError::Conflict(
                "Cannot delete your own account".to_string(),
            ));
        }
        self.repository.users.delete(username).await
    }
}
