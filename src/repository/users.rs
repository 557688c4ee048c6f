//! Users repository for database operations

use sqlx::{Pool, Sqlite};

use crate::{
    error::{AppError, AppResult},
    models::user::{Role, User, UserRow},
    repository::conflict_on_unique,
};

#[derive(Clone)]
pub struct UsersRepository {
    pool: Pool<Sqlite>,
}

impl UsersRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// List all users
    pub async fn get_all(&self) -> AppResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>("SELECT * FROM users ORDER BY username")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(User::from).collect())
    }

    /// Get a user by username, as an optional
    pub async fn find(&self, username: &str) -> AppResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(User::from))
    }

    /// Get a user by username
    pub async fn get(&self, username: &str) -> AppResult<User> {
        self.find(username)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", username)))
    }

    /// Insert a new user (password already hashed by the caller)
    pub async fn create(&self, user: &User) -> AppResult<User> {
        sqlx::query(
            "INSERT INTO users (username, first_name, last_name, password, role) VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(&user.username)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.password)
        .bind(user.role.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "A user with this username"))?;

        Ok(user.clone())
    }

    /// Update name, role and optionally the password hash
    pub async fn update(
        &self,
        username: &str,
        first_name: &str,
        last_name: &str,
        password: Option<&str>,
        role: Option<Role>,
    ) -> AppResult<User> {
        let result = sqlx::query(
            r#"
            UPDATE users SET
                first_name = $1,
                last_name = $2,
                password = COALESCE($3, password),
                role = COALESCE($4, role)
            WHERE username = $5
            "#,
        )
        .bind(first_name)
        .bind(last_name)
        .bind(password)
        .bind(role.map(|r| r.as_str()))
        .bind(username)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("User {} not found", username)));
        }

        self.get(username).await
    }

    /// Delete a user. The last remaining admin can never be deleted; the
    /// check and the delete run in one transaction.
    pub async fn delete(&self, username: &str) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        let role: Option<String> =
            sqlx::query_scalar("SELECT role FROM users WHERE username = $1")
                .bind(username)
                .fetch_optional(&mut *tx)
                .await?;

        let role = role.ok_or_else(|| AppError::NotFound(format!("User {} not found", username)))?;

        if role == Role::Admin.as_str() {
            let admins: i64 =
                sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE role = 'admin'")
                    .fetch_one(&mut *tx)
                    .await?;
            if admins <= 1 {
                return Err(AppError::Conflict(
                    "Cannot delete the last administrator account".to_string(),
                ));
            }
        }

        sqlx::query("DELETE FROM users WHERE username = $1")
            .bind(username)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Number of admin accounts
    pub async fn count_admins(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE role = 'admin'")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Total number of accounts (used by first-start admin seeding)
    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
