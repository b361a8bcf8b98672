/*
 * Responsibility
 * - User Store interface consumed by the request context (read-only)
 * - SQLx/Postgres implementation over the users table
 *
 * Schema assumed:
 * - users."userId"       uuid primary key
 * - users."userName"     text unique
 * - users."passwordHash" text (pgcrypto crypt() format)
 * - users."roles"        text[]
 */
use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::repos::error::{RepoError, RepoResult};
use crate::services::auth::Role;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub user_name: String,
    pub roles: Vec<Role>,
}

impl User {
    pub fn is_granted_for(&self, required: Role) -> bool {
        crate::services::auth::roles::is_granted(&self.roles, required)
    }
}

#[async_trait]
pub trait UserStore: Send + Sync + 'static {
    // `RepoError::NotFound` when no user has this id.
    async fn get_by_id(&self, id: Uuid) -> RepoResult<User>;

    // `Ok(None)` when the name is unknown or the password does not match.
    async fn verify_credentials(&self, user_name: &str, password: &str)
    -> RepoResult<Option<User>>;
}

#[derive(Debug, FromRow)]
struct UserRow {
    #[sqlx(rename = "userId")]
    id: Uuid,
    #[sqlx(rename = "userName")]
    user_name: String,
    roles: Vec<String>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        let roles = row
            .roles
            .iter()
            .filter_map(|raw| match raw.parse::<Role>() {
                Ok(role) => Some(role),
                Err(err) => {
                    tracing::warn!(user_id = %row.id, error = %err, "skipping unknown role");
                    None
                }
            })
            .collect();

        Self {
            id: row.id,
            user_name: row.user_name,
            roles,
        }
    }
}

#[derive(Clone, Debug)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn get_by_id(&self, id: Uuid) -> RepoResult<User> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT "userId", "userName", "roles"
            FROM users
            WHERE "userId" = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(RepoError::NotFound)?;

        Ok(row.into())
    }

    async fn verify_credentials(
        &self,
        user_name: &str,
        password: &str,
    ) -> RepoResult<Option<User>> {
        // crypt() re-hashes with the salt embedded in the stored hash
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT "userId", "userName", "roles"
            FROM users
            WHERE "userName" = $1
              AND "passwordHash" = crypt($2, "passwordHash")
            "#,
        )
        .bind(user_name)
        .bind(password)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(User::from))
    }
}
