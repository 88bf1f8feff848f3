//! 사용자 Repository (PostgreSQL).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use park_core::{NewUser, ParkError, ParkResult, Role, User, UserStore};
use sqlx::{FromRow, PgPool};

use super::map_write_error;

/// `users` 테이블 행. 역할은 `ROLE_*` 문자열로 저장됩니다.
#[derive(Debug, FromRow)]
struct UserRow {
    id: i64,
    username: String,
    password_hash: String,
    role: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[sqlx(default)]
    created_by: Option<String>,
    #[sqlx(default)]
    updated_by: Option<String>,
}

impl TryFrom<UserRow> for User {
    type Error = ParkError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role = Role::from_authority(&row.role)
            .ok_or_else(|| ParkError::Database(format!("알 수 없는 역할 값: {}", row.role)))?;

        Ok(User {
            id: row.id,
            username: row.username,
            password_hash: row.password_hash,
            role,
            created_at: row.created_at,
            updated_at: row.updated_at,
            created_by: row.created_by,
            updated_by: row.updated_by,
        })
    }
}

const COLUMNS: &str =
    "id, username, password_hash, role, created_at, updated_at, created_by, updated_by";

/// PostgreSQL 사용자 저장소.
#[derive(Clone)]
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
    async fn create(&self, user: NewUser) -> ParkResult<User> {
        let sql = format!(
            "INSERT INTO users (username, password_hash, role, created_by, updated_by)
             VALUES ($1, $2, $3, $4, $4)
             RETURNING {COLUMNS}"
        );

        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(&user.username)
            .bind(&user.password_hash)
            .bind(user.role.authority())
            .bind(&user.created_by)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_write_error(e, |_| format!("이미 등록된 사용자명입니다: {}", user.username)))?;

        row.try_into()
    }

    async fn find_by_id(&self, id: i64) -> ParkResult<Option<User>> {
        let sql = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn find_by_username(&self, username: &str) -> ParkResult<Option<User>> {
        let sql = format!("SELECT {COLUMNS} FROM users WHERE username = $1");
        sqlx::query_as::<_, UserRow>(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn list(&self) -> ParkResult<Vec<User>> {
        let sql = format!("SELECT {COLUMNS} FROM users ORDER BY id");
        sqlx::query_as::<_, UserRow>(&sql)
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(User::try_from)
            .collect()
    }

    async fn update_password(&self, id: i64, password_hash: &str, updated_by: &str) -> ParkResult<()> {
        let result = sqlx::query(
            "UPDATE users
             SET password_hash = $1, updated_at = NOW(), updated_by = $2
             WHERE id = $3",
        )
        .bind(password_hash)
        .bind(updated_by)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(ParkError::NotFound(format!("사용자 id={}", id)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(role: &str) -> UserRow {
        UserRow {
            id: 1,
            username: "admin@park.com".to_string(),
            password_hash: "$argon2id$...".to_string(),
            role: role.to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            created_by: None,
            updated_by: None,
        }
    }

    #[test]
    fn test_row_role_mapping() {
        let user = User::try_from(row("ROLE_ADMIN")).unwrap();
        assert_eq!(user.role, Role::Admin);

        let user = User::try_from(row("ROLE_CUSTOMER")).unwrap();
        assert_eq!(user.role, Role::Customer);
    }

    #[test]
    fn test_row_unknown_role_rejected() {
        assert!(matches!(User::try_from(row("ADMIN")), Err(ParkError::Database(_))));
    }
}
