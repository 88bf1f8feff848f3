//! 주차면 Repository (PostgreSQL).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use park_core::{NewParkingSpace, ParkError, ParkResult, ParkingSpace, ParkingSpaceStore, ParkingStatus};
use sqlx::{FromRow, PgPool};

use super::map_write_error;

#[derive(Debug, FromRow)]
struct ParkingSpaceRow {
    id: i64,
    code: String,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[sqlx(default)]
    created_by: Option<String>,
    #[sqlx(default)]
    updated_by: Option<String>,
}

impl TryFrom<ParkingSpaceRow> for ParkingSpace {
    type Error = ParkError;

    fn try_from(row: ParkingSpaceRow) -> Result<Self, Self::Error> {
        let status = ParkingStatus::parse(&row.status)
            .ok_or_else(|| ParkError::Database(format!("알 수 없는 주차면 상태: {}", row.status)))?;

        Ok(ParkingSpace {
            id: row.id,
            code: row.code,
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
            created_by: row.created_by,
            updated_by: row.updated_by,
        })
    }
}

/// PostgreSQL 주차면 저장소.
#[derive(Clone)]
pub struct PgParkingSpaceStore {
    pool: PgPool,
}

impl PgParkingSpaceStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ParkingSpaceStore for PgParkingSpaceStore {
    async fn create(&self, space: NewParkingSpace) -> ParkResult<ParkingSpace> {
        let row = sqlx::query_as::<_, ParkingSpaceRow>(
            "INSERT INTO parking_spaces (code, status, created_by, updated_by)
             VALUES ($1, $2, $3, $3)
             RETURNING id, code, status, created_at, updated_at, created_by, updated_by",
        )
        .bind(&space.code)
        .bind(space.status.as_str())
        .bind(&space.created_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, |_| format!("이미 등록된 주차면 코드입니다: {}", space.code)))?;

        row.try_into()
    }

    async fn find_by_code(&self, code: &str) -> ParkResult<Option<ParkingSpace>> {
        sqlx::query_as::<_, ParkingSpaceRow>(
            "SELECT id, code, status, created_at, updated_at, created_by, updated_by
             FROM parking_spaces
             WHERE code = $1",
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await?
        .map(ParkingSpace::try_from)
        .transpose()
    }
}
