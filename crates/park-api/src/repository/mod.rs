//! 저장소 구현.
//!
//! `park_core`의 저장소 trait을 PostgreSQL(`sqlx`)과 메모리로 구현합니다.
//! PostgreSQL 구현은 `database.url`이 설정된 경우에만 사용됩니다.

pub mod customers;
pub mod memory;
pub mod parking_spaces;
pub mod users;

use std::time::Duration;

use park_core::{DatabaseConfig, ParkError, ParkResult};
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;

pub use customers::PgCustomerStore;
pub use memory::{MemoryCustomerStore, MemoryParkingSpaceStore, MemoryUserStore};
pub use parking_spaces::PgParkingSpaceStore;
pub use users::PgUserStore;

/// 연결 풀 생성.
pub async fn connect(config: &DatabaseConfig, url: &str) -> ParkResult<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.connection_timeout_secs))
        .connect(url)
        .await?;

    info!(max_connections = config.max_connections, "Database connection established");
    Ok(pool)
}

/// 스키마 마이그레이션 실행.
pub async fn migrate(pool: &PgPool) -> ParkResult<()> {
    info!("Running database migrations...");

    sqlx::migrate!("../../migrations")
        .run(pool)
        .await
        .map_err(|e| ParkError::Database(e.to_string()))?;

    info!("Migrations completed successfully");
    Ok(())
}

/// 유일성 제약 위반이면 `Conflict`로, 그 외에는 `Database`로 변환합니다.
///
/// `describe`는 위반된 제약 이름을 받아 사용자용 메시지를 만듭니다.
pub(crate) fn map_write_error(err: sqlx::Error, describe: impl FnOnce(Option<&str>) -> String) -> ParkError {
    if let Some(db) = err.as_database_error() {
        if db.is_unique_violation() {
            return ParkError::Conflict(describe(db.constraint()));
        }
    }
    ParkError::from(err)
}
