//! 모든 핸들러에서 공유되는 애플리케이션 상태.
//!
//! AppState는 Arc로 래핑되어 여러 요청 간에 공유됩니다.
//! 공유되는 값은 기동 후 변경되지 않는 서명 키와 저장소 핸들뿐입니다.

use std::sync::Arc;

use park_core::{CustomerStore, ParkingSpaceStore, UserStore};
use sqlx::PgPool;

use crate::auth::{Authenticator, PrincipalResolver, TokenCodec};
use crate::repository::{
    MemoryCustomerStore, MemoryParkingSpaceStore, MemoryUserStore, PgCustomerStore,
    PgParkingSpaceStore, PgUserStore,
};

/// 애플리케이션 공유 상태.
///
/// Axum의 State extractor를 통해 핸들러에 주입됩니다.
#[derive(Clone)]
pub struct AppState {
    /// 토큰 발급/검증기
    pub tokens: Arc<TokenCodec>,

    /// 사용자 저장소
    pub users: Arc<dyn UserStore>,

    /// 고객 저장소
    pub customers: Arc<dyn CustomerStore>,

    /// 주차면 저장소
    pub parking_spaces: Arc<dyn ParkingSpaceStore>,

    /// 로그인 자격 증명 검증기
    pub authenticator: Authenticator,

    /// 토큰 주체 → 사용자 ID 해석기
    pub principals: PrincipalResolver,

    /// 데이터베이스 연결 풀 (메모리 저장소 사용 시 None)
    pub db_pool: Option<PgPool>,

    /// 서버 시작 시간
    pub started_at: chrono::DateTime<chrono::Utc>,

    /// API 버전
    pub version: String,
}

impl AppState {
    /// 저장소를 직접 지정해 생성합니다.
    pub fn new(
        tokens: TokenCodec,
        users: Arc<dyn UserStore>,
        customers: Arc<dyn CustomerStore>,
        parking_spaces: Arc<dyn ParkingSpaceStore>,
    ) -> Self {
        Self {
            tokens: Arc::new(tokens),
            authenticator: Authenticator::new(users.clone()),
            principals: PrincipalResolver::new(users.clone()),
            users,
            customers,
            parking_spaces,
            db_pool: None,
            started_at: chrono::Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// PostgreSQL 저장소로 생성합니다.
    pub fn postgres(tokens: TokenCodec, pool: PgPool) -> Self {
        let mut state = Self::new(
            tokens,
            Arc::new(PgUserStore::new(pool.clone())),
            Arc::new(PgCustomerStore::new(pool.clone())),
            Arc::new(PgParkingSpaceStore::new(pool.clone())),
        );
        state.db_pool = Some(pool);
        state
    }

    /// 메모리 저장소로 생성합니다.
    pub fn in_memory(tokens: TokenCodec) -> Self {
        Self::new(
            tokens,
            Arc::new(MemoryUserStore::new()),
            Arc::new(MemoryCustomerStore::new()),
            Arc::new(MemoryParkingSpaceStore::new()),
        )
    }

    /// 서버 업타임(초).
    pub fn uptime_secs(&self) -> i64 {
        (chrono::Utc::now() - self.started_at).num_seconds()
    }

    /// 데이터베이스 연결 상태 확인.
    pub async fn is_db_healthy(&self) -> bool {
        match &self.db_pool {
            Some(pool) => sqlx::query("SELECT 1").execute(pool).await.is_ok(),
            None => false,
        }
    }
}

/// 테스트용 AppState 생성 (메모리 저장소, 고정 서명 키, 30분 TTL).
#[cfg(any(test, feature = "test-utils"))]
pub fn create_test_state() -> AppState {
    use secrecy::SecretString;

    let secret = SecretString::from("test-secret-key-for-jwt-testing-minimum-32-chars");
    AppState::in_memory(TokenCodec::new(&secret, chrono::Duration::minutes(30)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use park_core::Role;

    #[tokio::test]
    async fn test_in_memory_state() {
        let state = create_test_state();
        assert!(state.db_pool.is_none());
        assert!(!state.is_db_healthy().await);
        assert!(state.uptime_secs() >= 0);
        assert!(state.users.list().await.unwrap().is_empty());
    }

    #[test]
    fn test_state_codec_issues_tokens() {
        let state = create_test_state();
        let now = chrono::Utc::now();
        let token = state.tokens.issue("ana@park.com", Role::Customer, now).unwrap();
        assert_eq!(state.tokens.verify(&token, now).unwrap().role, Role::Customer);
    }
}
