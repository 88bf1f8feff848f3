//! API 라우트.
//!
//! 모든 REST API 엔드포인트를 정의하고 라우터를 구성합니다.
//!
//! # 라우트 구조
//!
//! - `/health`, `/health/ready` - 헬스 체크 (공개)
//! - `/api/v1/auth` - 로그인 (공개)
//! - `/api/v1/users` - 계정 관리
//! - `/api/v1/customers` - 고객 관리
//! - `/api/v1/parking` - 주차면 관리
//! - `/docs-park` - Swagger UI (공개)

pub mod auth;
pub mod customers;
pub mod health;
pub mod parking;
pub mod users;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{Method, StatusCode},
    middleware, Router,
};
use park_core::Role;
use tower_http::timeout::TimeoutLayer;

pub use auth::auth_router;
pub use customers::customers_router;
pub use health::health_router;
pub use parking::parking_router;
pub use users::users_router;

use crate::auth::{authenticate, authorize, AccessPolicy};
use crate::middleware::error_context;
use crate::openapi::swagger_ui_router;
use crate::state::AppState;

/// 라우트별 접근 정책.
///
/// 각 라우트는 공개이거나 정확히 하나의 역할만 허용합니다.
/// 이 표에 없는 API 라우트는 인증된 주체를 요구합니다.
pub fn access_policy() -> AccessPolicy {
    AccessPolicy::builder()
        // 공개
        .public(Method::POST, users::USERS)
        .public(Method::POST, auth::AUTH)
        // ADMIN
        .require(Method::GET, users::USERS, Role::Admin)
        .require(Method::GET, users::USER_BY_ID, Role::Admin)
        .require(Method::GET, customers::CUSTOMERS, Role::Admin)
        .require(Method::GET, customers::CUSTOMER_BY_ID, Role::Admin)
        .require(Method::POST, parking::PARKING, Role::Admin)
        .require(Method::GET, parking::PARKING_BY_CODE, Role::Admin)
        // CUSTOMER
        .require(Method::PATCH, users::USER_BY_ID, Role::Customer)
        .require(Method::POST, customers::CUSTOMERS, Role::Customer)
        .require(Method::GET, customers::CUSTOMER_DETAILS, Role::Customer)
        .build()
}

/// 인가 검사가 적용된 API 라우터 생성.
pub fn create_api_router(policy: AccessPolicy) -> Router<Arc<AppState>> {
    Router::new()
        .merge(auth_router())
        .merge(users_router())
        .merge(customers_router())
        .merge(parking_router())
        .route_layer(middleware::from_fn_with_state(Arc::new(policy), authorize))
}

/// 요청 처리 제한 시간.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// 전체 애플리케이션 라우터 생성.
///
/// 요청 흐름: 에러 정보 보강 → 타임아웃 → 토큰 검증 → 라우팅 → 인가 → 핸들러.
/// CORS, 트레이싱 레이어는 바이너리에서 추가합니다.
pub fn create_app(state: Arc<AppState>) -> Router {
    create_app_with_timeout(state, REQUEST_TIMEOUT)
}

/// 제한 시간을 지정해 애플리케이션 라우터를 생성합니다.
///
/// 408 응답도 에러 정보 보강 계층을 거쳐 같은 형식의 본문을 갖습니다.
pub fn create_app_with_timeout(state: Arc<AppState>, timeout: Duration) -> Router {
    let tokens = state.tokens.clone();

    Router::new()
        .merge(create_api_router(access_policy()))
        .merge(health_router())
        .with_state(state)
        .merge(swagger_ui_router())
        .layer(middleware::from_fn_with_state(tokens, authenticate))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            timeout,
        ))
        .layer(middleware::from_fn(error_context))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::RoleSet;

    #[test]
    fn test_each_route_allows_at_most_one_role() {
        let policy = access_policy();
        let routes = [
            (Method::GET, users::USERS),
            (Method::GET, users::USER_BY_ID),
            (Method::PATCH, users::USER_BY_ID),
            (Method::GET, customers::CUSTOMERS),
            (Method::POST, customers::CUSTOMERS),
            (Method::GET, customers::CUSTOMER_BY_ID),
            (Method::GET, customers::CUSTOMER_DETAILS),
            (Method::POST, parking::PARKING),
            (Method::GET, parking::PARKING_BY_CODE),
        ];

        for (method, path) in routes {
            let required = policy.requirement(&method, path);
            assert!(!required.is_public(), "{} {}", method, path);
            assert_ne!(required, RoleSet::any(), "{} {}", method, path);
        }
    }

    #[test]
    fn test_public_routes() {
        let policy = access_policy();
        assert!(policy.requirement(&Method::POST, users::USERS).is_public());
        assert!(policy.requirement(&Method::POST, auth::AUTH).is_public());
    }
}
