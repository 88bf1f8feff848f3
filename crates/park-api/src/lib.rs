//! 주차장 관리 REST API 서버.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - Axum 기반 REST API (계정, 고객, 주차면)
//! - Bearer 토큰 인증과 라우트별 역할 검사
//! - PostgreSQL / 메모리 저장소
//! - OpenAPI 문서 및 Swagger UI
//!
//! # 모듈 구성
//!
//! - [`state`]: 애플리케이션 공유 상태 (AppState)
//! - [`routes`]: REST API 엔드포인트와 접근 정책
//! - [`auth`]: 토큰 발급/검증, 로그인, 인가
//! - [`middleware`]: HTTP 미들웨어
//! - [`repository`]: 저장소 구현
//! - [`openapi`]: OpenAPI 문서 및 Swagger UI

pub mod auth;
pub mod bootstrap;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod openapi;
pub mod repository;
pub mod routes;
pub mod state;

pub use auth::{
    hash_password, verify_password, AccessPolicy, AuthError, AuthPrincipal, Authenticator, Claims,
    Principal, RoleSet, TokenCodec, TokenError,
};
pub use error::{ApiError, ApiErrorResponse, ApiResult, FieldError};
pub use routes::{access_policy, create_api_router, create_app, create_app_with_timeout};
pub use state::AppState;

#[cfg(any(test, feature = "test-utils"))]
pub use state::create_test_state;
