//! API 서버용 HTTP middleware.
//!
//! 요청 처리 파이프라인에 적용되는 middleware 모듈.
//! 인증/인가 미들웨어는 [`crate::auth`]에 있습니다.

mod error_context;

pub use error_context::error_context;
