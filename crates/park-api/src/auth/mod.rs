//! 인증 및 권한 부여.
//!
//! Bearer 토큰 기반 인증과 라우트별 역할 검사를 제공합니다.
//!
//! # 구성 요소
//!
//! - [`TokenCodec`]: 토큰 발급/검증
//! - [`Authenticator`]: 로그인 자격 증명 검증
//! - [`authenticate`]: 요청마다 토큰을 검증해 [`Principal`]을 붙이는 미들웨어
//! - [`AccessPolicy`] / [`authorize`]: 라우트별 요구 역할 검사
//! - [`AuthPrincipal`]: 핸들러용 주체 추출기
//!
//! # 사용 예시
//!
//! ```rust,ignore
//! async fn protected_handler(
//!     AuthPrincipal(principal): AuthPrincipal,
//! ) -> impl IntoResponse {
//!     format!("Hello, {}!", principal.subject())
//! }
//! ```

mod credentials;
mod jwt;
mod middleware;
mod password;
mod policy;
mod principal;

pub use credentials::{Authenticator, CredentialError};
pub use jwt::{Claims, TokenCodec, TokenError};
pub use middleware::{authenticate, bearer_token, AuthError, AuthPrincipal};
pub use password::{
    hash_password, hash_password_blocking, verify_password, verify_password_blocking, PasswordError,
};
pub use policy::{authorize, decide, AccessPolicy, AccessPolicyBuilder, RoleSet};
pub use principal::{Principal, PrincipalResolver};
