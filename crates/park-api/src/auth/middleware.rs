//! Axum용 인증 미들웨어.
//!
//! [`authenticate`]는 모든 요청에서 Bearer 토큰을 검증해 [`Principal`]을
//! 요청 extension에 넣습니다. 실패해도 요청을 막지 않으며, 거부 여부는
//! [`super::policy::authorize`]가 결정합니다.

use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use tracing::debug;

use super::{Principal, TokenCodec};
use crate::error::ApiError;

const BEARER_PREFIX: &str = "Bearer ";

/// 인증/인가 실패.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("인증이 필요합니다")]
    Unauthenticated,
    #[error("이 리소스에 접근할 권한이 없습니다")]
    Forbidden,
    /// 로그인 실패. 사용자 부재와 비밀번호 불일치를 구분하지 않습니다.
    #[error("아이디 또는 비밀번호가 올바르지 않습니다")]
    InvalidCredentials,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        ApiError::from(self).into_response()
    }
}

/// Bearer 토큰 추출.
///
/// 헤더가 없거나, UTF-8이 아니거나, `Bearer ` 접두사가 없으면 `None`.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let token = headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix(BEARER_PREFIX)?
        .trim();

    (!token.is_empty()).then_some(token)
}

/// 요청 인터셉터.
///
/// 검증에 성공하면 [`Principal`]을 extension에 추가하고,
/// 어떤 실패든 주체 없이 다음 단계로 넘깁니다.
pub async fn authenticate(
    State(codec): State<Arc<TokenCodec>>,
    mut request: Request,
    next: Next,
) -> Response {
    request.extensions_mut().remove::<Principal>();

    if let Some(token) = bearer_token(request.headers()) {
        let now = Utc::now();
        match codec.verify(token, now) {
            Ok(claims) => {
                let principal = Principal::from_claims(&claims);
                debug!(username = %principal.subject(), role = %principal.role(), "Bearer token accepted");
                request.extensions_mut().insert(principal);
            }
            Err(e) => {
                debug!(reason = e.kind(), "Bearer token rejected");
            }
        }
    }

    next.run(request).await
}

/// 인증된 주체 추출기.
///
/// ```rust,ignore
/// async fn handler(AuthPrincipal(principal): AuthPrincipal) -> impl IntoResponse {
///     format!("Hello, {}!", principal.subject())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthPrincipal(pub Principal);

impl<S> FromRequestParts<S> for AuthPrincipal
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .map(AuthPrincipal)
            .ok_or(AuthError::Unauthenticated)
    }
}
