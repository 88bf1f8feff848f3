//! 로그인 endpoint.
//!
//! 자격 증명을 검증하고 Bearer 토큰을 발급합니다.

use std::sync::Arc;

use axum::{extract::State, routing::post, Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;
use validator::Validate;

use crate::auth::{AuthError, CredentialError};
use crate::error::{ApiError, ApiErrorResponse, ApiResult};
use crate::extract::ValidatedJson;
use crate::state::AppState;

/// 로그인 경로.
pub const AUTH: &str = "/api/v1/auth";

/// 로그인 요청.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    /// 사용자명 (이메일)
    #[validate(email(message = "사용자명은 이메일 형식이어야 합니다"))]
    #[schema(example = "ana@park.com")]
    pub username: String,
    /// 비밀번호 (6자)
    #[validate(length(equal = 6, message = "비밀번호는 6자여야 합니다"))]
    #[schema(example = "123456")]
    pub password: String,
}

/// 발급된 토큰.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub token: String,
    /// 항상 "Bearer"
    pub token_type: String,
    /// 유효 시간 (초)
    pub expires_in: i64,
}

/// 로그인.
///
/// 사용자가 없거나 비밀번호가 틀려도 같은 401 응답을 반환합니다.
#[utoipa::path(
    post,
    path = "/api/v1/auth",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "토큰 발급", body = TokenResponse),
        (status = 401, description = "자격 증명 불일치", body = ApiErrorResponse),
        (status = 422, description = "입력 값 오류", body = ApiErrorResponse)
    )
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> ApiResult<Json<TokenResponse>> {
    let role = state
        .authenticator
        .authenticate(&req.username, &req.password)
        .await
        .map_err(|e| match e {
            CredentialError::NotFound | CredentialError::InvalidCredential => {
                info!(username = %req.username, "Login failed");
                ApiError::from(AuthError::InvalidCredentials)
            }
            CredentialError::Store(e) => ApiError::from(e),
            CredentialError::Password(e) => ApiError::from(e),
        })?;

    let token = state
        .tokens
        .issue(&req.username, role, Utc::now())
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    info!(username = %req.username, role = %role, "Token issued");

    Ok(Json(TokenResponse {
        token,
        token_type: "Bearer".to_string(),
        expires_in: state.tokens.ttl().num_seconds(),
    }))
}

/// 로그인 라우터 생성.
pub fn auth_router() -> Router<Arc<AppState>> {
    Router::new().route(AUTH, post(login))
}
