//! 사용자 endpoint.
//!
//! # 엔드포인트
//!
//! - `POST /api/v1/users` - 계정 생성 (공개, 항상 CUSTOMER)
//! - `GET /api/v1/users` - 전체 조회 (ADMIN)
//! - `GET /api/v1/users/{id}` - 단건 조회 (ADMIN)
//! - `PATCH /api/v1/users/{id}` - 본인 비밀번호 변경 (CUSTOMER)

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use park_core::{NewUser, Role, User};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;
use validator::Validate;

use crate::auth::{hash_password_blocking, verify_password_blocking, AuthError, AuthPrincipal, PasswordError};
use crate::error::{ApiError, ApiErrorResponse, ApiResult};
use crate::extract::ValidatedJson;
use crate::state::AppState;

pub const USERS: &str = "/api/v1/users";
pub const USER_BY_ID: &str = "/api/v1/users/{id}";

/// 계정 생성 요청.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    /// 사용자명 (이메일)
    #[validate(email(message = "사용자명은 이메일 형식이어야 합니다"))]
    #[schema(example = "ana@park.com")]
    pub username: String,
    /// 비밀번호 (6자)
    #[validate(length(equal = 6, message = "비밀번호는 6자여야 합니다"))]
    #[schema(example = "123456")]
    pub password: String,
}

/// 비밀번호 변경 요청.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct PasswordUpdateRequest {
    #[validate(length(equal = 6, message = "비밀번호는 6자여야 합니다"))]
    pub current_password: String,
    #[validate(length(equal = 6, message = "비밀번호는 6자여야 합니다"))]
    pub new_password: String,
    #[validate(length(equal = 6, message = "비밀번호는 6자여야 합니다"))]
    pub confirm_password: String,
}

/// 사용자 응답. 비밀번호 해시는 포함하지 않습니다.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub role: Role,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            role: user.role,
        }
    }
}

/// 계정 생성.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    tag = "users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "생성됨", body = UserResponse),
        (status = 409, description = "사용자명 중복", body = ApiErrorResponse),
        (status = 422, description = "입력 값 오류", body = ApiErrorResponse)
    )
)]
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    let password_hash = hash_password_blocking(req.password).await?;

    let user = state
        .users
        .create(NewUser {
            username: req.username,
            password_hash,
            role: Role::Customer,
            created_by: None,
        })
        .await?;

    info!(user_id = user.id, username = %user.username, "User registered");
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// 전체 사용자 조회.
#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "사용자 목록", body = [UserResponse]),
        (status = 401, description = "인증 필요", body = ApiErrorResponse),
        (status = 403, description = "ADMIN 전용", body = ApiErrorResponse)
    )
)]
pub async fn list_users(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<UserResponse>>> {
    let users = state.users.list().await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// 사용자 단건 조회.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    tag = "users",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "사용자 ID")),
    responses(
        (status = 200, description = "사용자", body = UserResponse),
        (status = 401, description = "인증 필요", body = ApiErrorResponse),
        (status = 403, description = "ADMIN 전용", body = ApiErrorResponse),
        (status = 404, description = "없음", body = ApiErrorResponse)
    )
)]
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<UserResponse>> {
    let user = state
        .users
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("사용자를 찾을 수 없습니다: id={}", id)))?;

    Ok(Json(user.into()))
}

/// 본인 비밀번호 변경.
#[utoipa::path(
    patch,
    path = "/api/v1/users/{id}",
    tag = "users",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "사용자 ID (본인)")),
    request_body = PasswordUpdateRequest,
    responses(
        (status = 204, description = "변경됨"),
        (status = 400, description = "확인 불일치 또는 현재 비밀번호 오류", body = ApiErrorResponse),
        (status = 401, description = "인증 필요", body = ApiErrorResponse),
        (status = 403, description = "다른 사용자", body = ApiErrorResponse),
        (status = 422, description = "입력 값 오류", body = ApiErrorResponse)
    )
)]
pub async fn update_password(
    State(state): State<Arc<AppState>>,
    AuthPrincipal(principal): AuthPrincipal,
    Path(id): Path<i64>,
    ValidatedJson(req): ValidatedJson<PasswordUpdateRequest>,
) -> ApiResult<StatusCode> {
    if state.principals.user_id(&principal).await? != id {
        return Err(AuthError::Forbidden.into());
    }

    if req.new_password != req.confirm_password {
        return Err(ApiError::BadRequest(
            "새 비밀번호와 확인 비밀번호가 일치하지 않습니다".to_string(),
        ));
    }

    let user = state
        .users
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("사용자를 찾을 수 없습니다: id={}", id)))?;

    match verify_password_blocking(req.current_password, user.password_hash).await {
        Ok(()) => {}
        Err(PasswordError::VerificationFailed | PasswordError::InvalidHashFormat) => {
            return Err(ApiError::BadRequest(
                "현재 비밀번호가 일치하지 않습니다".to_string(),
            ));
        }
        Err(e) => return Err(e.into()),
    }

    let password_hash = hash_password_blocking(req.new_password).await?;
    state
        .users
        .update_password(id, &password_hash, principal.subject())
        .await?;

    info!(user_id = id, "Password updated");
    Ok(StatusCode::NO_CONTENT)
}

/// 사용자 라우터 생성.
pub fn users_router() -> Router<Arc<AppState>> {
    Router::new()
        .route(USERS, get(list_users).post(create_user))
        .route(USER_BY_ID, get(get_user).patch(update_password))
}
