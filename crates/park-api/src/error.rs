//! 통합 API 에러 응답 타입.
//!
//! 모든 실패는 같은 형식의 JSON 본문으로 응답합니다.
//! 메서드와 경로는 [`crate::middleware::error_context`]가 응답 직전에 채웁니다.

use axum::{
    http::{header::WWW_AUTHENTICATE, HeaderValue, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use park_core::ParkError;
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;

use crate::auth::{AuthError, PasswordError};

/// 필드 단위 검증 실패.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldError {
    /// 필드명
    pub field: String,
    /// 실패 사유
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// 통합 API 에러 응답.
///
/// # 예시
///
/// ```json
/// {
///   "timestamp": "2024-05-01T12:00:00Z",
///   "status": 422,
///   "reason": "Unprocessable Entity",
///   "code": "VALIDATION_ERROR",
///   "message": "입력 값이 올바르지 않습니다",
///   "method": "POST",
///   "path": "/api/v1/users",
///   "errors": [{"field": "username", "message": "이메일 형식이어야 합니다"}]
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorResponse {
    /// 발생 시각 (RFC 3339)
    pub timestamp: String,
    /// HTTP 상태 코드
    pub status: u16,
    /// 상태 코드 설명 (예: "Unauthorized")
    pub reason: String,
    /// 에러 코드 (예: "UNAUTHENTICATED", "NOT_FOUND")
    pub code: String,
    /// 사람이 읽을 수 있는 에러 메시지
    pub message: String,
    /// HTTP 메서드
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    /// 요청 경로
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// 필드 검증 실패 목록 (검증 에러에만 포함)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
}

impl ApiErrorResponse {
    pub fn new(status: StatusCode, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            timestamp: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            code: code.into(),
            message: message.into(),
            method: None,
            path: None,
            errors: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_errors(mut self, errors: Vec<FieldError>) -> Self {
        self.errors = errors;
        self
    }

    /// 요청 정보(메서드, 경로)를 추가합니다.
    #[must_use]
    pub fn with_request_info(mut self, method: &Method, uri: &Uri) -> Self {
        self.method = Some(method.to_string());
        self.path = Some(uri.path().to_string());
        self
    }

    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl std::fmt::Display for ApiErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let mut response = (status, Json(self.clone())).into_response();

        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }

        // 요청 정보를 채울 수 있도록 본문 원본을 남겨둠
        response.extensions_mut().insert(self);
        response
    }
}

/// 핸들러 에러.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("입력 값이 올바르지 않습니다")]
    Validation(Vec<FieldError>),

    /// 원인은 로그에만 남기고 응답 본문에는 포함하지 않습니다.
    #[error("내부 서버 오류가 발생했습니다")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Auth(AuthError::Unauthenticated | AuthError::InvalidCredentials) => {
                StatusCode::UNAUTHORIZED
            }
            ApiError::Auth(AuthError::Forbidden) => StatusCode::FORBIDDEN,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Auth(AuthError::Unauthenticated) => "UNAUTHENTICATED",
            ApiError::Auth(AuthError::InvalidCredentials) => "INVALID_CREDENTIALS",
            ApiError::Auth(AuthError::Forbidden) => "FORBIDDEN",
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::Validation(_) => "VALIDATION_ERROR",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn to_response_body(&self) -> ApiErrorResponse {
        let body = ApiErrorResponse::new(self.status(), self.code(), self.to_string());
        match self {
            ApiError::Validation(errors) => body.with_errors(errors.clone()),
            _ => body,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(detail) = &self {
            error!(detail = %detail, "Request failed with internal error");
        }
        self.to_response_body().into_response()
    }
}

impl From<ParkError> for ApiError {
    fn from(err: ParkError) -> Self {
        match err {
            ParkError::NotFound(msg) => ApiError::NotFound(msg),
            ParkError::Conflict(msg) => ApiError::Conflict(msg),
            ParkError::InvalidInput(msg) => ApiError::BadRequest(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

/// API 핸들러 Result 타입 별칭.
pub type ApiResult<T> = Result<T, ApiError>;
