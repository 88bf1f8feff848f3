//! 주차면 endpoint (ADMIN 전용).

use std::borrow::Cow;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header::LOCATION, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use park_core::{NewParkingSpace, ParkingSpace, ParkingStatus};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::auth::AuthPrincipal;
use crate::error::{ApiError, ApiErrorResponse, ApiResult};
use crate::extract::ValidatedJson;
use crate::state::AppState;

pub const PARKING: &str = "/api/v1/parking";
pub const PARKING_BY_CODE: &str = "/api/v1/parking/{code}";

/// 주차면 등록 요청.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateParkingSpaceRequest {
    /// 주차면 코드 (영문 대문자, 숫자, `-` 4자)
    #[validate(
        length(equal = 4, message = "코드는 4자여야 합니다"),
        custom(function = "validate_code")
    )]
    #[schema(example = "A-01")]
    pub code: String,
    /// 상태 (FREE | BUSY)
    #[validate(custom(function = "validate_status"))]
    #[schema(example = "FREE")]
    pub status: String,
}

/// 코드는 URL 경로와 `Location` 헤더에 그대로 들어갑니다.
fn validate_code(code: &str) -> Result<(), ValidationError> {
    if code
        .bytes()
        .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit() || b == b'-')
    {
        Ok(())
    } else {
        Err(ValidationError::new("code")
            .with_message(Cow::Borrowed("코드는 영문 대문자, 숫자, '-'만 사용할 수 있습니다")))
    }
}

fn validate_status(status: &str) -> Result<(), ValidationError> {
    match ParkingStatus::parse(status) {
        Some(_) => Ok(()),
        None => Err(ValidationError::new("status")
            .with_message(Cow::Borrowed("상태는 FREE 또는 BUSY여야 합니다"))),
    }
}

/// 주차면 응답.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ParkingSpaceResponse {
    pub id: i64,
    pub code: String,
    pub status: ParkingStatus,
}

impl From<ParkingSpace> for ParkingSpaceResponse {
    fn from(space: ParkingSpace) -> Self {
        Self {
            id: space.id,
            code: space.code,
            status: space.status,
        }
    }
}

/// 주차면 등록. 본문 없이 `Location` 헤더로 새 리소스를 알립니다.
#[utoipa::path(
    post,
    path = "/api/v1/parking",
    tag = "parking",
    security(("bearer_auth" = [])),
    request_body = CreateParkingSpaceRequest,
    responses(
        (status = 201, description = "등록됨", headers(("Location" = String, description = "새 주차면 경로"))),
        (status = 401, description = "인증 필요", body = ApiErrorResponse),
        (status = 403, description = "ADMIN 전용", body = ApiErrorResponse),
        (status = 409, description = "코드 중복", body = ApiErrorResponse),
        (status = 422, description = "입력 값 오류", body = ApiErrorResponse)
    )
)]
pub async fn create_parking_space(
    State(state): State<Arc<AppState>>,
    AuthPrincipal(principal): AuthPrincipal,
    ValidatedJson(req): ValidatedJson<CreateParkingSpaceRequest>,
) -> ApiResult<Response> {
    let status = ParkingStatus::parse(&req.status)
        .ok_or_else(|| ApiError::BadRequest(format!("알 수 없는 상태: {}", req.status)))?;

    let space = state
        .parking_spaces
        .create(NewParkingSpace {
            code: req.code,
            status,
            created_by: Some(principal.subject().to_string()),
        })
        .await?;

    info!(code = %space.code, status = %space.status, "Parking space created");

    let location = HeaderValue::try_from(format!("{}/{}", PARKING, space.code))
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok((StatusCode::CREATED, [(LOCATION, location)]).into_response())
}

/// 코드로 주차면 조회.
#[utoipa::path(
    get,
    path = "/api/v1/parking/{code}",
    tag = "parking",
    security(("bearer_auth" = [])),
    params(("code" = String, Path, description = "주차면 코드")),
    responses(
        (status = 200, description = "주차면", body = ParkingSpaceResponse),
        (status = 401, description = "인증 필요", body = ApiErrorResponse),
        (status = 403, description = "ADMIN 전용", body = ApiErrorResponse),
        (status = 404, description = "없음", body = ApiErrorResponse)
    )
)]
pub async fn get_parking_space(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> ApiResult<Json<ParkingSpaceResponse>> {
    let space = state
        .parking_spaces
        .find_by_code(&code)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("주차면을 찾을 수 없습니다: {}", code)))?;

    Ok(Json(space.into()))
}

/// 주차면 라우터 생성.
pub fn parking_router() -> Router<Arc<AppState>> {
    Router::new()
        .route(PARKING, post(create_parking_space))
        .route(PARKING_BY_CODE, get(get_parking_space))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_validation() {
        let ok = CreateParkingSpaceRequest {
            code: "A-01".to_string(),
            status: "FREE".to_string(),
        };
        assert!(ok.validate().is_ok());

        let bad = CreateParkingSpaceRequest {
            code: "A-001".to_string(),
            status: "free".to_string(),
        };
        let errors = bad.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("code"));
        assert!(errors.field_errors().contains_key("status"));
    }

    #[test]
    fn test_code_rejects_unsafe_characters() {
        for code in ["A/01", "a-01", "A 01", "A\n01", "Á-1", "../."] {
            let req = CreateParkingSpaceRequest {
                code: code.to_string(),
                status: "FREE".to_string(),
            };
            let errors = req.validate().unwrap_err();
            assert!(errors.field_errors().contains_key("code"), "{:?}", code);
        }

        for code in ["B-12", "0000", "ZZ-9"] {
            let req = CreateParkingSpaceRequest {
                code: code.to_string(),
                status: "BUSY".to_string(),
            };
            assert!(req.validate().is_ok(), "{:?}", code);
        }
    }
}
