//! OpenAPI 문서화 설정.
//!
//! utoipa로 OpenAPI 3 스펙을 생성합니다.
//! Swagger UI는 `/docs-park`, JSON 스펙은 `/v3/api-docs/openapi.json`에서 제공되며
//! 두 경로 모두 인증 없이 접근할 수 있습니다.
//!
//! 새 엔드포인트를 추가할 때:
//!
//! 1. 응답/요청 타입에 `#[derive(ToSchema)]` 추가
//! 2. 핸들러에 `#[utoipa::path(...)]` 어노테이션 추가
//! 3. 이 파일의 `paths(...)` 및 `components(schemas(...))`에 추가

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::error::{ApiErrorResponse, FieldError};
use crate::routes::{
    auth::{LoginRequest, TokenResponse},
    customers::{CreateCustomerRequest, CustomerPageResponse, CustomerResponse},
    health::{ComponentHealth, ComponentStatus, HealthResponse},
    parking::{CreateParkingSpaceRequest, ParkingSpaceResponse},
    users::{CreateUserRequest, PasswordUpdateRequest, UserResponse},
};

/// Swagger UI 경로.
pub const SWAGGER_UI_PATH: &str = "/docs-park";
/// OpenAPI JSON 경로.
pub const OPENAPI_JSON_PATH: &str = "/v3/api-docs/openapi.json";

/// Bearer 인증 스키마 등록.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// API 문서.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Park API",
        version = "0.1.0",
        description = "주차장 관리 REST API. 로그인으로 발급받은 토큰을 `Authorization: Bearer <token>` 헤더로 전달합니다."
    ),
    paths(
        crate::routes::health::health_check,
        crate::routes::health::health_ready,
        crate::routes::auth::login,
        crate::routes::users::create_user,
        crate::routes::users::list_users,
        crate::routes::users::get_user,
        crate::routes::users::update_password,
        crate::routes::customers::create_customer,
        crate::routes::customers::list_customers,
        crate::routes::customers::get_customer,
        crate::routes::customers::get_own_details,
        crate::routes::parking::create_parking_space,
        crate::routes::parking::get_parking_space,
    ),
    components(schemas(
        ApiErrorResponse,
        FieldError,
        HealthResponse,
        ComponentHealth,
        ComponentStatus,
        LoginRequest,
        TokenResponse,
        CreateUserRequest,
        PasswordUpdateRequest,
        UserResponse,
        CreateCustomerRequest,
        CustomerResponse,
        CustomerPageResponse,
        CreateParkingSpaceRequest,
        ParkingSpaceResponse,
        park_core::Role,
        park_core::ParkingStatus,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "헬스 체크"),
        (name = "auth", description = "로그인"),
        (name = "users", description = "계정 관리"),
        (name = "customers", description = "고객 관리"),
        (name = "parking", description = "주차면 관리")
    )
)]
pub struct ApiDoc;

/// Swagger UI 라우터 생성.
pub fn swagger_ui_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    SwaggerUi::new(SWAGGER_UI_PATH)
        .url(OPENAPI_JSON_PATH, ApiDoc::openapi())
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_spec_valid() {
        let spec = ApiDoc::openapi();
        let json = serde_json::to_string_pretty(&spec).unwrap();

        assert!(json.contains("Park API"));
        assert!(json.contains("/api/v1/auth"));
        assert!(json.contains("/api/v1/customers/details"));
        assert!(json.contains("/api/v1/parking/{code}"));
        assert!(json.contains("bearer_auth"));
    }

    #[test]
    fn test_openapi_contains_schemas() {
        let json = serde_json::to_string(&ApiDoc::openapi()).unwrap();

        assert!(json.contains("ApiErrorResponse"));
        assert!(json.contains("TokenResponse"));
        assert!(json.contains("CustomerPageResponse"));
    }

    #[test]
    fn test_swagger_ui_router_creates() {
        let _router: Router<()> = swagger_ui_router();
    }
}
