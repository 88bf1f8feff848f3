//! 고객 endpoint.
//!
//! # 엔드포인트
//!
//! - `POST /api/v1/customers` - 본인 고객 정보 등록 (CUSTOMER)
//! - `GET /api/v1/customers` - 이름순 페이지 조회 (ADMIN)
//! - `GET /api/v1/customers/{id}` - 단건 조회 (ADMIN)
//! - `GET /api/v1/customers/details` - 본인 고객 정보 조회 (CUSTOMER)

use std::borrow::Cow;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use park_core::{is_valid_cpf, Customer, NewCustomer, Page, PageRequest, DEFAULT_PAGE_SIZE};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use crate::auth::AuthPrincipal;
use crate::error::{ApiError, ApiErrorResponse, ApiResult};
use crate::extract::ValidatedJson;
use crate::state::AppState;

pub const CUSTOMERS: &str = "/api/v1/customers";
pub const CUSTOMER_BY_ID: &str = "/api/v1/customers/{id}";
pub const CUSTOMER_DETAILS: &str = "/api/v1/customers/details";

/// 고객 등록 요청.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCustomerRequest {
    /// 이름 (5~100자)
    #[validate(length(min = 5, max = 100, message = "이름은 5자 이상 100자 이하여야 합니다"))]
    #[schema(example = "Ana Silva")]
    pub name: String,
    /// CPF (숫자 11자리)
    #[validate(custom(function = "validate_cpf"))]
    #[schema(example = "61334522006")]
    pub cpf: String,
}

fn validate_cpf(cpf: &str) -> Result<(), ValidationError> {
    if is_valid_cpf(cpf) {
        Ok(())
    } else {
        Err(ValidationError::new("cpf").with_message(Cow::Borrowed("유효한 CPF가 아닙니다")))
    }
}

/// 고객 응답.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CustomerResponse {
    pub id: i64,
    pub name: String,
    pub cpf: String,
}

impl From<Customer> for CustomerResponse {
    fn from(customer: Customer) -> Self {
        Self {
            id: customer.id,
            name: customer.name,
            cpf: customer.cpf,
        }
    }
}

/// 페이지 쿼리.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// 페이지 번호 (0부터, 기본 0)
    pub page: Option<u32>,
    /// 페이지 크기 (기본 5, 최대 100)
    pub size: Option<u32>,
}

impl From<PageQuery> for PageRequest {
    fn from(query: PageQuery) -> Self {
        PageRequest::new(query.page.unwrap_or(0), query.size.unwrap_or(DEFAULT_PAGE_SIZE))
    }
}

/// 고객 페이지 응답.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CustomerPageResponse {
    pub content: Vec<CustomerResponse>,
    pub number: u32,
    pub size: u32,
    pub total_elements: u64,
    pub total_pages: u64,
    pub first: bool,
    pub last: bool,
}

impl From<Page<Customer>> for CustomerPageResponse {
    fn from(page: Page<Customer>) -> Self {
        let page = page.map(CustomerResponse::from);
        Self {
            content: page.content,
            number: page.number,
            size: page.size,
            total_elements: page.total_elements,
            total_pages: page.total_pages,
            first: page.first,
            last: page.last,
        }
    }
}

/// 본인 고객 정보 등록.
#[utoipa::path(
    post,
    path = "/api/v1/customers",
    tag = "customers",
    security(("bearer_auth" = [])),
    request_body = CreateCustomerRequest,
    responses(
        (status = 201, description = "등록됨", body = CustomerResponse),
        (status = 401, description = "인증 필요", body = ApiErrorResponse),
        (status = 403, description = "CUSTOMER 전용", body = ApiErrorResponse),
        (status = 409, description = "CPF 또는 사용자 중복", body = ApiErrorResponse),
        (status = 422, description = "입력 값 오류", body = ApiErrorResponse)
    )
)]
pub async fn create_customer(
    State(state): State<Arc<AppState>>,
    AuthPrincipal(principal): AuthPrincipal,
    ValidatedJson(req): ValidatedJson<CreateCustomerRequest>,
) -> ApiResult<(StatusCode, Json<CustomerResponse>)> {
    let user_id = state.principals.user_id(&principal).await?;

    let customer = state
        .customers
        .create(NewCustomer {
            name: req.name,
            cpf: req.cpf,
            user_id,
            created_by: Some(principal.subject().to_string()),
        })
        .await?;

    info!(customer_id = customer.id, user_id, "Customer registered");
    Ok((StatusCode::CREATED, Json(customer.into())))
}

/// 이름순 고객 페이지 조회.
#[utoipa::path(
    get,
    path = "/api/v1/customers",
    tag = "customers",
    security(("bearer_auth" = [])),
    params(PageQuery),
    responses(
        (status = 200, description = "고객 페이지", body = CustomerPageResponse),
        (status = 401, description = "인증 필요", body = ApiErrorResponse),
        (status = 403, description = "ADMIN 전용", body = ApiErrorResponse)
    )
)]
pub async fn list_customers(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<CustomerPageResponse>> {
    let page = state.customers.page(query.into()).await?;
    Ok(Json(page.into()))
}

/// 고객 단건 조회.
#[utoipa::path(
    get,
    path = "/api/v1/customers/{id}",
    tag = "customers",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "고객 ID")),
    responses(
        (status = 200, description = "고객", body = CustomerResponse),
        (status = 401, description = "인증 필요", body = ApiErrorResponse),
        (status = 403, description = "ADMIN 전용", body = ApiErrorResponse),
        (status = 404, description = "없음", body = ApiErrorResponse)
    )
)]
pub async fn get_customer(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<CustomerResponse>> {
    let customer = state
        .customers
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("고객을 찾을 수 없습니다: id={}", id)))?;

    Ok(Json(customer.into()))
}

/// 본인 고객 정보 조회.
#[utoipa::path(
    get,
    path = "/api/v1/customers/details",
    tag = "customers",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "본인 고객 정보", body = CustomerResponse),
        (status = 401, description = "인증 필요", body = ApiErrorResponse),
        (status = 403, description = "CUSTOMER 전용", body = ApiErrorResponse),
        (status = 404, description = "고객 정보 미등록", body = ApiErrorResponse)
    )
)]
pub async fn get_own_details(
    State(state): State<Arc<AppState>>,
    AuthPrincipal(principal): AuthPrincipal,
) -> ApiResult<Json<CustomerResponse>> {
    let user_id = state.principals.user_id(&principal).await?;

    let customer = state
        .customers
        .find_by_user_id(user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("등록된 고객 정보가 없습니다".to_string()))?;

    Ok(Json(customer.into()))
}

/// 고객 라우터 생성.
pub fn customers_router() -> Router<Arc<AppState>> {
    Router::new()
        .route(CUSTOMERS, get(list_customers).post(create_customer))
        .route(CUSTOMER_DETAILS, get(get_own_details))
        .route(CUSTOMER_BY_ID, get(get_customer))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_customer_validation() {
        let ok = CreateCustomerRequest {
            name: "Ana Silva".to_string(),
            cpf: "61334522006".to_string(),
        };
        assert!(ok.validate().is_ok());

        let bad = CreateCustomerRequest {
            name: "Ana".to_string(),
            cpf: "11111111111".to_string(),
        };
        let errors = bad.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("name"));
        assert!(errors.field_errors().contains_key("cpf"));
    }

    #[test]
    fn test_page_query_defaults() {
        let request = PageRequest::from(PageQuery::default());
        assert_eq!(request.page, 0);
        assert_eq!(request.size, DEFAULT_PAGE_SIZE);

        let request = PageRequest::from(PageQuery {
            page: Some(2),
            size: Some(500),
        });
        assert_eq!(request.page, 2);
        assert_eq!(request.size, park_core::MAX_PAGE_SIZE);
    }
}
