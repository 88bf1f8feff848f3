//! 검증 JSON 추출기.

use axum::{
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use crate::error::{ApiError, FieldError};

/// 역직렬화 후 `validator` 검증까지 통과한 JSON 본문.
///
/// JSON 파싱 실패와 검증 실패 모두 422로 응답합니다.
///
/// ```rust,ignore
/// async fn create(ValidatedJson(req): ValidatedJson<CreateUserRequest>) -> ApiResult<...> { ... }
/// ```
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::Validation(vec![FieldError::new("body", rejection.body_text())]))?;

        value
            .validate()
            .map_err(|errors| ApiError::Validation(field_errors(&errors)))?;

        Ok(Self(value))
    }
}

/// 검증 에러를 필드명 순으로 펼칩니다.
pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut fields: Vec<FieldError> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, list)| {
            list.iter().map(move |e| {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string());
                FieldError::new(field.to_string(), message)
            })
        })
        .collect();

    fields.sort_by(|a, b| a.field.cmp(&b.field).then_with(|| a.message.cmp(&b.message)));
    fields
}
