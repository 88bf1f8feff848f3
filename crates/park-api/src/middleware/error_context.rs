//! 에러 응답 마무리 middleware.
//!
//! 핸들러와 인증 계층이 만든 [`ApiErrorResponse`]에 요청 메서드와 경로를 채우고,
//! axum 기본 거부 응답(경로 파라미터 파싱 실패, 404, 405 등)도 같은 형식으로 바꿉니다.

use axum::{
    body::to_bytes,
    extract::Request,
    http::{header::CONTENT_TYPE, Method, StatusCode, Uri},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::ApiErrorResponse;

/// 기본 거부 응답 본문을 읽을 최대 크기.
const MAX_REJECTION_BODY: usize = 16 * 1024;

/// 에러 응답에 요청 정보를 채웁니다.
pub async fn error_context(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let mut response = next.run(request).await;

    if let Some(body) = response.extensions_mut().remove::<ApiErrorResponse>() {
        return body.with_request_info(&method, &uri).into_response();
    }

    let status = response.status();
    if (status.is_client_error() || status.is_server_error()) && !is_json(&response) {
        return rewrap(response, &method, &uri).await;
    }

    response
}

fn is_json(response: &Response) -> bool {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"))
}

async fn rewrap(response: Response, method: &Method, uri: &Uri) -> Response {
    let status = response.status();
    let text = to_bytes(response.into_body(), MAX_REJECTION_BODY)
        .await
        .ok()
        .and_then(|bytes| String::from_utf8(bytes.to_vec()).ok())
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| default_message(status).to_string());

    ApiErrorResponse::new(status, status_code_name(status), text)
        .with_request_info(method, uri)
        .into_response()
}

fn status_code_name(status: StatusCode) -> String {
    status
        .canonical_reason()
        .unwrap_or("ERROR")
        .to_uppercase()
        .replace([' ', '-'], "_")
}

fn default_message(status: StatusCode) -> &'static str {
    match status {
        StatusCode::NOT_FOUND => "요청한 리소스를 찾을 수 없습니다",
        StatusCode::METHOD_NOT_ALLOWED => "허용되지 않은 메서드입니다",
        StatusCode::REQUEST_TIMEOUT => "요청 처리 시간이 초과되었습니다",
        _ => "요청을 처리할 수 없습니다",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, extract::Path, http::Request, middleware, routing::get, Router};
    use tower::ServiceExt;

    use crate::auth::AuthError;

    async fn denied() -> AuthError {
        AuthError::Unauthenticated
    }

    async fn by_id(Path(id): Path<i64>) -> String {
        id.to_string()
    }

    fn app() -> Router {
        Router::new()
            .route("/denied", get(denied))
            .route("/items/{id}", get(by_id))
            .layer(middleware::from_fn(error_context))
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_fills_method_and_path() {
        let response = app()
            .oneshot(Request::builder().uri("/denied").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.headers().get("www-authenticate").is_some());

        let json = body_json(response).await;
        assert_eq!(json["method"], "GET");
        assert_eq!(json["path"], "/denied");
        assert_eq!(json["status"], 401);
        assert_eq!(json["code"], "UNAUTHENTICATED");
    }

    #[tokio::test]
    async fn test_rewraps_plain_rejections() {
        let response = app()
            .oneshot(Request::builder().uri("/items/abc").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["code"], "BAD_REQUEST");
        assert_eq!(json["path"], "/items/abc");
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let response = app()
            .oneshot(Request::builder().uri("/nowhere").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = body_json(response).await;
        assert_eq!(json["code"], "NOT_FOUND");
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_gets_uniform_body() {
        use std::time::Duration;
        use tower_http::timeout::TimeoutLayer;

        async fn slow() -> &'static str {
            tokio::time::sleep(Duration::from_secs(60)).await;
            "late"
        }

        let app = Router::new()
            .route("/slow", get(slow))
            .layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                Duration::from_secs(1),
            ))
            .layer(middleware::from_fn(error_context));

        let response = app
            .oneshot(Request::builder().uri("/slow").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
        let json = body_json(response).await;
        assert_eq!(json["status"], 408);
        assert_eq!(json["code"], "REQUEST_TIMEOUT");
        assert_eq!(json["path"], "/slow");
    }

    #[tokio::test]
    async fn test_success_untouched() {
        let response = app()
            .oneshot(Request::builder().uri("/items/7").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"7");
    }
}
