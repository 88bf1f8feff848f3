//! 주차장 관리 API 서버.
//!
//! 설정을 읽고 저장소를 선택한 뒤 Axum 서버를 시작합니다.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::{
    http::{header, Method},
    Router,
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use park_api::auth::TokenCodec;
use park_api::bootstrap::ensure_admin;
use park_api::openapi::{ApiDoc, OPENAPI_JSON_PATH, SWAGGER_UI_PATH};
use park_api::repository;
use park_api::routes::create_app;
use park_api::state::AppState;
use park_core::{init_logging, AppConfig, CorsConfig, LogConfig};

/// CORS 레이어 생성.
///
/// `cors.origins`가 비어 있으면 개발 모드로 보고 모든 origin을 허용합니다.
fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins: Vec<_> = config
        .origins
        .iter()
        .filter_map(|s| s.trim().parse().ok())
        .collect();

    let restricted = !origins.is_empty();
    let allow_origin = if restricted {
        info!("CORS configured with {} allowed origins", origins.len());
        AllowOrigin::list(origins)
    } else {
        if !config.origins.is_empty() {
            warn!("cors.origins is set but contains no valid origins, allowing any");
        } else {
            warn!("cors.origins not set, allowing any origin (development mode)");
        }
        AllowOrigin::any()
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .expose_headers([header::LOCATION])
        .allow_credentials(restricted)
        .max_age(Duration::from_secs(3600))
}

/// `--export-openapi` 플래그 또는 `EXPORT_OPENAPI=1`이면 스펙을 출력합니다.
fn export_openapi_requested() -> bool {
    let flag = std::env::args().any(|arg| arg == "--export-openapi");
    let env = std::env::var("EXPORT_OPENAPI")
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false);
    flag || env
}

/// 설정에 따라 저장소를 선택해 상태를 만듭니다.
async fn create_app_state(config: &AppConfig, tokens: TokenCodec) -> anyhow::Result<AppState> {
    let state = match &config.database.url {
        Some(url) => {
            let pool = repository::connect(&config.database, url)
                .await
                .context("database connection failed")?;
            repository::migrate(&pool).await.context("migration failed")?;
            AppState::postgres(tokens, pool)
        }
        None => {
            warn!("database.url not set, using in-memory stores (data is lost on restart)");
            AppState::in_memory(tokens)
        }
    };

    if let Some(admin) = &config.auth.bootstrap_admin {
        ensure_admin(state.users.as_ref(), admin)
            .await
            .context("bootstrap admin creation failed")?;
    }

    Ok(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env 파일 로드 (있는 경우)
    let _ = dotenvy::dotenv();

    if export_openapi_requested() {
        use utoipa::OpenApi as _;
        println!("{}", serde_json::to_string_pretty(&ApiDoc::openapi())?);
        return Ok(());
    }

    let config = AppConfig::load_default().context("failed to load configuration")?;

    init_logging(LogConfig::from(&config.logging))
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {}", e))?;

    info!("Starting Park API server...");

    let addr = config.server.socket_addr()?;
    let secret = config.auth.signing_secret()?;
    let tokens = TokenCodec::new(&secret, config.auth.token_ttl());
    info!(ttl_minutes = config.auth.token_ttl_minutes, "Token codec initialized");

    let state = Arc::new(create_app_state(&config, tokens).await?);

    let app: Router = create_app(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.cors));

    info!(%addr, "API server listening");
    info!("Swagger UI available at http://{}{}", addr, SWAGGER_UI_PATH);
    info!("OpenAPI spec at http://{}{}", addr, OPENAPI_JSON_PATH);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped gracefully");
    Ok(())
}

/// Graceful shutdown 시그널 대기 (Ctrl+C 또는 SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            warn!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}
