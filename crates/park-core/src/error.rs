//! 주차 관리 시스템의 에러 타입.

use thiserror::Error;

/// 도메인 및 저장소 계층 공통 에러.
#[derive(Debug, Error)]
pub enum ParkError {
    /// 설정 에러
    #[error("설정 에러: {0}")]
    Config(String),

    /// 데이터베이스 에러
    #[error("데이터베이스 에러: {0}")]
    Database(String),

    /// 찾을 수 없음
    #[error("찾을 수 없음: {0}")]
    NotFound(String),

    /// 유일성 제약 위반 (중복 사용자명, CPF, 주차면 코드 등)
    #[error("중복: {0}")]
    Conflict(String),

    /// 잘못된 입력
    #[error("잘못된 입력: {0}")]
    InvalidInput(String),

    /// 내부 에러
    #[error("내부 에러: {0}")]
    Internal(String),
}

/// 도메인 작업 Result 타입.
pub type ParkResult<T> = Result<T, ParkError>;

impl ParkError {
    /// 유일성 제약 위반인지 확인합니다.
    pub fn is_conflict(&self) -> bool {
        matches!(self, ParkError::Conflict(_))
    }

    /// 대상이 존재하지 않는 에러인지 확인합니다.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ParkError::NotFound(_))
    }
}

impl From<config::ConfigError> for ParkError {
    fn from(err: config::ConfigError) -> Self {
        ParkError::Config(err.to_string())
    }
}

#[cfg(feature = "sqlx-support")]
impl From<sqlx::Error> for ParkError {
    fn from(err: sqlx::Error) -> Self {
        ParkError::Database(err.to_string())
    }
}
