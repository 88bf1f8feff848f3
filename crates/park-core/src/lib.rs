//! # Park Core
//!
//! 주차 관리 서비스의 핵심 도메인 모델과 타입을 제공합니다.
//!
//! - 사용자/고객/주차면 도메인 타입과 역할([`Role`])
//! - 저장소 협력자 트레이트 ([`UserStore`], [`CustomerStore`], [`ParkingSpaceStore`])
//! - 설정 관리 ([`AppConfig`])
//! - 로깅 인프라
//! - 공통 에러 타입 ([`ParkError`])

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;

pub use config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
