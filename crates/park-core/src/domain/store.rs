//! 저장소 협력자 인터페이스.
//!
//! 영속화는 이 크레이트 밖에서 구현됩니다 (PostgreSQL, 메모리).
//! 모든 구현은 유일성 제약 위반을 [`crate::ParkError::Conflict`]로 보고해야 합니다.

use async_trait::async_trait;

use super::{Customer, NewCustomer, NewParkingSpace, NewUser, Page, PageRequest, ParkingSpace, User};
use crate::error::ParkResult;

/// 사용자 저장소.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// 사용자 생성. 사용자명이 이미 있으면 `Conflict`.
    async fn create(&self, user: NewUser) -> ParkResult<User>;

    async fn find_by_id(&self, id: i64) -> ParkResult<Option<User>>;

    /// 사용자명으로 조회 (대소문자 구분).
    async fn find_by_username(&self, username: &str) -> ParkResult<Option<User>>;

    async fn list(&self) -> ParkResult<Vec<User>>;

    /// 비밀번호 해시 교체. 대상이 없으면 `NotFound`.
    async fn update_password(&self, id: i64, password_hash: &str, updated_by: &str) -> ParkResult<()>;
}

/// 고객 저장소.
#[async_trait]
pub trait CustomerStore: Send + Sync {
    /// 고객 생성. CPF 또는 사용자 연결이 중복되면 `Conflict`.
    async fn create(&self, customer: NewCustomer) -> ParkResult<Customer>;

    async fn find_by_id(&self, id: i64) -> ParkResult<Option<Customer>>;

    async fn find_by_user_id(&self, user_id: i64) -> ParkResult<Option<Customer>>;

    /// 이름순 페이지 조회.
    async fn page(&self, request: PageRequest) -> ParkResult<Page<Customer>>;
}

/// 주차면 저장소.
#[async_trait]
pub trait ParkingSpaceStore: Send + Sync {
    /// 주차면 생성. 코드가 중복되면 `Conflict`.
    async fn create(&self, space: NewParkingSpace) -> ParkResult<ParkingSpace>;

    async fn find_by_code(&self, code: &str) -> ParkResult<Option<ParkingSpace>>;
}
