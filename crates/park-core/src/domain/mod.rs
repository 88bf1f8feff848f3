//! 도메인 모델.

pub mod customer;
pub mod page;
pub mod parking;
pub mod role;
pub mod store;
pub mod user;

pub use customer::{is_valid_cpf, Customer, NewCustomer};
pub use page::{Page, PageRequest, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use parking::{NewParkingSpace, ParkingSpace, ParkingStatus};
pub use role::Role;
pub use store::{CustomerStore, ParkingSpaceStore, UserStore};
pub use user::{NewUser, User};
