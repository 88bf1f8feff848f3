//! 메모리 저장소.
//!
//! 테스트와 데이터베이스 미설정 시 사용합니다. 프로세스가 끝나면 데이터는 사라집니다.
//! 유일성 제약은 PostgreSQL 스키마와 같게 검사합니다.

use async_trait::async_trait;
use chrono::Utc;
use park_core::{
    Customer, CustomerStore, NewCustomer, NewParkingSpace, NewUser, Page, PageRequest, ParkError,
    ParkResult, ParkingSpace, ParkingSpaceStore, User, UserStore,
};
use tokio::sync::RwLock;

/// id 순번과 행 목록.
#[derive(Debug)]
struct Table<T> {
    next_id: i64,
    rows: Vec<T>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            next_id: 1,
            rows: Vec::new(),
        }
    }
}

impl<T> Table<T> {
    fn allocate_id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

// ==================== 사용자 ====================

/// 메모리 사용자 저장소.
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    table: RwLock<Table<User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create(&self, user: NewUser) -> ParkResult<User> {
        let mut table = self.table.write().await;
        if table.rows.iter().any(|u| u.username == user.username) {
            return Err(ParkError::Conflict(format!(
                "이미 등록된 사용자명입니다: {}",
                user.username
            )));
        }

        let now = Utc::now();
        let created = User {
            id: table.allocate_id(),
            username: user.username,
            password_hash: user.password_hash,
            role: user.role,
            created_at: now,
            updated_at: now,
            updated_by: user.created_by.clone(),
            created_by: user.created_by,
        };
        table.rows.push(created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: i64) -> ParkResult<Option<User>> {
        Ok(self.table.read().await.rows.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> ParkResult<Option<User>> {
        Ok(self
            .table
            .read()
            .await
            .rows
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn list(&self) -> ParkResult<Vec<User>> {
        Ok(self.table.read().await.rows.clone())
    }

    async fn update_password(&self, id: i64, password_hash: &str, updated_by: &str) -> ParkResult<()> {
        let mut table = self.table.write().await;
        let user = table
            .rows
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| ParkError::NotFound(format!("사용자 id={}", id)))?;

        user.password_hash = password_hash.to_string();
        user.updated_at = Utc::now();
        user.updated_by = Some(updated_by.to_string());
        Ok(())
    }
}

// ==================== 고객 ====================

/// 메모리 고객 저장소.
#[derive(Debug, Default)]
pub struct MemoryCustomerStore {
    table: RwLock<Table<Customer>>,
}

impl MemoryCustomerStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CustomerStore for MemoryCustomerStore {
    async fn create(&self, customer: NewCustomer) -> ParkResult<Customer> {
        let mut table = self.table.write().await;
        if table.rows.iter().any(|c| c.cpf == customer.cpf) {
            return Err(ParkError::Conflict(format!(
                "이미 등록된 CPF입니다: {}",
                customer.cpf
            )));
        }
        if table.rows.iter().any(|c| c.user_id == customer.user_id) {
            return Err(ParkError::Conflict(
                "이미 고객 정보가 등록된 사용자입니다".to_string(),
            ));
        }

        let now = Utc::now();
        let created = Customer {
            id: table.allocate_id(),
            name: customer.name,
            cpf: customer.cpf,
            user_id: customer.user_id,
            created_at: now,
            updated_at: now,
            updated_by: customer.created_by.clone(),
            created_by: customer.created_by,
        };
        table.rows.push(created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: i64) -> ParkResult<Option<Customer>> {
        Ok(self.table.read().await.rows.iter().find(|c| c.id == id).cloned())
    }

    async fn find_by_user_id(&self, user_id: i64) -> ParkResult<Option<Customer>> {
        Ok(self
            .table
            .read()
            .await
            .rows
            .iter()
            .find(|c| c.user_id == user_id)
            .cloned())
    }

    async fn page(&self, request: PageRequest) -> ParkResult<Page<Customer>> {
        let table = self.table.read().await;

        let mut sorted: Vec<&Customer> = table.rows.iter().collect();
        sorted.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));

        let offset = usize::try_from(request.offset()).unwrap_or(usize::MAX);
        let content = sorted
            .into_iter()
            .skip(offset)
            .take(request.size as usize)
            .cloned()
            .collect();

        Ok(Page::new(content, request, table.rows.len() as u64))
    }
}

// ==================== 주차면 ====================

/// 메모리 주차면 저장소.
#[derive(Debug, Default)]
pub struct MemoryParkingSpaceStore {
    table: RwLock<Table<ParkingSpace>>,
}

impl MemoryParkingSpaceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ParkingSpaceStore for MemoryParkingSpaceStore {
    async fn create(&self, space: NewParkingSpace) -> ParkResult<ParkingSpace> {
        let mut table = self.table.write().await;
        if table.rows.iter().any(|s| s.code == space.code) {
            return Err(ParkError::Conflict(format!(
                "이미 등록된 주차면 코드입니다: {}",
                space.code
            )));
        }

        let now = Utc::now();
        let created = ParkingSpace {
            id: table.allocate_id(),
            code: space.code,
            status: space.status,
            created_at: now,
            updated_at: now,
            updated_by: space.created_by.clone(),
            created_by: space.created_by,
        };
        table.rows.push(created.clone());
        Ok(created)
    }

    async fn find_by_code(&self, code: &str) -> ParkResult<Option<ParkingSpace>> {
        Ok(self.table.read().await.rows.iter().find(|s| s.code == code).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use park_core::{ParkingStatus, Role};

    fn new_user(username: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            password_hash: "hash".to_string(),
            role: Role::Customer,
            created_by: None,
        }
    }

    fn new_customer(name: &str, cpf: &str, user_id: i64) -> NewCustomer {
        NewCustomer {
            name: name.to_string(),
            cpf: cpf.to_string(),
            user_id,
            created_by: Some("ana@park.com".to_string()),
        }
    }

    #[tokio::test]
    async fn test_user_store_unique_username() {
        let store = MemoryUserStore::new();
        let first = store.create(new_user("ana@park.com")).await.unwrap();
        assert_eq!(first.id, 1);

        let err = store.create(new_user("ana@park.com")).await.unwrap_err();
        assert!(err.is_conflict());

        let second = store.create(new_user("bia@park.com")).await.unwrap();
        assert_eq!(second.id, 2);
        assert_eq!(store.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_user_store_update_password() {
        let store = MemoryUserStore::new();
        let user = store.create(new_user("ana@park.com")).await.unwrap();

        store.update_password(user.id, "new-hash", "ana@park.com").await.unwrap();
        let updated = store.find_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(updated.password_hash, "new-hash");
        assert_eq!(updated.updated_by.as_deref(), Some("ana@park.com"));

        assert!(store.update_password(99, "x", "y").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_customer_store_constraints() {
        let store = MemoryCustomerStore::new();
        store.create(new_customer("Ana Silva", "61334522006", 1)).await.unwrap();

        assert!(store
            .create(new_customer("Outra Pessoa", "61334522006", 2))
            .await
            .unwrap_err()
            .is_conflict());
        assert!(store
            .create(new_customer("Ana Silva", "91504930002", 1))
            .await
            .unwrap_err()
            .is_conflict());

        let found = store.find_by_user_id(1).await.unwrap().unwrap();
        assert_eq!(found.cpf, "61334522006");
    }

    #[tokio::test]
    async fn test_customer_page_sorted_by_name() {
        let store = MemoryCustomerStore::new();
        let names = ["Carla Souza", "Ana Silva", "Bruno Lima"];
        let cpfs = ["61334522006", "91504930002", "68788268020"];
        for (i, (name, cpf)) in names.iter().zip(cpfs).enumerate() {
            store.create(new_customer(name, cpf, i as i64 + 1)).await.unwrap();
        }

        let page = store.page(PageRequest::new(0, 2)).await.unwrap();
        let names: Vec<_> = page.content.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Ana Silva", "Bruno Lima"]);
        assert_eq!(page.total_elements, 3);
        assert_eq!(page.total_pages, 2);
        assert!(!page.last);

        let page = store.page(PageRequest::new(1, 2)).await.unwrap();
        assert_eq!(page.content.len(), 1);
        assert_eq!(page.content[0].name, "Carla Souza");
        assert!(page.last);
    }

    #[tokio::test]
    async fn test_parking_space_unique_code() {
        let store = MemoryParkingSpaceStore::new();
        let space = store
            .create(NewParkingSpace {
                code: "A-01".to_string(),
                status: ParkingStatus::Free,
                created_by: None,
            })
            .await
            .unwrap();
        assert_eq!(space.status, ParkingStatus::Free);

        let err = store
            .create(NewParkingSpace {
                code: "A-01".to_string(),
                status: ParkingStatus::Busy,
                created_by: None,
            })
            .await
            .unwrap_err();
        assert!(err.is_conflict());
        assert!(store.find_by_code("B-01").await.unwrap().is_none());
    }
}
