//! 최초 관리자 계정 생성.
//!
//! API로는 CUSTOMER 계정만 만들 수 있으므로 관리자는 기동 시 설정값으로 만듭니다.

use park_core::{BootstrapAdmin, NewUser, ParkError, ParkResult, Role, UserStore};
use tracing::{info, warn};

use crate::auth::hash_password_blocking;

/// 관리자 계정이 없으면 생성합니다.
///
/// 새로 만들었으면 `true`. 같은 사용자명이 이미 있으면 역할과 무관하게 건드리지 않습니다.
pub async fn ensure_admin(users: &dyn UserStore, admin: &BootstrapAdmin) -> ParkResult<bool> {
    if !admin.username.contains('@') {
        return Err(ParkError::Config(
            "auth.bootstrap_admin.username은 이메일 형식이어야 합니다".to_string(),
        ));
    }
    if admin.password.chars().count() != 6 {
        return Err(ParkError::Config(
            "auth.bootstrap_admin.password는 6자여야 합니다".to_string(),
        ));
    }

    if let Some(existing) = users.find_by_username(&admin.username).await? {
        if existing.role != Role::Admin {
            warn!(username = %admin.username, "Bootstrap admin username belongs to a non-admin account");
        }
        return Ok(false);
    }

    let password_hash = hash_password_blocking(admin.password.clone())
        .await
        .map_err(|e| ParkError::Internal(e.to_string()))?;

    match users
        .create(NewUser {
            username: admin.username.clone(),
            password_hash,
            role: Role::Admin,
            created_by: Some("bootstrap".to_string()),
        })
        .await
    {
        Ok(user) => {
            info!(user_id = user.id, username = %user.username, "Bootstrap admin created");
            Ok(true)
        }
        // 다른 인스턴스가 먼저 만든 경우
        Err(e) if e.is_conflict() => Ok(false),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MemoryUserStore;

    fn admin(username: &str, password: &str) -> BootstrapAdmin {
        BootstrapAdmin {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_creates_admin_once() {
        let store = MemoryUserStore::new();
        let config = admin("admin@park.com", "123456");

        assert!(ensure_admin(&store, &config).await.unwrap());
        assert!(!ensure_admin(&store, &config).await.unwrap());

        let user = store.find_by_username("admin@park.com").await.unwrap().unwrap();
        assert_eq!(user.role, Role::Admin);
        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_rejects_unusable_credentials() {
        let store = MemoryUserStore::new();
        assert!(ensure_admin(&store, &admin("admin", "123456")).await.is_err());
        assert!(ensure_admin(&store, &admin("admin@park.com", "12345678")).await.is_err());
        assert!(store.list().await.unwrap().is_empty());
    }
}
