//! 자격 증명 검증.

use std::sync::Arc;

use park_core::{ParkError, Role, UserStore};
use tracing::warn;

use super::password::{burn_verification, verify_password_blocking, PasswordError};

/// 자격 증명 검증 에러.
///
/// `NotFound`와 `InvalidCredential`은 로그인 응답에서 하나의 401로 합쳐집니다.
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("사용자를 찾을 수 없습니다")]
    NotFound,
    #[error("비밀번호가 일치하지 않습니다")]
    InvalidCredential,
    #[error(transparent)]
    Store(#[from] ParkError),
    #[error(transparent)]
    Password(PasswordError),
}

/// 사용자 저장소를 통한 로그인 검증기.
#[derive(Clone)]
pub struct Authenticator {
    users: Arc<dyn UserStore>,
}

impl Authenticator {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    /// 사용자명과 평문 비밀번호를 검증하고 역할을 반환합니다.
    ///
    /// 사용자가 없어도 더미 해시 검증을 수행해서 응답 시간으로
    /// 계정 존재 여부가 드러나지 않게 합니다.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<Role, CredentialError> {
        let Some(user) = self.users.find_by_username(username).await? else {
            burn_verification(password.to_string()).await;
            return Err(CredentialError::NotFound);
        };

        match verify_password_blocking(password.to_string(), user.password_hash).await {
            Ok(()) => Ok(user.role),
            Err(PasswordError::VerificationFailed) => Err(CredentialError::InvalidCredential),
            Err(PasswordError::InvalidHashFormat) => {
                warn!(user_id = user.id, "Stored password hash is not a valid PHC string");
                Err(CredentialError::InvalidCredential)
            }
            Err(e) => Err(CredentialError::Password(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::hash_password;
    use crate::repository::MemoryUserStore;
    use park_core::NewUser;

    async fn authenticator_with(username: &str, password: &str, role: Role) -> Authenticator {
        let store = Arc::new(MemoryUserStore::new());
        store
            .create(NewUser {
                username: username.to_string(),
                password_hash: hash_password(password).unwrap(),
                role,
                created_by: None,
            })
            .await
            .unwrap();
        Authenticator::new(store)
    }

    #[tokio::test]
    async fn test_authenticate_returns_role() {
        let auth = authenticator_with("admin@park.com", "123456", Role::Admin).await;
        assert_eq!(auth.authenticate("admin@park.com", "123456").await.unwrap(), Role::Admin);
    }

    #[tokio::test]
    async fn test_wrong_password() {
        let auth = authenticator_with("ana@park.com", "123456", Role::Customer).await;
        assert!(matches!(
            auth.authenticate("ana@park.com", "654321").await,
            Err(CredentialError::InvalidCredential)
        ));
    }

    #[tokio::test]
    async fn test_unknown_username() {
        let auth = authenticator_with("ana@park.com", "123456", Role::Customer).await;
        assert!(matches!(
            auth.authenticate("ghost@park.com", "123456").await,
            Err(CredentialError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_username_is_case_sensitive() {
        let auth = authenticator_with("ana@park.com", "123456", Role::Customer).await;
        assert!(matches!(
            auth.authenticate("ANA@park.com", "123456").await,
            Err(CredentialError::NotFound)
        ));
    }
}
