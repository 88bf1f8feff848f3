//! 인증된 요청 주체.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use park_core::{Role, UserStore};
use tokio::sync::RwLock;
use tracing::debug;

use super::jwt::Claims;
use super::middleware::AuthError;
use crate::error::{ApiError, ApiResult};

/// 검증된 토큰에서 만들어진 요청 주체.
///
/// 역할은 서명된 토큰 안의 값만 사용하며 저장소에서 다시 읽지 않습니다.
/// 필드가 비공개이므로 [`Principal::from_claims`] 외의 방법으로는 만들 수 없습니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    subject: String,
    role: Role,
    issued_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl Principal {
    pub fn from_claims(claims: &Claims) -> Self {
        Self {
            subject: claims.sub.clone(),
            role: claims.role,
            issued_at: claims.issued_at(),
            expires_at: claims.expires_at(),
        }
    }

    /// 사용자명.
    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }
}

/// 주체의 사용자 ID 해석기.
///
/// 처음 필요할 때 사용자명으로 조회하고 결과를 캐시합니다.
#[derive(Clone)]
pub struct PrincipalResolver {
    users: Arc<dyn UserStore>,
    ids: Arc<RwLock<HashMap<String, i64>>>,
}

impl PrincipalResolver {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self {
            users,
            ids: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// 주체의 사용자 ID.
    ///
    /// 토큰은 유효하지만 사용자가 더 이상 없으면 `Unauthenticated`.
    pub async fn user_id(&self, principal: &Principal) -> ApiResult<i64> {
        if let Some(id) = self.ids.read().await.get(principal.subject()) {
            return Ok(*id);
        }

        let user = self
            .users
            .find_by_username(principal.subject())
            .await?
            .ok_or_else(|| {
                debug!(username = %principal.subject(), "Token subject has no matching user");
                ApiError::from(AuthError::Unauthenticated)
            })?;

        self.ids
            .write()
            .await
            .insert(principal.subject().to_string(), user.id);
        Ok(user.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MemoryUserStore;
    use park_core::NewUser;

    fn claims(sub: &str, role: Role) -> Claims {
        Claims {
            sub: sub.to_string(),
            role,
            iat: 1_700_000_000,
            exp: 1_700_001_800,
            jti: "test".to_string(),
        }
    }

    #[test]
    fn test_principal_carries_token_role() {
        let principal = Principal::from_claims(&claims("ana@park.com", Role::Customer));
        assert_eq!(principal.subject(), "ana@park.com");
        assert_eq!(principal.role(), Role::Customer);
        assert_eq!(principal.expires_at().timestamp(), 1_700_001_800);
    }

    #[tokio::test]
    async fn test_resolver_caches_user_id() {
        let store = Arc::new(MemoryUserStore::new());
        let user = store
            .create(NewUser {
                username: "ana@park.com".to_string(),
                password_hash: "hash".to_string(),
                role: Role::Customer,
                created_by: None,
            })
            .await
            .unwrap();

        let resolver = PrincipalResolver::new(store);
        let principal = Principal::from_claims(&claims("ana@park.com", Role::Customer));

        assert_eq!(resolver.user_id(&principal).await.unwrap(), user.id);
        assert_eq!(resolver.ids.read().await.get("ana@park.com"), Some(&user.id));
        assert_eq!(resolver.user_id(&principal).await.unwrap(), user.id);
    }

    #[tokio::test]
    async fn test_resolver_unknown_subject() {
        let resolver = PrincipalResolver::new(Arc::new(MemoryUserStore::new()));
        let principal = Principal::from_claims(&claims("ghost@park.com", Role::Admin));

        let err = resolver.user_id(&principal).await.unwrap_err();
        assert!(matches!(err, ApiError::Auth(AuthError::Unauthenticated)));
    }
}
