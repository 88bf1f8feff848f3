//! 라우트별 접근 정책.
//!
//! 각 라우트의 요구 역할은 기동 시점에 표로 만들어지고, [`authorize`]가
//! 매칭된 라우트 패턴(`MatchedPath`)으로 이 표를 조회합니다.
//! 표에 없는 라우트는 역할과 무관하게 인증만 요구합니다.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{MatchedPath, Request, State},
    http::Method,
    middleware::Next,
    response::{IntoResponse, Response},
};
use park_core::Role;
use tracing::debug;

use super::{AuthError, Principal};

/// 허용 역할 집합. 비어 있으면 공개 라우트입니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RoleSet(u8);

impl RoleSet {
    const fn bit(role: Role) -> u8 {
        match role {
            Role::Admin => 0b01,
            Role::Customer => 0b10,
        }
    }

    pub const fn public() -> Self {
        Self(0)
    }

    pub const fn only(role: Role) -> Self {
        Self(Self::bit(role))
    }

    pub fn of(roles: &[Role]) -> Self {
        Self(roles.iter().fold(0, |acc, role| acc | Self::bit(*role)))
    }

    /// 모든 역할 (인증만 요구).
    pub fn any() -> Self {
        Self::of(&Role::ALL)
    }

    pub fn is_public(&self) -> bool {
        self.0 == 0
    }

    pub fn contains(&self, role: Role) -> bool {
        self.0 & Self::bit(role) != 0
    }
}

impl From<Role> for RoleSet {
    fn from(role: Role) -> Self {
        Self::only(role)
    }
}

/// 접근 결정.
///
/// 주체가 없으면 역할 요구와 무관하게 항상 `Unauthenticated`가 먼저입니다.
pub fn decide(required: RoleSet, principal: Option<&Principal>) -> Result<(), AuthError> {
    if required.is_public() {
        return Ok(());
    }

    let principal = principal.ok_or(AuthError::Unauthenticated)?;

    if required.contains(principal.role()) {
        Ok(())
    } else {
        Err(AuthError::Forbidden)
    }
}

/// (메서드, 라우트 패턴) → 요구 역할 표.
#[derive(Debug, Clone)]
pub struct AccessPolicy {
    rules: HashMap<(Method, String), RoleSet>,
    fallback: RoleSet,
}

impl AccessPolicy {
    pub fn builder() -> AccessPolicyBuilder {
        AccessPolicyBuilder {
            rules: HashMap::new(),
        }
    }

    /// 라우트의 요구 역할. 등록되지 않은 라우트는 인증만 요구합니다.
    pub fn requirement(&self, method: &Method, path: &str) -> RoleSet {
        self.rules
            .get(&(method.clone(), path.to_string()))
            .copied()
            .unwrap_or(self.fallback)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// [`AccessPolicy`] 빌더.
pub struct AccessPolicyBuilder {
    rules: HashMap<(Method, String), RoleSet>,
}

impl AccessPolicyBuilder {
    /// 토큰 없이 접근 가능한 라우트.
    pub fn public(self, method: Method, path: &str) -> Self {
        self.require(method, path, RoleSet::public())
    }

    /// 역할을 요구하는 라우트.
    pub fn require(mut self, method: Method, path: &str, roles: impl Into<RoleSet>) -> Self {
        self.rules.insert((method, path.to_string()), roles.into());
        self
    }

    pub fn build(self) -> AccessPolicy {
        AccessPolicy {
            rules: self.rules,
            fallback: RoleSet::any(),
        }
    }
}

/// 인가 미들웨어.
///
/// `route_layer`로 적용해야 `MatchedPath`가 채워집니다.
pub async fn authorize(
    State(policy): State<Arc<AccessPolicy>>,
    request: Request,
    next: Next,
) -> Response {
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|matched| matched.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());

    let required = policy.requirement(request.method(), &path);
    let principal = request.extensions().get::<Principal>();

    if let Err(e) = decide(required, principal) {
        debug!(
            method = %request.method(),
            route = %path,
            username = principal.map(|p| p.subject()).unwrap_or("-"),
            reason = %e,
            "Access denied"
        );
        return e.into_response();
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Claims;

    fn principal(role: Role) -> Principal {
        Principal::from_claims(&Claims {
            sub: "someone@park.com".to_string(),
            role,
            iat: 0,
            exp: i64::MAX,
            jti: "t".to_string(),
        })
    }

    #[test]
    fn test_role_set() {
        let admin = RoleSet::only(Role::Admin);
        assert!(admin.contains(Role::Admin));
        assert!(!admin.contains(Role::Customer));
        assert!(!admin.is_public());

        assert!(RoleSet::public().is_public());
        assert!(RoleSet::any().contains(Role::Admin));
        assert!(RoleSet::any().contains(Role::Customer));
        assert_eq!(RoleSet::of(&[Role::Customer]), RoleSet::from(Role::Customer));
    }

    #[test]
    fn test_decide_public_allows_everyone() {
        assert!(decide(RoleSet::public(), None).is_ok());
        assert!(decide(RoleSet::public(), Some(&principal(Role::Customer))).is_ok());
    }

    #[test]
    fn test_decide_unauthenticated_before_forbidden() {
        assert_eq!(
            decide(RoleSet::only(Role::Admin), None),
            Err(AuthError::Unauthenticated)
        );
        assert_eq!(
            decide(RoleSet::only(Role::Customer), None),
            Err(AuthError::Unauthenticated)
        );
        assert_eq!(decide(RoleSet::any(), None), Err(AuthError::Unauthenticated));
    }

    #[test]
    fn test_decide_wrong_role_forbidden() {
        assert_eq!(
            decide(RoleSet::only(Role::Admin), Some(&principal(Role::Customer))),
            Err(AuthError::Forbidden)
        );
        assert_eq!(
            decide(RoleSet::only(Role::Customer), Some(&principal(Role::Admin))),
            Err(AuthError::Forbidden)
        );
        assert!(decide(RoleSet::only(Role::Admin), Some(&principal(Role::Admin))).is_ok());
    }

    #[test]
    fn test_policy_lookup_and_fallback() {
        let policy = AccessPolicy::builder()
            .public(Method::POST, "/api/v1/users")
            .require(Method::GET, "/api/v1/users/{id}", Role::Admin)
            .build();

        assert!(policy.requirement(&Method::POST, "/api/v1/users").is_public());
        assert_eq!(
            policy.requirement(&Method::GET, "/api/v1/users/{id}"),
            RoleSet::only(Role::Admin)
        );
        // 메서드가 다르면 별도 라우트
        assert_eq!(policy.requirement(&Method::GET, "/api/v1/users"), RoleSet::any());
        assert_eq!(policy.requirement(&Method::DELETE, "/unknown"), RoleSet::any());
        assert_eq!(policy.len(), 2);
    }
}
