//! 사용자 계정.

use chrono::{DateTime, Utc};

use super::Role;

/// 저장된 사용자 계정.
///
/// `password_hash`는 PHC 형식 argon2 해시이며 평문은 저장하지 않습니다.
#[derive(Clone)]
pub struct User {
    pub id: i64,
    /// 로그인 아이디 (이메일, 대소문자 구분, 유일)
    pub username: String,
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: Option<String>,
    pub updated_by: Option<String>,
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

/// 새 사용자 입력.
#[derive(Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub role: Role,
    pub created_by: Option<String>,
}

impl std::fmt::Debug for NewUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewUser")
            .field("username", &self.username)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_hides_password_hash() {
        let user = NewUser {
            username: "ana@email.com".to_string(),
            password_hash: "$argon2id$v=19$secret".to_string(),
            role: Role::Admin,
            created_by: None,
        };
        let printed = format!("{:?}", user);
        assert!(printed.contains("ana@email.com"));
        assert!(!printed.contains("argon2id"));
    }
}
