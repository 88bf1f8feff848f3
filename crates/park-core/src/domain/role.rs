//! 사용자 역할.
//!
//! 토큰/JSON에서는 `ADMIN`, `CUSTOMER`로, 데이터베이스 컬럼에서는
//! `ROLE_ADMIN`, `ROLE_CUSTOMER`로 표현됩니다. 접두사 변환은
//! 저장소 경계에서만 [`Role::authority`] / [`Role::from_authority`]로 처리합니다.

use serde::{Deserialize, Serialize};

/// 사용자 역할.
///
/// 사용자당 정확히 하나이며 계정 생성 이후 변경되지 않습니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    /// 관리자 - 주차면 관리, 고객 조회
    Admin,
    /// 고객 - 본인 고객 정보 등록/조회
    Customer,
}

const AUTHORITY_PREFIX: &str = "ROLE_";

impl Role {
    /// 모든 역할.
    pub const ALL: [Role; 2] = [Role::Admin, Role::Customer];

    /// 토큰/JSON 표현.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Customer => "CUSTOMER",
        }
    }

    /// 문자열에서 역할 파싱 (대소문자 무시).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "ADMIN" => Some(Role::Admin),
            "CUSTOMER" => Some(Role::Customer),
            _ => None,
        }
    }

    /// 데이터베이스 컬럼 표현 (`ROLE_ADMIN`).
    pub fn authority(&self) -> &'static str {
        match self {
            Role::Admin => "ROLE_ADMIN",
            Role::Customer => "ROLE_CUSTOMER",
        }
    }

    /// 데이터베이스 컬럼 값에서 역할 파싱.
    pub fn from_authority(s: &str) -> Option<Self> {
        s.strip_prefix(AUTHORITY_PREFIX).and_then(Self::parse)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse() {
        assert_eq!(Role::parse("admin"), Some(Role::Admin));
        assert_eq!(Role::parse("CUSTOMER"), Some(Role::Customer));
        assert_eq!(Role::parse("ROLE_ADMIN"), None);
        assert_eq!(Role::parse(""), None);
    }

    #[test]
    fn test_authority_round_trip() {
        for role in Role::ALL {
            assert_eq!(Role::from_authority(role.authority()), Some(role));
        }
        assert_eq!(Role::from_authority("ADMIN"), None);
        assert_eq!(Role::from_authority("ROLE_OPERATOR"), None);
    }

    #[test]
    fn test_role_serialization() {
        let json = serde_json::to_string(&Role::Customer).unwrap();
        assert_eq!(json, "\"CUSTOMER\"");

        let parsed: Role = serde_json::from_str("\"ADMIN\"").unwrap();
        assert_eq!(parsed, Role::Admin);
        assert!(serde_json::from_str::<Role>("\"ROLE_ADMIN\"").is_err());
    }
}
