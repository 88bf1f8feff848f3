//! 주차면.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 주차면 상태.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
#[serde(rename_all = "UPPERCASE")]
pub enum ParkingStatus {
    /// 비어 있음
    Free,
    /// 사용 중
    Busy,
}

impl ParkingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParkingStatus::Free => "FREE",
            ParkingStatus::Busy => "BUSY",
        }
    }

    /// 대문자 표현만 허용합니다.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "FREE" => Some(ParkingStatus::Free),
            "BUSY" => Some(ParkingStatus::Busy),
            _ => None,
        }
    }
}

impl std::fmt::Display for ParkingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 저장된 주차면.
#[derive(Debug, Clone)]
pub struct ParkingSpace {
    pub id: i64,
    /// 주차면 코드 (4자, 유일. 예: "A-01")
    pub code: String,
    pub status: ParkingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: Option<String>,
    pub updated_by: Option<String>,
}

/// 새 주차면 입력.
#[derive(Debug, Clone)]
pub struct NewParkingSpace {
    pub code: String,
    pub status: ParkingStatus,
    pub created_by: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse() {
        assert_eq!(ParkingStatus::parse("FREE"), Some(ParkingStatus::Free));
        assert_eq!(ParkingStatus::parse("BUSY"), Some(ParkingStatus::Busy));
        assert_eq!(ParkingStatus::parse("free"), None);
        assert_eq!(ParkingStatus::parse("OCCUPIED"), None);
    }
}
