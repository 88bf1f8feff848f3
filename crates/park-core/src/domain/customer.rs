//! 고객 정보.
//!
//! 고객은 `Customer` 역할 사용자 계정 하나에 정확히 하나 연결됩니다.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// 저장된 고객.
#[derive(Debug, Clone, Serialize)]
pub struct Customer {
    pub id: i64,
    pub name: String,
    /// CPF (숫자 11자리)
    pub cpf: String,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: Option<String>,
    pub updated_by: Option<String>,
}

/// 새 고객 입력.
#[derive(Debug, Clone)]
pub struct NewCustomer {
    pub name: String,
    pub cpf: String,
    pub user_id: i64,
    pub created_by: Option<String>,
}

/// CPF 검증 (숫자 11자리 + 검증 숫자 2개).
///
/// 모든 자리가 같은 숫자인 번호(`00000000000` 등)는 검증 숫자가 맞아도 무효입니다.
pub fn is_valid_cpf(cpf: &str) -> bool {
    if cpf.len() != 11 || !cpf.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }

    let digits: Vec<u32> = cpf.bytes().map(|b| u32::from(b - b'0')).collect();
    if digits.iter().all(|&d| d == digits[0]) {
        return false;
    }

    let check_digit = |len: usize| -> u32 {
        let sum: u32 = digits[..len]
            .iter()
            .enumerate()
            .map(|(i, &d)| d * (len as u32 + 1 - i as u32))
            .sum();
        match (sum * 10) % 11 {
            10 => 0,
            d => d,
        }
    };

    check_digit(9) == digits[9] && check_digit(10) == digits[10]
}
