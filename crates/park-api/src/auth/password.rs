//! 비밀번호 해싱 유틸리티.
//!
//! Argon2id로 해싱하며, 요청 처리 중에는 블로킹 풀에서 실행합니다.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use once_cell::sync::Lazy;

/// 비밀번호 처리 에러.
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("비밀번호 해싱 실패")]
    HashingFailed,
    #[error("비밀번호 검증 실패")]
    VerificationFailed,
    #[error("잘못된 해시 형식")]
    InvalidHashFormat,
    #[error("해싱 작업이 중단되었습니다")]
    Interrupted,
}

/// 존재하지 않는 사용자명에 대해서도 같은 비용의 검증을 수행하기 위한 해시.
static DUMMY_HASH: Lazy<Option<String>> =
    Lazy::new(|| hash_password("timing-equalizer-password").ok());

/// 비밀번호 해싱.
///
/// 솔트는 자동으로 생성되며 PHC 형식 문자열을 반환합니다.
///
/// ```rust,ignore
/// let hash = hash_password("123456").unwrap();
/// // "$argon2id$v=19$m=19456,t=2,p=1$..."
/// ```
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| PasswordError::HashingFailed)?;

    Ok(hash.to_string())
}

/// 비밀번호 검증.
///
/// 일치하면 `Ok(())`, 불일치하면 `VerificationFailed`.
pub fn verify_password(password: &str, hash: &str) -> Result<(), PasswordError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| PasswordError::InvalidHashFormat)?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| PasswordError::VerificationFailed)
}

/// [`hash_password`]를 블로킹 풀에서 실행합니다.
pub async fn hash_password_blocking(password: String) -> Result<String, PasswordError> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|_| PasswordError::Interrupted)?
}

/// [`verify_password`]를 블로킹 풀에서 실행합니다.
pub async fn verify_password_blocking(password: String, hash: String) -> Result<(), PasswordError> {
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|_| PasswordError::Interrupted)?
}

/// 더미 해시에 대해 검증을 수행하고 결과는 버립니다.
pub(crate) async fn burn_verification(password: String) {
    if let Some(hash) = DUMMY_HASH.as_ref() {
        let _ = verify_password_blocking(password, hash.clone()).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_password() {
        let hash = hash_password("123456").unwrap();
        assert!(hash.starts_with("$argon2id$"));

        assert!(verify_password("123456", &hash).is_ok());
        assert!(matches!(
            verify_password("654321", &hash),
            Err(PasswordError::VerificationFailed)
        ));
    }

    #[test]
    fn test_same_password_different_salts() {
        let first = hash_password("123456").unwrap();
        let second = hash_password("123456").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_invalid_hash_format() {
        assert!(matches!(
            verify_password("123456", "plain-text"),
            Err(PasswordError::InvalidHashFormat)
        ));
    }

    #[test]
    fn test_dummy_hash_available() {
        assert!(DUMMY_HASH.is_some());
    }

    #[tokio::test]
    async fn test_blocking_variants() {
        let hash = hash_password_blocking("abcdef".to_string()).await.unwrap();
        assert!(verify_password_blocking("abcdef".to_string(), hash.clone()).await.is_ok());
        assert!(verify_password_blocking("abcdeg".to_string(), hash).await.is_err());
    }
}
