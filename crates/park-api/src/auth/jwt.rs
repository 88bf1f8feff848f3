//! 토큰 발급 및 검증.
//!
//! HS256 서명 토큰을 사용합니다. 서명 키와 유효 시간은 생성 시 주입되며
//! 이후 변경되지 않으므로 여러 요청에서 동기화 없이 공유할 수 있습니다.

use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use park_core::Role;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

/// 토큰 페이로드.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - 사용자명
    pub sub: String,
    /// 사용자 역할 (`ADMIN` / `CUSTOMER`)
    pub role: Role,
    /// Issued At (Unix timestamp, 초)
    pub iat: i64,
    /// Expiration (Unix timestamp, 초)
    pub exp: i64,
    /// JWT ID - 같은 초에 발급된 토큰도 서로 다른 문자열이 되도록 합니다
    pub jti: String,
}

impl Claims {
    /// 발급 시각.
    pub fn issued_at(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.iat, 0).single().unwrap_or_default()
    }

    /// 만료 시각.
    pub fn expires_at(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.exp, 0).single().unwrap_or_default()
    }

    /// `now` 시점에 만료되었는지 확인. 만료 시각 당일 초부터 만료로 봅니다.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }
}

/// 토큰 처리 에러.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("잘못된 토큰 형식")]
    Malformed,
    /// 변조와 잘못된 키는 구분하지 않습니다.
    #[error("토큰 서명이 유효하지 않습니다")]
    BadSignature,
    #[error("토큰이 만료되었습니다")]
    Expired,
    #[error("토큰 subject가 비어 있습니다")]
    EmptySubject,
    #[error("토큰 만료 시각이 표현 범위를 벗어납니다")]
    ExpiryOutOfRange,
    #[error("토큰 인코딩 실패: {0}")]
    Encoding(#[source] jsonwebtoken::errors::Error),
}

impl TokenError {
    /// 로그용 짧은 분류명.
    pub fn kind(&self) -> &'static str {
        match self {
            TokenError::Malformed => "malformed",
            TokenError::BadSignature => "bad_signature",
            TokenError::Expired => "expired",
            TokenError::EmptySubject => "empty_subject",
            TokenError::ExpiryOutOfRange => "expiry_out_of_range",
            TokenError::Encoding(_) => "encoding",
        }
    }
}

/// 토큰 발급기 겸 검증기.
///
/// # 사용 예시
///
/// ```rust,ignore
/// let codec = TokenCodec::new(&secret, chrono::Duration::minutes(30));
/// let token = codec.issue("alice@park.com", Role::Customer, Utc::now())?;
/// let claims = codec.verify(&token, Utc::now())?;
/// ```
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("algorithm", &Algorithm::HS256)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenCodec {
    /// 서명 키와 유효 시간으로 생성합니다.
    pub fn new(secret: &SecretString, ttl: Duration) -> Self {
        let key = secret.expose_secret().as_bytes();

        let mut validation = Validation::new(Algorithm::HS256);
        // 만료는 주입된 `now`로 직접 판정
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(key),
            decoding_key: DecodingKey::from_secret(key),
            validation,
            ttl,
        }
    }

    /// 토큰 유효 시간.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// 토큰 발급.
    ///
    /// `iat = now`, `exp = now + ttl`로 서명된 토큰 문자열을 반환합니다.
    pub fn issue(&self, subject: &str, role: Role, now: DateTime<Utc>) -> Result<String, TokenError> {
        if subject.trim().is_empty() {
            return Err(TokenError::EmptySubject);
        }

        let expires_at = now
            .checked_add_signed(self.ttl)
            .ok_or(TokenError::ExpiryOutOfRange)?;

        let claims = Claims {
            sub: subject.to_string(),
            role,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            jti: uuid::Uuid::new_v4().to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(TokenError::Encoding)
    }

    /// 토큰 검증.
    ///
    /// 어떤 입력이든 성공 또는 하나의 에러로 끝나며 패닉하지 않습니다.
    /// 서명 비교는 HMAC 검증의 상수 시간 비교를 사용합니다.
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| classify(e.kind()))?;

        if data.claims.is_expired_at(now) {
            return Err(TokenError::Expired);
        }

        Ok(data.claims)
    }
}

fn classify(kind: &ErrorKind) -> TokenError {
    match kind {
        ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => TokenError::BadSignature,
        ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Malformed,
    }
}
