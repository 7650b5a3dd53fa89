//! Signed bearer tokens: HS256 JWTs carrying the user's external id and
//! e-mail.

use chrono::{DateTime, Utc};
use jsonwebtoken::{
  Algorithm, DecodingKey, EncodingKey, Header, Validation,
  errors::ErrorKind as JwtErrorKind,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum TokenError {
  #[error("malformed token")]
  Malformed,

  #[error("invalid token signature")]
  BadSignature,

  #[error("token expired")]
  Expired,

  #[error("failed to sign token: {0}")]
  Sign(#[source] jsonwebtoken::errors::Error),
}

pub type Result<T, E = TokenError> = std::result::Result<T, E>;

/// What a verified token vouches for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
  pub sub:   Uuid,
  pub email: String,
  /// Expiry as a Unix timestamp in seconds.
  pub exp:   i64,
}

#[derive(Clone)]
pub struct TokenService {
  encoding:   EncodingKey,
  decoding:   DecodingKey,
  validation: Validation,
  ttl_secs:   i64,
}

impl TokenService {
  pub fn new(secret: impl AsRef<[u8]>, ttl_secs: u64) -> Self {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    Self {
      encoding: EncodingKey::from_secret(secret.as_ref()),
      decoding: DecodingKey::from_secret(secret.as_ref()),
      validation,
      ttl_secs: i64::try_from(ttl_secs).unwrap_or(i64::MAX),
    }
  }

  pub fn issue(&self, sub: Uuid, email: &str) -> Result<String> {
    self.issue_at(sub, email, Utc::now())
  }

  fn issue_at(&self, sub: Uuid, email: &str, now: DateTime<Utc>) -> Result<String> {
    let claims = Claims {
      sub,
      email: email.to_owned(),
      exp: now.timestamp().saturating_add(self.ttl_secs),
    };
    jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
      .map_err(TokenError::Sign)
  }

  /// Check the signature, then expiry.
  pub fn verify(&self, token: &str) -> Result<Claims> {
    jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)
      .map(|data| data.claims)
      .map_err(|e| match e.kind() {
        JwtErrorKind::ExpiredSignature => TokenError::Expired,
        JwtErrorKind::InvalidSignature => TokenError::BadSignature,
        _ => TokenError::Malformed,
      })
  }
}
