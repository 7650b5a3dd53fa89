//! Users, the identities every permission decision is made about.
//!
//! A [`UserRecord`] carries the internal id and the credential hash and never
//! leaves the core; callers only ever see a [`UserView`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result, error::require_text};

/// A user row as read from the store. Only active users are ever returned.
#[derive(Debug, Clone)]
pub struct UserRecord {
  pub id:              i64,
  pub external_id:     Uuid,
  pub name:            String,
  pub email:           String,
  /// Opaque to the core; produced and checked by the credential service.
  pub credential_hash: String,
  pub avatar_url:      Option<String>,
  pub created_at:      DateTime<Utc>,
  pub modified_at:     Option<DateTime<Utc>>,
}

impl UserRecord {
  pub fn view(&self) -> UserView {
    UserView {
      external_id: self.external_id,
      name:        self.name.clone(),
      email:       self.email.clone(),
      avatar_url:  self.avatar_url.clone(),
      created_at:  self.created_at,
    }
  }
}

/// The externally-safe projection of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserView {
  pub external_id: Uuid,
  pub name:        String,
  pub email:       String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub avatar_url:  Option<String>,
  pub created_at:  DateTime<Utc>,
}

/// Input to [`crate::service::UserService::register`].
#[derive(Debug, Clone)]
pub struct NewAccount {
  pub name:            String,
  pub email:           String,
  pub credential_hash: String,
}

/// Input to [`crate::store::TrackerStore::create_user`]. The external id is
/// assigned by the orchestrator before the insert.
#[derive(Debug, Clone)]
pub struct NewUser {
  pub external_id:     Uuid,
  pub name:            String,
  pub email:           String,
  pub credential_hash: String,
}

/// Fields a user may change on their own profile.
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
  pub name:       String,
  pub avatar_url: Option<String>,
}

/// Minimal shape check: a non-empty local part and domain around one `@`.
pub fn validate_email(email: &str) -> Result<()> {
  require_text("email", email)?;
  match email.trim().split_once('@') {
    Some((local, domain))
      if !local.is_empty() && !domain.is_empty() && !domain.contains('@') =>
    {
      Ok(())
    }
    _ => Err(Error::InvalidArgument(format!("invalid email address: {email:?}"))),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn email_shapes() {
    assert!(validate_email("ana@example.com").is_ok());
    assert!(validate_email("  ana@example.com ").is_ok());
    assert!(validate_email("").is_err());
    assert!(validate_email("ana").is_err());
    assert!(validate_email("@example.com").is_err());
    assert!(validate_email("ana@").is_err());
    assert!(validate_email("a@b@c").is_err());
  }

  #[test]
  fn view_never_carries_the_credential_hash() {
    let record = UserRecord {
      id:              7,
      external_id:     Uuid::new_v4(),
      name:            "Ana".into(),
      email:           "ana@example.com".into(),
      credential_hash: "$argon2id$secret".into(),
      avatar_url:      None,
      created_at:      Utc::now(),
      modified_at:     None,
    };
    let json = serde_json::to_string(&record.view()).unwrap();
    assert!(!json.contains("argon2"));
    assert!(!json.contains("\"id\""));
    assert!(json.contains("external_id"));
  }
}
