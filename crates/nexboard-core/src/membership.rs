//! The membership table: who belongs to a workspace, and with what role.
//!
//! Two invariants hold for every workspace after any sequence of valid
//! operations:
//!
//! - exactly one row has role [`Role::Owner`], and its user is the workspace's
//!   recorded owner;
//! - a user holds at most one row per workspace.
//!
//! The owner row is written only by workspace creation. Every other write path
//! goes through [`ensure_assignable`] and [`ensure_not_owner`], which the store
//! evaluates inside the same transaction as the write.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use uuid::Uuid;

use crate::{Error, Result, store::TrackerStore};

// ─── Role ────────────────────────────────────────────────────────────────────

/// A workspace-scoped role. Boards and tasks inherit the role of their
/// governing workspace; there are no finer-grained roles.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  EnumString,
  Display,
  AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
  Owner,
  Admin,
  Member,
}

impl Role {
  /// Parse a role from its wire form, rejecting anything else as
  /// `InvalidArgument`.
  pub fn parse(s: &str) -> Result<Self> {
    s.parse()
      .map_err(|_| Error::InvalidArgument(format!("invalid role: {s:?}")))
  }
}

// ─── Records ─────────────────────────────────────────────────────────────────

/// A membership row joined with the member's public identity.
#[derive(Debug, Clone)]
pub struct MemberRecord {
  pub workspace_id:     i64,
  pub user_id:          i64,
  pub user_external_id: Uuid,
  pub name:             String,
  pub email:            String,
  pub role:             Role,
  pub joined_at:        DateTime<Utc>,
}

impl MemberRecord {
  pub fn view(&self) -> MemberView {
    MemberView {
      user_external_id: self.user_external_id,
      name:             self.name.clone(),
      email:            self.email.clone(),
      role:             self.role,
      joined_at:        self.joined_at,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberView {
  pub user_external_id: Uuid,
  pub name:             String,
  pub email:            String,
  pub role:             Role,
  pub joined_at:        DateTime<Utc>,
}

// ─── Invariant checks ────────────────────────────────────────────────────────

/// Only workspace creation may write an owner row.
pub fn ensure_assignable(role: Role) -> Result<()> {
  if role == Role::Owner {
    return Err(Error::InvalidArgument(
      "the owner role cannot be granted; it belongs to the workspace creator"
        .into(),
    ));
  }
  Ok(())
}

/// The recorded owner's membership can be neither re-roled nor removed.
pub fn ensure_not_owner(owner_id: i64, target_user_id: i64) -> Result<()> {
  if owner_id == target_user_id {
    return Err(Error::InvalidArgument(
      "the workspace owner's membership cannot be changed or removed".into(),
    ));
  }
  Ok(())
}

// ─── Table operations ────────────────────────────────────────────────────────

/// The membership operations every orchestrator and the access policy share.
///
/// Writes are delegated to the store, which evaluates the invariant checks in
/// the same transaction as the write.
pub struct MembershipTable<S> {
  store: Arc<S>,
}

impl<S: TrackerStore> MembershipTable<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  /// `RoleOf`: the single primitive the access policy depends on.
  pub async fn role_of(&self, workspace_id: i64, user_id: i64) -> Result<Role> {
    self
      .store
      .member_role(workspace_id, user_id)
      .await
      .map_err(Into::into)?
      .ok_or_else(|| Error::not_found("membership"))
  }

  pub async fn add(
    &self,
    workspace_id: i64,
    user_id: i64,
    role: Role,
  ) -> Result<MemberRecord> {
    ensure_assignable(role)?;
    self
      .store
      .add_member(workspace_id, user_id, role)
      .await
      .map_err(Into::into)
  }

  pub async fn change_role(
    &self,
    workspace_id: i64,
    user_id: i64,
    role: Role,
  ) -> Result<MemberRecord> {
    ensure_assignable(role)?;
    self
      .store
      .change_member_role(workspace_id, user_id, role)
      .await
      .map_err(Into::into)
  }

  pub async fn remove(&self, workspace_id: i64, user_id: i64) -> Result<()> {
    self
      .store
      .remove_member(workspace_id, user_id)
      .await
      .map_err(Into::into)
  }

  pub async fn list(&self, workspace_id: i64) -> Result<Vec<MemberRecord>> {
    self.store.members(workspace_id).await.map_err(Into::into)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::ErrorKind;

  #[test]
  fn roles_parse_from_lowercase_only() {
    assert_eq!(Role::parse("owner").unwrap(), Role::Owner);
    assert_eq!(Role::parse("admin").unwrap(), Role::Admin);
    assert_eq!(Role::parse("member").unwrap(), Role::Member);
    for bad in ["Owner", "ADMIN", "guest", ""] {
      assert_eq!(
        Role::parse(bad).unwrap_err().kind(),
        ErrorKind::InvalidArgument,
        "{bad:?} should be rejected"
      );
    }
  }

  #[test]
  fn role_wire_form_matches_serde() {
    assert_eq!(Role::Admin.as_ref(), "admin");
    assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
  }

  #[test]
  fn owner_role_is_never_assignable() {
    assert!(ensure_assignable(Role::Member).is_ok());
    assert!(ensure_assignable(Role::Admin).is_ok());
    assert_eq!(
      ensure_assignable(Role::Owner).unwrap_err().kind(),
      ErrorKind::InvalidArgument
    );
  }

  #[test]
  fn owner_membership_is_immutable() {
    assert!(ensure_not_owner(1, 2).is_ok());
    assert_eq!(
      ensure_not_owner(1, 1).unwrap_err().kind(),
      ErrorKind::InvalidArgument
    );
  }
}
