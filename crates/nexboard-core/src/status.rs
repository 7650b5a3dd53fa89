//! Statuses: a flat, global vocabulary shared by every workspace.
//!
//! Names are unique among active statuses. The check and the write it guards
//! run in one store transaction; [`ensure_name_available`] is the rule the
//! store evaluates inside it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

#[derive(Debug, Clone)]
pub struct StatusRecord {
  pub id:          i64,
  pub external_id: Uuid,
  pub name:        String,
  pub color:       Option<String>,
  /// Ordering key; lists are sorted ascending on it.
  pub position:    i64,
  pub created_at:  DateTime<Utc>,
  pub modified_at: Option<DateTime<Utc>>,
}

impl StatusRecord {
  pub fn view(&self) -> StatusView {
    StatusView {
      external_id: self.external_id,
      name:        self.name.clone(),
      color:       self.color.clone(),
      position:    self.position,
      created_at:  self.created_at,
      modified_at: self.modified_at,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusView {
  pub external_id: Uuid,
  pub name:        String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub color:       Option<String>,
  pub position:    i64,
  pub created_at:  DateTime<Utc>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub modified_at: Option<DateTime<Utc>>,
}

/// Body of a status create or update.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusInput {
  pub name:     String,
  #[serde(default)]
  pub color:    Option<String>,
  /// Defaults to 0 on create; left unchanged on update when absent.
  #[serde(default)]
  pub position: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct NewStatus {
  pub external_id: Uuid,
  pub name:        String,
  pub color:       Option<String>,
  pub position:    i64,
}

#[derive(Debug, Clone)]
pub struct StatusChanges {
  pub name:     String,
  pub color:    Option<String>,
  pub position: i64,
}

/// `holder` is the id of the active status currently using `name`, if any;
/// `updating` is the status being renamed (a status never clashes with
/// itself).
pub fn ensure_name_available(
  name: &str,
  holder: Option<i64>,
  updating: Option<i64>,
) -> Result<()> {
  match holder {
    Some(id) if Some(id) != updating => Err(Error::Conflict(format!(
      "a status named {name:?} already exists"
    ))),
    _ => Ok(()),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::ErrorKind;

  #[test]
  fn free_name_is_available() {
    assert!(ensure_name_available("Done", None, None).is_ok());
    assert!(ensure_name_available("Done", None, Some(3)).is_ok());
  }

  #[test]
  fn taken_name_conflicts() {
    let err = ensure_name_available("Done", Some(1), None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
    let err = ensure_name_available("Done", Some(1), Some(2)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
  }

  #[test]
  fn keeping_own_name_is_not_a_clash() {
    assert!(ensure_name_available("Done", Some(2), Some(2)).is_ok());
  }
}
