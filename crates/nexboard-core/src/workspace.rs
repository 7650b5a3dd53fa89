//! Workspaces: the top of the containment hierarchy and the only scope that
//! carries roles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A workspace row joined with its owner's external id.
#[derive(Debug, Clone)]
pub struct WorkspaceRecord {
  pub id:                i64,
  pub external_id:       Uuid,
  pub name:              String,
  pub description:       Option<String>,
  /// The canonical owner. Always also present in the membership table with
  /// role `owner`.
  pub owner_id:          i64,
  pub owner_external_id: Uuid,
  pub created_at:        DateTime<Utc>,
  pub modified_at:       Option<DateTime<Utc>>,
}

impl WorkspaceRecord {
  pub fn view(&self) -> WorkspaceView {
    WorkspaceView {
      external_id:       self.external_id,
      name:              self.name.clone(),
      description:       self.description.clone(),
      owner_external_id: self.owner_external_id,
      created_at:        self.created_at,
      modified_at:       self.modified_at,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceView {
  pub external_id:       Uuid,
  pub name:              String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description:       Option<String>,
  pub owner_external_id: Uuid,
  pub created_at:        DateTime<Utc>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub modified_at:       Option<DateTime<Utc>>,
}

/// Input to [`crate::store::TrackerStore::create_workspace`].
#[derive(Debug, Clone)]
pub struct NewWorkspace {
  pub external_id: Uuid,
  pub name:        String,
  pub description: Option<String>,
  pub owner_id:    i64,
}

/// Name and description, shared by workspace and board create/update.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Details {
  pub name:        String,
  #[serde(default)]
  pub description: Option<String>,
}
