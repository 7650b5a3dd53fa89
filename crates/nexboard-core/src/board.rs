//! Boards live inside exactly one workspace and hold tasks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct BoardRecord {
  pub id:                    i64,
  pub external_id:           Uuid,
  /// The governing workspace.
  pub workspace_id:          i64,
  pub workspace_external_id: Uuid,
  pub created_by:            Option<i64>,
  pub name:                  String,
  pub description:           Option<String>,
  pub created_at:            DateTime<Utc>,
  pub modified_at:           Option<DateTime<Utc>>,
}

impl BoardRecord {
  pub fn view(&self) -> BoardView {
    BoardView {
      external_id:           self.external_id,
      workspace_external_id: self.workspace_external_id,
      name:                  self.name.clone(),
      description:           self.description.clone(),
      created_at:            self.created_at,
      modified_at:           self.modified_at,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardView {
  pub external_id:           Uuid,
  pub workspace_external_id: Uuid,
  pub name:                  String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description:           Option<String>,
  pub created_at:            DateTime<Utc>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub modified_at:           Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct NewBoard {
  pub external_id:  Uuid,
  pub workspace_id: i64,
  pub created_by:   i64,
  pub name:         String,
  pub description:  Option<String>,
}
