//! Tasks: the leaves of the hierarchy. A task belongs to one board, points at
//! one global status, and may be assigned to a member of its workspace.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Priority ────────────────────────────────────────────────────────────────

#[derive(
  Debug,
  Clone,
  Copy,
  Default,
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
pub enum Priority {
  #[default]
  Low,
  Medium,
  High,
}

impl Priority {
  /// Parse an optional wire value. Absent or empty input yields `fallback`.
  pub fn resolve(raw: Option<&str>, fallback: Priority) -> Result<Self> {
    match raw.map(str::trim) {
      None | Some("") => Ok(fallback),
      Some(s) => s
        .parse()
        .map_err(|_| Error::InvalidArgument(format!("invalid priority: {s:?}"))),
    }
  }
}

// ─── Records ─────────────────────────────────────────────────────────────────

/// The status fields denormalised onto every task projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSummary {
  pub external_id: Uuid,
  pub name:        String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub color:       Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssigneeSummary {
  pub external_id: Uuid,
  pub name:        String,
}

/// A task row joined with its board, status and assignee.
#[derive(Debug, Clone)]
pub struct TaskRecord {
  pub id:                i64,
  pub external_id:       Uuid,
  pub board_id:          i64,
  pub board_external_id: Uuid,
  pub status_id:         i64,
  pub status:            StatusSummary,
  pub assignee_id:       Option<i64>,
  pub assignee:          Option<AssigneeSummary>,
  pub created_by:        i64,
  pub title:             String,
  pub description:       Option<String>,
  pub priority:          Priority,
  pub due_date:          Option<DateTime<Utc>>,
  pub position:          i64,
  pub created_at:        DateTime<Utc>,
  pub modified_at:       Option<DateTime<Utc>>,
}

impl TaskRecord {
  pub fn view(&self) -> TaskView {
    TaskView {
      external_id:       self.external_id,
      board_external_id: self.board_external_id,
      status:            self.status.clone(),
      assigned_to:       self.assignee.clone(),
      title:             self.title.clone(),
      description:       self.description.clone(),
      priority:          self.priority,
      due_date:          self.due_date,
      position:          self.position,
      created_at:        self.created_at,
      modified_at:       self.modified_at,
    }
  }

  /// The current mutable fields, as a starting point for a partial change.
  pub fn changes(&self) -> TaskChanges {
    TaskChanges {
      status_id:   self.status_id,
      assignee_id: self.assignee_id,
      title:       self.title.clone(),
      description: self.description.clone(),
      priority:    self.priority,
      due_date:    self.due_date,
      position:    self.position,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskView {
  pub external_id:       Uuid,
  pub board_external_id: Uuid,
  pub status:            StatusSummary,
  /// `null` when unassigned.
  pub assigned_to:       Option<AssigneeSummary>,
  pub title:             String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description:       Option<String>,
  pub priority:          Priority,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub due_date:          Option<DateTime<Utc>>,
  pub position:          i64,
  pub created_at:        DateTime<Utc>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub modified_at:       Option<DateTime<Utc>>,
}

// ─── Inputs ──────────────────────────────────────────────────────────────────

/// Body of a task create or full update.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskInput {
  pub title:                   String,
  #[serde(default)]
  pub description:             Option<String>,
  /// `low`, `medium` or `high`; empty or absent means "default" on create and
  /// "unchanged" on update.
  #[serde(default)]
  pub priority:                Option<String>,
  #[serde(default)]
  pub due_date:                Option<DateTime<Utc>>,
  pub status_external_id:      Uuid,
  #[serde(default)]
  pub assigned_to_external_id: Option<Uuid>,
}

/// Input to [`crate::store::TrackerStore::create_task`]. The store appends
/// the task to the bottom of its status column.
#[derive(Debug, Clone)]
pub struct NewTask {
  pub external_id: Uuid,
  pub board_id:    i64,
  pub status_id:   i64,
  pub assignee_id: Option<i64>,
  pub created_by:  i64,
  pub title:       String,
  pub description: Option<String>,
  pub priority:    Priority,
  pub due_date:    Option<DateTime<Utc>>,
}

/// The full set of mutable task fields; updates always write all of them.
#[derive(Debug, Clone)]
pub struct TaskChanges {
  pub status_id:   i64,
  pub assignee_id: Option<i64>,
  pub title:       String,
  pub description: Option<String>,
  pub priority:    Priority,
  pub due_date:    Option<DateTime<Utc>>,
  pub position:    i64,
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::ErrorKind;

  #[test]
  fn priority_defaults_when_unset() {
    assert_eq!(Priority::resolve(None, Priority::Low).unwrap(), Priority::Low);
    assert_eq!(
      Priority::resolve(Some(""), Priority::High).unwrap(),
      Priority::High
    );
  }

  #[test]
  fn priority_parses_known_values() {
    assert_eq!(
      Priority::resolve(Some("medium"), Priority::Low).unwrap(),
      Priority::Medium
    );
    assert_eq!(
      Priority::resolve(Some("high"), Priority::Low).unwrap(),
      Priority::High
    );
  }

  #[test]
  fn unknown_priority_is_invalid() {
    let err = Priority::resolve(Some("urgent"), Priority::Low).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
  }
}
