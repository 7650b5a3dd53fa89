//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings. UUIDs are stored as
//! hyphenated lowercase strings. Roles and priorities use their lowercase
//! wire form.

use chrono::{DateTime, Utc};
use nexboard_core::{
  board::BoardRecord,
  membership::{MemberRecord, Role},
  status::StatusRecord,
  task::{AssigneeSummary, Priority, StatusSummary, TaskRecord},
  user::UserRecord,
  workspace::WorkspaceRecord,
};
use rusqlite::Row;
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

fn decode_opt_dt(s: Option<String>) -> Result<Option<DateTime<Utc>>> {
  s.as_deref().map(decode_dt).transpose()
}

// ─── Enumerations ────────────────────────────────────────────────────────────

pub fn decode_role(s: &str) -> Result<Role> {
  s.parse().map_err(|_| Error::Decode(format!("role {s:?}")))
}

pub fn decode_priority(s: &str) -> Result<Priority> {
  s.parse().map_err(|_| Error::Decode(format!("priority {s:?}")))
}

// ─── Row types ───────────────────────────────────────────────────────────────
//
// Each `*_SELECT` lists exactly the columns its `Raw*::from_row` reads, in
// order. Callers append their own `WHERE` / `ORDER BY`.

pub const USER_SELECT: &str = "
  SELECT u.id, u.external_id, u.name, u.email, u.credential_hash,
         u.avatar_url, u.created_at, u.modified_at
  FROM users u";

pub struct RawUser {
  pub id:              i64,
  pub external_id:     String,
  pub name:            String,
  pub email:           String,
  pub credential_hash: String,
  pub avatar_url:      Option<String>,
  pub created_at:      String,
  pub modified_at:     Option<String>,
}

impl RawUser {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:              row.get(0)?,
      external_id:     row.get(1)?,
      name:            row.get(2)?,
      email:           row.get(3)?,
      credential_hash: row.get(4)?,
      avatar_url:      row.get(5)?,
      created_at:      row.get(6)?,
      modified_at:     row.get(7)?,
    })
  }

  pub fn into_record(self) -> Result<UserRecord> {
    Ok(UserRecord {
      id:              self.id,
      external_id:     decode_uuid(&self.external_id)?,
      name:            self.name,
      email:           self.email,
      credential_hash: self.credential_hash,
      avatar_url:      self.avatar_url,
      created_at:      decode_dt(&self.created_at)?,
      modified_at:     decode_opt_dt(self.modified_at)?,
    })
  }
}

pub const WORKSPACE_SELECT: &str = "
  SELECT w.id, w.external_id, w.name, w.description, w.owner_id,
         o.external_id, w.created_at, w.modified_at
  FROM workspaces w
  JOIN users o ON o.id = w.owner_id";

pub struct RawWorkspace {
  pub id:                i64,
  pub external_id:       String,
  pub name:              String,
  pub description:       Option<String>,
  pub owner_id:          i64,
  pub owner_external_id: String,
  pub created_at:        String,
  pub modified_at:       Option<String>,
}

impl RawWorkspace {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:                row.get(0)?,
      external_id:       row.get(1)?,
      name:              row.get(2)?,
      description:       row.get(3)?,
      owner_id:          row.get(4)?,
      owner_external_id: row.get(5)?,
      created_at:        row.get(6)?,
      modified_at:       row.get(7)?,
    })
  }

  pub fn into_record(self) -> Result<WorkspaceRecord> {
    Ok(WorkspaceRecord {
      id:                self.id,
      external_id:       decode_uuid(&self.external_id)?,
      name:              self.name,
      description:       self.description,
      owner_id:          self.owner_id,
      owner_external_id: decode_uuid(&self.owner_external_id)?,
      created_at:        decode_dt(&self.created_at)?,
      modified_at:       decode_opt_dt(self.modified_at)?,
    })
  }
}

pub const MEMBER_SELECT: &str = "
  SELECT m.workspace_id, m.user_id, u.external_id, u.name, u.email,
         m.role, m.joined_at
  FROM workspace_members m
  JOIN users u ON u.id = m.user_id";

pub struct RawMember {
  pub workspace_id:     i64,
  pub user_id:          i64,
  pub user_external_id: String,
  pub name:             String,
  pub email:            String,
  pub role:             String,
  pub joined_at:        String,
}

impl RawMember {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      workspace_id:     row.get(0)?,
      user_id:          row.get(1)?,
      user_external_id: row.get(2)?,
      name:             row.get(3)?,
      email:            row.get(4)?,
      role:             row.get(5)?,
      joined_at:        row.get(6)?,
    })
  }

  pub fn into_record(self) -> Result<MemberRecord> {
    Ok(MemberRecord {
      workspace_id:     self.workspace_id,
      user_id:          self.user_id,
      user_external_id: decode_uuid(&self.user_external_id)?,
      name:             self.name,
      email:            self.email,
      role:             decode_role(&self.role)?,
      joined_at:        decode_dt(&self.joined_at)?,
    })
  }
}

pub const BOARD_SELECT: &str = "
  SELECT b.id, b.external_id, b.workspace_id, w.external_id, b.created_by,
         b.name, b.description, b.created_at, b.modified_at
  FROM boards b
  JOIN workspaces w ON w.id = b.workspace_id";

pub struct RawBoard {
  pub id:                    i64,
  pub external_id:           String,
  pub workspace_id:          i64,
  pub workspace_external_id: String,
  pub created_by:            Option<i64>,
  pub name:                  String,
  pub description:           Option<String>,
  pub created_at:            String,
  pub modified_at:           Option<String>,
}

impl RawBoard {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:                    row.get(0)?,
      external_id:           row.get(1)?,
      workspace_id:          row.get(2)?,
      workspace_external_id: row.get(3)?,
      created_by:            row.get(4)?,
      name:                  row.get(5)?,
      description:           row.get(6)?,
      created_at:            row.get(7)?,
      modified_at:           row.get(8)?,
    })
  }

  pub fn into_record(self) -> Result<BoardRecord> {
    Ok(BoardRecord {
      id:                    self.id,
      external_id:           decode_uuid(&self.external_id)?,
      workspace_id:          self.workspace_id,
      workspace_external_id: decode_uuid(&self.workspace_external_id)?,
      created_by:            self.created_by,
      name:                  self.name,
      description:           self.description,
      created_at:            decode_dt(&self.created_at)?,
      modified_at:           decode_opt_dt(self.modified_at)?,
    })
  }
}

pub const STATUS_SELECT: &str = "
  SELECT s.id, s.external_id, s.name, s.color, s.position,
         s.created_at, s.modified_at
  FROM statuses s";

pub struct RawStatus {
  pub id:          i64,
  pub external_id: String,
  pub name:        String,
  pub color:       Option<String>,
  pub position:    i64,
  pub created_at:  String,
  pub modified_at: Option<String>,
}

impl RawStatus {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:          row.get(0)?,
      external_id: row.get(1)?,
      name:        row.get(2)?,
      color:       row.get(3)?,
      position:    row.get(4)?,
      created_at:  row.get(5)?,
      modified_at: row.get(6)?,
    })
  }

  pub fn into_record(self) -> Result<StatusRecord> {
    Ok(StatusRecord {
      id:          self.id,
      external_id: decode_uuid(&self.external_id)?,
      name:        self.name,
      color:       self.color,
      position:    self.position,
      created_at:  decode_dt(&self.created_at)?,
      modified_at: decode_opt_dt(self.modified_at)?,
    })
  }
}

/// Tasks joined with their board, status and (optional) assignee.
pub const TASK_SELECT: &str = "
  SELECT t.id, t.external_id, t.board_id, b.external_id,
         t.status_id, s.external_id, s.name, s.color,
         t.assigned_to, a.external_id, a.name,
         t.created_by, t.title, t.description, t.priority, t.due_date,
         t.position, t.created_at, t.modified_at
  FROM tasks t
  JOIN boards   b ON b.id = t.board_id
  JOIN statuses s ON s.id = t.status_id
  LEFT JOIN users a ON a.id = t.assigned_to";

pub struct RawTask {
  pub id:                   i64,
  pub external_id:          String,
  pub board_id:             i64,
  pub board_external_id:    String,
  pub status_id:            i64,
  pub status_external_id:   String,
  pub status_name:          String,
  pub status_color:         Option<String>,
  pub assignee_id:          Option<i64>,
  pub assignee_external_id: Option<String>,
  pub assignee_name:        Option<String>,
  pub created_by:           i64,
  pub title:                String,
  pub description:          Option<String>,
  pub priority:             String,
  pub due_date:             Option<String>,
  pub position:             i64,
  pub created_at:           String,
  pub modified_at:          Option<String>,
}

impl RawTask {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:                   row.get(0)?,
      external_id:          row.get(1)?,
      board_id:             row.get(2)?,
      board_external_id:    row.get(3)?,
      status_id:            row.get(4)?,
      status_external_id:   row.get(5)?,
      status_name:          row.get(6)?,
      status_color:         row.get(7)?,
      assignee_id:          row.get(8)?,
      assignee_external_id: row.get(9)?,
      assignee_name:        row.get(10)?,
      created_by:           row.get(11)?,
      title:                row.get(12)?,
      description:          row.get(13)?,
      priority:             row.get(14)?,
      due_date:             row.get(15)?,
      position:             row.get(16)?,
      created_at:           row.get(17)?,
      modified_at:          row.get(18)?,
    })
  }

  pub fn into_record(self) -> Result<TaskRecord> {
    let assignee = match (self.assignee_external_id, self.assignee_name) {
      (Some(id), Some(name)) => {
        Some(AssigneeSummary { external_id: decode_uuid(&id)?, name })
      }
      _ => None,
    };

    Ok(TaskRecord {
      id: self.id,
      external_id: decode_uuid(&self.external_id)?,
      board_id: self.board_id,
      board_external_id: decode_uuid(&self.board_external_id)?,
      status_id: self.status_id,
      status: StatusSummary {
        external_id: decode_uuid(&self.status_external_id)?,
        name:        self.status_name,
        color:       self.status_color,
      },
      assignee_id: self.assignee_id,
      assignee,
      created_by: self.created_by,
      title: self.title,
      description: self.description,
      priority: decode_priority(&self.priority)?,
      due_date: decode_opt_dt(self.due_date)?,
      position: self.position,
      created_at: decode_dt(&self.created_at)?,
      modified_at: decode_opt_dt(self.modified_at)?,
    })
  }
}
