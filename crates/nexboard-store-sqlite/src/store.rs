//! [`SqliteStore`], the SQLite implementation of [`TrackerStore`].

use std::path::Path;

use chrono::Utc;
use nexboard_core::{
  board::{BoardRecord, NewBoard},
  guard::{Guarded, ensure_no_dependents},
  membership::{MemberRecord, Role, ensure_not_owner},
  status::{NewStatus, StatusChanges, StatusRecord, ensure_name_available},
  store::TrackerStore,
  task::{NewTask, TaskChanges, TaskRecord},
  user::{NewUser, ProfileChanges, UserRecord},
  workspace::{Details, NewWorkspace, WorkspaceRecord},
};
use rusqlite::{OptionalExtension as _, TransactionBehavior};
use uuid::Uuid;

use crate::{
  Result,
  encode::{
    BOARD_SELECT, MEMBER_SELECT, RawBoard, RawMember, RawStatus, RawTask,
    RawUser, RawWorkspace, STATUS_SELECT, TASK_SELECT, USER_SELECT,
    WORKSPACE_SELECT, decode_role, encode_dt, encode_uuid,
  },
  schema::SCHEMA,
};

type Mapper<T> = fn(&rusqlite::Row<'_>) -> rusqlite::Result<T>;

/// Outcome of a transaction that may be refused by a domain rule. The outer
/// `tokio_rusqlite` result carries driver failures; the inner one carries the
/// refusal, after which the transaction is dropped and rolled back.
type Checked<T> = std::result::Result<T, nexboard_core::Error>;

// ─── Store ───────────────────────────────────────────────────────────────────

/// A NexBoard store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref().to_owned();
    let conn = tokio_rusqlite::Connection::open(&path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    tracing::debug!(path = %path.display(), "opened sqlite store");
    Ok(store)
  }

  /// Open an in-memory store, mainly for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn fetch_one<T, P>(
    &self,
    sql: String,
    params: P,
    map: Mapper<T>,
  ) -> Result<Option<T>>
  where
    T: Send + 'static,
    P: rusqlite::Params + Send + 'static,
  {
    let row = self
      .conn
      .call(move |conn| Ok(conn.query_row(&sql, params, map).optional()?))
      .await?;
    Ok(row)
  }

  async fn fetch_all<T, P>(
    &self,
    sql: String,
    params: P,
    map: Mapper<T>,
  ) -> Result<Vec<T>>
  where
    T: Send + 'static,
    P: rusqlite::Params + Send + 'static,
  {
    let rows = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(params, map)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }
}

// ─── Row loaders ─────────────────────────────────────────────────────────────
//
// Synchronous, so they can run inside a transaction right after a write.

fn user_row(conn: &rusqlite::Connection, id: i64) -> rusqlite::Result<RawUser> {
  conn.query_row(&format!("{USER_SELECT} WHERE u.id = ?1"), [id], RawUser::from_row)
}

fn workspace_row(
  conn: &rusqlite::Connection,
  id: i64,
) -> rusqlite::Result<RawWorkspace> {
  conn.query_row(
    &format!("{WORKSPACE_SELECT} WHERE w.id = ?1"),
    [id],
    RawWorkspace::from_row,
  )
}

fn member_row(
  conn: &rusqlite::Connection,
  workspace_id: i64,
  user_id: i64,
) -> rusqlite::Result<Option<RawMember>> {
  conn
    .query_row(
      &format!("{MEMBER_SELECT} WHERE m.workspace_id = ?1 AND m.user_id = ?2"),
      [workspace_id, user_id],
      RawMember::from_row,
    )
    .optional()
}

fn board_row(conn: &rusqlite::Connection, id: i64) -> rusqlite::Result<RawBoard> {
  conn.query_row(&format!("{BOARD_SELECT} WHERE b.id = ?1"), [id], RawBoard::from_row)
}

fn status_row(conn: &rusqlite::Connection, id: i64) -> rusqlite::Result<RawStatus> {
  conn.query_row(
    &format!("{STATUS_SELECT} WHERE s.id = ?1"),
    [id],
    RawStatus::from_row,
  )
}

fn task_row(conn: &rusqlite::Connection, id: i64) -> rusqlite::Result<RawTask> {
  conn.query_row(&format!("{TASK_SELECT} WHERE t.id = ?1"), [id], RawTask::from_row)
}

/// The active status holding `name`, if any.
fn status_named(
  conn: &rusqlite::Connection,
  name: &str,
) -> rusqlite::Result<Option<i64>> {
  conn
    .query_row(
      "SELECT id FROM statuses WHERE name = ?1 AND active_status = 1",
      [name],
      |row| row.get(0),
    )
    .optional()
}

fn workspace_owner(
  conn: &rusqlite::Connection,
  workspace_id: i64,
) -> rusqlite::Result<i64> {
  conn.query_row(
    "SELECT owner_id FROM workspaces WHERE id = ?1",
    [workspace_id],
    |row| row.get(0),
  )
}

/// Position for a task appended to the bottom of its column on a board.
fn column_tail(
  conn: &rusqlite::Connection,
  board_id: i64,
  status_id: i64,
) -> rusqlite::Result<i64> {
  conn.query_row(
    "SELECT COALESCE(MAX(position) + 1, 0) FROM tasks
     WHERE board_id = ?1 AND status_id = ?2 AND active_status = 1",
    [board_id, status_id],
    |row| row.get(0),
  )
}

/// The row was removed between resolution and the write.
fn not_found(what: &str) -> nexboard_core::Error {
  nexboard_core::Error::NotFound(format!("{what} not found"))
}

fn membership_not_found() -> nexboard_core::Error { not_found("membership") }

// ─── TrackerStore impl ───────────────────────────────────────────────────────

impl TrackerStore for SqliteStore {
  type Error = crate::Error;

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn create_user(&self, input: NewUser) -> Result<UserRecord> {
    let id_str = encode_uuid(input.external_id);
    let now    = encode_dt(Utc::now());

    let raw = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let taken = tx
          .query_row(
            "SELECT 1 FROM users WHERE email = ?1 AND active_status = 1",
            [&input.email],
            |_| Ok(()),
          )
          .optional()?
          .is_some();
        if taken {
          return Ok(Checked::Err(nexboard_core::Error::Conflict(format!(
            "email {:?} is already registered",
            input.email
          ))));
        }

        tx.execute(
          "INSERT INTO users (external_id, name, email, credential_hash, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![
            id_str,
            input.name,
            input.email,
            input.credential_hash,
            now
          ],
        )?;
        let raw = user_row(&tx, tx.last_insert_rowid())?;
        tx.commit()?;
        Ok(Checked::Ok(raw))
      })
      .await??;

    raw.into_record()
  }

  async fn user_by_external_id(&self, external_id: Uuid) -> Result<Option<UserRecord>> {
    self
      .fetch_one(
        format!("{USER_SELECT} WHERE u.external_id = ?1 AND u.active_status = 1"),
        [encode_uuid(external_id)],
        RawUser::from_row,
      )
      .await?
      .map(RawUser::into_record)
      .transpose()
  }

  async fn user_by_email(&self, email: String) -> Result<Option<UserRecord>> {
    self
      .fetch_one(
        format!("{USER_SELECT} WHERE u.email = ?1 AND u.active_status = 1"),
        [email],
        RawUser::from_row,
      )
      .await?
      .map(RawUser::into_record)
      .transpose()
  }

  async fn update_user_profile(
    &self,
    id: i64,
    changes: ProfileChanges,
  ) -> Result<UserRecord> {
    let now = encode_dt(Utc::now());

    let raw = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "UPDATE users SET name = ?1, avatar_url = ?2, modified_at = ?3
           WHERE id = ?4 AND active_status = 1",
          rusqlite::params![changes.name, changes.avatar_url, now, id],
        )?;
        if changed == 0 {
          return Ok(Err(not_found("user")));
        }
        Ok(Ok(user_row(conn, id)?))
      })
      .await??;

    raw.into_record()
  }

  // ── Workspaces ────────────────────────────────────────────────────────────

  async fn create_workspace(&self, input: NewWorkspace) -> Result<WorkspaceRecord> {
    let id_str   = encode_uuid(input.external_id);
    let now      = encode_dt(Utc::now());
    let owner_id = input.owner_id;

    let raw = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute(
          "INSERT INTO workspaces (external_id, name, description, owner_id, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![id_str, input.name, input.description, owner_id, now],
        )?;
        let workspace_id = tx.last_insert_rowid();
        tx.execute(
          "INSERT INTO workspace_members (workspace_id, user_id, role, joined_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![workspace_id, owner_id, Role::Owner.as_ref(), now],
        )?;
        let raw = workspace_row(&tx, workspace_id)?;
        tx.commit()?;
        Ok(raw)
      })
      .await?;

    raw.into_record()
  }

  async fn workspace_by_external_id(
    &self,
    external_id: Uuid,
  ) -> Result<Option<WorkspaceRecord>> {
    self
      .fetch_one(
        format!("{WORKSPACE_SELECT} WHERE w.external_id = ?1 AND w.active_status = 1"),
        [encode_uuid(external_id)],
        RawWorkspace::from_row,
      )
      .await?
      .map(RawWorkspace::into_record)
      .transpose()
  }

  async fn workspace_by_id(&self, id: i64) -> Result<Option<WorkspaceRecord>> {
    self
      .fetch_one(
        format!("{WORKSPACE_SELECT} WHERE w.id = ?1 AND w.active_status = 1"),
        [id],
        RawWorkspace::from_row,
      )
      .await?
      .map(RawWorkspace::into_record)
      .transpose()
  }

  async fn workspaces_for_member(&self, user_id: i64) -> Result<Vec<WorkspaceRecord>> {
    self
      .fetch_all(
        format!(
          "{WORKSPACE_SELECT}
           JOIN workspace_members m ON m.workspace_id = w.id
           WHERE m.user_id = ?1 AND w.active_status = 1
           ORDER BY w.created_at, w.id"
        ),
        [user_id],
        RawWorkspace::from_row,
      )
      .await?
      .into_iter()
      .map(RawWorkspace::into_record)
      .collect()
  }

  async fn update_workspace(&self, id: i64, details: Details) -> Result<WorkspaceRecord> {
    let now = encode_dt(Utc::now());

    let raw = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "UPDATE workspaces SET name = ?1, description = ?2, modified_at = ?3
           WHERE id = ?4 AND active_status = 1",
          rusqlite::params![details.name, details.description, now, id],
        )?;
        if changed == 0 {
          return Ok(Err(not_found("workspace")));
        }
        Ok(Ok(workspace_row(conn, id)?))
      })
      .await??;

    raw.into_record()
  }

  async fn delete_workspace(&self, id: i64) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute("DELETE FROM workspaces WHERE id = ?1", [id])?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Membership ────────────────────────────────────────────────────────────

  async fn member_role(&self, workspace_id: i64, user_id: i64) -> Result<Option<Role>> {
    self
      .fetch_one(
        "SELECT role FROM workspace_members WHERE workspace_id = ?1 AND user_id = ?2"
          .to_owned(),
        [workspace_id, user_id],
        |row| row.get::<_, String>(0),
      )
      .await?
      .as_deref()
      .map(decode_role)
      .transpose()
  }

  async fn members(&self, workspace_id: i64) -> Result<Vec<MemberRecord>> {
    self
      .fetch_all(
        format!("{MEMBER_SELECT} WHERE m.workspace_id = ?1 ORDER BY m.joined_at, m.user_id"),
        [workspace_id],
        RawMember::from_row,
      )
      .await?
      .into_iter()
      .map(RawMember::into_record)
      .collect()
  }

  async fn add_member(
    &self,
    workspace_id: i64,
    user_id: i64,
    role: Role,
  ) -> Result<MemberRecord> {
    let role_str = role.to_string();
    let now      = encode_dt(Utc::now());

    let raw = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        if member_row(&tx, workspace_id, user_id)?.is_some() {
          return Ok(Checked::Err(nexboard_core::Error::Conflict(
            "user is already a member of this workspace".into(),
          )));
        }
        tx.execute(
          "INSERT INTO workspace_members (workspace_id, user_id, role, joined_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![workspace_id, user_id, role_str, now],
        )?;
        let raw = member_row(&tx, workspace_id, user_id)?;
        tx.commit()?;
        Ok(raw.ok_or_else(membership_not_found))
      })
      .await??;

    raw.into_record()
  }

  async fn change_member_role(
    &self,
    workspace_id: i64,
    user_id: i64,
    role: Role,
  ) -> Result<MemberRecord> {
    let role_str = role.to_string();

    let raw = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let owner_id = workspace_owner(&tx, workspace_id)?;
        if let Err(e) = ensure_not_owner(owner_id, user_id) {
          return Ok(Err(e));
        }
        let changed = tx.execute(
          "UPDATE workspace_members SET role = ?1
           WHERE workspace_id = ?2 AND user_id = ?3",
          rusqlite::params![role_str, workspace_id, user_id],
        )?;
        if changed == 0 {
          return Ok(Err(membership_not_found()));
        }
        let raw = member_row(&tx, workspace_id, user_id)?;
        tx.commit()?;
        Ok(raw.ok_or_else(membership_not_found))
      })
      .await??;

    raw.into_record()
  }

  async fn remove_member(&self, workspace_id: i64, user_id: i64) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let owner_id = workspace_owner(&tx, workspace_id)?;
        if let Err(e) = ensure_not_owner(owner_id, user_id) {
          return Ok(Err(e));
        }
        let removed = tx.execute(
          "DELETE FROM workspace_members WHERE workspace_id = ?1 AND user_id = ?2",
          [workspace_id, user_id],
        )?;
        if removed == 0 {
          return Ok(Err(membership_not_found()));
        }
        tx.commit()?;
        Ok(Checked::Ok(()))
      })
      .await??;
    Ok(())
  }

  // ── Boards ────────────────────────────────────────────────────────────────

  async fn create_board(&self, input: NewBoard) -> Result<BoardRecord> {
    let id_str = encode_uuid(input.external_id);
    let now    = encode_dt(Utc::now());

    let raw = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO boards (external_id, workspace_id, created_by, name, description, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![
            id_str,
            input.workspace_id,
            input.created_by,
            input.name,
            input.description,
            now
          ],
        )?;
        Ok(board_row(conn, conn.last_insert_rowid())?)
      })
      .await?;

    raw.into_record()
  }

  async fn board_by_external_id(&self, external_id: Uuid) -> Result<Option<BoardRecord>> {
    self
      .fetch_one(
        format!("{BOARD_SELECT} WHERE b.external_id = ?1 AND b.active_status = 1"),
        [encode_uuid(external_id)],
        RawBoard::from_row,
      )
      .await?
      .map(RawBoard::into_record)
      .transpose()
  }

  async fn board_by_id(&self, id: i64) -> Result<Option<BoardRecord>> {
    self
      .fetch_one(
        format!("{BOARD_SELECT} WHERE b.id = ?1 AND b.active_status = 1"),
        [id],
        RawBoard::from_row,
      )
      .await?
      .map(RawBoard::into_record)
      .transpose()
  }

  async fn boards_in_workspace(&self, workspace_id: i64) -> Result<Vec<BoardRecord>> {
    self
      .fetch_all(
        format!(
          "{BOARD_SELECT} WHERE b.workspace_id = ?1 AND b.active_status = 1
           ORDER BY b.created_at, b.id"
        ),
        [workspace_id],
        RawBoard::from_row,
      )
      .await?
      .into_iter()
      .map(RawBoard::into_record)
      .collect()
  }

  async fn update_board(&self, id: i64, details: Details) -> Result<BoardRecord> {
    let now = encode_dt(Utc::now());

    let raw = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "UPDATE boards SET name = ?1, description = ?2, modified_at = ?3
           WHERE id = ?4 AND active_status = 1",
          rusqlite::params![details.name, details.description, now, id],
        )?;
        if changed == 0 {
          return Ok(Err(not_found("board")));
        }
        Ok(Ok(board_row(conn, id)?))
      })
      .await??;

    raw.into_record()
  }

  async fn delete_board(&self, id: i64) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute("DELETE FROM boards WHERE id = ?1", [id])?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Statuses ──────────────────────────────────────────────────────────────

  async fn create_status(&self, input: NewStatus) -> Result<StatusRecord> {
    let id_str = encode_uuid(input.external_id);
    let now    = encode_dt(Utc::now());

    let raw = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let holder = status_named(&tx, &input.name)?;
        if let Err(e) = ensure_name_available(&input.name, holder, None) {
          return Ok(Err(e));
        }
        tx.execute(
          "INSERT INTO statuses (external_id, name, color, position, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![id_str, input.name, input.color, input.position, now],
        )?;
        let raw = status_row(&tx, tx.last_insert_rowid())?;
        tx.commit()?;
        Ok(Ok(raw))
      })
      .await??;

    raw.into_record()
  }

  async fn status_by_external_id(&self, external_id: Uuid) -> Result<Option<StatusRecord>> {
    self
      .fetch_one(
        format!("{STATUS_SELECT} WHERE s.external_id = ?1 AND s.active_status = 1"),
        [encode_uuid(external_id)],
        RawStatus::from_row,
      )
      .await?
      .map(RawStatus::into_record)
      .transpose()
  }

  async fn list_statuses(&self) -> Result<Vec<StatusRecord>> {
    self
      .fetch_all(
        format!("{STATUS_SELECT} WHERE s.active_status = 1 ORDER BY s.position, s.id"),
        (),
        RawStatus::from_row,
      )
      .await?
      .into_iter()
      .map(RawStatus::into_record)
      .collect()
  }

  async fn update_status(&self, id: i64, changes: StatusChanges) -> Result<StatusRecord> {
    let now = encode_dt(Utc::now());

    let raw = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let holder = status_named(&tx, &changes.name)?;
        if let Err(e) = ensure_name_available(&changes.name, holder, Some(id)) {
          return Ok(Err(e));
        }
        let changed = tx.execute(
          "UPDATE statuses SET name = ?1, color = ?2, position = ?3, modified_at = ?4
           WHERE id = ?5 AND active_status = 1",
          rusqlite::params![changes.name, changes.color, changes.position, now, id],
        )?;
        if changed == 0 {
          return Ok(Err(not_found("status")));
        }
        let raw = status_row(&tx, id)?;
        tx.commit()?;
        Ok(Ok(raw))
      })
      .await??;

    raw.into_record()
  }

  async fn count_tasks_with_status(&self, status_id: i64) -> Result<u64> {
    let count: i64 = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "SELECT COUNT(*) FROM tasks WHERE status_id = ?1 AND active_status = 1",
          [status_id],
          |row| row.get(0),
        )?)
      })
      .await?;
    Ok(count.max(0) as u64)
  }

  async fn delete_status(&self, id: i64) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let dependents: i64 = tx.query_row(
          "SELECT COUNT(*) FROM tasks WHERE status_id = ?1 AND active_status = 1",
          [id],
          |row| row.get(0),
        )?;
        if let Err(e) = ensure_no_dependents(Guarded::Status, dependents.max(0) as u64) {
          return Ok(Err(e));
        }
        tx.execute("DELETE FROM statuses WHERE id = ?1", [id])?;
        tx.commit()?;
        Ok(Ok(()))
      })
      .await??;
    Ok(())
  }

  // ── Tasks ─────────────────────────────────────────────────────────────────

  async fn create_task(&self, input: NewTask) -> Result<TaskRecord> {
    let id_str   = encode_uuid(input.external_id);
    let now      = encode_dt(Utc::now());
    let priority = input.priority.to_string();
    let due      = input.due_date.map(encode_dt);

    let raw = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let position = column_tail(&tx, input.board_id, input.status_id)?;
        tx.execute(
          "INSERT INTO tasks (
             external_id, board_id, status_id, assigned_to, created_by,
             title, description, priority, due_date, position, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
          rusqlite::params![
            id_str,
            input.board_id,
            input.status_id,
            input.assignee_id,
            input.created_by,
            input.title,
            input.description,
            priority,
            due,
            position,
            now,
          ],
        )?;
        let raw = task_row(&tx, tx.last_insert_rowid())?;
        tx.commit()?;
        Ok(raw)
      })
      .await?;

    raw.into_record()
  }

  async fn task_by_external_id(&self, external_id: Uuid) -> Result<Option<TaskRecord>> {
    self
      .fetch_one(
        format!("{TASK_SELECT} WHERE t.external_id = ?1 AND t.active_status = 1"),
        [encode_uuid(external_id)],
        RawTask::from_row,
      )
      .await?
      .map(RawTask::into_record)
      .transpose()
  }

  async fn tasks_on_board(&self, board_id: i64) -> Result<Vec<TaskRecord>> {
    self
      .fetch_all(
        format!(
          "{TASK_SELECT} WHERE t.board_id = ?1 AND t.active_status = 1
           ORDER BY s.position, t.position, t.id"
        ),
        [board_id],
        RawTask::from_row,
      )
      .await?
      .into_iter()
      .map(RawTask::into_record)
      .collect()
  }

  async fn update_task(&self, id: i64, changes: TaskChanges) -> Result<TaskRecord> {
    let now      = encode_dt(Utc::now());
    let priority = changes.priority.to_string();
    let due      = changes.due_date.map(encode_dt);

    let raw = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let current = tx
          .query_row(
            "SELECT board_id, status_id FROM tasks WHERE id = ?1 AND active_status = 1",
            [id],
            |row| Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?)),
          )
          .optional()?;
        let Some((board_id, status_id)) = current else {
          return Ok(Err(not_found("task")));
        };
        // A status change sends the task to the bottom of its new column.
        let position = if status_id == changes.status_id {
          changes.position
        } else {
          column_tail(&tx, board_id, changes.status_id)?
        };

        tx.execute(
          "UPDATE tasks SET
             status_id = ?1, assigned_to = ?2, title = ?3, description = ?4,
             priority = ?5, due_date = ?6, position = ?7, modified_at = ?8
           WHERE id = ?9",
          rusqlite::params![
            changes.status_id,
            changes.assignee_id,
            changes.title,
            changes.description,
            priority,
            due,
            position,
            now,
            id,
          ],
        )?;
        let raw = task_row(&tx, id)?;
        tx.commit()?;
        Ok(Ok(raw))
      })
      .await??;

    raw.into_record()
  }

  async fn delete_task(&self, id: i64) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute("DELETE FROM tasks WHERE id = ?1", [id])?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}
