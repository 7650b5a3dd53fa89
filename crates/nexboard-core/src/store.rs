//! The `TrackerStore` trait: the persistence collaborator.
//!
//! The trait is implemented by storage backends (e.g. `nexboard-store-sqlite`).
//! Orchestrators receive the store by injection and never cache what it
//! returns across requests: uniqueness and referential checks depend on
//! reading current committed state on every call.
//!
//! # Atomic groupings
//!
//! Four methods must each run as a single transaction, because they pair a
//! check with the write it guards:
//!
//! 1. [`create_workspace`](TrackerStore::create_workspace) inserts the
//!    workspace and its owner membership.
//! 2. [`create_status`](TrackerStore::create_status) and
//!    [`update_status`](TrackerStore::update_status) evaluate
//!    [`crate::status::ensure_name_available`] before writing.
//! 3. [`delete_status`](TrackerStore::delete_status) evaluates
//!    [`crate::guard::ensure_no_dependents`] before deleting.
//! 4. [`change_member_role`](TrackerStore::change_member_role) and
//!    [`remove_member`](TrackerStore::remove_member) evaluate
//!    [`crate::membership::ensure_not_owner`] before writing.
//!
//! Domain failures raised inside those transactions must come back as the
//! matching [`crate::Error`] kind once converted.

use std::future::Future;

use uuid::Uuid;

use crate::{
  board::{BoardRecord, NewBoard},
  membership::{MemberRecord, Role},
  status::{NewStatus, StatusChanges, StatusRecord},
  task::{NewTask, TaskChanges, TaskRecord},
  user::{NewUser, ProfileChanges, UserRecord},
  workspace::{Details, NewWorkspace, WorkspaceRecord},
};

/// Abstraction over a NexBoard persistence backend.
///
/// Lookups return `None` for rows that do not exist or are not active.
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait TrackerStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static + Into<crate::Error>;

  // ── Users ─────────────────────────────────────────────────────────────

  /// Fails with `Conflict` if an active user already has this email.
  fn create_user(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<UserRecord, Self::Error>> + Send + '_;

  fn user_by_external_id(
    &self,
    external_id: Uuid,
  ) -> impl Future<Output = Result<Option<UserRecord>, Self::Error>> + Send + '_;

  fn user_by_email(
    &self,
    email: String,
  ) -> impl Future<Output = Result<Option<UserRecord>, Self::Error>> + Send + '_;

  fn update_user_profile(
    &self,
    id: i64,
    changes: ProfileChanges,
  ) -> impl Future<Output = Result<UserRecord, Self::Error>> + Send + '_;

  // ── Workspaces ────────────────────────────────────────────────────────

  /// Insert the workspace and its owner membership in one transaction.
  fn create_workspace(
    &self,
    input: NewWorkspace,
  ) -> impl Future<Output = Result<WorkspaceRecord, Self::Error>> + Send + '_;

  fn workspace_by_external_id(
    &self,
    external_id: Uuid,
  ) -> impl Future<Output = Result<Option<WorkspaceRecord>, Self::Error>> + Send + '_;

  fn workspace_by_id(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<WorkspaceRecord>, Self::Error>> + Send + '_;

  /// Every active workspace `user_id` holds a membership in.
  fn workspaces_for_member(
    &self,
    user_id: i64,
  ) -> impl Future<Output = Result<Vec<WorkspaceRecord>, Self::Error>> + Send + '_;

  fn update_workspace(
    &self,
    id: i64,
    details: Details,
  ) -> impl Future<Output = Result<WorkspaceRecord, Self::Error>> + Send + '_;

  /// Delete a workspace together with its memberships, boards and tasks.
  fn delete_workspace(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Membership ────────────────────────────────────────────────────────

  fn member_role(
    &self,
    workspace_id: i64,
    user_id: i64,
  ) -> impl Future<Output = Result<Option<Role>, Self::Error>> + Send + '_;

  fn members(
    &self,
    workspace_id: i64,
  ) -> impl Future<Output = Result<Vec<MemberRecord>, Self::Error>> + Send + '_;

  /// Fails with `Conflict` if the user already holds a row in the workspace.
  fn add_member(
    &self,
    workspace_id: i64,
    user_id: i64,
    role: Role,
  ) -> impl Future<Output = Result<MemberRecord, Self::Error>> + Send + '_;

  /// Fails with `InvalidArgument` for the workspace owner and `NotFound` if
  /// the user is not a member.
  fn change_member_role(
    &self,
    workspace_id: i64,
    user_id: i64,
    role: Role,
  ) -> impl Future<Output = Result<MemberRecord, Self::Error>> + Send + '_;

  /// Fails with `InvalidArgument` for the workspace owner and `NotFound` if
  /// the user is not a member.
  fn remove_member(
    &self,
    workspace_id: i64,
    user_id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Boards ────────────────────────────────────────────────────────────

  fn create_board(
    &self,
    input: NewBoard,
  ) -> impl Future<Output = Result<BoardRecord, Self::Error>> + Send + '_;

  fn board_by_external_id(
    &self,
    external_id: Uuid,
  ) -> impl Future<Output = Result<Option<BoardRecord>, Self::Error>> + Send + '_;

  fn board_by_id(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<BoardRecord>, Self::Error>> + Send + '_;

  fn boards_in_workspace(
    &self,
    workspace_id: i64,
  ) -> impl Future<Output = Result<Vec<BoardRecord>, Self::Error>> + Send + '_;

  fn update_board(
    &self,
    id: i64,
    details: Details,
  ) -> impl Future<Output = Result<BoardRecord, Self::Error>> + Send + '_;

  /// Delete a board together with its tasks.
  fn delete_board(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Statuses ──────────────────────────────────────────────────────────

  /// Name-uniqueness check and insert, in one transaction.
  fn create_status(
    &self,
    input: NewStatus,
  ) -> impl Future<Output = Result<StatusRecord, Self::Error>> + Send + '_;

  fn status_by_external_id(
    &self,
    external_id: Uuid,
  ) -> impl Future<Output = Result<Option<StatusRecord>, Self::Error>> + Send + '_;

  /// All active statuses, ordered by `position` ascending.
  fn list_statuses(
    &self,
  ) -> impl Future<Output = Result<Vec<StatusRecord>, Self::Error>> + Send + '_;

  /// Name-uniqueness check and update, in one transaction.
  fn update_status(
    &self,
    id: i64,
    changes: StatusChanges,
  ) -> impl Future<Output = Result<StatusRecord, Self::Error>> + Send + '_;

  /// Number of active tasks pointing at the status.
  fn count_tasks_with_status(
    &self,
    status_id: i64,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  /// Dependent count and delete, in one transaction.
  fn delete_status(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Tasks ─────────────────────────────────────────────────────────────

  fn create_task(
    &self,
    input: NewTask,
  ) -> impl Future<Output = Result<TaskRecord, Self::Error>> + Send + '_;

  fn task_by_external_id(
    &self,
    external_id: Uuid,
  ) -> impl Future<Output = Result<Option<TaskRecord>, Self::Error>> + Send + '_;

  /// Active tasks on a board, ordered by status position then task position.
  fn tasks_on_board(
    &self,
    board_id: i64,
  ) -> impl Future<Output = Result<Vec<TaskRecord>, Self::Error>> + Send + '_;

  /// Write every mutable field. A task whose status changes is appended to
  /// the bottom of its new column and `changes.position` is ignored. A row
  /// that is no longer active is `NotFound`.
  fn update_task(
    &self,
    id: i64,
    changes: TaskChanges,
  ) -> impl Future<Output = Result<TaskRecord, Self::Error>> + Send + '_;

  fn delete_task(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
