use chrono::Utc;
use nexboard_core::{
  ErrorKind,
  board::NewBoard,
  membership::Role,
  status::{NewStatus, StatusChanges},
  store::TrackerStore,
  task::{NewTask, Priority},
  user::{NewUser, ProfileChanges},
  workspace::{Details, NewWorkspace},
};
use uuid::Uuid;

use super::store;
use crate::SqliteStore;

fn new_user(email: &str) -> NewUser {
  NewUser {
    external_id:     Uuid::new_v4(),
    name:            "Someone".into(),
    email:           email.into(),
    credential_hash: "hash".into(),
  }
}

async fn seeded_workspace(s: &SqliteStore) -> (i64, i64) {
  let owner = s.create_user(new_user("owner@example.com")).await.unwrap();
  let ws = s
    .create_workspace(NewWorkspace {
      external_id: Uuid::new_v4(),
      name:        "Acme".into(),
      description: None,
      owner_id:    owner.id,
    })
    .await
    .unwrap();
  (ws.id, owner.id)
}

fn core_kind(err: crate::Error) -> ErrorKind {
  nexboard_core::Error::from(err).kind()
}

// ─── Users ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_fetch_user() {
  let s = store().await;
  let user = s.create_user(new_user("ana@example.com")).await.unwrap();

  let by_id = s.user_by_external_id(user.external_id).await.unwrap().unwrap();
  assert_eq!(by_id.id, user.id);
  assert_eq!(by_id.credential_hash, "hash");

  let by_email = s.user_by_email("ana@example.com".into()).await.unwrap();
  assert_eq!(by_email.unwrap().external_id, user.external_id);

  assert!(s.user_by_external_id(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_email_is_a_conflict() {
  let s = store().await;
  s.create_user(new_user("ana@example.com")).await.unwrap();
  let err = s.create_user(new_user("ana@example.com")).await.unwrap_err();
  assert_eq!(core_kind(err), ErrorKind::Conflict);
}

#[tokio::test]
async fn profile_update_stamps_modified_at() {
  let s = store().await;
  let user = s.create_user(new_user("ana@example.com")).await.unwrap();
  assert!(user.modified_at.is_none());

  let updated = s
    .update_user_profile(user.id, ProfileChanges {
      name:       "Ana Lima".into(),
      avatar_url: Some("https://example.com/ana.png".into()),
    })
    .await
    .unwrap();
  assert_eq!(updated.name, "Ana Lima");
  assert_eq!(updated.avatar_url.as_deref(), Some("https://example.com/ana.png"));
  assert!(updated.modified_at.is_some());
}

// ─── Workspaces and membership ───────────────────────────────────────────────

#[tokio::test]
async fn workspace_creation_writes_the_owner_row() {
  let s = store().await;
  let (ws, owner) = seeded_workspace(&s).await;

  assert_eq!(s.member_role(ws, owner).await.unwrap(), Some(Role::Owner));
  let members = s.members(ws).await.unwrap();
  assert_eq!(members.len(), 1);
  assert_eq!(members[0].user_id, owner);
}

#[tokio::test]
async fn owner_row_is_protected_inside_the_store() {
  let s = store().await;
  let (ws, owner) = seeded_workspace(&s).await;

  let err = s.change_member_role(ws, owner, Role::Member).await.unwrap_err();
  assert_eq!(core_kind(err), ErrorKind::InvalidArgument);
  let err = s.remove_member(ws, owner).await.unwrap_err();
  assert_eq!(core_kind(err), ErrorKind::InvalidArgument);
  assert_eq!(s.member_role(ws, owner).await.unwrap(), Some(Role::Owner));
}

#[tokio::test]
async fn a_second_owner_row_is_rejected_by_the_schema() {
  let s = store().await;
  let (ws, _) = seeded_workspace(&s).await;
  let other = s.create_user(new_user("bo@example.com")).await.unwrap();

  let err = s.add_member(ws, other.id, Role::Owner).await.unwrap_err();
  assert_eq!(core_kind(err), ErrorKind::Conflict);
}

#[tokio::test]
async fn membership_rows_are_unique_per_user() {
  let s = store().await;
  let (ws, _) = seeded_workspace(&s).await;
  let bo = s.create_user(new_user("bo@example.com")).await.unwrap();

  s.add_member(ws, bo.id, Role::Member).await.unwrap();
  let err = s.add_member(ws, bo.id, Role::Admin).await.unwrap_err();
  assert_eq!(core_kind(err), ErrorKind::Conflict);
  assert_eq!(s.members(ws).await.unwrap().len(), 2);
}

#[tokio::test]
async fn changing_or_removing_a_non_member_is_not_found() {
  let s = store().await;
  let (ws, _) = seeded_workspace(&s).await;
  let bo = s.create_user(new_user("bo@example.com")).await.unwrap();

  let err = s.change_member_role(ws, bo.id, Role::Admin).await.unwrap_err();
  assert_eq!(core_kind(err), ErrorKind::NotFound);
  let err = s.remove_member(ws, bo.id).await.unwrap_err();
  assert_eq!(core_kind(err), ErrorKind::NotFound);
}

#[tokio::test]
async fn deleting_a_workspace_cascades() {
  let s = store().await;
  let (ws, owner) = seeded_workspace(&s).await;
  let board = s
    .create_board(NewBoard {
      external_id:  Uuid::new_v4(),
      workspace_id: ws,
      created_by:   owner,
      name:         "Roadmap".into(),
      description:  None,
    })
    .await
    .unwrap();

  s.delete_workspace(ws).await.unwrap();
  assert!(s.workspace_by_id(ws).await.unwrap().is_none());
  assert!(s.board_by_id(board.id).await.unwrap().is_none());
  assert!(s.member_role(ws, owner).await.unwrap().is_none());
  assert!(s.workspaces_for_member(owner).await.unwrap().is_empty());
}

// ─── Statuses and tasks ──────────────────────────────────────────────────────

fn new_status(name: &str, position: i64) -> NewStatus {
  NewStatus {
    external_id: Uuid::new_v4(),
    name:        name.into(),
    color:       None,
    position,
  }
}

#[tokio::test]
async fn statuses_list_in_position_order() {
  let s = store().await;
  s.create_status(new_status("Done", 2)).await.unwrap();
  s.create_status(new_status("Todo", 0)).await.unwrap();
  s.create_status(new_status("Doing", 1)).await.unwrap();

  let names: Vec<_> = s
    .list_statuses()
    .await
    .unwrap()
    .into_iter()
    .map(|st| st.name)
    .collect();
  assert_eq!(names, ["Todo", "Doing", "Done"]);
}

#[tokio::test]
async fn status_rename_checks_other_rows_only() {
  let s = store().await;
  let todo = s.create_status(new_status("Todo", 0)).await.unwrap();
  s.create_status(new_status("Done", 1)).await.unwrap();

  let same = s
    .update_status(todo.id, StatusChanges {
      name:     "Todo".into(),
      color:    Some("#ccc".into()),
      position: 5,
    })
    .await
    .unwrap();
  assert_eq!(same.color.as_deref(), Some("#ccc"));
  assert_eq!(same.position, 5);

  let err = s
    .update_status(todo.id, StatusChanges {
      name:     "Done".into(),
      color:    None,
      position: 0,
    })
    .await
    .unwrap_err();
  assert_eq!(core_kind(err), ErrorKind::Conflict);
}

#[tokio::test]
async fn tasks_append_to_their_column_and_block_status_delete() {
  let s = store().await;
  let (ws, owner) = seeded_workspace(&s).await;
  let board = s
    .create_board(NewBoard {
      external_id:  Uuid::new_v4(),
      workspace_id: ws,
      created_by:   owner,
      name:         "Roadmap".into(),
      description:  None,
    })
    .await
    .unwrap();
  let todo = s.create_status(new_status("Todo", 0)).await.unwrap();
  let done = s.create_status(new_status("Done", 1)).await.unwrap();

  let task = |title: &str, status_id: i64| NewTask {
    external_id: Uuid::new_v4(),
    board_id: board.id,
    status_id,
    assignee_id: None,
    created_by: owner,
    title: title.into(),
    description: None,
    priority: Priority::Medium,
    due_date: Some(Utc::now()),
  };

  let a = s.create_task(task("a", todo.id)).await.unwrap();
  let b = s.create_task(task("b", todo.id)).await.unwrap();
  let c = s.create_task(task("c", done.id)).await.unwrap();
  assert_eq!((a.position, b.position, c.position), (0, 1, 0));
  assert_eq!(b.status.name, "Todo");
  assert_eq!(b.priority, Priority::Medium);
  assert!(b.assignee.is_none());

  assert_eq!(s.count_tasks_with_status(todo.id).await.unwrap(), 2);
  let err = s.delete_status(todo.id).await.unwrap_err();
  assert_eq!(core_kind(err), ErrorKind::Conflict);
  assert!(s.status_by_external_id(todo.external_id).await.unwrap().is_some());

  s.delete_task(a.id).await.unwrap();
  s.delete_task(b.id).await.unwrap();
  s.delete_status(todo.id).await.unwrap();
  assert!(s.status_by_external_id(todo.external_id).await.unwrap().is_none());
}

#[tokio::test]
async fn board_tasks_order_by_status_then_position() {
  let s = store().await;
  let (ws, owner) = seeded_workspace(&s).await;
  let board = s
    .create_board(NewBoard {
      external_id:  Uuid::new_v4(),
      workspace_id: ws,
      created_by:   owner,
      name:         "Roadmap".into(),
      description:  Some("Q3".into()),
    })
    .await
    .unwrap();
  let later = s.create_status(new_status("Later", 9)).await.unwrap();
  let now = s.create_status(new_status("Now", 1)).await.unwrap();

  for (title, status) in [("l0", later.id), ("n0", now.id), ("n1", now.id)] {
    s.create_task(NewTask {
      external_id: Uuid::new_v4(),
      board_id: board.id,
      status_id: status,
      assignee_id: None,
      created_by: owner,
      title: title.into(),
      description: None,
      priority: Priority::Low,
      due_date: None,
    })
    .await
    .unwrap();
  }

  let titles: Vec<_> = s
    .tasks_on_board(board.id)
    .await
    .unwrap()
    .into_iter()
    .map(|t| t.title)
    .collect();
  assert_eq!(titles, ["n0", "n1", "l0"]);
}

#[tokio::test]
async fn workspace_details_update() {
  let s = store().await;
  let (ws, _) = seeded_workspace(&s).await;
  let updated = s
    .update_workspace(ws, Details {
      name:        "Acme Corp".into(),
      description: Some("HQ".into()),
    })
    .await
    .unwrap();
  assert_eq!(updated.name, "Acme Corp");
  assert_eq!(updated.description.as_deref(), Some("HQ"));
  assert!(updated.modified_at.is_some());
}

#[tokio::test]
async fn changing_status_appends_to_the_new_column() {
  let s = store().await;
  let (ws, owner) = seeded_workspace(&s).await;
  let board = s
    .create_board(NewBoard {
      external_id:  Uuid::new_v4(),
      workspace_id: ws,
      created_by:   owner,
      name:         "Roadmap".into(),
      description:  None,
    })
    .await
    .unwrap();
  let todo = s.create_status(new_status("Todo", 0)).await.unwrap();
  let done = s.create_status(new_status("Done", 1)).await.unwrap();

  let task = |title: &str, status_id: i64| NewTask {
    external_id: Uuid::new_v4(),
    board_id: board.id,
    status_id,
    assignee_id: None,
    created_by: owner,
    title: title.into(),
    description: None,
    priority: Priority::Low,
    due_date: None,
  };
  let a = s.create_task(task("a", todo.id)).await.unwrap();
  let b = s.create_task(task("b", todo.id)).await.unwrap();
  s.create_task(task("c", done.id)).await.unwrap();

  // Same status: the caller's position stands.
  let mut changes = b.changes();
  changes.title = "b2".into();
  let b = s.update_task(b.id, changes).await.unwrap();
  assert_eq!(b.position, 1);

  let mut changes = a.changes();
  changes.status_id = done.id;
  let moved = s.update_task(a.id, changes).await.unwrap();
  assert_eq!(moved.status.name, "Done");
  assert_eq!(moved.position, 1);

  let titles: Vec<_> = s
    .tasks_on_board(board.id)
    .await
    .unwrap()
    .into_iter()
    .map(|t| t.title)
    .collect();
  assert_eq!(titles, ["b2", "c", "a"]);
}

#[tokio::test]
async fn updating_a_vanished_row_is_not_found() {
  let s = store().await;
  let (ws, owner) = seeded_workspace(&s).await;
  let board = s
    .create_board(NewBoard {
      external_id:  Uuid::new_v4(),
      workspace_id: ws,
      created_by:   owner,
      name:         "Roadmap".into(),
      description:  None,
    })
    .await
    .unwrap();
  let todo = s.create_status(new_status("Todo", 0)).await.unwrap();
  let task = s
    .create_task(NewTask {
      external_id: Uuid::new_v4(),
      board_id:    board.id,
      status_id:   todo.id,
      assignee_id: None,
      created_by:  owner,
      title:       "Ship".into(),
      description: None,
      priority:    Priority::Low,
      due_date:    None,
    })
    .await
    .unwrap();

  let changes = task.changes();
  s.delete_task(task.id).await.unwrap();
  let err = s.update_task(task.id, changes).await.unwrap_err();
  assert_eq!(core_kind(err), ErrorKind::NotFound);

  s.delete_board(board.id).await.unwrap();
  let details = Details { name: "Gone".into(), description: None };
  let err = s.update_board(board.id, details.clone()).await.unwrap_err();
  assert_eq!(core_kind(err), ErrorKind::NotFound);

  s.delete_workspace(ws).await.unwrap();
  let err = s.update_workspace(ws, details).await.unwrap_err();
  assert_eq!(core_kind(err), ErrorKind::NotFound);

  s.delete_status(todo.id).await.unwrap();
  let err = s
    .update_status(todo.id, StatusChanges {
      name:     "Todo".into(),
      color:    None,
      position: 0,
    })
    .await
    .unwrap_err();
  assert_eq!(core_kind(err), ErrorKind::NotFound);

  let err = s
    .update_user_profile(i64::MAX, ProfileChanges { name: "Nobody".into(), avatar_url: None })
    .await
    .unwrap_err();
  assert_eq!(core_kind(err), ErrorKind::NotFound);
}
