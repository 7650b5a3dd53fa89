//! Tests for `SqliteStore` and for the orchestrators running on top of it,
//! all against an in-memory database.

mod store;

use std::sync::Arc;

use nexboard_core::{
  ErrorKind, Result,
  ids::RandomIds,
  service::Services,
  user::{NewAccount, UserView},
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

async fn services() -> Services<SqliteStore> {
  Services::new(Arc::new(store().await), Arc::new(RandomIds))
}

async fn register(services: &Services<SqliteStore>, name: &str) -> UserView {
  services
    .users
    .register(NewAccount {
      name:            name.to_owned(),
      email:           format!("{}@example.com", name.to_lowercase()),
      credential_hash: "$argon2id$v=19$stub".into(),
    })
    .await
    .expect("register")
}

#[track_caller]
fn assert_kind<T: std::fmt::Debug>(result: Result<T>, kind: ErrorKind) {
  match result {
    Ok(v) => panic!("expected {kind:?}, got Ok({v:?})"),
    Err(e) => assert_eq!(e.kind(), kind, "unexpected error: {e}"),
  }
}
