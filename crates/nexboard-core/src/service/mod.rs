//! Mutation orchestrators.
//!
//! Each orchestrator runs every request through the same phases, in order:
//! resolve the external ids it was handed, ask the [`AccessPolicy`] for the
//! capability the operation needs, consult the referential guard when deleting
//! a status, then mutate and return an externally-safe projection. A later
//! phase never runs if an earlier one failed.
//!
//! Collaborators are injected at construction; nothing is cached between
//! requests.

pub mod boards;
pub mod statuses;
pub mod tasks;
pub mod users;
pub mod workspaces;

use std::sync::Arc;

use crate::{access::AccessPolicy, ids::IdGenerator, store::TrackerStore};

pub use self::{
  boards::BoardService, statuses::StatusService, tasks::TaskService,
  users::UserService, workspaces::WorkspaceService,
};

/// All orchestrators, sharing one store, one policy and one id generator.
pub struct Services<S> {
  pub users:      UserService<S>,
  pub workspaces: WorkspaceService<S>,
  pub boards:     BoardService<S>,
  pub statuses:   StatusService<S>,
  pub tasks:      TaskService<S>,
}

impl<S: TrackerStore> Services<S> {
  pub fn new(store: Arc<S>, ids: Arc<dyn IdGenerator>) -> Self {
    let policy = Arc::new(AccessPolicy::new(store.clone()));
    Self {
      users:      UserService::new(store.clone(), ids.clone()),
      workspaces: WorkspaceService::new(
        store.clone(),
        policy.clone(),
        ids.clone(),
      ),
      boards:     BoardService::new(store.clone(), policy.clone(), ids.clone()),
      statuses:   StatusService::new(store.clone(), ids.clone()),
      tasks:      TaskService::new(store, policy, ids),
    }
  }
}
