//! Referential guard: blocks deletes that would leave live rows pointing at
//! nothing.
//!
//! Only cross-entity references are guarded. Containment (workspace → board →
//! task) cascades in the store instead.

use std::sync::Arc;

use crate::{Error, Result, store::TrackerStore};

/// Kinds of rows whose deletion is guarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guarded {
  /// Referenced by tasks.
  Status,
}

/// The guard rule. Stores evaluate this inside the delete transaction.
pub fn ensure_no_dependents(kind: Guarded, dependents: u64) -> Result<()> {
  if dependents == 0 {
    return Ok(());
  }
  match kind {
    Guarded::Status => Err(Error::Conflict(format!(
      "status is in use by {dependents} active task(s); move them to another \
       status before deleting"
    ))),
  }
}

pub struct ReferentialGuard<S> {
  store: Arc<S>,
}

impl<S: TrackerStore> ReferentialGuard<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  /// `CanDelete`: `true` when no active dependents reference the row.
  pub async fn can_delete(&self, kind: Guarded, id: i64) -> Result<bool> {
    Ok(self.dependents(kind, id).await? == 0)
  }

  /// Fail with `Conflict` while active dependents exist.
  pub async fn check(&self, kind: Guarded, id: i64) -> Result<()> {
    let count = self.dependents(kind, id).await?;
    if count > 0 {
      tracing::debug!(?kind, id, count, "delete blocked by live dependents");
    }
    ensure_no_dependents(kind, count)
  }

  async fn dependents(&self, kind: Guarded, id: i64) -> Result<u64> {
    match kind {
      Guarded::Status => self
        .store
        .count_tasks_with_status(id)
        .await
        .map_err(Into::into),
    }
  }
}
