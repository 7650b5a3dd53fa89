//! The global status vocabulary.
//!
//! Statuses are shared by every workspace. Any authenticated user may manage
//! them; the only protections are name uniqueness and the referential guard
//! on delete, both evaluated by the store in the same transaction as the
//! write.

use std::sync::Arc;

use uuid::Uuid;

use crate::{
  Result,
  error::require_text,
  guard::{Guarded, ReferentialGuard},
  ids::IdGenerator,
  resolve::Resolver,
  status::{NewStatus, StatusChanges, StatusInput, StatusView},
  store::TrackerStore,
};

pub struct StatusService<S> {
  store:    Arc<S>,
  resolver: Resolver<S>,
  guard:    ReferentialGuard<S>,
  ids:      Arc<dyn IdGenerator>,
}

impl<S: TrackerStore> StatusService<S> {
  pub fn new(store: Arc<S>, ids: Arc<dyn IdGenerator>) -> Self {
    Self {
      resolver: Resolver::new(store.clone()),
      guard: ReferentialGuard::new(store.clone()),
      store,
      ids,
    }
  }

  /// Fails with `Conflict` if an active status already has the name.
  pub async fn create(&self, actor: Uuid, input: StatusInput) -> Result<StatusView> {
    self.resolver.user(actor).await?;
    require_text("name", &input.name)?;

    let input = NewStatus {
      external_id: self.ids.next_id(),
      name:        input.name.trim().to_owned(),
      color:       input.color,
      position:    input.position.unwrap_or(0),
    };
    let status = self.store.create_status(input).await.map_err(Into::into)?;
    tracing::info!(status = %status.external_id, name = %status.name, "created status");
    Ok(status.view())
  }

  /// All statuses, ordered by position.
  pub async fn list(&self, actor: Uuid) -> Result<Vec<StatusView>> {
    self.resolver.user(actor).await?;
    let statuses = self.store.list_statuses().await.map_err(Into::into)?;
    Ok(statuses.iter().map(|s| s.view()).collect())
  }

  pub async fn get(&self, actor: Uuid, status: Uuid) -> Result<StatusView> {
    self.resolver.user(actor).await?;
    Ok(self.resolver.status(status).await?.view())
  }

  /// Replace name and color; the position is kept unless one is given.
  pub async fn update(
    &self,
    actor: Uuid,
    status: Uuid,
    input: StatusInput,
  ) -> Result<StatusView> {
    self.resolver.user(actor).await?;
    let current = self.resolver.status(status).await?;
    require_text("name", &input.name)?;

    let changes = StatusChanges {
      name:     input.name.trim().to_owned(),
      color:    input.color,
      position: input.position.unwrap_or(current.position),
    };
    let updated = self
      .store
      .update_status(current.id, changes)
      .await
      .map_err(Into::into)?;
    tracing::info!(status = %updated.external_id, "updated status");
    Ok(updated.view())
  }

  /// Fails with `Conflict` while any active task still uses the status.
  pub async fn delete(&self, actor: Uuid, status: Uuid) -> Result<()> {
    self.resolver.user(actor).await?;
    let current = self.resolver.status(status).await?;

    // Early answer for the common case; the store repeats the count inside
    // the delete transaction.
    self.guard.check(Guarded::Status, current.id).await?;
    self.store.delete_status(current.id).await.map_err(Into::into)?;
    tracing::info!(status = %status, "deleted status");
    Ok(())
  }
}
