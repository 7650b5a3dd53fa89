//! Account registration and profile maintenance.
//!
//! Password hashing happens before this layer; the credential arrives here as
//! an opaque hash and is never returned.

use std::sync::Arc;

use uuid::Uuid;

use crate::{
  Result,
  error::require_text,
  ids::IdGenerator,
  resolve::Resolver,
  store::TrackerStore,
  user::{NewAccount, NewUser, ProfileChanges, UserRecord, UserView, validate_email},
};

pub struct UserService<S> {
  store:    Arc<S>,
  resolver: Resolver<S>,
  ids:      Arc<dyn IdGenerator>,
}

impl<S: TrackerStore> UserService<S> {
  pub fn new(store: Arc<S>, ids: Arc<dyn IdGenerator>) -> Self {
    Self { resolver: Resolver::new(store.clone()), store, ids }
  }

  /// Create an account. Fails with `Conflict` if the email is taken.
  pub async fn register(&self, account: NewAccount) -> Result<UserView> {
    require_text("name", &account.name)?;
    validate_email(&account.email)?;

    let input = NewUser {
      external_id:     self.ids.next_id(),
      name:            account.name.trim().to_owned(),
      email:           account.email.trim().to_owned(),
      credential_hash: account.credential_hash,
    };
    let user = self.store.create_user(input).await.map_err(Into::into)?;
    tracing::info!(user = %user.external_id, "registered user");
    Ok(user.view())
  }

  /// The full record, credential hash included, for credential checks.
  pub async fn by_email(&self, email: &str) -> Result<UserRecord> {
    self.resolver.user_by_email(email).await
  }

  pub async fn profile(&self, actor: Uuid) -> Result<UserView> {
    Ok(self.resolver.user(actor).await?.view())
  }

  pub async fn update_profile(
    &self,
    actor: Uuid,
    changes: ProfileChanges,
  ) -> Result<UserView> {
    let user = self.resolver.user(actor).await?;
    require_text("name", &changes.name)?;

    let changes = ProfileChanges {
      name:       changes.name.trim().to_owned(),
      avatar_url: changes.avatar_url.filter(|url| !url.trim().is_empty()),
    };
    let user = self
      .store
      .update_user_profile(user.id, changes)
      .await
      .map_err(Into::into)?;
    tracing::info!(user = %user.external_id, "updated profile");
    Ok(user.view())
  }
}
