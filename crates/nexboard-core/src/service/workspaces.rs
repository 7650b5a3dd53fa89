//! Workspace lifecycle and membership management.

use std::sync::Arc;

use uuid::Uuid;

use crate::{
  Result,
  access::{AccessPolicy, Capability},
  error::require_text,
  ids::IdGenerator,
  membership::{MemberView, MembershipTable, Role},
  store::TrackerStore,
  workspace::{Details, NewWorkspace, WorkspaceView},
};

pub struct WorkspaceService<S> {
  store:   Arc<S>,
  policy:  Arc<AccessPolicy<S>>,
  members: MembershipTable<S>,
  ids:     Arc<dyn IdGenerator>,
}

impl<S: TrackerStore> WorkspaceService<S> {
  pub fn new(
    store: Arc<S>,
    policy: Arc<AccessPolicy<S>>,
    ids: Arc<dyn IdGenerator>,
  ) -> Self {
    Self { members: MembershipTable::new(store.clone()), store, policy, ids }
  }

  /// Create a workspace owned by `actor`. No prior membership is needed; the
  /// owner row is written in the same transaction as the workspace.
  pub async fn create(&self, actor: Uuid, details: Details) -> Result<WorkspaceView> {
    let owner = self.policy.resolver().user(actor).await?;
    require_text("name", &details.name)?;

    let input = NewWorkspace {
      external_id: self.ids.next_id(),
      name:        details.name.trim().to_owned(),
      description: details.description,
      owner_id:    owner.id,
    };
    let workspace = self.store.create_workspace(input).await.map_err(Into::into)?;
    tracing::info!(
      workspace = %workspace.external_id,
      owner = %owner.external_id,
      "created workspace"
    );
    Ok(workspace.view())
  }

  /// Every workspace the actor belongs to, in any role.
  pub async fn list_mine(&self, actor: Uuid) -> Result<Vec<WorkspaceView>> {
    let user = self.policy.resolver().user(actor).await?;
    let workspaces = self
      .store
      .workspaces_for_member(user.id)
      .await
      .map_err(Into::into)?;
    Ok(workspaces.iter().map(|w| w.view()).collect())
  }

  pub async fn get(&self, actor: Uuid, workspace: Uuid) -> Result<WorkspaceView> {
    let grant = self
      .policy
      .workspace(actor, workspace, Capability::IsMember)
      .await?;
    Ok(grant.workspace.view())
  }

  pub async fn update(
    &self,
    actor: Uuid,
    workspace: Uuid,
    details: Details,
  ) -> Result<WorkspaceView> {
    let grant = self
      .policy
      .workspace(actor, workspace, Capability::IsOwner)
      .await?;
    require_text("name", &details.name)?;

    let details = Details { name: details.name.trim().to_owned(), ..details };
    let updated = self
      .store
      .update_workspace(grant.workspace.id, details)
      .await
      .map_err(Into::into)?;
    tracing::info!(workspace = %updated.external_id, "updated workspace");
    Ok(updated.view())
  }

  /// Delete a workspace. Memberships, boards and tasks go with it.
  pub async fn delete(&self, actor: Uuid, workspace: Uuid) -> Result<()> {
    let grant = self
      .policy
      .workspace(actor, workspace, Capability::IsOwner)
      .await?;
    self
      .store
      .delete_workspace(grant.workspace.id)
      .await
      .map_err(Into::into)?;
    tracing::info!(workspace = %workspace, "deleted workspace");
    Ok(())
  }

  // ── Membership ────────────────────────────────────────────────────────

  pub async fn members(&self, actor: Uuid, workspace: Uuid) -> Result<Vec<MemberView>> {
    let grant = self
      .policy
      .workspace(actor, workspace, Capability::IsMember)
      .await?;
    let members = self.members.list(grant.workspace.id).await?;
    Ok(members.iter().map(|m| m.view()).collect())
  }

  /// `AddMember`: grant `user` a role in the workspace.
  pub async fn invite(
    &self,
    actor: Uuid,
    workspace: Uuid,
    user: Uuid,
    role: &str,
  ) -> Result<MemberView> {
    let role = Role::parse(role)?;
    let invitee = self.policy.resolver().user(user).await?;
    let grant = self
      .policy
      .workspace(actor, workspace, Capability::IsOwnerOrAdmin)
      .await?;

    let member = self.members.add(grant.workspace.id, invitee.id, role).await?;
    tracing::info!(
      workspace = %workspace,
      member = %invitee.external_id,
      %role,
      "added member"
    );
    Ok(member.view())
  }

  /// `ChangeRole`. The owner's own row is immutable.
  pub async fn change_role(
    &self,
    actor: Uuid,
    workspace: Uuid,
    user: Uuid,
    role: &str,
  ) -> Result<MemberView> {
    let role = Role::parse(role)?;
    let target = self.policy.resolver().user(user).await?;
    let grant = self
      .policy
      .workspace(actor, workspace, Capability::IsOwner)
      .await?;

    let member = self
      .members
      .change_role(grant.workspace.id, target.id, role)
      .await?;
    tracing::info!(
      workspace = %workspace,
      member = %target.external_id,
      %role,
      "changed member role"
    );
    Ok(member.view())
  }

  /// `RemoveMember`. The owner cannot be removed.
  pub async fn remove_member(
    &self,
    actor: Uuid,
    workspace: Uuid,
    user: Uuid,
  ) -> Result<()> {
    let target = self.policy.resolver().user(user).await?;
    let grant = self
      .policy
      .workspace(actor, workspace, Capability::IsOwnerOrAdmin)
      .await?;

    self.members.remove(grant.workspace.id, target.id).await?;
    tracing::info!(
      workspace = %workspace,
      member = %target.external_id,
      "removed member"
    );
    Ok(())
  }
}
