//! JSON REST API for NexBoard.
//!
//! Exposes an axum [`Router`] backed by the orchestrators in
//! [`nexboard_core::service`], generic over any
//! [`nexboard_core::store::TrackerStore`]. Authentication, TLS and transport
//! concerns are the caller's responsibility: every route expects an
//! [`Actor`] to have been placed in the request extensions already.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", nexboard_api::api_router(services.clone()))
//! ```

pub mod actor;
pub mod boards;
pub mod error;
pub mod extract;
pub mod statuses;
pub mod tasks;
pub mod users;
pub mod workspaces;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, patch, put},
};
use nexboard_core::{service::Services, store::TrackerStore};

pub use actor::Actor;
pub use error::ApiError;

type Svc<S> = axum::extract::State<Arc<Services<S>>>;

/// Build a fully-materialised API router for `services`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(services: Arc<Services<S>>) -> Router<()>
where
  S: TrackerStore + 'static,
{
  Router::new()
    // Profile
    .route(
      "/users/profile",
      get(users::profile::<S>).put(users::update_profile::<S>),
    )
    // Workspaces
    .route(
      "/workspaces",
      get(workspaces::list::<S>).post(workspaces::create::<S>),
    )
    .route(
      "/workspaces/{id}",
      get(workspaces::get_one::<S>)
        .put(workspaces::update::<S>)
        .delete(workspaces::delete::<S>),
    )
    .route(
      "/workspaces/{id}/members",
      get(workspaces::members::<S>).post(workspaces::invite::<S>),
    )
    .route(
      "/workspaces/{id}/members/{user_id}",
      put(workspaces::change_role::<S>).delete(workspaces::remove_member::<S>),
    )
    // Boards
    .route(
      "/workspaces/{id}/boards",
      get(boards::list::<S>).post(boards::create::<S>),
    )
    .route(
      "/boards/{id}",
      get(boards::get_one::<S>)
        .put(boards::update::<S>)
        .delete(boards::delete::<S>),
    )
    // Tasks
    .route(
      "/boards/{id}/tasks",
      get(tasks::list::<S>).post(tasks::create::<S>),
    )
    .route(
      "/tasks/{id}",
      get(tasks::get_one::<S>)
        .put(tasks::update::<S>)
        .delete(tasks::delete::<S>),
    )
    .route("/tasks/{id}/status", patch(tasks::move_status::<S>))
    .route("/tasks/{id}/assign", patch(tasks::assign::<S>))
    // Statuses
    .route(
      "/statuses",
      get(statuses::list::<S>).post(statuses::create::<S>),
    )
    .route(
      "/statuses/{id}",
      get(statuses::get_one::<S>)
        .put(statuses::update::<S>)
        .delete(statuses::delete::<S>),
    )
    .with_state(services)
}

#[cfg(test)]
mod tests;
