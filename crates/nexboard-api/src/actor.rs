//! The authenticated caller.

use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::ApiError;

/// The verified identity of the caller, inserted into the request
/// extensions by whatever authentication layer sits in front of the router.
/// Handlers trust it as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
  pub external_id: Uuid,
  pub email:       String,
}

impl<S: Send + Sync> FromRequestParts<S> for Actor {
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    _state: &S,
  ) -> Result<Self, Self::Rejection> {
    parts
      .extensions
      .get::<Actor>()
      .cloned()
      .ok_or_else(|| ApiError::Unauthenticated("authentication required".into()))
  }
}
