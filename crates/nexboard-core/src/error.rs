//! Error types for `nexboard-core`.
//!
//! Every failure surfaced by the core is one of a small set of kinds that a
//! transport can map onto distinct response codes. Resolution failures and
//! permission failures are never folded together.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A referenced entity does not resolve, or is no longer active.
  #[error("{0}")]
  NotFound(String),

  /// The actor resolves but lacks the required capability.
  #[error("{0}")]
  Unauthorized(String),

  /// Malformed input, an unknown enum value, or an attempt to break an
  /// immutable invariant.
  #[error("{0}")]
  InvalidArgument(String),

  /// A uniqueness violation, or a delete blocked by live dependents.
  #[error("{0}")]
  Conflict(String),

  /// The persistence layer failed; surfaced unchanged, never retried here.
  #[error("store unavailable: {0}")]
  Unavailable(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// The category of an [`Error`], without its message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  NotFound,
  Unauthorized,
  InvalidArgument,
  Conflict,
  Unavailable,
}

impl Error {
  pub fn kind(&self) -> ErrorKind {
    match self {
      Self::NotFound(_) => ErrorKind::NotFound,
      Self::Unauthorized(_) => ErrorKind::Unauthorized,
      Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
      Self::Conflict(_) => ErrorKind::Conflict,
      Self::Unavailable(_) => ErrorKind::Unavailable,
    }
  }

  pub(crate) fn not_found(what: &str) -> Self {
    Self::NotFound(format!("{what} not found"))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Reject blank required text fields.
pub(crate) fn require_text(field: &str, value: &str) -> Result<()> {
  if value.trim().is_empty() {
    return Err(Error::InvalidArgument(format!("{field} is required")));
  }
  Ok(())
}
