//! Error type for `nexboard-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A domain rule evaluated inside a transaction refused the write.
  #[error("core error: {0}")]
  Core(#[from] nexboard_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("unrecognised column value: {0}")]
  Decode(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
  fn is_constraint_violation(&self) -> bool {
    matches!(
      self,
      Self::Database(tokio_rusqlite::Error::Rusqlite(
        rusqlite::Error::SqliteFailure(failure, _)
      )) if failure.code == rusqlite::ErrorCode::ConstraintViolation
    )
  }
}

impl From<Error> for nexboard_core::Error {
  fn from(err: Error) -> Self {
    // The schema's unique indexes back up the in-transaction checks.
    if err.is_constraint_violation() {
      return Self::Conflict("conflicts with an existing record".into());
    }
    match err {
      Error::Core(e) => e,
      other => Self::Unavailable(Box::new(other)),
    }
  }
}

#[cfg(test)]
mod tests {
  use nexboard_core::ErrorKind;

  use super::*;

  #[test]
  fn domain_errors_pass_through_unchanged() {
    let err: nexboard_core::Error =
      Error::Core(nexboard_core::Error::Conflict("taken".into())).into();
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert_eq!(err.to_string(), "taken");
  }

  #[test]
  fn driver_failures_become_unavailable() {
    let err: nexboard_core::Error =
      Error::Database(tokio_rusqlite::Error::ConnectionClosed).into();
    assert_eq!(err.kind(), ErrorKind::Unavailable);

    let err: nexboard_core::Error = Error::Decode("role \"guest\"".into()).into();
    assert_eq!(err.kind(), ErrorKind::Unavailable);
  }
}
