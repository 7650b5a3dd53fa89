//! External identifier generation.
//!
//! External ids are the only identifiers callers ever see. Internal ids are
//! assigned by the store on insert.

use uuid::Uuid;

pub trait IdGenerator: Send + Sync {
  /// A fresh id, unique within its entity type.
  fn next_id(&self) -> Uuid;
}

/// Random v4 UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIds;

impl IdGenerator for RandomIds {
  fn next_id(&self) -> Uuid { Uuid::new_v4() }
}
