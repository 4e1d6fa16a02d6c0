//! The `{ id, data }` envelope every generated document is stored in.

use lean_uuid::RecordId;
use serde::{Deserialize, Serialize};

/// A stored document: an opaque identifier plus its payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record<T> {
    pub id: RecordId,
    pub data: T,
}

impl<T> Record<T> {
    pub fn new(id: RecordId, data: T) -> Self {
        Self { id, data }
    }

    pub fn id_string(&self) -> String {
        self.id.to_string()
    }
}
