//! # Write Batches
//!
//! An ordered list of writes that commits all-or-nothing.
//!
//! ## Preconditions
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  WriteBatch::new()                                                      │
//! │    .expect_field("bookings", id, "status", "Complete")   ◄─ guard       │
//! │    .expect_field("bookings", id, "rated", false)         ◄─ guard       │
//! │    .create("ratings", r1, vehicle_rating)                               │
//! │    .create("ratings", r2, supplier_rating)                              │
//! │    .update("bookings", id, {"rated": true})                             │
//! │                                                                         │
//! │  Any guard fails  → PreconditionFailed, nothing written                │
//! │  Any write fails  → error, nothing written                             │
//! │  Otherwise        → every write visible at once                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Ops apply in order, so a guard placed after a write sees that write.

use serde_json::Value;

/// One operation inside a [`WriteBatch`].
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOp {
    /// Insert at a caller-chosen id; `Conflict` if it exists.
    Create {
        collection: String,
        id: String,
        data: Value,
    },
    /// Insert or replace.
    Set {
        collection: String,
        id: String,
        data: Value,
    },
    /// Shallow merge into an existing document; `NotFound` if absent.
    Update {
        collection: String,
        id: String,
        patch: Value,
    },
    /// Remove; absent is a no-op.
    Delete { collection: String, id: String },
    /// Compare-and-set guard on a top-level field. `None` expects the
    /// field to be absent.
    Expect {
        collection: String,
        id: String,
        field: String,
        value: Option<Value>,
    },
}

impl WriteOp {
    pub fn collection(&self) -> &str {
        match self {
            WriteOp::Create { collection, .. }
            | WriteOp::Set { collection, .. }
            | WriteOp::Update { collection, .. }
            | WriteOp::Delete { collection, .. }
            | WriteOp::Expect { collection, .. } => collection,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            WriteOp::Create { id, .. }
            | WriteOp::Set { id, .. }
            | WriteOp::Update { id, .. }
            | WriteOp::Delete { id, .. }
            | WriteOp::Expect { id, .. } => id,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            WriteOp::Create { .. } => "create",
            WriteOp::Set { .. } => "set",
            WriteOp::Update { .. } => "update",
            WriteOp::Delete { .. } => "delete",
            WriteOp::Expect { .. } => "expect",
        }
    }
}

/// Builder for an atomic batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WriteBatch {
    ops: Vec<WriteOp>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(mut self, collection: &str, id: &str, data: Value) -> Self {
        self.ops.push(WriteOp::Create {
            collection: collection.to_string(),
            id: id.to_string(),
            data,
        });
        self
    }

    pub fn set(mut self, collection: &str, id: &str, data: Value) -> Self {
        self.ops.push(WriteOp::Set {
            collection: collection.to_string(),
            id: id.to_string(),
            data,
        });
        self
    }

    pub fn update(mut self, collection: &str, id: &str, patch: Value) -> Self {
        self.ops.push(WriteOp::Update {
            collection: collection.to_string(),
            id: id.to_string(),
            patch,
        });
        self
    }

    pub fn delete(mut self, collection: &str, id: &str) -> Self {
        self.ops.push(WriteOp::Delete {
            collection: collection.to_string(),
            id: id.to_string(),
        });
        self
    }

    pub fn expect_field(
        mut self,
        collection: &str,
        id: &str,
        field: &str,
        value: impl Into<Value>,
    ) -> Self {
        self.ops.push(WriteOp::Expect {
            collection: collection.to_string(),
            id: id.to_string(),
            field: field.to_string(),
            value: Some(value.into()),
        });
        self
    }

    /// Guards that a field still holds what was read earlier, where `None`
    /// means it was absent from the document.
    pub fn expect_unchanged(
        mut self,
        collection: &str,
        id: &str,
        field: &str,
        read: Option<Value>,
    ) -> Self {
        self.ops.push(WriteOp::Expect {
            collection: collection.to_string(),
            id: id.to_string(),
            field: field.to_string(),
            value: read,
        });
        self
    }

    pub fn ops(&self) -> &[WriteOp] {
        &self.ops
    }

    pub fn into_ops(self) -> Vec<WriteOp> {
        self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}
