use crate::collection::DocId;
use std::fmt::Display;

use itertools::Itertools;

/// Acknowledgment of a successful insert operation.
///
/// `InsertAck` is the single item an insert publisher delivers before it
/// completes. It carries the ids the store assigned to the inserted
/// documents.
///
/// # Examples
///
/// ```rust,ignore
/// collection.insert_one(doc).subscribe(FnSubscriber::new(
///     1,
///     |ack: InsertAck| println!("inserted {}", ack.inserted_ids().len()),
///     |err| eprintln!("insert failed: {}", err),
///     || println!("complete"),
/// ));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertAck {
    inserted_ids: Vec<DocId>,
}

impl InsertAck {
    /// Creates an acknowledgment carrying the store-assigned ids.
    pub(crate) fn new(inserted_ids: Vec<DocId>) -> Self {
        InsertAck { inserted_ids }
    }

    /// Ids assigned to the inserted documents, in insertion order.
    pub fn inserted_ids(&self) -> &[DocId] {
        &self.inserted_ids
    }
}

impl Display for InsertAck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "InsertAck[{}]",
            self.inserted_ids.iter().map(|id| id.to_string()).join(", ")
        )
    }
}

/// The aggregate effect of an update operation across all matched documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateOutcome {
    matched_count: u64,
    modified_count: u64,
    upserted_id: Option<DocId>,
}

impl UpdateOutcome {
    pub(crate) fn new(matched_count: u64, modified_count: u64, upserted_id: Option<DocId>) -> Self {
        UpdateOutcome {
            matched_count,
            modified_count,
            upserted_id,
        }
    }

    /// Number of documents the filter matched.
    pub fn matched_count(&self) -> u64 {
        self.matched_count
    }

    /// Number of matched documents the update actually modified.
    pub fn modified_count(&self) -> u64 {
        self.modified_count
    }

    /// Id of the document inserted by an upsert, if one happened.
    pub fn upserted_id(&self) -> Option<DocId> {
        self.upserted_id
    }
}

impl Display for UpdateOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.upserted_id {
            Some(id) => write!(
                f,
                "UpdateOutcome[matched={}, modified={}, upserted={}]",
                self.matched_count, self.modified_count, id
            ),
            None => write!(
                f,
                "UpdateOutcome[matched={}, modified={}]",
                self.matched_count, self.modified_count
            ),
        }
    }
}

/// The aggregate effect of a delete operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteOutcome {
    deleted_count: u64,
}

impl DeleteOutcome {
    pub(crate) fn new(deleted_count: u64) -> Self {
        DeleteOutcome { deleted_count }
    }

    /// Number of documents removed.
    pub fn deleted_count(&self) -> u64 {
        self.deleted_count
    }
}

impl Display for DeleteOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DeleteOutcome[deleted={}]", self.deleted_count)
    }
}
