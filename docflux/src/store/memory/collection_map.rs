use crossbeam_skiplist::SkipMap;
use std::collections::Bound::{Excluded, Unbounded};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::collection::{
    DeleteOutcome, DocId, Document, InsertAck, ProjectionSpec, UpdateOptions, UpdateOutcome,
    UpdateSpec,
};
use crate::common::stream::{
    default_collator, DocumentStream, FilteredStream, ProjectedStream, SortedStream,
};
use crate::common::SortableFields;
use crate::errors::{DocfluxError, DocfluxResult, ErrorKind};
use crate::filter::Filter;
use crate::store::StoreCollectionProvider;

/// In-memory collection source backed by a concurrent skip list.
///
/// # Purpose
/// `MemoryCollection` stores documents keyed by their [DocId]. Since ids are
/// time-ordered, iterating the skip list in key order replays documents in
/// insertion order, which is the store-native result order for unsorted
/// queries.
///
/// # Characteristics
/// - **Thread-Safe**: Can be safely cloned and shared across threads
/// - **Concurrent Skip List**: O(log n) insert/remove/lookup
/// - **Lazy Scans**: query results are produced by a cursor that walks the
///   skip list one key at a time; nothing is materialized unless a sort
///   requires it
#[derive(Clone)]
pub(crate) struct MemoryCollection {
    inner: Arc<MemoryCollectionInner>,
}

impl MemoryCollection {
    pub(crate) fn new(name: &str, closed: Arc<AtomicBool>) -> Self {
        MemoryCollection {
            inner: Arc::new(MemoryCollectionInner {
                name: name.to_string(),
                primary: Arc::new(SkipMap::new()),
                closed,
            }),
        }
    }
}

struct MemoryCollectionInner {
    name: String,
    primary: Arc<SkipMap<u64, Document>>,
    closed: Arc<AtomicBool>,
}

impl MemoryCollectionInner {
    fn ensure_open(&self) -> DocfluxResult<()> {
        if self.closed.load(Ordering::Acquire) {
            log::error!("Store is closed; operation on {} rejected", self.name);
            return Err(DocfluxError::new(
                "Store is closed",
                ErrorKind::ConnectionFailure,
            ));
        }
        Ok(())
    }

    fn insert_document(&self, mut document: Document) -> DocfluxResult<DocId> {
        let id = match document.id() {
            Some(id) => {
                if self.primary.contains_key(&id.raw()) {
                    log::error!("Document with id {} already exists in {}", id, self.name);
                    return Err(DocfluxError::new(
                        &format!("Document with id {} already exists", id),
                        ErrorKind::OperationFailure,
                    ));
                }
                id
            }
            None => DocId::new(),
        };
        document.put_id(id);
        self.primary.insert(id.raw(), document);
        Ok(id)
    }
}

impl StoreCollectionProvider for MemoryCollection {
    fn name(&self) -> String {
        self.inner.name.clone()
    }

    fn insert_one(&self, document: Document) -> DocfluxResult<InsertAck> {
        self.inner.ensure_open()?;
        let id = self.inner.insert_document(document)?;
        Ok(InsertAck::new(vec![id]))
    }

    fn insert_many(&self, documents: Vec<Document>) -> DocfluxResult<InsertAck> {
        self.inner.ensure_open()?;
        if documents.is_empty() {
            log::error!("Cannot insert an empty batch into {}", self.inner.name);
            return Err(DocfluxError::new(
                "Cannot insert an empty batch of documents",
                ErrorKind::OperationFailure,
            ));
        }
        let mut ids = Vec::with_capacity(documents.len());
        for document in documents {
            ids.push(self.inner.insert_document(document)?);
        }
        Ok(InsertAck::new(ids))
    }

    fn query(
        &self,
        filter: Option<Filter>,
        sort: Option<SortableFields>,
        projection: Option<ProjectionSpec>,
    ) -> DocfluxResult<DocumentStream> {
        self.inner.ensure_open()?;
        if let Some(filter) = &filter {
            filter.validate()?;
        }

        let mut stream: DocumentStream = Box::new(ScanStream::new(self.inner.primary.clone()));
        if let Some(filter) = filter {
            stream = Box::new(FilteredStream::new(stream, filter));
        }
        if let Some(sort) = sort {
            if !sort.is_empty() {
                stream = Box::new(SortedStream::new(stream, &sort, default_collator()));
            }
        }
        if let Some(projection) = projection {
            stream = Box::new(ProjectedStream::new(stream, projection));
        }
        Ok(stream)
    }

    fn update(
        &self,
        filter: Filter,
        update: &UpdateSpec,
        options: &UpdateOptions,
        just_once: bool,
    ) -> DocfluxResult<UpdateOutcome> {
        self.inner.ensure_open()?;
        filter.validate()?;
        if update.is_empty() {
            log::error!("Update on {} has an empty specification", self.inner.name);
            return Err(DocfluxError::new(
                "Update specification has no operations",
                ErrorKind::OperationFailure,
            ));
        }

        let mut matched = 0u64;
        let mut modified = 0u64;
        for entry in self.inner.primary.iter() {
            if filter.apply(entry.value())? {
                matched += 1;
                let mut document = entry.value().clone();
                if update.apply(&mut document)? {
                    self.inner.primary.insert(*entry.key(), document);
                    modified += 1;
                }
                if just_once {
                    break;
                }
            }
        }

        if matched == 0 && options.insert_if_absent {
            let mut document = Document::new();
            update.apply(&mut document)?;
            let id = self.inner.insert_document(document)?;
            log::debug!("Upserted document {} into {}", id, self.inner.name);
            return Ok(UpdateOutcome::new(0, 0, Some(id)));
        }

        Ok(UpdateOutcome::new(matched, modified, None))
    }

    fn delete(&self, filter: Filter, just_once: bool) -> DocfluxResult<DeleteOutcome> {
        self.inner.ensure_open()?;
        filter.validate()?;

        let mut keys = Vec::new();
        for entry in self.inner.primary.iter() {
            if filter.apply(entry.value())? {
                keys.push(*entry.key());
                if just_once {
                    break;
                }
            }
        }

        let mut deleted = 0u64;
        for key in keys {
            if self.inner.primary.remove(&key).is_some() {
                deleted += 1;
            }
        }
        Ok(DeleteOutcome::new(deleted))
    }
}

/// A cursor that walks the skip list one key at a time.
///
/// Holding only the last visited key keeps the scan lazy and tolerant of
/// concurrent modification: entries inserted behind the cursor are skipped,
/// entries ahead of it are observed.
struct ScanStream {
    primary: Arc<SkipMap<u64, Document>>,
    cursor: Option<u64>,
}

impl ScanStream {
    fn new(primary: Arc<SkipMap<u64, Document>>) -> Self {
        ScanStream {
            primary,
            cursor: None,
        }
    }
}

impl Iterator for ScanStream {
    type Item = DocfluxResult<Document>;

    fn next(&mut self) -> Option<Self::Item> {
        let entry = match self.cursor {
            None => self.primary.front()?,
            Some(last) => self.primary.range((Excluded(last), Unbounded)).next()?,
        };
        self.cursor = Some(*entry.key());
        Some(Ok(entry.value().clone()))
    }
}
