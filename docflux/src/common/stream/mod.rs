//! Lazily pollable document streams and their adapters.
//!
//! A [`DocumentStream`] is the store's "sequence source": a boxed, sendable
//! iterator of document results that a find executor pumps through the
//! demand gate one item at a time. The adapters in this module shape a raw
//! store scan into the requested result set: [`FilteredStream`] drops
//! non-matching documents, [`SortedStream`] applies a stable multi-key sort,
//! and [`ProjectedStream`] rewrites each document to its projected form.

mod filtered_stream;
mod projected_stream;
mod sorted_stream;

pub(crate) use filtered_stream::*;
pub(crate) use projected_stream::*;
pub(crate) use sorted_stream::*;

use crate::collection::Document;
use crate::errors::DocfluxResult;

/// A lazily pollable sequence of document results produced by a store query.
pub type DocumentStream = Box<dyn Iterator<Item = DocfluxResult<Document>> + Send>;
