use crate::collection::{Document, ProjectionSpec};
use crate::common::stream::DocumentStream;
use crate::errors::DocfluxResult;

/// A stream adapter that rewrites each document to its projected form.
pub(crate) struct ProjectedStream {
    inner: DocumentStream,
    projection: ProjectionSpec,
}

impl ProjectedStream {
    pub(crate) fn new(inner: DocumentStream, projection: ProjectionSpec) -> Self {
        ProjectedStream { inner, projection }
    }
}

impl Iterator for ProjectedStream {
    type Item = DocfluxResult<Document>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|doc_result| doc_result.and_then(|doc| self.projection.apply(&doc)))
    }
}
