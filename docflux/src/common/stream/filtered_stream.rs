use crate::collection::Document;
use crate::common::stream::DocumentStream;
use crate::errors::DocfluxResult;
use crate::filter::Filter;

/// A stream adapter that yields only the documents matching a filter.
///
/// Filtering is lazy: the underlying stream is advanced one document at a
/// time, so an unconsumed tail is never evaluated. A filter evaluation error
/// is surfaced in place of the offending document and the stream ends.
pub(crate) struct FilteredStream {
    inner: DocumentStream,
    filter: Filter,
    failed: bool,
}

impl FilteredStream {
    pub(crate) fn new(inner: DocumentStream, filter: Filter) -> Self {
        FilteredStream {
            inner,
            filter,
            failed: false,
        }
    }
}

impl Iterator for FilteredStream {
    type Item = DocfluxResult<Document>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        loop {
            match self.inner.next() {
                Some(Ok(document)) => match self.filter.apply(&document) {
                    Ok(true) => return Some(Ok(document)),
                    Ok(false) => continue,
                    Err(e) => {
                        self.failed = true;
                        return Some(Err(e));
                    }
                },
                Some(Err(e)) => {
                    self.failed = true;
                    return Some(Err(e));
                }
                None => return None,
            }
        }
    }
}
