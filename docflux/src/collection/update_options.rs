/// Options for controlling update operations.
///
/// # Examples
///
/// ```rust,ignore
/// use docflux::collection::UpdateOptions;
///
/// // insert a new document when the filter matches nothing
/// let options = UpdateOptions::new().insert_if_absent(true);
/// let publisher = collection.update_one_with_options(filter, spec, options);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateOptions {
    pub(crate) insert_if_absent: bool,
}

impl UpdateOptions {
    /// Creates options with default settings (no upsert).
    pub fn new() -> Self {
        UpdateOptions {
            insert_if_absent: false,
        }
    }

    /// When enabled and the filter matches no document, the update
    /// specification is applied to an empty document and the result is
    /// inserted. The outcome then reports the new id as `upserted_id`.
    pub fn insert_if_absent(mut self, insert_if_absent: bool) -> Self {
        self.insert_if_absent = insert_if_absent;
        self
    }
}
