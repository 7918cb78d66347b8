/// The reserved field holding the store-assigned document id.
pub const DOC_ID: &str = "_id";

/// Separator for addressing embedded document fields.
pub const FIELD_SEPARATOR: char = '.';
