use thiserror::Error;

/// Schema document failures, surfaced once at loader construction.
///
/// All of these indicate a malformed or ambiguous schema on the store side
/// and are not retryable.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("schema document has no `classes` array")]
    MissingClasses,

    #[error("class entry #{index} has no `class` name")]
    UnnamedClass { index: usize },

    #[error("duplicate class `{class}` in schema")]
    DuplicateClass { class: String },

    #[error("class `{class}` has a property without a `name`")]
    UnnamedProperty { class: String },

    #[error("property `{class}.{property}` has no `dataType`")]
    MissingDataType { class: String, property: String },

    #[error("property `{class}.{property}` has {count} data types, cannot resolve a unique target")]
    AmbiguousDataType {
        class: String,
        property: String,
        count: usize,
    },

    #[error("property `{class}.{property}` references unknown class `{target}`")]
    UnknownTarget {
        class: String,
        property: String,
        target: String,
    },
}

/// Failures originating in the external object store. The loader never
/// catches or retries these; they propagate to the caller unchanged.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("request to object store failed")]
    Http(#[from] reqwest::Error),

    #[error("object store rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Loader failures. `Schema` and `MissingField` mean the caller and the
/// store's schema disagree; both abort the current call without corrupting
/// the loader's created-set.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("invalid schema: {0}")]
    Schema(#[from] SchemaError),

    #[error("record is missing field `{field}` required by class `{class}`")]
    MissingField { class: String, field: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}
