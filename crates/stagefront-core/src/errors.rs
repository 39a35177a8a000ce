use thiserror::Error;

/// Configuration errors raised before any stage runs. Unknown fields fail
/// fast instead of silently no-op sorting or grouping.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("unknown sort field `{field}` for {kind}")]
    UnknownSortField { kind: &'static str, field: String },
    #[error("unknown filter field `{field}` for {kind}")]
    UnknownFilterField { kind: &'static str, field: String },
    #[error("unknown range field `{field}` for {kind}")]
    UnknownRangeField { kind: &'static str, field: String },
    #[error("field `{field}` is not groupable for {kind}")]
    UnknownGroupField { kind: &'static str, field: String },
}

pub type Result<T> = std::result::Result<T, QueryError>;
