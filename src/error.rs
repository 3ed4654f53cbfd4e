use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("malformed record {index} in batch {batch}: field `{field}` {reason}")]
    MalformedRecord {
        batch: usize,
        index: usize,
        field: &'static str,
        reason: String,
    },

    #[error("malformed batch {batch}: {reason}")]
    MalformedBatch { batch: usize, reason: String },

    #[error("no plays left after filtering")]
    EmptyDataset,

    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

impl EngineError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}
