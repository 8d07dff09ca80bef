#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum StoreError {
    #[error("Subscriber file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid subscriber id `{id}`: {reason}")]
    InvalidId { id: String, reason: String },
}
