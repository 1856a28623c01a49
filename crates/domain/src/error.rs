use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("id must not be empty")]
    EmptyId,
    #[error("thumbnail base size must be positive and not exceed max size, got base={base} max={max}")]
    InvalidThumbnailSettings { base: u32, max: u32 },
}
