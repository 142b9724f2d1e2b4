pub mod repository;

pub use repository::BannerRepository;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    ValidationError(String),
    #[error("Duplicate banner id: {0}")]
    DuplicateBanner(String),
    #[error("Banner store unavailable: {0}")]
    StoreError(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
