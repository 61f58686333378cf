use catalog_core::FetchError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("card source failed: {0}")]
    Network(#[from] FetchError),
    #[error("no query session is open; load a query before requesting the next page")]
    NotLoaded,
}
