pub mod error;
pub mod omdb;
pub mod repository;
pub mod types;

pub use error::{ErrorInfo, Fetched, RepositoryError};
pub use omdb::{DEFAULT_OMDB_BASE_URL, OmdbRepository};
pub use repository::CatalogRepository;
pub use types::{CatalogItem, CatalogPayload, DetailRecord};
