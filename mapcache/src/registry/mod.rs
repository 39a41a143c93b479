//! Forest management: the cache registry and its errors.

mod cache_registry;
mod error;

pub use cache_registry::{CacheRegistry, ForestIter, RootsIter};
pub use error::RegistryError;
