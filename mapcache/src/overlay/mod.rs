//! Cache overlay nodes and their variant metadata.

mod cache_overlay;
mod cache_type;
mod feature;
pub(crate) mod geopackage;
mod tiled;

pub use cache_overlay::{CacheKind, CacheOverlay, OverlayIter};
pub use cache_type::CacheType;
pub use feature::{FeatureLayerMeta, GeometryKind};
pub use geopackage::GeoPackageMeta;
pub use tiled::{TileScheme, TiledMeta};
