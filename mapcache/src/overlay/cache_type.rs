//! The closed set of cache overlay types.
//!
//! Consumers (the map renderer, the overlay list UI) match exhaustively on
//! [`CacheType`]; adding a variant is a deliberate API change, not a plugin point.

use std::fmt::Display;

/// Tag identifying the concrete kind of a cache overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CacheType {
	/// Packaged container database holding child tile and feature layers.
	GeoPackage,
	/// Tiled raster source served by a WMS endpoint.
	Wms,
	/// Tiled raster source served in TMS tile order.
	Tms,
	/// Tiled raster source served in XYZ tile order.
	Xyz,
	/// Vector feature layer.
	FeatureLayer,
}

impl CacheType {
	pub fn as_str(&self) -> &str {
		match self {
			CacheType::GeoPackage => "geopackage",
			CacheType::Wms => "wms",
			CacheType::Tms => "tms",
			CacheType::Xyz => "xyz",
			CacheType::FeatureLayer => "feature layer",
		}
	}
}

impl Display for CacheType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}
