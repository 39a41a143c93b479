//! Metadata for tiled raster caches.
//!
//! A tiled overlay is addressed by a URL template and serves a pyramid of raster
//! tiles over one of three schemes: WMS bounding-box requests, or TMS/XYZ tile
//! coordinates (which differ only in the direction of the Y axis). Fetching and
//! decoding tiles is the renderer's collaborator's job; the forest stores the
//! address and zoom-range metadata needed to list and identify the source.

use crate::CacheType;
use std::fmt::Display;

/// Serving scheme of a tiled source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileScheme {
	Wms,
	Tms,
	Xyz,
}

impl TileScheme {
	pub fn as_str(&self) -> &str {
		match self {
			TileScheme::Wms => "WMS",
			TileScheme::Tms => "TMS",
			TileScheme::Xyz => "XYZ",
		}
	}

	/// The overlay type tag corresponding to this scheme.
	pub fn cache_type(&self) -> CacheType {
		match self {
			TileScheme::Wms => CacheType::Wms,
			TileScheme::Tms => CacheType::Tms,
			TileScheme::Xyz => CacheType::Xyz,
		}
	}
}

impl Display for TileScheme {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Metadata of a tiled raster source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TiledMeta {
	/// Serving scheme of the source.
	pub scheme: TileScheme,
	/// Address template, e.g. `https://tiles.example.org/{z}/{x}/{y}.png`.
	pub url_template: String,
	/// Lowest zoom level served.
	pub zoom_min: u8,
	/// Highest zoom level served.
	pub zoom_max: u8,
	/// Number of tiles cached locally, when known.
	pub tile_count: Option<u64>,
}

impl TiledMeta {
	pub fn new(scheme: TileScheme, url_template: impl Into<String>, zoom_min: u8, zoom_max: u8) -> Self {
		Self {
			scheme,
			url_template: url_template.into(),
			zoom_min,
			zoom_max,
			tile_count: None,
		}
	}

	pub fn with_tile_count(mut self, tile_count: u64) -> Self {
		self.tile_count = Some(tile_count);
		self
	}
}
