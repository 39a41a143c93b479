//! Metadata for vector feature layers.

use std::fmt::Display;

/// Dominant geometry kind of a feature layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeometryKind {
	Point,
	Line,
	Polygon,
	/// Layer mixes several geometry kinds.
	Mixed,
}

impl GeometryKind {
	pub fn as_str(&self) -> &str {
		match self {
			GeometryKind::Point => "point",
			GeometryKind::Line => "line",
			GeometryKind::Polygon => "polygon",
			GeometryKind::Mixed => "mixed",
		}
	}
}

impl Display for GeometryKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Metadata of a vector feature layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureLayerMeta {
	/// Number of features in the layer.
	pub feature_count: u64,
	/// Dominant geometry kind of the layer.
	pub geometry: GeometryKind,
}

impl FeatureLayerMeta {
	pub fn new(feature_count: u64, geometry: GeometryKind) -> Self {
		Self { feature_count, geometry }
	}
}
