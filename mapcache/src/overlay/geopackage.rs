//! Metadata for packaged container caches.
//!
//! A GeoPackage overlay represents one on-disk packaged database. Opening the
//! package and enumerating its tile and feature tables is the opener's job; the
//! forest only stores the resulting child overlays and the package metadata
//! captured here.

use std::path::PathBuf;

/// Metadata of a packaged container database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeoPackageMeta {
	/// Location of the package on disk.
	pub path: PathBuf,
	/// Package size in bytes, when known.
	pub size_bytes: Option<u64>,
}

impl GeoPackageMeta {
	pub fn new(path: PathBuf) -> Self {
		Self { path, size_bytes: None }
	}

	pub fn with_size(mut self, size_bytes: u64) -> Self {
		self.size_bytes = Some(size_bytes);
		self
	}
}

/// Formats a byte count for display, e.g. `2.4 MB`.
pub(crate) fn format_size(bytes: u64) -> String {
	const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
	let mut value = bytes as f64;
	let mut unit = 0;
	while value >= 1024.0 && unit < UNITS.len() - 1 {
		value /= 1024.0;
		unit += 1;
	}
	if unit == 0 {
		format!("{bytes} B")
	} else {
		format!("{value:.1} {}", UNITS[unit])
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(0, "0 B")]
	#[case(512, "512 B")]
	#[case(1024, "1.0 KB")]
	#[case(1536, "1.5 KB")]
	#[case(2_621_440, "2.5 MB")]
	#[case(5_368_709_120, "5.0 GB")]
	fn size_formatting(#[case] bytes: u64, #[case] expected: &str) {
		assert_eq!(format_size(bytes), expected);
	}

	#[test]
	fn builder_sets_size() {
		let meta = GeoPackageMeta::new(PathBuf::from("/data/pack.gpkg")).with_size(42);
		assert_eq!(meta.size_bytes, Some(42));
	}
}
