//! The cache overlay node.
//!
//! A [`CacheOverlay`] is one node in the forest of offline map caches: a packaged
//! container database, a tiled raster source, or a vector feature layer. All
//! variants share the same identity and state surface (a display name, a globally
//! unique cache name, an enabled flag, and an ordered child list), so the renderer
//! and the overlay list UI can walk the forest without knowing the backend behind
//! each node.
//!
//! Variant-specific metadata lives in [`CacheKind`], a closed tagged enum. Whether
//! a node may hold children is a property of the variant, not of the instance:
//! only packaged containers do, so `supports_children() == false ⇒ children()
//! is empty` holds by construction.
//!
//! Subtrees are built bottom-up by a loader and are structurally immutable once
//! shared: the only state that mutates in place afterwards is the `enabled` flag,
//! an atomic bool. Reloading a container means building a fresh subtree and
//! swapping it in through the registry, never editing a published one.
//!
//! # Examples
//!
//! ```
//! use mapcache::*;
//! use std::path::PathBuf;
//!
//! let mut pack = CacheOverlay::new_geopackage("pack", GeoPackageMeta::new(PathBuf::from("/data/pack.gpkg")));
//! pack
//! 	.attach_child(CacheOverlay::new_feature_layer(
//! 		"roads",
//! 		FeatureLayerMeta::new(120, GeometryKind::Line),
//! 	))
//! 	.unwrap();
//!
//! let child = &pack.children()[0];
//! assert_eq!(child.cache_name(), "pack/roads");
//! assert!(!child.enabled());
//! ```

use crate::overlay::geopackage::format_size;
use crate::{CacheType, FeatureLayerMeta, GeoPackageMeta, TiledMeta, build_child_cache_name, validate_raw_name};
use anyhow::{Result, ensure};
use itertools::Itertools;
use std::sync::{
	Arc,
	atomic::{AtomicBool, Ordering},
};

/// Variant payload of a cache overlay.
///
/// This is a closed set; every consumer matches exhaustively, so an unhandled
/// variant is a compile error rather than a silent runtime gap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheKind {
	/// Packaged container database; the only variant that holds children.
	GeoPackage(GeoPackageMeta),
	/// Tiled raster source (WMS, TMS or XYZ).
	Tiled(TiledMeta),
	/// Vector feature layer.
	FeatureLayer(FeatureLayerMeta),
}

impl CacheKind {
	/// The type tag of this variant.
	pub fn cache_type(&self) -> CacheType {
		match self {
			CacheKind::GeoPackage(_) => CacheType::GeoPackage,
			CacheKind::Tiled(meta) => meta.scheme.cache_type(),
			CacheKind::FeatureLayer(_) => CacheType::FeatureLayer,
		}
	}

	/// True for container variants that may enumerate child caches.
	pub fn supports_children(&self) -> bool {
		matches!(self, CacheKind::GeoPackage(_))
	}
}

/// One node in the cache overlay forest.
#[derive(Debug)]
pub struct CacheOverlay {
	name: String,
	cache_name: String,
	kind: CacheKind,
	enabled: AtomicBool,
	children: Vec<Arc<CacheOverlay>>,
}

impl CacheOverlay {
	/// Creates an overlay whose cache name equals its name (a root, or a node whose
	/// composite name will be derived when it is attached to a parent).
	pub fn new(name: impl Into<String>, kind: CacheKind) -> Self {
		let name = name.into();
		let cache_name = name.clone();
		Self::with_cache_name(name, cache_name, kind)
	}

	/// Creates an overlay with an explicit cache name distinct from its display name.
	pub fn with_cache_name(name: impl Into<String>, cache_name: impl Into<String>, kind: CacheKind) -> Self {
		Self {
			name: name.into(),
			cache_name: cache_name.into(),
			kind,
			enabled: AtomicBool::new(false),
			children: Vec::new(),
		}
	}

	/// Creates a packaged container overlay.
	pub fn new_geopackage(name: impl Into<String>, meta: GeoPackageMeta) -> Self {
		Self::new(name, CacheKind::GeoPackage(meta))
	}

	/// Creates a tiled raster overlay.
	pub fn new_tiled(name: impl Into<String>, meta: TiledMeta) -> Self {
		Self::new(name, CacheKind::Tiled(meta))
	}

	/// Creates a vector feature layer overlay.
	pub fn new_feature_layer(name: impl Into<String>, meta: FeatureLayerMeta) -> Self {
		Self::new(name, CacheKind::FeatureLayer(meta))
	}

	/// The overlay's own name, unique among its siblings.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// The overlay's globally unique cache name.
	///
	/// Equals [`name()`](Self::name) for roots; for children it is the composite
	/// derived via [`build_child_cache_name`].
	pub fn cache_name(&self) -> &str {
		&self.cache_name
	}

	/// The overlay's type tag.
	pub fn cache_type(&self) -> CacheType {
		self.kind.cache_type()
	}

	/// The overlay's variant payload.
	pub fn kind(&self) -> &CacheKind {
		&self.kind
	}

	/// True if this overlay may hold child overlays. Fixed by the variant.
	pub fn supports_children(&self) -> bool {
		self.kind.supports_children()
	}

	/// Read-only view of the child overlays, in attachment order.
	///
	/// Always empty for non-container variants.
	pub fn children(&self) -> &[Arc<CacheOverlay>] {
		&self.children
	}

	/// Whether the overlay is currently enabled for rendering.
	pub fn enabled(&self) -> bool {
		self.enabled.load(Ordering::Relaxed)
	}

	/// Sets the enabled flag.
	///
	/// A plain per-node scalar write: no cascade to children or parents. Whether a
	/// disabled container suppresses its enabled children is the renderer's policy.
	pub fn set_enabled(&self, enabled: bool) {
		self.enabled.store(enabled, Ordering::Relaxed);
	}

	/// Attaches a child overlay, deriving its composite cache name (and those of
	/// its whole subtree) from this overlay's cache name.
	///
	/// Fails on non-container variants, on child names containing the reserved
	/// separator, and on sibling name collisions. Must be called before the parent
	/// is registered; published subtrees are structurally immutable.
	pub fn attach_child(&mut self, child: CacheOverlay) -> Result<()> {
		ensure!(
			self.supports_children(),
			"{} overlay {:?} cannot hold child overlays",
			self.cache_type(),
			self.name
		);
		validate_raw_name(&child.name)?;
		ensure!(
			!self.children.iter().any(|c| c.name == child.name),
			"overlay {:?} already holds a child named {:?}",
			self.cache_name,
			child.name
		);
		let child = child.reroot(&self.cache_name);
		self.children.push(Arc::new(child));
		Ok(())
	}

	/// Depth-first iteration over this overlay and its subtree, self first,
	/// children in attachment order.
	pub fn iter(&self) -> OverlayIter<'_> {
		OverlayIter { stack: vec![self] }
	}

	/// Human-readable description of the overlay for display in a cache list.
	pub fn info(&self) -> String {
		match &self.kind {
			CacheKind::GeoPackage(meta) => {
				let mut lines = vec![format!("GeoPackage {}", self.name)];
				if self.children.is_empty() {
					lines.push("no layers".to_string());
				} else {
					lines.push(format!(
						"{} layer{}: {}",
						self.children.len(),
						if self.children.len() == 1 { "" } else { "s" },
						self.children.iter().map(|c| c.name()).join(", ")
					));
				}
				if let Some(size) = meta.size_bytes {
					lines.push(format!("size: {}", format_size(size)));
				}
				lines.push(format!("path: {}", meta.path.display()));
				lines.join("\n")
			}
			CacheKind::Tiled(meta) => {
				let mut lines = vec![
					format!("{} tile source", meta.scheme),
					format!("url: {}", meta.url_template),
					format!("zoom: {} - {}", meta.zoom_min, meta.zoom_max),
				];
				if let Some(count) = meta.tile_count {
					lines.push(format!("{count} tile{}", if count == 1 { "" } else { "s" }));
				}
				lines.join("\n")
			}
			CacheKind::FeatureLayer(meta) => {
				format!(
					"feature layer {}\n{} {} feature{}",
					self.name,
					meta.feature_count,
					meta.geometry,
					if meta.feature_count == 1 { "" } else { "s" }
				)
			}
		}
	}

	/// Rewrites this node's cache name (and, recursively, its subtree's) as a
	/// composite under `parent_cache_name`.
	fn reroot(mut self, parent_cache_name: &str) -> Self {
		self.cache_name = build_child_cache_name(parent_cache_name, &self.name);
		let cache_name = self.cache_name.clone();
		self.children = self
			.children
			.into_iter()
			.map(|child| {
				// Before registration the parent holds the only strong reference.
				let child = Arc::try_unwrap(child).unwrap_or_else(|shared| shared.clone_subtree());
				Arc::new(child.reroot(&cache_name))
			})
			.collect();
		self
	}

	fn clone_subtree(&self) -> Self {
		Self {
			name: self.name.clone(),
			cache_name: self.cache_name.clone(),
			kind: self.kind.clone(),
			enabled: AtomicBool::new(self.enabled()),
			children: self.children.iter().map(|c| Arc::new(c.clone_subtree())).collect(),
		}
	}
}

/// Depth-first iterator over an overlay subtree.
pub struct OverlayIter<'a> {
	stack: Vec<&'a CacheOverlay>,
}

impl<'a> Iterator for OverlayIter<'a> {
	type Item = &'a CacheOverlay;

	fn next(&mut self) -> Option<Self::Item> {
		let node = self.stack.pop()?;
		self.stack.extend(node.children.iter().rev().map(Arc::as_ref));
		Some(node)
	}
}
