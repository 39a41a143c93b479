//! The cache registry.
//!
//! [`CacheRegistry`] owns the forest of root overlays and resolves any node, root
//! or nested, by its composite cache name in O(1). It guarantees forest-wide cache
//! name uniqueness: an [`add`](CacheRegistry::add) that would collide with any
//! existing name, anywhere in the forest, is rejected wholesale.
//!
//! ## Concurrency
//!
//! The forest is published as an immutable snapshot behind an [`ArcSwap`].
//! Structural mutations (`add`, `remove`, `replace`) build the next snapshot off
//! to the side and publish it with a single atomic swap, so a renderer iterating
//! [`roots`](CacheRegistry::roots) or a subtree's children concurrently with a
//! reload only ever observes complete trees, never a partially rebuilt one.
//! Structural mutations are expected to run on one coordinating task; enabled
//! toggles are independent per-node atomic writes and may come from anywhere.
//!
//! # Examples
//!
//! ```
//! use mapcache::*;
//!
//! let registry = CacheRegistry::new();
//! let mut pack = CacheOverlay::new_geopackage("pack", GeoPackageMeta::new("/data/pack.gpkg".into()));
//! pack
//! 	.attach_child(CacheOverlay::new_feature_layer(
//! 		"roads",
//! 		FeatureLayerMeta::new(12, GeometryKind::Line),
//! 	))
//! 	.unwrap();
//! registry.add(pack).unwrap();
//!
//! registry.set_enabled("pack/roads", true).unwrap();
//! assert!(registry.lookup("pack/roads").unwrap().enabled());
//! ```

use crate::{CacheOverlay, RegistryError};
use arc_swap::ArcSwap;
use std::{
	collections::{HashMap, HashSet},
	sync::Arc,
};

/// One immutable snapshot of the forest.
///
/// `roots` keeps registration order for stable listing; `index` maps every cache
/// name reachable in the forest, root or nested, to its node.
#[derive(Debug, Default)]
struct Forest {
	roots: Vec<Arc<CacheOverlay>>,
	index: HashMap<String, Arc<CacheOverlay>>,
}

impl Forest {
	fn branch(&self) -> Forest {
		Forest {
			roots: self.roots.clone(),
			index: self.index.clone(),
		}
	}

	fn root_position(&self, cache_name: &str) -> Result<usize, RegistryError> {
		self
			.roots
			.iter()
			.position(|root| root.cache_name() == cache_name)
			.ok_or_else(|| RegistryError::NotFound(cache_name.to_string()))
	}
}

/// Walks a subtree and returns every node in it, depth-first.
fn subtree_nodes(root: &Arc<CacheOverlay>) -> Vec<Arc<CacheOverlay>> {
	let mut nodes = Vec::new();
	let mut stack = vec![Arc::clone(root)];
	while let Some(node) = stack.pop() {
		stack.extend(node.children().iter().rev().cloned());
		nodes.push(node);
	}
	nodes
}

/// Rejects cache name duplicates within a freshly built subtree.
fn check_subtree_names(nodes: &[Arc<CacheOverlay>]) -> Result<(), RegistryError> {
	let mut seen = HashSet::new();
	for node in nodes {
		if !seen.insert(node.cache_name()) {
			return Err(RegistryError::DuplicateName(node.cache_name().to_string()));
		}
	}
	Ok(())
}

/// Registry of root cache overlays, addressable by composite cache name.
#[derive(Debug, Default)]
pub struct CacheRegistry {
	forest: ArcSwap<Forest>,
}

impl CacheRegistry {
	/// Creates an empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers a root overlay.
	///
	/// The whole incoming subtree is validated first: if any of its cache names is
	/// already taken anywhere in the forest, or repeats within the subtree itself,
	/// nothing is inserted and [`RegistryError::DuplicateName`] names the offender.
	pub fn add(&self, overlay: CacheOverlay) -> Result<(), RegistryError> {
		let root = Arc::new(overlay);
		let nodes = subtree_nodes(&root);
		check_subtree_names(&nodes)?;

		let forest = self.forest.load();
		for node in &nodes {
			if forest.index.contains_key(node.cache_name()) {
				return Err(RegistryError::DuplicateName(node.cache_name().to_string()));
			}
		}

		let mut next = forest.branch();
		next.roots.push(Arc::clone(&root));
		for node in nodes {
			next.index.insert(node.cache_name().to_string(), node);
		}

		log::debug!("registered cache overlay {:?} ({})", root.cache_name(), root.cache_type());
		self.forest.store(Arc::new(next));
		Ok(())
	}

	/// Removes the subtree rooted at a **root** overlay and returns it.
	///
	/// Nested cache names are not removable individually; a container rebuilds its
	/// own child list as part of [`replace`](Self::replace). Unknown or non-root
	/// names yield [`RegistryError::NotFound`].
	pub fn remove(&self, cache_name: &str) -> Result<Arc<CacheOverlay>, RegistryError> {
		let forest = self.forest.load();
		let position = forest.root_position(cache_name)?;

		let mut next = forest.branch();
		let root = next.roots.remove(position);
		for node in subtree_nodes(&root) {
			next.index.remove(node.cache_name());
		}

		log::debug!("removed cache overlay {:?}", cache_name);
		self.forest.store(Arc::new(next));
		Ok(root)
	}

	/// Atomically replaces the subtree rooted at a **root** overlay.
	///
	/// This is the reload path: a loader rebuilds the subtree off to the side and
	/// publishes it here in one snapshot swap, so concurrent readers see either the
	/// old complete subtree or the new one, never a mix. The new subtree's names
	/// are validated against the forest minus the outgoing subtree; the root keeps
	/// its position in the listing order.
	pub fn replace(&self, cache_name: &str, overlay: CacheOverlay) -> Result<(), RegistryError> {
		let new_root = Arc::new(overlay);
		let nodes = subtree_nodes(&new_root);
		check_subtree_names(&nodes)?;

		let forest = self.forest.load();
		let position = forest.root_position(cache_name)?;

		let outgoing: HashSet<String> = subtree_nodes(&forest.roots[position])
			.iter()
			.map(|node| node.cache_name().to_string())
			.collect();
		for node in &nodes {
			if !outgoing.contains(node.cache_name()) && forest.index.contains_key(node.cache_name()) {
				return Err(RegistryError::DuplicateName(node.cache_name().to_string()));
			}
		}

		let mut next = forest.branch();
		for name in &outgoing {
			next.index.remove(name);
		}
		next.roots[position] = Arc::clone(&new_root);
		for node in nodes {
			next.index.insert(node.cache_name().to_string(), node);
		}

		log::debug!("replaced cache overlay {:?} with {:?}", cache_name, new_root.cache_name());
		self.forest.store(Arc::new(next));
		Ok(())
	}

	/// Resolves an overlay, root or nested, by its composite cache name.
	pub fn lookup(&self, cache_name: &str) -> Result<Arc<CacheOverlay>, RegistryError> {
		self
			.forest
			.load()
			.index
			.get(cache_name)
			.cloned()
			.ok_or_else(|| RegistryError::NotFound(cache_name.to_string()))
	}

	/// Toggles a single overlay's enabled flag.
	///
	/// No cascade: parents and children are untouched. An unknown name fails with
	/// [`RegistryError::NotFound`] and alters nothing.
	pub fn set_enabled(&self, cache_name: &str, enabled: bool) -> Result<(), RegistryError> {
		let node = self.lookup(cache_name)?;
		node.set_enabled(enabled);
		log::trace!("cache overlay {:?} enabled = {}", cache_name, enabled);
		Ok(())
	}

	/// Iterates the root overlays in registration order.
	///
	/// The iterator holds one snapshot: it is finite, restartable by calling
	/// `roots()` again, and stable across repeated calls without intervening
	/// structural mutation.
	pub fn roots(&self) -> RootsIter {
		RootsIter {
			forest: self.forest.load_full(),
			position: 0,
		}
	}

	/// Depth-first iteration over every overlay in the forest, roots in
	/// registration order, each followed by its subtree.
	pub fn iter(&self) -> ForestIter {
		let forest = self.forest.load_full();
		let stack = forest.roots.iter().rev().cloned().collect();
		ForestIter { _forest: forest, stack }
	}

	/// Number of overlays in the forest, nested nodes included.
	pub fn len(&self) -> usize {
		self.forest.load().index.len()
	}

	pub fn is_empty(&self) -> bool {
		self.forest.load().index.is_empty()
	}

	/// Reconciles a persisted `cache name → enabled` set against the live forest.
	///
	/// Applies each entry via lookup + toggle and returns how many matched.
	/// Entries with no live node are stale caches and are dropped silently apart
	/// from a debug log line.
	pub fn apply_enabled_states<'a, I>(&self, entries: I) -> usize
	where
		I: IntoIterator<Item = (&'a str, bool)>,
	{
		let mut applied = 0;
		for (cache_name, enabled) in entries {
			match self.set_enabled(cache_name, enabled) {
				Ok(()) => applied += 1,
				Err(_) => log::debug!("dropping stale enabled-cache entry {:?}", cache_name),
			}
		}
		applied
	}
}

/// Snapshot iterator over root overlays. See [`CacheRegistry::roots`].
pub struct RootsIter {
	forest: Arc<Forest>,
	position: usize,
}

impl Iterator for RootsIter {
	type Item = Arc<CacheOverlay>;

	fn next(&mut self) -> Option<Self::Item> {
		let root = self.forest.roots.get(self.position)?;
		self.position += 1;
		Some(Arc::clone(root))
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		let remaining = self.forest.roots.len() - self.position;
		(remaining, Some(remaining))
	}
}

impl ExactSizeIterator for RootsIter {}

/// Snapshot iterator over the whole forest. See [`CacheRegistry::iter`].
pub struct ForestIter {
	// Keeps the snapshot alive while the walk borrows nothing from it.
	_forest: Arc<Forest>,
	stack: Vec<Arc<CacheOverlay>>,
}

impl Iterator for ForestIter {
	type Item = Arc<CacheOverlay>;

	fn next(&mut self) -> Option<Self::Item> {
		let node = self.stack.pop()?;
		self.stack.extend(node.children().iter().rev().cloned());
		Some(node)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{CacheType, FeatureLayerMeta, GeoPackageMeta, GeometryKind, TileScheme, TiledMeta};
	use std::path::PathBuf;

	fn geopackage_with_children(name: &str, children: &[&str]) -> CacheOverlay {
		let mut pack = CacheOverlay::new_geopackage(name, GeoPackageMeta::new(PathBuf::from(format!("/data/{name}.gpkg"))));
		for child in children {
			pack
				.attach_child(CacheOverlay::new_feature_layer(
					*child,
					FeatureLayerMeta::new(5, GeometryKind::Polygon),
				))
				.unwrap();
		}
		pack
	}

	fn tiled(name: &str) -> CacheOverlay {
		CacheOverlay::new_tiled(name, TiledMeta::new(TileScheme::Xyz, "https://t.example.org/{z}/{x}/{y}.png", 0, 8))
	}

	#[test]
	fn add_and_lookup_nested() {
		let registry = CacheRegistry::new();
		registry.add(geopackage_with_children("A", &["X"])).unwrap();

		let child = registry.lookup("A/X").unwrap();
		assert_eq!(child.name(), "X");
		assert_eq!(child.cache_type(), CacheType::FeatureLayer);
		assert_eq!(registry.len(), 2);
	}

	#[test]
	fn duplicate_root_name_is_rejected_without_partial_insert() {
		let registry = CacheRegistry::new();
		registry.add(geopackage_with_children("A", &["X"])).unwrap();

		let err = registry.add(geopackage_with_children("A", &["Y"])).unwrap_err();
		assert_eq!(err, RegistryError::DuplicateName("A".to_string()));
		assert_eq!(registry.len(), 2);
		assert!(registry.lookup("A/Y").is_err());
	}

	#[test]
	fn duplicate_nested_name_is_rejected() {
		let registry = CacheRegistry::new();
		registry.add(geopackage_with_children("A", &["X"])).unwrap();

		// A root whose composite child name collides with an existing nested name.
		let err = registry
			.add(geopackage_with_children("A", &["X"]))
			.unwrap_err();
		assert!(matches!(err, RegistryError::DuplicateName(_)));

		// A root named like an existing composite name.
		let err = registry.add(tiled("A/X")).unwrap_err();
		assert_eq!(err, RegistryError::DuplicateName("A/X".to_string()));
	}

	#[test]
	fn explicit_cache_name_collisions_are_rejected() {
		let registry = CacheRegistry::new();
		registry.add(tiled("t")).unwrap();
		let clash = CacheOverlay::with_cache_name(
			"other",
			"t",
			crate::CacheKind::Tiled(TiledMeta::new(TileScheme::Tms, "https://x", 0, 1)),
		);
		assert!(matches!(registry.add(clash), Err(RegistryError::DuplicateName(_))));
	}

	#[test]
	fn remove_drops_whole_subtree() {
		let registry = CacheRegistry::new();
		registry.add(geopackage_with_children("A", &["X", "Y"])).unwrap();
		registry.add(tiled("B")).unwrap();

		let removed = registry.remove("A").unwrap();
		assert_eq!(removed.cache_name(), "A");
		assert!(registry.lookup("A/X").is_err());
		assert_eq!(registry.len(), 1);

		// Nested names are not root-removable.
		registry.add(geopackage_with_children("C", &["Z"])).unwrap();
		assert_eq!(
			registry.remove("C/Z").unwrap_err(),
			RegistryError::NotFound("C/Z".to_string())
		);
	}

	#[test]
	fn set_enabled_unknown_name_changes_nothing() {
		let registry = CacheRegistry::new();
		registry.add(geopackage_with_children("A", &["X"])).unwrap();
		registry.set_enabled("A/X", true).unwrap();

		let err = registry.set_enabled("A/GONE", true).unwrap_err();
		assert_eq!(err, RegistryError::NotFound("A/GONE".to_string()));
		assert!(registry.lookup("A/X").unwrap().enabled());
		assert!(!registry.lookup("A").unwrap().enabled());
	}

	#[test]
	fn no_cascade_between_container_and_children() {
		let registry = CacheRegistry::new();
		registry.add(geopackage_with_children("A", &["X"])).unwrap();

		registry.set_enabled("A/X", true).unwrap();
		registry.set_enabled("A", false).unwrap();
		assert!(registry.lookup("A/X").unwrap().enabled());
	}

	#[test]
	fn roots_iterates_in_registration_order_and_restarts() {
		let registry = CacheRegistry::new();
		registry.add(geopackage_with_children("A", &[])).unwrap();
		registry.add(tiled("B")).unwrap();

		let names = |iter: RootsIter| iter.map(|r| r.cache_name().to_string()).collect::<Vec<_>>();
		assert_eq!(names(registry.roots()), ["A", "B"]);
		assert_eq!(names(registry.roots()), ["A", "B"]);
		assert_eq!(registry.roots().len(), 2);
	}

	#[test]
	fn forest_iter_is_depth_first() {
		let registry = CacheRegistry::new();
		registry.add(geopackage_with_children("A", &["X", "Y"])).unwrap();
		registry.add(tiled("B")).unwrap();

		let names: Vec<String> = registry.iter().map(|n| n.cache_name().to_string()).collect();
		assert_eq!(names, ["A", "A/X", "A/Y", "B"]);
	}

	#[test]
	fn replace_swaps_subtree_and_keeps_order() {
		let registry = CacheRegistry::new();
		registry.add(geopackage_with_children("A", &["X"])).unwrap();
		registry.add(tiled("B")).unwrap();

		registry.replace("A", geopackage_with_children("A", &["Y", "Z"])).unwrap();
		assert!(registry.lookup("A/X").is_err());
		assert!(registry.lookup("A/Y").is_ok());
		assert_eq!(
			registry.roots().map(|r| r.cache_name().to_string()).collect::<Vec<_>>(),
			["A", "B"]
		);

		// Collision with a name outside the outgoing subtree is rejected.
		let err = registry.replace("A", tiled("B")).unwrap_err();
		assert_eq!(err, RegistryError::DuplicateName("B".to_string()));
		assert!(registry.lookup("A/Y").is_ok());

		// Unknown and non-root names are not replaceable.
		assert!(matches!(
			registry.replace("A/Y", tiled("W")),
			Err(RegistryError::NotFound(_))
		));
	}

	#[test]
	fn apply_enabled_states_skips_stale_entries() {
		let registry = CacheRegistry::new();
		registry.add(geopackage_with_children("A", &["X"])).unwrap();

		let applied = registry.apply_enabled_states([("A/X", true), ("A", true), ("STALE", true)]);
		assert_eq!(applied, 2);
		assert!(registry.lookup("A/X").unwrap().enabled());
		assert!(registry.lookup("A").unwrap().enabled());
	}
}
