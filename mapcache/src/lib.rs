//! mapcache: a registry for heterogeneous, nestable offline map cache overlays.
//!
//! Offline map data comes in very different shapes: packaged container databases
//! holding many sub-layers, network-addressed tile pyramids, plain feature
//! layers. A map renderer and a cache list UI still want one uniform view, a
//! forest of named, typed, enable-able nodes. This crate models exactly that view:
//! - [`CacheOverlay`]: one node, with a display name, a globally unique composite
//!   cache name, a closed [`CacheKind`] variant payload, an enabled flag, and an
//!   ordered child list (containers only),
//! - [`CacheRegistry`]: the forest manager, resolving any node by cache name,
//!   enforcing forest-wide name uniqueness, and publishing structural changes as
//!   atomic snapshot swaps so concurrent readers never see a half-built tree,
//! - [`build_child_cache_name`]: the deterministic naming rule loaders use to
//!   derive composite names.
//!
//! Actual data access (opening packages, fetching tiles, decoding geometry) is
//! delegated to backend-specific collaborators. This crate only models identity,
//! grouping, enablement, and descriptive metadata.
//!
//! # Quick start
//! ```
//! use mapcache::*;
//!
//! let registry = CacheRegistry::new();
//!
//! // A loader opened a packaged database and found one tile layer inside.
//! let mut pack = CacheOverlay::new_geopackage("survey", GeoPackageMeta::new("/data/survey.gpkg".into()));
//! pack
//! 	.attach_child(CacheOverlay::new_tiled(
//! 		"imagery",
//! 		TiledMeta::new(TileScheme::Xyz, "file:///tiles/{z}/{x}/{y}.png", 0, 14),
//! 	))
//! 	.unwrap();
//! registry.add(pack).unwrap();
//!
//! // The UI toggles the nested layer by its composite name.
//! registry.set_enabled("survey/imagery", true).unwrap();
//!
//! // The renderer walks the forest read-only.
//! for overlay in registry.iter() {
//! 	println!("{} enabled={}", overlay.cache_name(), overlay.enabled());
//! }
//! ```

mod naming;
/// Re-exports the composite naming rule and its helpers.
pub use naming::*;

mod overlay;
/// Re-exports the overlay node, variant payloads, and type tags.
pub use overlay::*;

mod registry;
/// Re-exports the forest registry and its error type.
pub use registry::*;
