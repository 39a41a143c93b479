//! Composite cache names.
//!
//! Every overlay in the forest is addressable by a single string key, its *cache name*.
//! A root overlay's cache name is its own name; a child's cache name is derived by
//! joining the parent's cache name and the child's name with [`CACHE_NAME_SEPARATOR`].
//!
//! The separator is reserved: raw overlay names must not contain it. Loaders are
//! responsible for rejecting or escaping such names before constructing overlays;
//! [`validate_raw_name`] is the check they should apply. Under that precondition,
//! composite names are reconstructable by string inspection alone, which is what
//! allows the registry to resolve any node without walking the tree and allows a
//! persisted enabled-cache list to be matched against live overlays purely by key.
//!
//! # Examples
//!
//! ```
//! use mapcache::{build_child_cache_name, split_cache_name};
//!
//! let child = build_child_cache_name("countries", "rivers");
//! assert_eq!(child, "countries/rivers");
//! assert_eq!(split_cache_name(&child), Some(("countries", "rivers")));
//! ```

use anyhow::{Result, ensure};

/// Reserved delimiter between a parent cache name and a child name.
pub const CACHE_NAME_SEPARATOR: char = '/';

/// Builds the composite cache name of a child overlay.
///
/// This is the only sanctioned way to derive a child's cache name. It is pure and
/// deterministic: the same `(parent, child)` pair always yields the same key.
///
/// # Examples
///
/// ```
/// use mapcache::build_child_cache_name;
///
/// assert_eq!(build_child_cache_name("pack", "roads"), "pack/roads");
/// assert_eq!(build_child_cache_name("pack/roads", "minor"), "pack/roads/minor");
/// ```
pub fn build_child_cache_name(parent_cache_name: &str, child_name: &str) -> String {
	format!("{parent_cache_name}{CACHE_NAME_SEPARATOR}{child_name}")
}

/// Splits a composite cache name into `(parent_cache_name, child_name)`.
///
/// Splits on the **last** separator occurrence, so the result inverts
/// [`build_child_cache_name`] for any child name free of separators, even when the
/// parent cache name is itself composite. Returns `None` for root cache names.
pub fn split_cache_name(cache_name: &str) -> Option<(&str, &str)> {
	cache_name.rsplit_once(CACHE_NAME_SEPARATOR)
}

/// Checks that a raw overlay name does not contain the reserved separator.
///
/// Loaders must apply this check before constructing overlays; the forest itself
/// assumes the precondition holds.
pub fn validate_raw_name(name: &str) -> Result<()> {
	ensure!(
		!name.contains(CACHE_NAME_SEPARATOR),
		"overlay name {name:?} must not contain the reserved separator {CACHE_NAME_SEPARATOR:?}"
	);
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("pack", "roads")]
	#[case("pack/roads", "minor")]
	#[case("", "roads")]
	#[case("pack", "")]
	#[case("Straßen", "flüsse")]
	#[case("地図", "道路")]
	fn build_and_split_round_trip(#[case] parent: &str, #[case] child: &str) {
		let composite = build_child_cache_name(parent, child);
		assert_eq!(split_cache_name(&composite), Some((parent, child)));
	}

	#[test]
	fn build_is_deterministic() {
		assert_eq!(
			build_child_cache_name("a", "b"),
			build_child_cache_name("a", "b")
		);
	}

	#[test]
	fn split_of_root_name_is_none() {
		assert_eq!(split_cache_name("pack"), None);
		assert_eq!(split_cache_name(""), None);
	}

	#[test]
	fn raw_name_validation() {
		assert!(validate_raw_name("roads").is_ok());
		assert!(validate_raw_name("道路").is_ok());
		assert!(validate_raw_name("").is_ok());
		assert!(validate_raw_name("roads/minor").is_err());
	}
}
