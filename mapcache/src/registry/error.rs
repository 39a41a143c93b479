//! Registry error types.
//!
//! Registry operations fail in exactly two ways, and callers branch on which:
//! a loader resolves a [`RegistryError::DuplicateName`] itself (skip or rename,
//! never auto-renamed here), while reconciliation against persisted state treats
//! [`RegistryError::NotFound`] as a stale entry and moves on.

use std::fmt::Display;

/// Failure of a cache registry operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
	/// The cache name is already taken somewhere in the forest.
	DuplicateName(String),
	/// No overlay with the given cache name exists.
	NotFound(String),
}

impl Display for RegistryError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			RegistryError::DuplicateName(name) => write!(f, "cache name {name:?} already exists in the forest"),
			RegistryError::NotFound(name) => write!(f, "no cache overlay named {name:?}"),
		}
	}
}

impl std::error::Error for RegistryError {}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn messages_carry_the_offending_name() {
		assert!(RegistryError::DuplicateName("a/b".to_string()).to_string().contains("a/b"));
		assert!(RegistryError::NotFound("gone".to_string()).to_string().contains("gone"));
	}

	#[test]
	fn interoperates_with_anyhow() {
		let err: anyhow::Error = RegistryError::NotFound("x".to_string()).into();
		assert!(err.downcast_ref::<RegistryError>().is_some());
	}
}
