//! Binding name resolution.
//!
//! Binding names become file names, so they should describe the collection
//! rather than its position in the definition. Resolution is a pure function
//! of the handle: the same handle always yields the same name.
//!
//! Two bindings may resolve to the same name (for example two handles over
//! the same store collection). Nothing here detects that; both bindings then
//! share one fixture file.

use crate::collection::DocumentCollection;

/// Returns the most descriptive name a collection exposes.
///
/// Priority: the handle's display name, then its store collection name, then
/// the store collection name of the handle it wraps.
pub fn discover_name(collection: &dyn DocumentCollection) -> Option<&str> {
	let named = |name: &&str| !name.is_empty();
	collection
		.display_name()
		.filter(named)
		.or_else(|| collection.collection_name().filter(named))
		.or_else(|| {
			collection
				.inner()
				.and_then(|inner| inner.collection_name())
				.filter(named)
		})
}

/// Positional name used when a collection exposes no name of its own.
///
/// Already scoped to the fixture: `"{fixture}.{key}[{index}]"`.
pub fn fallback_name(fixture: &str, key: &str, index: usize) -> String {
	format!("{}.{}[{}]", fixture, key, index)
}

/// Resolves the fixture-scoped binding name for `collection`.
///
/// A discovered name is prefixed with the fixture name. The fallback is
/// returned as given, since [`fallback_name`] already carries the prefix.
///
/// # Example
///
/// ```rust,ignore
/// let name = resolve_name("users", accounts.as_ref(), &fallback_name("users", "user_name", 0));
/// assert_eq!(name, "users.accounts");
/// ```
pub fn resolve_name(fixture: &str, collection: &dyn DocumentCollection, fallback: &str) -> String {
	match discover_name(collection) {
		Some(discovered) => format!("{}.{}", fixture, discovered),
		None => fallback.to_string(),
	}
}
