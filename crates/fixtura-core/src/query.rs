//! Fixture query construction.
//!
//! Queries are built as BSON documents, never as strings, so key values
//! cannot change the shape of the predicate.

use bson::{Bson, Document};

/// Set-membership operator used for fixture queries.
pub const IN_OPERATOR: &str = "$in";

/// Builds the predicate "field `key` equals one of `values`".
///
/// An empty `values` slice produces `{ key: { "$in": [] } }`, which matches
/// no document.
///
/// # Example
///
/// ```
/// # use fixtura_core::query::build_query;
/// # use bson::{Bson, doc};
/// let query = build_query("user_name", &[Bson::from("alan"), Bson::from("neil")]);
/// assert_eq!(query, doc! { "user_name": { "$in": ["alan", "neil"] } });
/// ```
pub fn build_query(key: &str, values: &[Bson]) -> Document {
	let mut condition = Document::new();
	condition.insert(IN_OPERATOR, values.to_vec());

	let mut query = Document::new();
	query.insert(key, condition);
	query
}

/// Evaluates a predicate produced by [`build_query`] against a document.
///
/// Only the `{ field: { "$in": [...] } }` shape is understood; dotted field
/// paths descend into embedded documents and array fields match when any
/// element is a member. Any other predicate shape never matches.
pub fn matches(filter: &Document, document: &Document) -> bool {
	filter.iter().all(|(field, condition)| {
		let Some(values) = condition
			.as_document()
			.and_then(|condition| condition.get_array(IN_OPERATOR).ok())
		else {
			return false;
		};

		match lookup(document, field) {
			Some(Bson::Array(items)) => items.iter().any(|item| values.contains(item)),
			Some(value) => values.contains(value),
			None => false,
		}
	})
}

fn lookup<'a>(document: &'a Document, path: &str) -> Option<&'a Bson> {
	let mut segments = path.split('.');
	let mut current = document.get(segments.next()?)?;
	for segment in segments {
		current = current.as_document()?.get(segment)?;
	}
	Some(current)
}
