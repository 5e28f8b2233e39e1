//! End-to-end fixture scenarios against in-memory collections.

mod common;

use std::sync::Arc;
use std::time::{Duration, Instant};

use bson::{Bson, Document, doc};
use common::{MemoryCollection, handle};
use fixtura_core::{
	CollectionHandle, Fixture, FixtureDefinition, FixtureError, FixtureParser, FixtureRegistry,
	FixtureSerializer, Named,
};
use indexmap::IndexMap;
use rstest::{fixture, rstest};
use serde_json::json;
use tempfile::{TempDir, tempdir};

fn user(name: &str, age: i32) -> Document {
	doc! { "_id": format!("u-{}", name), "user_name": name, "age": age }
}

fn setting(name: &str, theme: &str) -> Document {
	doc! { "_id": format!("s-{}", name), "user_name": name, "theme": theme }
}

#[fixture]
fn fixture_dir() -> TempDir {
	tempdir().unwrap()
}

#[fixture]
fn users() -> Arc<MemoryCollection> {
	MemoryCollection::new("users")
		.with_documents(vec![user("alan", 41), user("neil", 38), user("grace", 85)])
		.into_handle()
}

#[fixture]
fn settings() -> Arc<MemoryCollection> {
	MemoryCollection::new("settings")
		.with_documents(vec![setting("alan", "dark"), setting("grace", "light")])
		.into_handle()
}

#[rstest]
#[tokio::test]
async fn test_get_writes_one_file_per_binding(
	fixture_dir: TempDir,
	users: Arc<MemoryCollection>,
	settings: Arc<MemoryCollection>,
) {
	let fixture = Fixture::builder("users")
		.bind_all(
			"user_name",
			[
				Named::handle("UserColl", handle(&users)),
				Named::handle("SettingsColl", handle(&settings)),
			],
		)
		.keys(["alan", "neil"])
		.path(fixture_dir.path())
		.build()
		.unwrap();

	let written = fixture.get().await.unwrap();

	// 2 users + 1 settings document match
	assert_eq!(written, 3);

	let expected_query = doc! { "user_name": { "$in": ["alan", "neil"] } };
	assert_eq!(users.finds(), vec![expected_query.clone()]);
	assert_eq!(settings.finds(), vec![expected_query]);

	let user_file = fixture_dir.path().join("users.UserColl.json");
	let settings_file = fixture_dir.path().join("users.SettingsColl.json");
	assert_eq!(fixture.binding_paths(), vec![user_file.clone(), settings_file.clone()]);

	let parser = FixtureParser::new();
	assert_eq!(
		parser.parse_file(&user_file).await.unwrap(),
		vec![user("alan", 41), user("neil", 38)]
	);
	assert_eq!(
		parser.parse_file(&settings_file).await.unwrap(),
		vec![setting("alan", "dark")]
	);
}

#[rstest]
#[tokio::test]
async fn test_load_saves_every_document(fixture_dir: TempDir) {
	let accounts = MemoryCollection::new("accounts").into_handle();
	let audit = MemoryCollection::new("audit").into_handle();
	let fixture = Fixture::builder("users")
		.bind("user_name", handle(&accounts))
		.bind("owner", handle(&audit))
		.path(fixture_dir.path())
		.build()
		.unwrap();

	let serializer = FixtureSerializer::new();
	let three: Vec<_> = (0..3).map(|i| doc! { "_id": i, "user_name": "alan" }).collect();
	let four: Vec<_> = (0..4).map(|i| doc! { "_id": i, "owner": "neil" }).collect();
	serializer
		.write_to_file(&three, &fixture_dir.path().join("users.accounts.json"))
		.await
		.unwrap();
	serializer
		.write_to_file(&four, &fixture_dir.path().join("users.audit.json"))
		.await
		.unwrap();

	let saved = fixture.load().await.unwrap();

	assert_eq!(saved, 7);
	assert_eq!(accounts.saves().len(), 3);
	assert_eq!(audit.saves().len(), 4);
	assert_eq!(accounts.documents().len(), 3);
}

#[rstest]
#[tokio::test]
async fn test_load_counts_only_acknowledged_saves(fixture_dir: TempDir) {
	let acknowledged = MemoryCollection::new("accounts").into_handle();
	let silent = MemoryCollection::new("audit").unacknowledged().into_handle();
	let fixture = Fixture::builder("users")
		.bind_all("user_name", [handle(&acknowledged), handle(&silent)])
		.path(fixture_dir.path())
		.build()
		.unwrap();

	let documents = vec![doc! { "user_name": "alan" }, doc! { "user_name": "neil" }];
	for path in fixture.binding_paths() {
		FixtureSerializer::new()
			.write_to_file(&documents, &path)
			.await
			.unwrap();
	}

	assert_eq!(fixture.load().await.unwrap(), 2);
	assert_eq!(silent.saves().len(), 2);
}

#[rstest]
#[tokio::test]
async fn test_load_skips_null_acknowledgements(fixture_dir: TempDir) {
	let acknowledged = MemoryCollection::new("accounts").into_handle();
	let nulls = MemoryCollection::new("audit").with_null_acks().into_handle();
	let fixture = Fixture::builder("users")
		.bind_all("user_name", [handle(&acknowledged), handle(&nulls)])
		.path(fixture_dir.path())
		.build()
		.unwrap();

	let documents = vec![doc! { "user_name": "alan" }, doc! { "user_name": "neil" }];
	for path in fixture.binding_paths() {
		FixtureSerializer::new()
			.write_to_file(&documents, &path)
			.await
			.unwrap();
	}

	assert_eq!(fixture.load().await.unwrap(), 2);
	assert_eq!(nulls.saves().len(), 2);
}

#[rstest]
#[tokio::test]
async fn test_load_runs_bindings_and_saves_concurrently(fixture_dir: TempDir) {
	let delay = Duration::from_millis(200);
	let accounts = MemoryCollection::new("accounts")
		.with_save_delay(delay)
		.into_handle();
	let settings = MemoryCollection::new("settings")
		.with_save_delay(delay)
		.into_handle();
	let fixture = Fixture::builder("users")
		.bind_all("user_name", [handle(&accounts), handle(&settings)])
		.path(fixture_dir.path())
		.build()
		.unwrap();

	let documents: Vec<_> = (0..5).map(|i| doc! { "_id": i, "user_name": "alan" }).collect();
	for path in fixture.binding_paths() {
		FixtureSerializer::new()
			.write_to_file(&documents, &path)
			.await
			.unwrap();
	}

	let started = Instant::now();
	let saved = fixture.load().await.unwrap();
	let elapsed = started.elapsed();

	// Ten saves of 200ms each take 2s when run one after another.
	assert_eq!(saved, 10);
	assert!(elapsed < Duration::from_secs(1), "load took {:?}", elapsed);
	assert_eq!(accounts.saves().len(), 5);
	assert_eq!(settings.saves().len(), 5);
}

#[rstest]
#[tokio::test]
async fn test_clear_sums_reported_counts() {
	let accounts = MemoryCollection::new("accounts")
		.with_reported_removals(2)
		.into_handle();
	let settings = MemoryCollection::new("settings")
		.with_reported_removals(3)
		.into_handle();
	let fixture = Fixture::builder("users")
		.bind_all("user_name", [handle(&accounts), handle(&settings)])
		.keys(["alan"])
		.build()
		.unwrap();

	assert_eq!(fixture.clear().await.unwrap(), 5);

	let expected_query = doc! { "user_name": { "$in": ["alan"] } };
	assert_eq!(accounts.removes(), vec![expected_query.clone()]);
	assert_eq!(settings.removes(), vec![expected_query]);
}

#[rstest]
#[tokio::test]
async fn test_clear_removes_matching_documents(
	users: Arc<MemoryCollection>,
	settings: Arc<MemoryCollection>,
) {
	let fixture = Fixture::builder("users")
		.bind_all("user_name", [handle(&users), handle(&settings)])
		.keys(["alan", "neil"])
		.build()
		.unwrap();

	assert_eq!(fixture.clear().await.unwrap(), 3);
	assert_eq!(users.documents(), vec![user("grace", 85)]);
	assert_eq!(settings.documents(), vec![setting("grace", "light")]);
}

#[rstest]
#[tokio::test]
async fn test_get_clear_load_restores_documents(
	fixture_dir: TempDir,
	users: Arc<MemoryCollection>,
) {
	let fixture = Fixture::builder("users")
		.bind("user_name", handle(&users))
		.keys(["alan", "neil"])
		.path(fixture_dir.path())
		.build()
		.unwrap();

	assert_eq!(fixture.get().await.unwrap(), 2);
	assert_eq!(fixture.clear().await.unwrap(), 2);
	assert_eq!(users.documents(), vec![user("grace", 85)]);

	assert_eq!(fixture.load().await.unwrap(), 2);
	let mut restored = users.documents();
	restored.sort_by_key(|document| document.get_str("_id").unwrap_or_default().to_string());
	assert_eq!(restored, vec![user("alan", 41), user("grace", 85), user("neil", 38)]);
}

#[rstest]
#[tokio::test]
async fn test_empty_keys_match_nothing(fixture_dir: TempDir, users: Arc<MemoryCollection>) {
	let fixture = Fixture::builder("users")
		.bind("user_name", handle(&users))
		.path(fixture_dir.path())
		.build()
		.unwrap();

	assert_eq!(fixture.get().await.unwrap(), 0);
	assert_eq!(users.finds(), vec![doc! { "user_name": { "$in": [] } }]);

	let written = FixtureParser::new()
		.parse_file(&fixture_dir.path().join("users.users.json"))
		.await
		.unwrap();
	assert!(written.is_empty());

	assert_eq!(fixture.clear().await.unwrap(), 0);
	assert_eq!(users.documents().len(), 3);
}

#[rstest]
#[tokio::test]
async fn test_load_missing_file_fails(fixture_dir: TempDir) {
	let accounts = MemoryCollection::new("accounts").into_handle();
	let fixture = Fixture::builder("users")
		.bind("user_name", handle(&accounts))
		.path(fixture_dir.path())
		.build()
		.unwrap();

	let err = fixture.load().await.unwrap_err();
	assert!(matches!(err, FixtureError::FileNotFound(_)));
	assert!(accounts.saves().is_empty());
}

#[rstest]
#[tokio::test]
async fn test_load_malformed_file_fails(fixture_dir: TempDir) {
	let accounts = MemoryCollection::new("accounts").into_handle();
	let fixture = Fixture::builder("users")
		.bind("user_name", handle(&accounts))
		.path(fixture_dir.path())
		.build()
		.unwrap();
	std::fs::write(fixture_dir.path().join("users.accounts.json"), "{ not json").unwrap();

	let err = fixture.load().await.unwrap_err();
	assert!(matches!(err, FixtureError::Parse { .. }));
}

#[rstest]
#[tokio::test]
async fn test_upstream_failure_names_binding(
	fixture_dir: TempDir,
	users: Arc<MemoryCollection>,
) {
	let broken = MemoryCollection::new("broken").failing().into_handle();
	let fixture = Fixture::builder("users")
		.bind_all("user_name", [handle(&users), handle(&broken)])
		.keys(["alan"])
		.path(fixture_dir.path())
		.build()
		.unwrap();

	match fixture.get().await {
		Err(FixtureError::Upstream { binding, .. }) => assert_eq!(binding, "users.broken"),
		other => panic!("Expected UpstreamError, got {:?}", other),
	}
}

#[rstest]
#[tokio::test]
async fn test_started_tasks_finish_after_failure(fixture_dir: TempDir) {
	let slow = MemoryCollection::new("slow")
		.with_save_delay(Duration::from_millis(50))
		.into_handle();
	let missing = MemoryCollection::new("missing").into_handle();
	let fixture = Fixture::builder("users")
		.bind("user_name", handle(&slow))
		.bind("user_name", handle(&missing))
		.path(fixture_dir.path())
		.build()
		.unwrap();

	let documents: Vec<_> = (0..5).map(|i| doc! { "_id": i }).collect();
	FixtureSerializer::new()
		.write_to_file(&documents, &fixture_dir.path().join("users.slow.json"))
		.await
		.unwrap();

	let err = fixture.load().await.unwrap_err();
	assert!(matches!(err, FixtureError::FileNotFound(_)));

	tokio::time::sleep(Duration::from_millis(500)).await;
	assert_eq!(slow.saves().len(), 5);
}

#[rstest]
fn test_duplicate_registration_fails_before_any_operation(users: Arc<MemoryCollection>) {
	let registry = FixtureRegistry::new();
	let first = Fixture::builder("users")
		.bind("user_name", handle(&users))
		.build()
		.unwrap();
	let second = Fixture::builder("users")
		.bind("user_name", handle(&users))
		.build()
		.unwrap();

	registry.register(first).unwrap();
	assert!(matches!(
		registry.register(second),
		Err(FixtureError::Registry(_))
	));
	assert!(users.finds().is_empty());
	assert!(users.saves().is_empty());
	assert!(users.removes().is_empty());
}

#[rstest]
#[tokio::test]
async fn test_registry_runs_fixtures_in_order(
	fixture_dir: TempDir,
	users: Arc<MemoryCollection>,
	settings: Arc<MemoryCollection>,
) {
	let registry = FixtureRegistry::new();
	registry
		.register_all([
			Fixture::builder("people")
				.bind("user_name", handle(&users))
				.keys(["grace"])
				.path(fixture_dir.path())
				.build()
				.unwrap(),
			Fixture::builder("prefs")
				.bind("user_name", handle(&settings))
				.keys(["alan", "grace"])
				.path(fixture_dir.path())
				.build()
				.unwrap(),
		])
		.unwrap();

	let summary = registry.get_all().await.unwrap();
	assert_eq!(
		summary.counts,
		vec![("people".to_string(), 1), ("prefs".to_string(), 2)]
	);
	assert_eq!(summary.total(), 3);
	assert!(fixture_dir.path().join("people.users.json").exists());
	assert!(fixture_dir.path().join("prefs.settings.json").exists());
}

#[rstest]
#[tokio::test]
async fn test_declarative_definition(
	fixture_dir: TempDir,
	users: Arc<MemoryCollection>,
	settings: Arc<MemoryCollection>,
) {
	let mut collections: IndexMap<String, CollectionHandle> = IndexMap::new();
	collections.insert("users".to_string(), handle(&users));
	collections.insert("settings".to_string(), handle(&settings));

	let value = json!({
		"name": "users",
		"collections": { "user_name": ["users", "settings"] },
		"keys": ["grace"],
		"path": fixture_dir.path().to_string_lossy(),
	});

	let definition = FixtureDefinition::from_value(&value, &collections).unwrap();
	let fixture = Fixture::new(definition).unwrap();

	assert_eq!(fixture.keys(), &[Bson::from("grace")]);
	assert_eq!(fixture.get().await.unwrap(), 2);
	assert!(fixture_dir.path().join("users.users.json").exists());
	assert!(fixture_dir.path().join("users.settings.json").exists());
}

#[rstest]
#[tokio::test]
async fn test_anonymous_collections_use_positional_names(fixture_dir: TempDir) {
	let first = MemoryCollection::anonymous().into_handle();
	let second = MemoryCollection::anonymous().into_handle();
	let fixture = Fixture::builder("users")
		.bind_all("user_name", [handle(&first), handle(&second)])
		.path(fixture_dir.path())
		.build()
		.unwrap();

	fixture.get().await.unwrap();
	assert!(fixture_dir.path().join("users.user_name[0].json").exists());
	assert!(fixture_dir.path().join("users.user_name[1].json").exists());
}
