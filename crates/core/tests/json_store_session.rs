use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use dbs::store::{self, JSON_FILE_DRIVER, JsonStoreBackend, JsonStoreDelegate, MEMORY_DRIVER};
use dbs::{DatabaseConfig, DatabaseProfile, ManualClock, SessionConfig, SessionedCrudDelegate};
use tempfile::TempDir;

fn delegate(config: DatabaseConfig, clock: &ManualClock) -> JsonStoreDelegate {
	let session = SessionConfig::from_config(&config, "shop");
	SessionedCrudDelegate::new(session, JsonStoreBackend)
		.with_manager(Arc::new(store::manager(config)))
		.with_clock(Arc::new(clock.clone()))
}

fn memory_config(expiry_secs: u64) -> DatabaseConfig {
	let mut config = DatabaseConfig {
		session_expiry_secs: expiry_secs,
		..DatabaseConfig::default()
	};
	config.insert_profile("shop", DatabaseProfile::new("qa", MEMORY_DRIVER).with_location("shop-qa"));
	config.insert_profile("shop", DatabaseProfile::new("staging", MEMORY_DRIVER));
	config
}

#[test]
fn memory_data_survives_expiry_reconnect() -> Result<()> {
	let clock = ManualClock::new(0);
	let mut db = delegate(memory_config(60), &clock);

	db.set_active_profile("qa")?;
	db.create("users", "")?;
	db.insert("users", r#"{"id":1,"name":"Ada"}"#)?;

	clock.advance(Duration::from_secs(61));
	assert!(db.is_session_expired());

	let doc = db.read_as_document("users", r#"{"id":1}"#)?;
	assert_eq!(doc.read::<String>("/0/name")?, "Ada");

	let stats = db.stats();
	assert_eq!(stats.authentications, 2);
	assert_eq!(stats.expirations, 1);
	assert_eq!(stats.disconnects, 1);
	Ok(())
}

#[test]
fn profiles_address_separate_stores() -> Result<()> {
	let clock = ManualClock::new(0);
	let mut db = delegate(memory_config(300), &clock);

	db.set_active_profile("qa")?;
	db.create("orders", "")?;
	db.insert_batch("orders", &[r#"{"id":1}"#.to_string(), r#"{"id":2}"#.to_string()])?;

	db.set_active_profile("staging")?;
	assert!(matches!(db.read_as_json("orders", ""), Err(dbs::Error::EntityNotFound(_))));

	db.set_active_profile("qa")?;
	assert_eq!(db.read_as_document("orders", "")?.len(), 2);
	assert_eq!(db.stats().authentications, 3);
	Ok(())
}

#[test]
fn json_file_store_persists_across_delegates() -> Result<()> {
	let tmp = TempDir::new()?;
	let path = tmp.path().join("qa.json");
	let mut config = DatabaseConfig::default();
	config.insert_profile("shop", DatabaseProfile::new("qa", JSON_FILE_DRIVER).with_location(path.to_string_lossy()));
	let clock = ManualClock::new(0);

	{
		let mut db = delegate(config.clone(), &clock);
		db.set_active_profile("qa")?;
		db.create("users", "")?;
		db.insert("users", r#"{"id":1,"role":"admin"}"#)?;
		db.insert("users", r#"{"id":2,"role":"dev"}"#)?;
		assert_eq!(db.update("users", r#"{"filter":{"role":"dev"},"set":{"role":"admin"}}"#)?, 1);
		db.disconnect()?;
	}

	let mut db = delegate(config, &clock);
	db.set_active_profile("qa")?;
	let admins = db.read_as_document("users", r#"{"role":"admin"}"#)?;
	assert_eq!(admins.len(), 2);
	assert_eq!(db.delete("users", r#"{"id":1}"#)?, 1);
	db.drop("users", "")?;
	assert!(db.read_as_json("users", "").is_err());
	Ok(())
}

#[test]
fn target_server_restricts_profiles() -> Result<()> {
	let mut config = DatabaseConfig::default();
	config.insert_profile("shop", DatabaseProfile::new("prod", MEMORY_DRIVER).with_target_server("eu-1"));
	let session = SessionConfig::from_config(&config, "shop").with_target_server(Some("us-1".to_string()));
	let mut db = SessionedCrudDelegate::new(session, JsonStoreBackend).with_manager(Arc::new(store::manager(config)));

	let err = db.set_active_profile("prod").unwrap_err();
	assert!(matches!(err, dbs::Error::TargetServerNotAllowed { .. }));
	assert!(!db.is_connected());

	db.set_target_server(Some("eu-1".to_string()));
	db.set_active_profile("prod")?;
	assert_eq!(db.active_profile_name(), Some("prod"));
	Ok(())
}
