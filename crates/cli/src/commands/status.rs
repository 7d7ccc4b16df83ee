use dbs::store::JsonStoreDelegate;

use crate::context::CommandContext;
use crate::output::StatusData;

/// Reports the resolved config and the delegate's session state.
pub fn status(ctx: &CommandContext, db: &JsonStoreDelegate) -> StatusData {
	StatusData {
		app: ctx.app().to_string(),
		config_path: ctx.config_path(),
		target_server: db.target_server().map(String::from),
		session_expiry_secs: db.session_expiry().as_secs(),
		default_profile: ctx.resolve_profile(None).ok(),
		active_profile: db.active_profile_name().map(String::from),
		connected: db.is_connected(),
		expired: db.is_session_expired(),
		drivers: dbs::store::DRIVERS.iter().map(|d| d.to_string()).collect(),
		entities: db.connection().map(|conn| conn.handle().entity_names()),
		stats: db.stats(),
	}
}

#[cfg(test)]
mod tests {
	use dbs::{DatabaseConfig, DatabaseProfile};

	use super::*;
	use crate::config::ConfigSource;

	#[test]
	fn status_lists_store_drivers_and_session() {
		let mut config = DatabaseConfig::default();
		config.insert_profile("shop", DatabaseProfile::new("qa", "memory"));
		let ctx = CommandContext::new(config, ConfigSource::Default, "shop".into(), Some("qa".into()), None);
		let mut db = ctx.delegate();
		assert_eq!(status(&ctx, &db).entities, None);
		db.set_active_profile("qa").unwrap();
		db.create("users", "").unwrap();

		let data = status(&ctx, &db);
		assert_eq!(data.drivers, vec!["json-file", "memory"]);
		assert_eq!(data.active_profile.as_deref(), Some("qa"));
		assert!(data.connected);
		assert_eq!(data.entities, Some(vec!["users".to_string()]));
	}
}
