use crate::context::CommandContext;
use crate::error::{CliError, Result};
use crate::output::{ProfileListData, ProfileShowData, ProfileSummary};

pub fn list(ctx: &CommandContext) -> Result<ProfileListData> {
	let app = ctx.app();
	let Some(app_config) = ctx.config().app(app) else {
		return Err(dbs::Error::UnknownApp(app.to_string()).into());
	};
	let default = ctx.config().default_profile(app);

	let profiles = app_config
		.profiles
		.values()
		.map(|profile| ProfileSummary {
			name: profile.name.clone(),
			driver: profile.driver.clone(),
			location: profile.location.clone(),
			target_servers: profile.target_servers.clone(),
			is_default: default == Some(profile.name.as_str()),
		})
		.collect();

	Ok(ProfileListData {
		app: app.to_string(),
		profiles,
	})
}

pub fn show(ctx: &CommandContext, name: &str) -> Result<ProfileShowData> {
	if name.is_empty() {
		return Err(CliError::InvalidInput("profile name must not be empty".into()));
	}
	let app = ctx.app();
	let Some(profile) = ctx.config().profile(app, name) else {
		return Err(dbs::Error::UnknownProfile {
			app: app.to_string(),
			profile: name.to_string(),
		}
		.into());
	};

	Ok(ProfileShowData {
		app: app.to_string(),
		is_default: ctx.config().default_profile(app) == Some(name),
		profile: profile.redacted(),
	})
}

#[cfg(test)]
mod tests {
	use dbs::{DatabaseConfig, DatabaseProfile};

	use super::*;
	use crate::config::ConfigSource;

	fn context() -> CommandContext {
		let mut config = DatabaseConfig::default();
		let mut qa = DatabaseProfile::new("qa", "memory");
		qa.password = Some("hunter2".into());
		config.insert_profile("shop", qa);
		config.insert_profile("shop", DatabaseProfile::new("staging", "json-file").with_location("staging.json"));
		config.apps.get_mut("shop").unwrap().default_profile = Some("staging".into());
		CommandContext::new(config, ConfigSource::Default, "shop".into(), None, None)
	}

	#[test]
	fn list_marks_default_profile() {
		let data = list(&context()).unwrap();
		let names: Vec<_> = data.profiles.iter().map(|p| (p.name.as_str(), p.is_default)).collect();
		assert_eq!(names, vec![("qa", false), ("staging", true)]);
	}

	#[test]
	fn show_redacts_password() {
		let data = show(&context(), "qa").unwrap();
		assert_eq!(data.profile.password.as_deref(), Some(dbs_protocol::REDACTED));
		assert!(!data.is_default);
	}

	#[test]
	fn show_unknown_profile_fails() {
		let err = show(&context(), "prod").unwrap_err();
		assert!(matches!(err, CliError::Database(dbs::Error::UnknownProfile { .. })));
	}
}
