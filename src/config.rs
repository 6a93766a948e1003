//! Immutable client configuration plus the environment-variable factory used at the
//! composition root.
//!
//! The client core only accepts fully resolved [`ClientConfig`] values. Reading the
//! process environment happens exclusively through [`ClientConfig::from_env`] and
//! [`ProjectClientConfig::from_env`], which callers invoke once while wiring the app.

// self
use crate::{
	_prelude::*,
	auth::{ApiSecret, DEFAULT_TOKEN_TTL, ProjectId},
	error::ConfigError,
};

/// Environment variable holding the SyncFlow server URL.
pub const ENV_SERVER_URL: &str = "SYNCFLOW_SERVER_URL";
/// Environment variable holding the API key.
pub const ENV_API_KEY: &str = "SYNCFLOW_API_KEY";
/// Environment variable holding the API secret.
pub const ENV_API_SECRET: &str = "SYNCFLOW_API_SECRET";
/// Environment variable holding the project identifier.
pub const ENV_PROJECT_ID: &str = "SYNCFLOW_PROJECT_ID";

/// Validated settings consumed by [`BaseClient`](crate::client::BaseClient).
#[derive(Clone, Debug)]
pub struct ClientConfig {
	/// Base URL every endpoint path is resolved against.
	pub server_url: Url,
	/// API key; used as the token issuer.
	pub api_key: String,
	/// Secret used to sign API tokens.
	pub api_secret: ApiSecret,
	token_ttl: Duration,
	/// Whether stale tokens are renewed automatically (defaults to `true`).
	pub auto_renew_token: bool,
	/// Project claim embedded in issued tokens.
	pub project: Option<String>,
}
impl ClientConfig {
	/// Validates the required settings and applies defaults for the rest.
	pub fn new(
		server_url: impl AsRef<str>,
		api_key: impl Into<String>,
		api_secret: impl Into<String>,
	) -> Result<Self, ConfigError> {
		let server_url = server_url.as_ref().trim();

		if server_url.is_empty() {
			return Err(ConfigError::Missing { field: "Server URL" });
		}

		let api_key = api_key.into();

		if api_key.trim().is_empty() {
			return Err(ConfigError::Missing { field: "API Key" });
		}

		let api_secret = ApiSecret::new(api_secret);

		if api_secret.is_blank() {
			return Err(ConfigError::Missing { field: "API Secret" });
		}

		let server_url = Url::parse(server_url)
			.map_err(|source| ConfigError::InvalidServerUrl { source })?;

		if server_url.cannot_be_a_base() {
			return Err(ConfigError::CannotBeBase { url: server_url.into() });
		}
		if server_url.query().is_some() || server_url.fragment().is_some() {
			return Err(ConfigError::ServerUrlQuery { url: server_url.into() });
		}

		Ok(Self {
			server_url,
			api_key,
			api_secret,
			token_ttl: DEFAULT_TOKEN_TTL,
			auto_renew_token: true,
			project: None,
		})
	}

	/// Reads the required settings from the process environment.
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::from_lookup(|name| std::env::var(name).ok())
	}

	/// Reads the required settings through `lookup`, treating `None` as unset.
	pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
		Self::new(
			lookup(ENV_SERVER_URL).unwrap_or_default(),
			lookup(ENV_API_KEY).unwrap_or_default(),
			lookup(ENV_API_SECRET).unwrap_or_default(),
		)
	}

	/// Lifetime of every issued token (defaults to one hour); always positive.
	pub fn token_ttl(&self) -> Duration {
		self.token_ttl
	}

	/// Overrides the token lifetime.
	///
	/// A TTL at or below [`GRACE_WINDOW`](crate::auth::GRACE_WINDOW) is accepted but makes
	/// every request sign a new token.
	pub fn with_token_ttl(mut self, ttl: Duration) -> Result<Self, ConfigError> {
		if !ttl.is_positive() {
			return Err(ConfigError::NonPositiveTtl);
		}

		self.token_ttl = ttl;

		Ok(self)
	}

	/// Enables or disables automatic renewal of stale tokens.
	pub fn with_auto_renew_token(mut self, auto_renew: bool) -> Self {
		self.auto_renew_token = auto_renew;

		self
	}

	/// Embeds `project` in every issued token.
	pub fn with_project(mut self, project: impl Into<String>) -> Self {
		self.project = Some(project.into());

		self
	}
}

/// Settings for a [`ProjectClient`](crate::project::ProjectClient).
#[derive(Clone, Debug)]
pub struct ProjectClientConfig {
	/// Transport and token settings.
	pub client: ClientConfig,
	/// Project every endpoint is scoped to.
	pub project_id: ProjectId,
}
impl ProjectClientConfig {
	/// Scopes `client` to `project_id`; the project also becomes the token's project claim.
	pub fn new(client: ClientConfig, project_id: ProjectId) -> Self {
		let client = client.with_project(project_id.as_ref());

		Self { client, project_id }
	}

	/// Reads all settings, including the project identifier, from the process environment.
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::from_lookup(|name| std::env::var(name).ok())
	}

	/// Reads all settings through `lookup`, treating `None` as unset.
	pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
		let client = ClientConfig::from_lookup(&lookup)?;
		let project_id = lookup(ENV_PROJECT_ID).unwrap_or_default();

		if project_id.trim().is_empty() {
			return Err(ConfigError::Missing { field: "Project ID" });
		}

		Ok(Self::new(client, ProjectId::new(project_id)?))
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::collections::HashMap;
	// self
	use super::*;

	fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
		let map = pairs
			.iter()
			.map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
			.collect::<HashMap<_, _>>();

		move |name: &str| map.get(name).cloned()
	}

	#[test]
	fn explicit_values_build_with_defaults() {
		let config =
			ClientConfig::new("HTTPS://DUMMY_SERVER_URL", "DUMMY_API_KEY", "DUMMY_API_SECRET")
				.expect("Explicit configuration should be valid.");

		assert_eq!(config.server_url.as_str(), "https://dummy_server_url/");
		assert_eq!(config.api_key, "DUMMY_API_KEY");
		assert_eq!(config.api_secret.expose(), "DUMMY_API_SECRET");
		assert_eq!(config.token_ttl(), Duration::hours(1));
		assert!(config.auto_renew_token);
		assert_eq!(config.project, None);
	}

	#[test]
	fn missing_values_fail_fast_in_order() {
		assert!(matches!(
			ClientConfig::new("", "k", "s"),
			Err(ConfigError::Missing { field: "Server URL" })
		));
		assert!(matches!(
			ClientConfig::new("https://x", " ", "s"),
			Err(ConfigError::Missing { field: "API Key" })
		));
		assert!(matches!(
			ClientConfig::new("https://x", "k", ""),
			Err(ConfigError::Missing { field: "API Secret" })
		));
		assert!(matches!(
			ClientConfig::new("not a url", "k", "s"),
			Err(ConfigError::InvalidServerUrl { .. })
		));
		assert!(matches!(
			ClientConfig::new("mailto:ops@example.com", "k", "s"),
			Err(ConfigError::CannotBeBase { .. })
		));
	}

	#[test]
	fn ttl_override_must_be_positive() {
		let config = ClientConfig::new("https://x", "k", "s").expect("Config should be valid.");

		assert!(matches!(
			config.clone().with_token_ttl(Duration::ZERO),
			Err(ConfigError::NonPositiveTtl)
		));

		let config = config
			.with_token_ttl(Duration::minutes(5))
			.expect("Positive TTL should be accepted.")
			.with_auto_renew_token(false);

		assert_eq!(config.token_ttl(), Duration::minutes(5));
		assert!(!config.auto_renew_token);
	}

	#[test]
	fn negative_ttl_override_is_rejected() {
		let config = ClientConfig::new("https://x", "k", "s").expect("Config should be valid.");

		assert!(matches!(
			config.with_token_ttl(Duration::seconds(-10)),
			Err(ConfigError::NonPositiveTtl)
		));
	}

	#[test]
	fn server_url_with_query_or_fragment_is_rejected() {
		for url in ["https://h.example/api?tenant=1", "https://h.example/api#top"] {
			assert!(
				matches!(ClientConfig::new(url, "k", "s"), Err(ConfigError::ServerUrlQuery { .. })),
				"`{url}` should be rejected."
			);
		}

		let config = ClientConfig::new("https://h.example/api/", "k", "s")
			.expect("Plain base path should be accepted.");

		assert_eq!(config.server_url.query(), None);
	}

	#[test]
	fn project_config_reads_lookup_and_sets_claim() {
		let config = ProjectClientConfig::from_lookup(env(&[
			(ENV_SERVER_URL, "https://syncflow.example.com"),
			(ENV_API_KEY, "key"),
			(ENV_API_SECRET, "secret"),
			(ENV_PROJECT_ID, "project-9"),
		]))
		.expect("Complete environment should build.");

		assert_eq!(config.project_id.as_ref(), "project-9");
		assert_eq!(config.client.project.as_deref(), Some("project-9"));
	}

	#[test]
	fn project_config_requires_project_id() {
		let err = ProjectClientConfig::from_lookup(env(&[
			(ENV_SERVER_URL, "https://syncflow.example.com"),
			(ENV_API_KEY, "key"),
			(ENV_API_SECRET, "secret"),
		]))
		.expect_err("Missing project identifier should fail.");

		assert!(matches!(err, ConfigError::Missing { field: "Project ID" }));

		let err = ProjectClientConfig::from_lookup(env(&[]))
			.expect_err("Empty environment should fail.");

		assert!(matches!(err, ConfigError::Missing { field: "Server URL" }));
	}
}
