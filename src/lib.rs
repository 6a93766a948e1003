//! SyncFlow client SDK: signed API tokens with transparent renewal, wrapped around an
//! authenticated JSON transport and typed project, session, and device endpoints.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod models;
pub mod obs;
pub mod project;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		auth::ProjectId,
		client::BaseClient,
		config::{ClientConfig, ProjectClientConfig},
		http::ReqwestHttpClient,
		project::ProjectClient,
	};

	/// API key used by integration test fixtures.
	pub const TEST_API_KEY: &str = "test-api-key";
	/// API secret used by integration test fixtures.
	pub const TEST_API_SECRET: &str = "test-api-secret";
	/// Project identifier used by integration test fixtures.
	pub const TEST_PROJECT_ID: &str = "test-project";

	/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Returns a validated configuration pointing at `server_url` with the test credentials.
	pub fn test_client_config(server_url: &str) -> ClientConfig {
		ClientConfig::new(server_url, TEST_API_KEY, TEST_API_SECRET)
			.expect("Test client configuration should be valid.")
	}

	/// Constructs a [`BaseClient`] backed by the reqwest transport used across integration
	/// tests.
	pub fn build_reqwest_test_client(config: ClientConfig) -> BaseClient<ReqwestHttpClient> {
		BaseClient::with_http_client(config, test_reqwest_http_client())
	}

	/// Constructs a [`ProjectClient`] scoped to [`TEST_PROJECT_ID`] on `server_url`.
	pub fn build_reqwest_test_project_client(server_url: &str) -> ProjectClient<ReqwestHttpClient> {
		let project_id =
			ProjectId::new(TEST_PROJECT_ID).expect("Test project identifier should be valid.");
		let config = ProjectClientConfig::new(test_client_config(server_url), project_id);

		ProjectClient::with_http_client(config, test_reqwest_http_client())
	}
}

mod _prelude {
	pub use std::{
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::RwLock;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(all(test, feature = "reqwest"))] use {color_eyre as _, httpmock as _};
