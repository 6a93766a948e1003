//! Project-scoped SyncFlow endpoints.
//!
//! Every method maps to one REST call under `projects/{projectId}` and returns the decoded
//! payload or an [`Error`]. Nothing is cached or retried.

// self
use crate::{
	_prelude::*,
	auth::{DeviceId, ProjectId, SessionId},
	client::BaseClient,
	config::ProjectClientConfig,
	http::ApiHttpClient,
	models::{
		DeviceRegisterRequest, DeviceResponse, NewSessionRequest, ParticipantInfo, ProjectInfo,
		ProjectSessionResponse, ProjectSummary, TokenRequest, TokenResponse,
	},
};
#[cfg(feature = "reqwest")] use crate::{error::ConfigError, http::ReqwestHttpClient};

#[cfg(feature = "reqwest")]
/// Project client specialized for the crate's default reqwest transport.
pub type ReqwestProjectClient = ProjectClient<ReqwestHttpClient>;

/// Client bound to a single SyncFlow project.
pub struct ProjectClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	client: BaseClient<C>,
	project_id: ProjectId,
}
impl<C> ProjectClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Creates a project client that sends requests through `http_client`.
	pub fn with_http_client(config: ProjectClientConfig, http_client: impl Into<Arc<C>>) -> Self {
		let ProjectClientConfig { client, project_id } = config;

		Self { client: BaseClient::with_http_client(client, http_client), project_id }
	}

	/// Project every request is scoped to.
	pub fn project_id(&self) -> &ProjectId {
		&self.project_id
	}

	/// Underlying authenticated client, for endpoints without a dedicated method.
	pub fn base(&self) -> &BaseClient<C> {
		&self.client
	}

	/// `GET projects/{id}`.
	pub async fn project_details(&self) -> Result<ProjectInfo> {
		self.client.get(&self.path("")).await
	}

	/// `DELETE projects/{id}`.
	pub async fn delete_project(&self) -> Result<ProjectInfo> {
		self.client.delete(&self.path("")).await
	}

	/// `GET projects/{id}/summarize`.
	pub async fn summarize_project(&self) -> Result<ProjectSummary> {
		self.client.get(&self.path("/summarize")).await
	}

	/// `POST projects/{id}/create-session`.
	pub async fn create_session(
		&self,
		request: &NewSessionRequest,
	) -> Result<ProjectSessionResponse> {
		self.client.post(&self.path("/create-session"), Some(request)).await
	}

	/// `GET projects/{id}/sessions`.
	pub async fn sessions(&self) -> Result<Vec<ProjectSessionResponse>> {
		self.client.get(&self.path("/sessions")).await
	}

	/// `GET projects/{id}/sessions/{session}`.
	pub async fn session(&self, session_id: &SessionId) -> Result<ProjectSessionResponse> {
		self.client.get(&self.session_path(session_id, "")).await
	}

	/// `GET projects/{id}/sessions/{session}/participants`.
	pub async fn participants(&self, session_id: &SessionId) -> Result<Vec<ParticipantInfo>> {
		self.client.get(&self.session_path(session_id, "/participants")).await
	}

	/// `GET projects/{id}/sessions/{session}/livekit-session-info`; the payload is passed
	/// through untyped.
	pub async fn livekit_session_info(&self, session_id: &SessionId) -> Result<serde_json::Value> {
		self.client.get(&self.session_path(session_id, "/livekit-session-info")).await
	}

	/// `POST projects/{id}/sessions/{session}/token`.
	///
	/// The request is validated first; an invalid request returns
	/// [`Error::Validation`] without contacting the server.
	pub async fn generate_session_token(
		&self,
		session_id: &SessionId,
		request: &TokenRequest,
	) -> Result<TokenResponse> {
		request.validate()?;

		self.client.post(&self.session_path(session_id, "/token"), Some(request)).await
	}

	/// `POST projects/{id}/sessions/{session}/stop`.
	pub async fn stop_session(&self, session_id: &SessionId) -> Result<ProjectSessionResponse> {
		self.client.post::<_, ()>(&self.session_path(session_id, "/stop"), None).await
	}

	/// `GET projects/{id}/devices`.
	pub async fn devices(&self) -> Result<Vec<DeviceResponse>> {
		self.client.get(&self.path("/devices")).await
	}

	/// `GET projects/{id}/devices/{device}`.
	pub async fn device(&self, device_id: &DeviceId) -> Result<DeviceResponse> {
		self.client.get(&self.device_path(device_id)).await
	}

	/// `POST projects/{id}/devices`.
	pub async fn register_device(&self, request: &DeviceRegisterRequest) -> Result<DeviceResponse> {
		self.client.post(&self.path("/devices"), Some(request)).await
	}

	/// `DELETE projects/{id}/devices/{device}`.
	pub async fn delete_device(&self, device_id: &DeviceId) -> Result<DeviceResponse> {
		self.client.delete(&self.device_path(device_id)).await
	}

	fn path(&self, suffix: &str) -> String {
		format!("projects/{}{suffix}", self.project_id)
	}

	fn session_path(&self, session_id: &SessionId, suffix: &str) -> String {
		self.path(&format!("/sessions/{session_id}{suffix}"))
	}

	fn device_path(&self, device_id: &DeviceId) -> String {
		self.path(&format!("/devices/{device_id}"))
	}
}
#[cfg(feature = "reqwest")]
impl ProjectClient<ReqwestHttpClient> {
	/// Creates a project client backed by a default reqwest transport.
	pub fn new(config: ProjectClientConfig) -> Self {
		Self::with_http_client(config, ReqwestHttpClient::default())
	}

	/// Builds a project client entirely from `SYNCFLOW_*` environment variables.
	pub fn from_env() -> Result<Self, ConfigError> {
		Ok(Self::new(ProjectClientConfig::from_env()?))
	}
}
impl<C> Clone for ProjectClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	fn clone(&self) -> Self {
		Self { client: self.client.clone(), project_id: self.project_id.clone() }
	}
}
impl<C> Debug for ProjectClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ProjectClient")
			.field("project_id", &self.project_id)
			.field("client", &self.client)
			.finish()
	}
}
