//! Demonstrates opening a SyncFlow session and minting a participant token with the default
//! reqwest transport against a mocked server.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
// self
use syncflow_client::{
	auth::ProjectId,
	config::{ClientConfig, ProjectClientConfig},
	http::ReqwestHttpClient,
	models::{NewSessionRequest, TokenRequest, VideoGrants},
	project::ProjectClient,
	reqwest::Client,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let session_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/projects/demo-project/create-session");
			then.status(200).header("content-type", "application/json").body(
				"{\"id\":\"s-42\",\"name\":\"standup\",\"status\":\"Started\",\"livekitRoomName\":\"standup-room\"}",
			);
		})
		.await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/projects/demo-project/sessions/s-42/token");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"token\":\"demo-livekit-token\",\"identity\":\"camera-01\"}");
		})
		.await;
	let config = ProjectClientConfig::new(
		ClientConfig::new(server.base_url(), "demo-key", "demo-secret")?,
		ProjectId::new("demo-project")?,
	);
	let http_client = ReqwestHttpClient::with_client(
		Client::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()?,
	);
	let client = <ProjectClient<ReqwestHttpClient>>::with_http_client(config, http_client);
	let session = client.create_session(&NewSessionRequest::named("standup")).await?;
	let room = session.livekit_room_name.clone().unwrap_or_else(|| session.name.clone());
	let token = client
		.generate_session_token(
			&session.id,
			&TokenRequest::new("camera-01").with_video_grants(VideoGrants::join(room)),
		)
		.await?;

	println!("Session {} is live; participant token: {}.", session.id, token.token);

	session_mock.assert_async().await;
	token_mock.assert_async().await;

	Ok(())
}
