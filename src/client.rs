//! Authenticated request layer shared by every SyncFlow endpoint wrapper.
//!
//! [`BaseClient::authorized_fetch`] obtains a usable token from [`ProjectTokenClaims`],
//! attaches it as a bearer credential, sends exactly one request, and folds the outcome
//! into [`Result`]: 2xx bodies decode into the caller's type, other statuses become
//! [`HttpError`], and transport failures become [`TransportError`]. Nothing is retried.

// crates.io
use ::http::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	auth::ProjectTokenClaims,
	config::ClientConfig,
	error::{ConfigError, HttpError, TransportError},
	http::{ApiHttpClient, HttpMethod, HttpRequest, HttpResponse},
	obs::{self, RequestOutcome, RequestSpan},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

const JSON_CONTENT_TYPE: &str = "application/json";
const EMPTY_OBJECT: &[u8] = b"{}";

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport.
pub type ReqwestBaseClient = BaseClient<ReqwestHttpClient>;

/// Sends authenticated JSON requests to a SyncFlow server.
///
/// Cloning is cheap; clones share the transport and the cached token.
pub struct BaseClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	http_client: Arc<C>,
	base_url: Url,
	claims: Arc<ProjectTokenClaims>,
}
impl<C> BaseClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Creates a client that issues tokens from `config` and sends requests through
	/// `http_client`.
	pub fn with_http_client(config: ClientConfig, http_client: impl Into<Arc<C>>) -> Self {
		let claims = Arc::new(ProjectTokenClaims::from_config(&config));

		Self::from_parts(config.server_url, claims, http_client)
	}

	/// Creates a client around an existing token holder.
	///
	/// Any query or fragment on `base_url` is dropped; endpoint paths are appended to its
	/// path only.
	pub fn from_parts(
		mut base_url: Url,
		claims: Arc<ProjectTokenClaims>,
		http_client: impl Into<Arc<C>>,
	) -> Self {
		base_url.set_query(None);
		base_url.set_fragment(None);

		Self { http_client: http_client.into(), base_url, claims }
	}

	/// Base URL every endpoint path is resolved against.
	pub fn base_url(&self) -> &Url {
		&self.base_url
	}

	/// Token holder backing this client.
	pub fn claims(&self) -> &Arc<ProjectTokenClaims> {
		&self.claims
	}

	/// Resolves `path` against the base URL with exactly one `/` between them.
	///
	/// Trailing slashes on the base and leading slashes on `path` are dropped, so
	/// `"sessions"` and `"/sessions"` address the same endpoint.
	pub fn endpoint_url(&self, path: &str) -> Result<Url, ConfigError> {
		let joined = format!(
			"{}/{}",
			self.base_url.as_str().trim_end_matches('/'),
			path.trim_start_matches('/')
		);

		Url::parse(&joined)
			.map_err(|source| ConfigError::InvalidEndpoint { path: path.to_owned(), source })
	}

	/// Performs one authenticated request and decodes a 2xx JSON body into `T`.
	///
	/// `headers` are merged with `Content-Type: application/json` and
	/// `Authorization: Bearer <token>`; those two always replace caller-supplied values.
	/// `GET` never sends a body. Other methods send `body` as JSON, or `{}` when `body` is
	/// `None`. An empty success body decodes as JSON `null`.
	pub async fn authorized_fetch<T, B>(
		&self,
		path: &str,
		method: HttpMethod,
		headers: HeaderMap,
		body: Option<&B>,
	) -> Result<T>
	where
		T: DeserializeOwned,
		B: ?Sized + Serialize,
	{
		let span = RequestSpan::new(method, "authorized_fetch");
		let recorder = span.clone();

		obs::record_request_outcome(method, RequestOutcome::Attempt);

		let result = span
			.instrument(async move {
				let request = self.build_request(path, method, headers, body)?;
				let response = self
					.http_client
					.execute(request)
					.await
					.map_err(TransportError::network)?;

				recorder.record_status(response.status().as_u16());

				decode_response(response)
			})
			.await;

		match &result {
			Ok(_) => obs::record_request_outcome(method, RequestOutcome::Success),
			Err(_) => obs::record_request_outcome(method, RequestOutcome::Failure),
		}

		result
	}

	/// Shorthand for a `GET` without extra headers.
	pub async fn get<T>(&self, path: &str) -> Result<T>
	where
		T: DeserializeOwned,
	{
		self.authorized_fetch::<T, ()>(path, HttpMethod::Get, HeaderMap::new(), None).await
	}

	/// Shorthand for a `POST` without extra headers.
	pub async fn post<T, B>(&self, path: &str, body: Option<&B>) -> Result<T>
	where
		T: DeserializeOwned,
		B: ?Sized + Serialize,
	{
		self.authorized_fetch(path, HttpMethod::Post, HeaderMap::new(), body).await
	}

	/// Shorthand for a `DELETE` without extra headers or body.
	pub async fn delete<T>(&self, path: &str) -> Result<T>
	where
		T: DeserializeOwned,
	{
		self.authorized_fetch::<T, ()>(path, HttpMethod::Delete, HeaderMap::new(), None).await
	}

	fn build_request<B>(
		&self,
		path: &str,
		method: HttpMethod,
		mut headers: HeaderMap,
		body: Option<&B>,
	) -> Result<HttpRequest>
	where
		B: ?Sized + Serialize,
	{
		let url = self.endpoint_url(path)?;
		let token = self.claims.current_token()?;
		let mut bearer = HeaderValue::try_from(format!("Bearer {}", token.expose()))
			.map_err(|e| ConfigError::from(::http::Error::from(e)))?;

		bearer.set_sensitive(true);
		headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
		headers.insert(AUTHORIZATION, bearer);

		let payload = match (method.sends_body(), body) {
			(false, _) => Vec::new(),
			(true, Some(body)) => serde_json::to_vec(body).map_err(ConfigError::RequestBody)?,
			(true, None) => EMPTY_OBJECT.to_vec(),
		};
		let mut request = ::http::Request::builder()
			.method(::http::Method::from(method))
			.uri(url.as_str())
			.body(payload)
			.map_err(ConfigError::from)?;

		*request.headers_mut() = headers;

		Ok(request)
	}
}
#[cfg(feature = "reqwest")]
impl BaseClient<ReqwestHttpClient> {
	/// Creates a client backed by a default reqwest transport.
	pub fn new(config: ClientConfig) -> Self {
		Self::with_http_client(config, ReqwestHttpClient::default())
	}
}
impl<C> Clone for BaseClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	fn clone(&self) -> Self {
		Self {
			http_client: self.http_client.clone(),
			base_url: self.base_url.clone(),
			claims: self.claims.clone(),
		}
	}
}
impl<C> Debug for BaseClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("BaseClient")
			.field("base_url", &self.base_url.as_str())
			.field("claims", &self.claims)
			.finish()
	}
}

fn decode_response<T>(response: HttpResponse) -> Result<T>
where
	T: DeserializeOwned,
{
	let status = response.status();
	let body = response.into_body();

	if !status.is_success() {
		return Err(HttpError::new(status.as_u16(), String::from_utf8_lossy(&body)).into());
	}

	let raw: &[u8] = if body.iter().all(u8::is_ascii_whitespace) { b"null" } else { &body };
	let mut deserializer = serde_json::Deserializer::from_slice(raw);

	serde_path_to_error::deserialize(&mut deserializer)
		.map_err(|source| Error::Decode { source, status: status.as_u16() })
}

#[cfg(test)]
mod tests {
	// std
	use std::convert::Infallible;
	// crates.io
	use ::http::StatusCode;
	// self
	use super::*;
	use crate::{
		auth::{ApiClaims, ApiSecret},
		http::TransportFuture,
		models::TokenResponse,
	};

	#[derive(Default)]
	struct RecordingHttpClient {
		requests: parking_lot::Mutex<Vec<HttpRequest>>,
		reply: Option<(u16, &'static str)>,
	}
	impl RecordingHttpClient {
		fn replying(status: u16, body: &'static str) -> Self {
			Self { requests: Default::default(), reply: Some((status, body)) }
		}

		fn take_requests(&self) -> Vec<HttpRequest> {
			std::mem::take(&mut *self.requests.lock())
		}
	}
	impl ApiHttpClient for RecordingHttpClient {
		type TransportError = Infallible;

		fn execute(&self, request: HttpRequest) -> TransportFuture<'_, Self::TransportError> {
			self.requests.lock().push(request);

			let (status, body) = self.reply.unwrap_or((200, "{}"));

			Box::pin(async move {
				let mut response = HttpResponse::new(body.as_bytes().to_vec());

				*response.status_mut() =
					StatusCode::from_u16(status).expect("Fixture status should be valid.");

				Ok(response)
			})
		}
	}

	fn config() -> ClientConfig {
		ClientConfig::new("https://syncflow.example.com/api/", "api-key", "api-secret")
			.expect("Fixture configuration should be valid.")
	}

	fn fixture_client(
		transport: RecordingHttpClient,
	) -> (BaseClient<RecordingHttpClient>, Arc<RecordingHttpClient>) {
		let transport = Arc::new(transport);

		(BaseClient::with_http_client(config(), transport.clone()), transport)
	}

	#[test]
	fn endpoint_url_inserts_exactly_one_separator() {
		let (client, _) = fixture_client(RecordingHttpClient::default());

		for path in ["projects/p-1", "/projects/p-1", "//projects/p-1"] {
			assert_eq!(
				client.endpoint_url(path).expect("Endpoint should resolve.").as_str(),
				"https://syncflow.example.com/api/projects/p-1"
			);
		}
	}

	#[test]
	fn endpoint_paths_never_land_in_a_base_query() {
		let claims =
			ProjectTokenClaims::new("api-key", ApiSecret::new("api-secret"), None, Duration::hours(1))
				.expect("Fixture TTL should be positive.");
		let client = BaseClient::<RecordingHttpClient>::from_parts(
			Url::parse("https://h.example/api?tenant=1#top").expect("Fixture URL should parse."),
			Arc::new(claims),
			RecordingHttpClient::default(),
		);
		let url = client.endpoint_url("projects/p-1").expect("Endpoint should resolve.");

		assert_eq!(url.as_str(), "https://h.example/api/projects/p-1");
		assert_eq!(url.path(), "/api/projects/p-1");
		assert_eq!(url.query(), None);
	}

	#[tokio::test]
	async fn get_never_sends_a_body() {
		let (client, transport) = fixture_client(RecordingHttpClient::default());
		let body = serde_json::json!({ "ignored": true });
		let _: serde_json::Value = client
			.authorized_fetch("projects", HttpMethod::Get, HeaderMap::new(), Some(&body))
			.await
			.expect("GET should succeed.");
		let requests = transport.take_requests();

		assert_eq!(requests.len(), 1);
		assert_eq!(requests[0].method(), ::http::Method::GET);
		assert!(requests[0].body().is_empty());
	}

	#[tokio::test]
	async fn missing_body_defaults_to_empty_object() {
		let (client, transport) = fixture_client(RecordingHttpClient::default());

		for method in [HttpMethod::Post, HttpMethod::Put, HttpMethod::Delete] {
			let _: serde_json::Value = client
				.authorized_fetch::<_, ()>("projects", method, HeaderMap::new(), None)
				.await
				.expect("Request should succeed.");
		}

		for request in transport.take_requests() {
			assert_eq!(request.body().as_slice(), b"{}");
		}
	}

	#[tokio::test]
	async fn reserved_headers_override_caller_values() {
		let (client, transport) = fixture_client(RecordingHttpClient::default());
		let mut headers = HeaderMap::new();

		headers.insert("content-type", HeaderValue::from_static("text/plain"));
		headers.insert("Authorization", HeaderValue::from_static("Basic abc"));
		headers.insert("x-request-id", HeaderValue::from_static("req-1"));

		let _: serde_json::Value = client
			.authorized_fetch("projects", HttpMethod::Post, headers, Some(&serde_json::json!({})))
			.await
			.expect("POST should succeed.");
		let request = transport.take_requests().pop().expect("One request should be recorded.");
		let headers = request.headers();

		assert_eq!(headers.get_all(CONTENT_TYPE).iter().count(), 1);
		assert_eq!(headers[CONTENT_TYPE], JSON_CONTENT_TYPE);
		assert_eq!(headers.get_all(AUTHORIZATION).iter().count(), 1);
		assert_eq!(headers["x-request-id"], "req-1");

		let bearer = headers[AUTHORIZATION].to_str().expect("Bearer header should be ASCII.");
		let token = bearer.strip_prefix("Bearer ").expect("Authorization should be a bearer.");
		let claims = ApiClaims::decode_unverified(token).expect("Token claims should decode.");

		assert_eq!(claims.iss, "api-key");
	}

	#[tokio::test]
	async fn success_body_decodes_into_target_type() {
		let (client, _) =
			fixture_client(RecordingHttpClient::replying(
				200,
				"{\"token\":\"abc\",\"identity\":\"u1\"}",
			));
		let response: TokenResponse = client.get("tokens").await.expect("Decoding should succeed.");

		assert_eq!(response, TokenResponse { token: "abc".into(), identity: "u1".into() });
	}

	#[tokio::test]
	async fn error_status_becomes_http_error() {
		let (client, _) = fixture_client(RecordingHttpClient::replying(401, "unauthorized"));
		let err = client
			.get::<serde_json::Value>("projects")
			.await
			.expect_err("401 should surface as an error value.");

		match err {
			Error::Http(http) => {
				assert_eq!(http, HttpError::new(401, "unauthorized"));
				assert!(http.is_auth_failure());
			},
			other => panic!("Unexpected error variant: {other:?}."),
		}
	}

	#[tokio::test]
	async fn malformed_success_body_reports_path() {
		let (client, _) =
			fixture_client(RecordingHttpClient::replying(200, "{\"token\":1,\"identity\":\"u\"}"));
		let err = client
			.get::<TokenResponse>("tokens")
			.await
			.expect_err("Mismatched body should fail to decode.");

		match err {
			Error::Decode { source, status } => {
				assert_eq!(status, 200);
				assert_eq!(source.path().to_string(), "token");
			},
			other => panic!("Unexpected error variant: {other:?}."),
		}
	}

	#[tokio::test]
	async fn empty_success_body_decodes_as_null() {
		let (client, _) = fixture_client(RecordingHttpClient::replying(204, ""));

		client.delete::<()>("projects/p-1").await.expect("Empty body should decode into unit.");
	}

	#[tokio::test]
	async fn token_is_reused_across_requests() {
		let (client, transport) = fixture_client(RecordingHttpClient::default());

		for _ in 0..3 {
			let _: serde_json::Value = client.get("projects").await.expect("GET should succeed.");
		}

		let bearers = transport
			.take_requests()
			.into_iter()
			.map(|request| request.headers()[AUTHORIZATION].clone())
			.collect::<Vec<_>>();

		assert_eq!(bearers.len(), 3);
		assert!(bearers.windows(2).all(|pair| pair[0] == pair[1]));
		assert!(bearers[0].is_sensitive());
	}

	#[test]
	fn debug_output_hides_secret() {
		let claims =
			ProjectTokenClaims::new("api-key", ApiSecret::new("api-secret"), None, Duration::hours(1))
				.expect("Fixture TTL should be positive.");
		let client = BaseClient::<RecordingHttpClient>::from_parts(
			Url::parse("https://syncflow.example.com").expect("Fixture URL should parse."),
			Arc::new(claims),
			RecordingHttpClient::default(),
		);

		assert!(!format!("{client:?}").contains("api-secret"));
	}
}
