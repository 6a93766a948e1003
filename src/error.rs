//! Client-level error types shared across the token, transport, and endpoint layers.

// self
use crate::_prelude::*;

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
///
/// Every failure mode, including network failures, surfaces through this enum so callers
/// can handle a single error channel.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Server answered with a non-success status.
	#[error(transparent)]
	Http(#[from] HttpError),
	/// Transport failure (DNS, TCP, TLS, timeout).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// API token could not be produced or read.
	#[error(transparent)]
	Token(#[from] TokenError),
	/// Request arguments were rejected before contacting the server.
	#[error(transparent)]
	Validation(#[from] ValidationError),

	/// Server answered with a success status but the body did not match the expected shape.
	#[error("Response body could not be decoded.")]
	Decode {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code of the response.
		status: u16,
	},
}

/// Non-success HTTP response returned by the SyncFlow server.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("HttpError: Status Code {status_code}; Message: {text}")]
pub struct HttpError {
	/// HTTP status code.
	pub status_code: u16,
	/// Raw response body.
	pub text: String,
}
impl HttpError {
	/// Creates a new error for the provided status and body text.
	pub fn new(status_code: u16, text: impl Into<String>) -> Self {
		Self { status_code, text: text.into() }
	}

	/// Returns `true` for 401 and 403 responses.
	pub fn is_auth_failure(&self) -> bool {
		matches!(self.status_code, 401 | 403)
	}
}

/// Configuration and validation failures raised while building clients.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// A required setting was missing or blank.
	#[error("{field} is required.")]
	Missing {
		/// Human-readable name of the missing setting.
		field: &'static str,
	},
	/// The server URL cannot be parsed.
	#[error("Server URL is invalid.")]
	InvalidServerUrl {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// The server URL cannot serve as a base for endpoint paths.
	#[error("Server URL `{url}` cannot be used as a base URL.")]
	CannotBeBase {
		/// Offending URL.
		url: String,
	},
	/// The server URL carries a query string or fragment, which endpoint paths cannot extend.
	#[error("Server URL `{url}` must not contain a query or fragment.")]
	ServerUrlQuery {
		/// Offending URL.
		url: String,
	},
	/// An endpoint URL could not be assembled from the base URL and path.
	#[error("Endpoint path `{path}` does not form a valid URL.")]
	InvalidEndpoint {
		/// Relative path requested by the caller.
		path: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// The token TTL is not positive.
	#[error("Token TTL must be positive.")]
	NonPositiveTtl,
	/// An identifier failed validation.
	#[error(transparent)]
	InvalidIdentifier(#[from] crate::auth::IdentifierError),
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] ::http::Error),
	/// Request body could not be serialized.
	#[error("Request body could not be serialized.")]
	RequestBody(#[source] serde_json::Error),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures.
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the SyncFlow server.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}

/// Failures while signing or reading API tokens.
///
/// Messages never include key material.
#[derive(Debug, ThisError)]
pub enum TokenError {
	/// The signer rejected the claims or key.
	#[error("API token could not be signed.")]
	Signing(#[source] jsonwebtoken::errors::Error),
	/// The token is not a three-segment compact JWS.
	#[error("API token is malformed.")]
	Malformed,
	/// The claims segment is not valid base64url.
	#[error("API token claims are not valid base64url.")]
	Encoding(#[from] base64::DecodeError),
	/// The claims segment is not the expected JSON object.
	#[error("API token claims could not be parsed.")]
	Claims(#[source] serde_json::Error),
}

/// Argument checks performed before any network activity.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum ValidationError {
	/// A required request field was missing or blank.
	#[error("Request field `{field}` is required.")]
	MissingField {
		/// Wire name of the missing field.
		field: &'static str,
	},
}
