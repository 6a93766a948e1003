//! Token lifecycle: lazy issuance, staleness checks, and renewal of the cached API token.

pub mod claims;
pub mod secret;

// self
use crate::{
	_prelude::*,
	auth::token::{
		claims::{self as signer, ApiClaims, IssuedToken},
		secret::{ApiSecret, SignedToken},
	},
	config::ClientConfig,
	error::{ConfigError, TokenError},
};

/// Safety margin subtracted from a token's expiry before it is treated as stale.
pub const GRACE_WINDOW: Duration = Duration::seconds(100);

/// Default token lifetime.
pub const DEFAULT_TOKEN_TTL: Duration = Duration::hours(1);

/// Owns the signing key for one API key and the single token currently issued with it.
///
/// The cached token starts out empty, is signed on first use, and is replaced wholesale
/// whenever it goes stale (with auto-renew on) or [`refresh`](Self::refresh) is called.
/// Concurrent callers that observe a stale token may each sign a replacement; the last
/// write wins and every caller still receives a valid token.
///
/// A TTL that does not exceed [`GRACE_WINDOW`] yields tokens that are stale as soon as they
/// are issued, so every access signs a new one.
pub struct ProjectTokenClaims {
	api_key: String,
	api_secret: ApiSecret,
	project: Option<String>,
	ttl: Duration,
	auto_renew: bool,
	cached: RwLock<Option<Arc<IssuedToken>>>,
}
impl ProjectTokenClaims {
	/// Creates a holder with auto-renew enabled and no token issued yet.
	///
	/// Fails with [`ConfigError::NonPositiveTtl`] unless `ttl` is positive, so every issued
	/// token expires after it was issued.
	pub fn new(
		api_key: impl Into<String>,
		api_secret: ApiSecret,
		project: Option<String>,
		ttl: Duration,
	) -> Result<Self, ConfigError> {
		if !ttl.is_positive() {
			return Err(ConfigError::NonPositiveTtl);
		}

		Ok(Self::with_checked_ttl(api_key.into(), api_secret, project, ttl))
	}

	/// Creates a holder from a validated [`ClientConfig`].
	pub fn from_config(config: &ClientConfig) -> Self {
		Self::with_checked_ttl(
			config.api_key.clone(),
			config.api_secret.clone(),
			config.project.clone(),
			config.token_ttl(),
		)
		.with_auto_renew(config.auto_renew_token)
	}

	fn with_checked_ttl(
		api_key: String,
		api_secret: ApiSecret,
		project: Option<String>,
		ttl: Duration,
	) -> Self {
		Self { api_key, api_secret, project, ttl, auto_renew: true, cached: RwLock::new(None) }
	}

	/// Enables or disables renewal of stale tokens in [`current_token`](Self::current_token).
	pub fn with_auto_renew(mut self, auto_renew: bool) -> Self {
		self.auto_renew = auto_renew;

		self
	}

	/// Returns whether stale tokens are renewed on access.
	pub fn auto_renew(&self) -> bool {
		self.auto_renew
	}

	/// Lifetime applied to every issued token.
	pub fn ttl(&self) -> Duration {
		self.ttl
	}

	/// Returns a usable token, signing one if none exists or the cached one is stale.
	///
	/// With auto-renew disabled the cached token is returned even when stale.
	pub fn current_token(&self) -> Result<SignedToken, TokenError> {
		self.current_token_at(OffsetDateTime::now_utc())
	}

	/// Same as [`current_token`](Self::current_token) with `instant` treated as "now".
	pub fn current_token_at(&self, instant: OffsetDateTime) -> Result<SignedToken, TokenError> {
		let cached = self.cached.read().clone();

		match cached {
			Some(issued) if !self.auto_renew || !issued.claims.is_stale_at(instant, GRACE_WINDOW) =>
				Ok(issued.token.clone()),
			_ => self.refresh_at(instant),
		}
	}

	/// Returns `true` when a token has been issued and is past its renewal point.
	///
	/// Returns `false` when no token exists yet.
	pub fn is_expired(&self) -> bool {
		self.is_expired_at(OffsetDateTime::now_utc())
	}

	/// Same as [`is_expired`](Self::is_expired) with `instant` treated as "now".
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		self.cached
			.read()
			.as_ref()
			.is_some_and(|issued| issued.claims.is_stale_at(instant, GRACE_WINDOW))
	}

	/// Signs a new token and replaces the cached one.
	///
	/// Requests already carrying the previous token are unaffected.
	pub fn refresh(&self) -> Result<SignedToken, TokenError> {
		self.refresh_at(OffsetDateTime::now_utc())
	}

	/// Same as [`refresh`](Self::refresh) with `instant` used as the issued-at time.
	pub fn refresh_at(&self, instant: OffsetDateTime) -> Result<SignedToken, TokenError> {
		let issued = signer::sign(
			&self.api_key,
			&self.api_secret,
			self.project.as_deref(),
			self.ttl,
			instant,
		)?;

		#[cfg(feature = "tracing")]
		tracing::debug!(
			issuer = %issued.claims.iss,
			iat = issued.claims.iat,
			exp = issued.claims.exp,
			"Issued a new SyncFlow API token."
		);

		let token = issued.token.clone();

		*self.cached.write() = Some(Arc::new(issued));

		Ok(token)
	}

	/// Claims of the cached token, if one has been issued.
	pub fn cached_claims(&self) -> Option<ApiClaims> {
		self.cached.read().as_ref().map(|issued| issued.claims.clone())
	}
}
impl Debug for ProjectTokenClaims {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ProjectTokenClaims")
			.field("api_key", &self.api_key)
			.field("api_secret", &"<redacted>")
			.field("project", &self.project)
			.field("ttl", &self.ttl)
			.field("auto_renew", &self.auto_renew)
			.field("cached_claims", &self.cached_claims())
			.finish()
	}
}
