//! API token claims and the HS256 signer that turns them into bearer credentials.

// crates.io
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
// self
use crate::{
	_prelude::*,
	auth::token::secret::{ApiSecret, SignedToken},
	error::TokenError,
};

/// Claims embedded in every SyncFlow API token.
///
/// `exp` is fixed to `iat + ttl` when the claims are created and never changes afterwards;
/// renewal produces a new value instead.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiClaims {
	/// Issued-at, in seconds since the Unix epoch.
	pub iat: i64,
	/// Expiry, in seconds since the Unix epoch.
	pub exp: i64,
	/// Issuer; always the API key.
	pub iss: String,
	/// Project the token is scoped to, if any.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub project: Option<String>,
}
impl ApiClaims {
	/// Builds claims issued at `issued_at` that stay valid for `ttl`.
	pub fn new(
		issuer: impl Into<String>,
		project: Option<&str>,
		issued_at: OffsetDateTime,
		ttl: Duration,
	) -> Self {
		let iat = issued_at.unix_timestamp();

		Self {
			iat,
			exp: iat.saturating_add(ttl.whole_seconds()),
			iss: issuer.into(),
			project: project.map(ToOwned::to_owned),
		}
	}

	/// Returns `true` once `instant` reaches `exp - grace`.
	///
	/// Claims whose TTL does not exceed `grace` are stale from the moment they are issued.
	pub fn is_stale_at(&self, instant: OffsetDateTime, grace: Duration) -> bool {
		instant.unix_timestamp() >= self.exp.saturating_sub(grace.whole_seconds())
	}

	/// Reads the claims segment of `token` without verifying its signature.
	pub fn decode_unverified(token: &str) -> Result<Self, TokenError> {
		let mut segments = token.split('.');
		let (Some(_header), Some(claims), Some(_signature), None) =
			(segments.next(), segments.next(), segments.next(), segments.next())
		else {
			return Err(TokenError::Malformed);
		};
		let raw = URL_SAFE_NO_PAD.decode(claims)?;

		serde_json::from_slice(&raw).map_err(TokenError::Claims)
	}
}

/// A signed token together with the claims it carries.
#[derive(Clone, Debug)]
pub struct IssuedToken {
	/// Compact JWS presented to the server.
	pub token: SignedToken,
	/// Claims encoded inside [`IssuedToken::token`].
	pub claims: ApiClaims,
}

/// Signs fresh claims for `issuer` with HS256.
///
/// The output depends only on the arguments; callers pass the wall clock as `issued_at`.
pub fn sign(
	issuer: &str,
	secret: &ApiSecret,
	project: Option<&str>,
	ttl: Duration,
	issued_at: OffsetDateTime,
) -> Result<IssuedToken, TokenError> {
	let claims = ApiClaims::new(issuer, project, issued_at, ttl);
	let token = jsonwebtoken::encode(
		&Header::new(Algorithm::HS256),
		&claims,
		&EncodingKey::from_secret(secret.expose().as_bytes()),
	)
	.map_err(TokenError::Signing)?;

	Ok(IssuedToken { token: SignedToken::new(token), claims })
}

#[cfg(test)]
mod tests {
	// crates.io
	use jsonwebtoken::{DecodingKey, Validation};
	use time::macros;
	// self
	use super::*;

	const GRACE: Duration = Duration::seconds(100);

	fn verifier() -> Validation {
		let mut validation = Validation::new(Algorithm::HS256);

		validation.validate_exp = false;
		validation.set_required_spec_claims(&["iss", "exp"]);

		validation
	}

	#[test]
	fn signed_token_verifies_with_shared_secret() {
		let secret = ApiSecret::new("shared-secret");
		let issued = macros::datetime!(2025-01-01 00:00 UTC);
		let issued_token = sign("api-key", &secret, Some("project-1"), Duration::hours(1), issued)
			.expect("Signing should succeed for a valid secret.");
		let data = jsonwebtoken::decode::<ApiClaims>(
			issued_token.token.expose(),
			&DecodingKey::from_secret(b"shared-secret"),
			&verifier(),
		)
		.expect("Token should verify with the shared secret.");

		assert_eq!(data.claims, issued_token.claims);
		assert_eq!(data.claims.iss, "api-key");
		assert_eq!(data.claims.project.as_deref(), Some("project-1"));
		assert_eq!(data.claims.exp - data.claims.iat, 3600);
		assert_eq!(issued_token.token.expose().split('.').count(), 3);
	}

	#[test]
	fn wrong_secret_fails_verification() {
		let issued_token = sign(
			"api-key",
			&ApiSecret::new("shared-secret"),
			None,
			Duration::hours(1),
			macros::datetime!(2025-01-01 00:00 UTC),
		)
		.expect("Signing should succeed.");

		assert!(
			jsonwebtoken::decode::<ApiClaims>(
				issued_token.token.expose(),
				&DecodingKey::from_secret(b"other-secret"),
				&verifier(),
			)
			.is_err()
		);
	}

	#[test]
	fn signing_is_deterministic_for_identical_timestamps() {
		let secret = ApiSecret::new("shared-secret");
		let issued = macros::datetime!(2025-06-01 12:00 UTC);
		let first = sign("k", &secret, None, Duration::minutes(5), issued)
			.expect("First signing should succeed.");
		let second = sign("k", &secret, None, Duration::minutes(5), issued)
			.expect("Second signing should succeed.");

		assert_eq!(first.token, second.token);
	}

	#[test]
	fn project_claim_is_omitted_when_absent() {
		let issued_token = sign(
			"k",
			&ApiSecret::new("s"),
			None,
			Duration::minutes(5),
			macros::datetime!(2025-06-01 12:00 UTC),
		)
		.expect("Signing should succeed.");
		let claims = ApiClaims::decode_unverified(issued_token.token.expose())
			.expect("Claims should be readable.");

		assert_eq!(claims.project, None);
		assert_eq!(claims, issued_token.claims);
	}

	#[test]
	fn staleness_starts_one_grace_window_before_expiry() {
		let issued = macros::datetime!(2025-01-01 00:00 UTC);
		let claims = ApiClaims::new("k", None, issued, Duration::hours(1));

		assert!(!claims.is_stale_at(issued, GRACE));
		assert!(!claims.is_stale_at(macros::datetime!(2025-01-01 00:58:19 UTC), GRACE));
		assert!(claims.is_stale_at(macros::datetime!(2025-01-01 00:58:20 UTC), GRACE));
		assert!(claims.is_stale_at(macros::datetime!(2025-01-01 01:30 UTC), GRACE));
	}

	#[test]
	fn ttl_within_grace_window_is_stale_immediately() {
		let issued = macros::datetime!(2025-01-01 00:00 UTC);

		assert!(ApiClaims::new("k", None, issued, GRACE).is_stale_at(issued, GRACE));
		assert!(ApiClaims::new("k", None, issued, Duration::seconds(30)).is_stale_at(issued, GRACE));
		assert!(!ApiClaims::new("k", None, issued, GRACE + Duration::SECOND).is_stale_at(issued, GRACE));
	}

	#[test]
	fn unverified_decode_rejects_malformed_tokens() {
		assert!(matches!(ApiClaims::decode_unverified("only.two"), Err(TokenError::Malformed)));
		assert!(matches!(ApiClaims::decode_unverified("a.b.c.d"), Err(TokenError::Malformed)));
		assert!(matches!(ApiClaims::decode_unverified("a.***.c"), Err(TokenError::Encoding(_))));

		let not_claims = URL_SAFE_NO_PAD.encode(b"[1,2,3]");

		assert!(matches!(
			ApiClaims::decode_unverified(&format!("h.{not_claims}.s")),
			Err(TokenError::Claims(_))
		));
	}
}
