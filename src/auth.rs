//! Auth-domain identifiers, API secrets, and the signed-token lifecycle.

pub mod id;
pub mod token;

pub use id::*;
pub use token::{ProjectTokenClaims, DEFAULT_TOKEN_TTL, GRACE_WINDOW, claims::*, secret::*};
