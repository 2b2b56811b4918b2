//! Cookie-backed sessions.
//!
//! The session cookie is signed with the server key, so its value only needs
//! to carry whether the bearer logged in and, for remembered sessions, when
//! the grant expires. Handlers never read the cookie themselves; they take a
//! [`SessionContext`] (or [`RequireAuth`] on protected routes) and let the
//! extractor do the verification.

use std::convert::Infallible;

use axum::{
	extract::{FromRef, FromRequestParts},
	http::request::Parts,
};
use axum_extra::extract::{
	SignedCookieJar,
	cookie::{Cookie, Key, SameSite},
};
use time::OffsetDateTime;

use crate::routes::ApiError;

pub const SESSION_COOKIE: &str = "notefold_session";

const CLAIMS_TAG: &str = "auth";

/// What the signed cookie said about the caller. Available on every route,
/// authenticated or not.
#[derive(Clone, Copy, Debug)]
pub struct SessionContext {
	pub authenticated: bool,
}
impl<S> FromRequestParts<S> for SessionContext
where
	Key: FromRef<S>,
	S: Send + Sync,
{
	type Rejection = Infallible;

	async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
		let jar = match SignedCookieJar::from_request_parts(parts, state).await {
			Ok(jar) => jar,
			Err(err) => match err {},
		};

		Ok(read_session(&jar))
	}
}

/// Marker extractor for protected routes. Rejects with the uniform 401 body
/// when the session is missing, tampered with, or expired.
#[derive(Clone, Copy, Debug)]
pub struct RequireAuth;
impl<S> FromRequestParts<S> for RequireAuth
where
	Key: FromRef<S>,
	S: Send + Sync,
{
	type Rejection = ApiError;

	async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
		let session = match SessionContext::from_request_parts(parts, state).await {
			Ok(session) => session,
			Err(err) => match err {},
		};

		if session.authenticated { Ok(Self) } else { Err(ApiError::auth_required()) }
	}
}

#[derive(Clone, Copy, Debug)]
struct SessionClaims {
	expires_at: Option<OffsetDateTime>,
}

pub(crate) fn read_session(jar: &SignedCookieJar) -> SessionContext {
	let authenticated = jar
		.get(SESSION_COOKIE)
		.and_then(|cookie| parse_claims(cookie.value()))
		.map(|claims| {
			claims.expires_at.is_none_or(|expires_at| expires_at > OffsetDateTime::now_utc())
		})
		.unwrap_or(false);

	SessionContext { authenticated }
}

/// Builds the login cookie. `Max-Age` is only set for remembered sessions;
/// otherwise the cookie lives until the browser closes.
pub(crate) fn session_cookie(expires_at: Option<OffsetDateTime>) -> Cookie<'static> {
	let mut cookie = Cookie::new(SESSION_COOKIE, encode_claims(expires_at));

	cookie.set_path("/");
	cookie.set_http_only(true);
	cookie.set_same_site(SameSite::Lax);
	if let Some(expires_at) = expires_at {
		cookie.set_max_age(expires_at - OffsetDateTime::now_utc());
	}

	cookie
}

pub(crate) fn removal_cookie() -> Cookie<'static> {
	let mut cookie = Cookie::new(SESSION_COOKIE, "");

	cookie.set_path("/");

	cookie
}

// Keeps the cookie value inside the plain cookie-octet range; no quoting or
// percent-encoding to worry about on either end.
fn encode_claims(expires_at: Option<OffsetDateTime>) -> String {
	match expires_at {
		Some(expires_at) => format!("{CLAIMS_TAG}:{}", expires_at.unix_timestamp()),
		None => CLAIMS_TAG.to_string(),
	}
}

fn parse_claims(value: &str) -> Option<SessionClaims> {
	match value.strip_prefix(CLAIMS_TAG)? {
		"" => Some(SessionClaims { expires_at: None }),
		rest => {
			let seconds = rest.strip_prefix(':')?.parse::<i64>().ok()?;
			let expires_at = OffsetDateTime::from_unix_timestamp(seconds).ok()?;

			Some(SessionClaims { expires_at: Some(expires_at) })
		},
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	use time::Duration;

	#[test]
	fn claims_round_trip_without_expiry() {
		let claims =
			parse_claims(&encode_claims(None)).expect("Failed to parse session-scoped claims.");

		assert!(claims.expires_at.is_none());
	}

	#[test]
	fn claims_round_trip_with_expiry() {
		let expires_at = OffsetDateTime::now_utc() + Duration::days(7);
		let claims = parse_claims(&encode_claims(Some(expires_at)))
			.expect("Failed to parse remembered claims.");

		assert_eq!(
			claims.expires_at.map(OffsetDateTime::unix_timestamp),
			Some(expires_at.unix_timestamp())
		);
	}

	#[test]
	fn garbage_claims_are_rejected() {
		assert!(parse_claims("").is_none());
		assert!(parse_claims("auth:").is_none());
		assert!(parse_claims("auth:tomorrow").is_none());
		assert!(parse_claims("admin").is_none());
	}

	#[test]
	fn remembered_cookie_carries_max_age() {
		let cookie = session_cookie(Some(OffsetDateTime::now_utc() + Duration::days(7)));

		assert!(cookie.max_age().is_some());
		assert_eq!(cookie.http_only(), Some(true));
		assert_eq!(cookie.same_site(), Some(SameSite::Lax));
		assert_eq!(cookie.path(), Some("/"));
	}

	#[test]
	fn session_cookie_omits_max_age() {
		let cookie = session_cookie(None);

		assert!(cookie.max_age().is_none());
	}
}
