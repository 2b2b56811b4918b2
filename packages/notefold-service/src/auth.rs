use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use time::{Duration, OffsetDateTime};

use crate::{Error, NotefoldService, Result};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoginRequest {
	#[serde(default)]
	pub password: String,
	#[serde(default)]
	pub remember: bool,
}

/// The outcome of a successful login. `expires_at` is set only for remembered
/// sessions; a `None` means the session lives as long as the browser does.
#[derive(Clone, Copy, Debug)]
pub struct LoginGrant {
	pub expires_at: Option<OffsetDateTime>,
}

impl NotefoldService {
	pub fn login(&self, req: &LoginRequest) -> Result<LoginGrant> {
		if password_digest(&req.password) != password_digest(&self.cfg.security.app_password) {
			tracing::debug!("Rejected login attempt.");

			return Err(Error::InvalidPassword);
		}

		let expires_at = req.remember.then(|| {
			OffsetDateTime::now_utc() + Duration::days(self.cfg.security.session_ttl_days)
		});

		Ok(LoginGrant { expires_at })
	}
}

fn password_digest(password: &str) -> [u8; 32] {
	Sha256::digest(password.as_bytes()).into()
}
