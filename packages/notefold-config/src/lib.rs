mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Config, Security, Service, Sqlite, Storage};

use std::{env, fs, path::Path};

pub const PASSWORD_ENV: &str = "APP_PASSWORD";
pub const SECRET_ENV: &str = "SECRET_KEY";

pub fn load(path: Option<&Path>) -> Result<Config> {
	let mut cfg = match path {
		Some(path) => {
			let raw = fs::read_to_string(path)
				.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

			toml::from_str(&raw)
				.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?
		},
		None => Config::default(),
	};

	apply_env_overrides(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}
	if cfg.service.frontend_dir.as_os_str().is_empty() {
		return Err(Error::Validation {
			message: "service.frontend_dir must be non-empty.".to_string(),
		});
	}
	if cfg.storage.sqlite.path.as_os_str().is_empty() {
		return Err(Error::Validation {
			message: "storage.sqlite.path must be non-empty.".to_string(),
		});
	}
	if cfg.storage.sqlite.pool_max_conns == 0 {
		return Err(Error::Validation {
			message: "storage.sqlite.pool_max_conns must be greater than zero.".to_string(),
		});
	}
	if cfg.security.app_password.is_empty() {
		return Err(Error::Validation {
			message: "security.app_password must be non-empty.".to_string(),
		});
	}
	if cfg.security.session_secret.is_empty() {
		return Err(Error::Validation {
			message: "security.session_secret must be non-empty.".to_string(),
		});
	}
	if cfg.security.session_ttl_days <= 0 {
		return Err(Error::Validation {
			message: "security.session_ttl_days must be greater than zero.".to_string(),
		});
	}

	Ok(())
}

fn apply_env_overrides(cfg: &mut Config) {
	if let Ok(password) = env::var(PASSWORD_ENV)
		&& !password.is_empty()
	{
		cfg.security.app_password = password;
	}
	if let Ok(secret) = env::var(SECRET_ENV)
		&& !secret.is_empty()
	{
		cfg.security.session_secret = secret;
	}
}
