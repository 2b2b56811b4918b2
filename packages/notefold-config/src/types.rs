use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub security: Security,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
	pub frontend_dir: PathBuf,
	pub open_browser: bool,
}
impl Default for Service {
	fn default() -> Self {
		Self {
			http_bind: "127.0.0.1:8080".to_string(),
			log_level: "info".to_string(),
			frontend_dir: PathBuf::from("frontend"),
			open_browser: true,
		}
	}
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Storage {
	pub sqlite: Sqlite,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Sqlite {
	pub path: PathBuf,
	pub pool_max_conns: u32,
}
impl Default for Sqlite {
	fn default() -> Self {
		Self { path: PathBuf::from("data/notefold.db"), pool_max_conns: 5 }
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Security {
	pub app_password: String,
	pub session_secret: String,
	pub session_ttl_days: i64,
}
impl Default for Security {
	fn default() -> Self {
		Self {
			app_password: "admin123".to_string(),
			session_secret: "dev-secret-key-change-in-production".to_string(),
			session_ttl_days: 7,
		}
	}
}
