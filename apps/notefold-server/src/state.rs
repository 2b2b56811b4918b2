use std::sync::Arc;

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use sha2::{Digest, Sha256};
use time::OffsetDateTime;

use notefold_service::{NotefoldService, SEED_FOLDER_NAME};
use notefold_storage::{db::Db, queries};

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<NotefoldService>,
	pub key: Key,
}
impl AppState {
	pub async fn new(config: notefold_config::Config) -> color_eyre::Result<Self> {
		let db = Db::connect(&config.storage.sqlite).await?;

		db.ensure_schema().await?;

		if queries::ensure_default_folder(&db, SEED_FOLDER_NAME, OffsetDateTime::now_utc()).await? {
			tracing::info!(name = SEED_FOLDER_NAME, "Seeded the default folder.");
		}

		let key = signing_key(&config.security.session_secret);
		let service = NotefoldService::new(config, db);

		Ok(Self { service: Arc::new(service), key })
	}
}

// SignedCookieJar pulls its key out of the router state through this impl.
impl FromRef<AppState> for Key {
	fn from_ref(state: &AppState) -> Self {
		state.key.clone()
	}
}

fn signing_key(secret: &str) -> Key {
	let digest: [u8; 32] = Sha256::digest(secret.as_bytes()).into();

	Key::derive_from(&digest)
}
