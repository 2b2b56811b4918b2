use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{Error, NotefoldService, Result};
use notefold_storage::{models::FolderWithNoteCount, queries};

pub const DEFAULT_FOLDER_NAME: &str = "Untitled Folder";
pub const SEED_FOLDER_NAME: &str = "Default Folder";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreateFolderRequest {
	#[serde(default)]
	pub name: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UpdateFolderRequest {
	#[serde(default)]
	pub name: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FolderResponse {
	pub id: i64,
	pub name: String,
	#[serde(with = "time::serde::rfc3339")]
	pub created_at: OffsetDateTime,
	#[serde(with = "time::serde::rfc3339")]
	pub updated_at: OffsetDateTime,
	pub note_count: i64,
}
impl From<FolderWithNoteCount> for FolderResponse {
	fn from(folder: FolderWithNoteCount) -> Self {
		Self {
			id: folder.id,
			name: folder.name,
			created_at: folder.created_at,
			updated_at: folder.updated_at,
			note_count: folder.note_count,
		}
	}
}

impl NotefoldService {
	pub async fn list_folders(&self) -> Result<Vec<FolderResponse>> {
		let folders = queries::list_folders(&self.db.pool).await?;

		Ok(folders.into_iter().map(FolderResponse::from).collect())
	}

	pub async fn create_folder(&self, req: CreateFolderRequest) -> Result<FolderResponse> {
		let now = OffsetDateTime::now_utc();
		let name = req.name.unwrap_or_else(|| DEFAULT_FOLDER_NAME.to_string());
		let folder = queries::insert_folder(&self.db.pool, &name, now).await?;

		Ok(FolderResponse {
			id: folder.id,
			name: folder.name,
			created_at: folder.created_at,
			updated_at: folder.updated_at,
			note_count: 0,
		})
	}

	pub async fn update_folder(&self, id: i64, req: UpdateFolderRequest) -> Result<FolderResponse> {
		let now = OffsetDateTime::now_utc();
		let mut tx = self.db.pool.begin().await?;
		let renamed = queries::rename_folder(&mut *tx, id, req.name.as_deref(), now).await?;

		if !renamed {
			return Err(folder_not_found(id));
		}

		let folder = queries::fetch_folder_with_count(&mut *tx, id)
			.await?
			.ok_or_else(|| folder_not_found(id))?;

		tx.commit().await?;

		Ok(folder.into())
	}

	pub async fn delete_folder(&self, id: i64) -> Result<()> {
		if !queries::delete_folder(&self.db, id).await? {
			return Err(folder_not_found(id));
		}

		tracing::debug!(folder_id = id, "Deleted folder and its notes.");

		Ok(())
	}
}

pub(crate) fn folder_not_found(id: i64) -> Error {
	Error::NotFound { message: format!("Folder {id} not found.") }
}
