pub mod auth;
pub mod folders;
pub mod notes;

mod error;

pub use auth::{LoginGrant, LoginRequest};
pub use error::{Error, Result};
pub use folders::{
	CreateFolderRequest, DEFAULT_FOLDER_NAME, FolderResponse, SEED_FOLDER_NAME, UpdateFolderRequest,
};
pub use notes::{
	CreateNoteRequest, DEFAULT_NOTE_TITLE, ListNotesRequest, MoveNoteRequest, NoteResponse,
	UpdateNoteRequest,
};

use notefold_config::Config;
use notefold_storage::db::Db;

pub struct NotefoldService {
	pub cfg: Config,
	pub db: Db,
}
impl NotefoldService {
	pub fn new(cfg: Config, db: Db) -> Self {
		Self { cfg, db }
	}
}
