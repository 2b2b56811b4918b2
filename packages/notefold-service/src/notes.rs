use serde::{Deserialize, Deserializer, Serialize};
use sqlx::{QueryBuilder, Sqlite, Transaction};
use time::OffsetDateTime;

use crate::{Error, NotefoldService, Result, folders};
use notefold_storage::{
	models::NoteRecord,
	queries::{self, NewNote},
};

pub const DEFAULT_NOTE_TITLE: &str = "Untitled Note";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ListNotesRequest {
	pub folder_id: Option<i64>,
	pub search: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreateNoteRequest {
	#[serde(default)]
	pub title: Option<String>,
	#[serde(default)]
	pub content: Option<String>,
	#[serde(default)]
	pub folder_id: Option<i64>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct UpdateNoteRequest {
	#[serde(default)]
	pub title: Option<String>,
	#[serde(default)]
	pub content: Option<String>,
	/// `None` keeps the stored folder; `Some(None)` moves the note out of any
	/// folder. The two are distinguishable on the wire as an absent key versus
	/// an explicit `null`.
	#[serde(default, deserialize_with = "double_option")]
	pub folder_id: Option<Option<i64>>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MoveNoteRequest {
	#[serde(default)]
	pub folder_id: Option<i64>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NoteResponse {
	pub id: i64,
	pub title: String,
	pub content: String,
	pub content_html: String,
	pub folder_id: Option<i64>,
	#[serde(with = "time::serde::rfc3339")]
	pub created_at: OffsetDateTime,
	#[serde(with = "time::serde::rfc3339")]
	pub updated_at: OffsetDateTime,
}
impl From<NoteRecord> for NoteResponse {
	fn from(note: NoteRecord) -> Self {
		Self {
			id: note.id,
			title: note.title,
			content: note.content,
			content_html: note.content_html,
			folder_id: note.folder_id,
			created_at: note.created_at,
			updated_at: note.updated_at,
		}
	}
}

fn double_option<'de, D>(deserializer: D) -> Result<Option<Option<i64>>, D::Error>
where
	D: Deserializer<'de>,
{
	Option::<i64>::deserialize(deserializer).map(Some)
}

impl NotefoldService {
	pub async fn list_notes(&self, req: ListNotesRequest) -> Result<Vec<NoteResponse>> {
		let mut builder = QueryBuilder::new(
			"SELECT id, title, content, content_html, folder_id, created_at, updated_at \
			 FROM notes WHERE 1 = 1",
		);

		if let Some(folder_id) = req.folder_id {
			builder.push(" AND folder_id = ");
			builder.push_bind(folder_id);
		}
		if let Some(search) = req.search.as_deref().filter(|term| !term.is_empty()) {
			// instr() keeps the match case-sensitive; LIKE would fold ASCII case.
			builder.push(" AND (instr(title, ");
			builder.push_bind(search);
			builder.push(") > 0 OR instr(content, ");
			builder.push_bind(search);
			builder.push(") > 0)");
		}
		builder.push(" ORDER BY updated_at DESC, id DESC");

		let notes: Vec<NoteRecord> = builder.build_query_as().fetch_all(&self.db.pool).await?;

		Ok(notes.into_iter().map(NoteResponse::from).collect())
	}

	pub async fn create_note(&self, req: CreateNoteRequest) -> Result<NoteResponse> {
		let now = OffsetDateTime::now_utc();
		let title = req.title.unwrap_or_else(|| DEFAULT_NOTE_TITLE.to_string());
		let content = req.content.unwrap_or_default();
		let content_html = notefold_render::render_markdown(&content);
		let mut tx = self.db.pool.begin().await?;

		if let Some(folder_id) = req.folder_id {
			ensure_folder_exists(&mut tx, folder_id).await?;
		}

		let note = queries::insert_note(
			&mut *tx,
			&NewNote {
				title: &title,
				content: &content,
				content_html: &content_html,
				folder_id: req.folder_id,
			},
			now,
		)
		.await?;

		tx.commit().await?;

		Ok(note.into())
	}

	pub async fn get_note(&self, id: i64) -> Result<NoteResponse> {
		let note = queries::fetch_note(&self.db.pool, id).await?.ok_or_else(|| note_not_found(id))?;

		Ok(note.into())
	}

	pub async fn update_note(&self, id: i64, req: UpdateNoteRequest) -> Result<NoteResponse> {
		let now = OffsetDateTime::now_utc();
		let mut tx = self.db.pool.begin().await?;
		let mut note = load_note(&mut tx, id).await?;

		if let Some(title) = req.title {
			note.title = title;
		}
		if let Some(content) = req.content {
			note.content_html = notefold_render::render_markdown(&content);
			note.content = content;
		}
		match req.folder_id {
			Some(Some(folder_id)) => {
				ensure_folder_exists(&mut tx, folder_id).await?;

				note.folder_id = Some(folder_id);
			},
			Some(None) => note.folder_id = None,
			None => {},
		}
		note.updated_at = now;

		let note = queries::update_note(&mut *tx, &note).await?;

		tx.commit().await?;

		Ok(note.into())
	}

	pub async fn delete_note(&self, id: i64) -> Result<()> {
		if !queries::delete_note(&self.db.pool, id).await? {
			return Err(note_not_found(id));
		}

		Ok(())
	}

	pub async fn move_note(&self, id: i64, req: MoveNoteRequest) -> Result<NoteResponse> {
		let now = OffsetDateTime::now_utc();
		let mut tx = self.db.pool.begin().await?;
		let mut note = load_note(&mut tx, id).await?;

		if let Some(folder_id) = req.folder_id {
			ensure_folder_exists(&mut tx, folder_id).await?;
		}
		note.folder_id = req.folder_id;
		note.updated_at = now;

		let note = queries::update_note(&mut *tx, &note).await?;

		tx.commit().await?;

		Ok(note.into())
	}
}

async fn load_note(tx: &mut Transaction<'_, Sqlite>, id: i64) -> Result<NoteRecord> {
	queries::fetch_note(&mut **tx, id).await?.ok_or_else(|| note_not_found(id))
}

async fn ensure_folder_exists(tx: &mut Transaction<'_, Sqlite>, folder_id: i64) -> Result<()> {
	if !queries::folder_exists(&mut **tx, folder_id).await? {
		return Err(folders::folder_not_found(folder_id));
	}

	Ok(())
}

fn note_not_found(id: i64) -> Error {
	Error::NotFound { message: format!("Note {id} not found.") }
}
