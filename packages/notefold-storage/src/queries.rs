use sqlx::{Executor, Sqlite};
use time::{
	OffsetDateTime, UtcOffset, format_description::BorrowedFormatItem, macros::format_description,
};

use crate::{
	Result,
	db::Db,
	models::{FolderRecord, FolderWithNoteCount, NoteRecord},
};

// Fixed-width UTC text; lexicographic order on the stored column then matches
// time order, which the ORDER BY clauses below rely on.
const TIMESTAMP_FORMAT: &[BorrowedFormatItem<'static>] =
	format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:6]Z");

fn encode_timestamp(ts: OffsetDateTime) -> Result<String> {
	Ok(ts.to_offset(UtcOffset::UTC).format(TIMESTAMP_FORMAT)?)
}

pub struct NewNote<'a> {
	pub title: &'a str,
	pub content: &'a str,
	pub content_html: &'a str,
	pub folder_id: Option<i64>,
}

pub async fn insert_folder<'e, E>(
	executor: E,
	name: &str,
	now: OffsetDateTime,
) -> Result<FolderRecord>
where
	E: Executor<'e, Database = Sqlite>,
{
	let now = encode_timestamp(now)?;
	let folder: FolderRecord = sqlx::query_as(
		"\
INSERT INTO folders (name, created_at, updated_at)
VALUES (?1, ?2, ?3)
RETURNING id, name, created_at, updated_at",
	)
	.bind(name)
	.bind(now.as_str())
	.bind(now.as_str())
	.fetch_one(executor)
	.await?;

	Ok(folder)
}

pub async fn list_folders<'e, E>(executor: E) -> Result<Vec<FolderWithNoteCount>>
where
	E: Executor<'e, Database = Sqlite>,
{
	let folders: Vec<FolderWithNoteCount> = sqlx::query_as(
		"\
SELECT
	f.id,
	f.name,
	f.created_at,
	f.updated_at,
	(SELECT COUNT(*) FROM notes n WHERE n.folder_id = f.id) AS note_count
FROM folders f
ORDER BY f.created_at ASC, f.id ASC",
	)
	.fetch_all(executor)
	.await?;

	Ok(folders)
}

pub async fn fetch_folder_with_count<'e, E>(
	executor: E,
	id: i64,
) -> Result<Option<FolderWithNoteCount>>
where
	E: Executor<'e, Database = Sqlite>,
{
	let folder: Option<FolderWithNoteCount> = sqlx::query_as(
		"\
SELECT
	f.id,
	f.name,
	f.created_at,
	f.updated_at,
	(SELECT COUNT(*) FROM notes n WHERE n.folder_id = f.id) AS note_count
FROM folders f
WHERE f.id = ?1",
	)
	.bind(id)
	.fetch_optional(executor)
	.await?;

	Ok(folder)
}

pub async fn folder_exists<'e, E>(executor: E, id: i64) -> Result<bool>
where
	E: Executor<'e, Database = Sqlite>,
{
	let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM folders WHERE id = ?1)")
		.bind(id)
		.fetch_one(executor)
		.await?;

	Ok(exists)
}

pub async fn count_folders<'e, E>(executor: E) -> Result<i64>
where
	E: Executor<'e, Database = Sqlite>,
{
	let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM folders").fetch_one(executor).await?;

	Ok(count)
}

/// Renames a folder and bumps `updated_at`. A `None` name keeps the stored
/// one, so a bare touch still advances the timestamp.
pub async fn rename_folder<'e, E>(
	executor: E,
	id: i64,
	name: Option<&str>,
	now: OffsetDateTime,
) -> Result<bool>
where
	E: Executor<'e, Database = Sqlite>,
{
	let now = encode_timestamp(now)?;
	let result = sqlx::query(
		"\
UPDATE folders
SET name = COALESCE(?1, name), updated_at = ?2
WHERE id = ?3",
	)
	.bind(name)
	.bind(now.as_str())
	.bind(id)
	.execute(executor)
	.await?;

	Ok(result.rows_affected() > 0)
}

/// Deletes a folder and every note filed under it in one transaction.
pub async fn delete_folder(db: &Db, id: i64) -> Result<bool> {
	let mut tx = db.pool.begin().await?;

	sqlx::query("DELETE FROM notes WHERE folder_id = ?1").bind(id).execute(&mut *tx).await?;

	let result = sqlx::query("DELETE FROM folders WHERE id = ?1").bind(id).execute(&mut *tx).await?;

	tx.commit().await?;

	Ok(result.rows_affected() > 0)
}

/// Creates the first folder when the table is empty. Returns whether a row was
/// inserted.
pub async fn ensure_default_folder(db: &Db, name: &str, now: OffsetDateTime) -> Result<bool> {
	let mut tx = db.pool.begin().await?;
	let count = count_folders(&mut *tx).await?;

	if count > 0 {
		tx.commit().await?;

		return Ok(false);
	}

	let now = encode_timestamp(now)?;

	sqlx::query(
		"\
INSERT INTO folders (name, created_at, updated_at)
VALUES (?1, ?2, ?3)",
	)
	.bind(name)
	.bind(now.as_str())
	.bind(now.as_str())
	.execute(&mut *tx)
	.await?;

	tx.commit().await?;

	Ok(true)
}

pub async fn insert_note<'e, E>(
	executor: E,
	note: &NewNote<'_>,
	now: OffsetDateTime,
) -> Result<NoteRecord>
where
	E: Executor<'e, Database = Sqlite>,
{
	let now = encode_timestamp(now)?;
	let record: NoteRecord = sqlx::query_as(
		"\
INSERT INTO notes (title, content, content_html, folder_id, created_at, updated_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?6)
RETURNING id, title, content, content_html, folder_id, created_at, updated_at",
	)
	.bind(note.title)
	.bind(note.content)
	.bind(note.content_html)
	.bind(note.folder_id)
	.bind(now.as_str())
	.bind(now.as_str())
	.fetch_one(executor)
	.await?;

	Ok(record)
}

pub async fn fetch_note<'e, E>(executor: E, id: i64) -> Result<Option<NoteRecord>>
where
	E: Executor<'e, Database = Sqlite>,
{
	let note: Option<NoteRecord> = sqlx::query_as(
		"\
SELECT id, title, content, content_html, folder_id, created_at, updated_at
FROM notes
WHERE id = ?1",
	)
	.bind(id)
	.fetch_optional(executor)
	.await?;

	Ok(note)
}

pub async fn update_note<'e, E>(executor: E, note: &NoteRecord) -> Result<NoteRecord>
where
	E: Executor<'e, Database = Sqlite>,
{
	let updated_at = encode_timestamp(note.updated_at)?;
	let record: NoteRecord = sqlx::query_as(
		"\
UPDATE notes
SET
	title = ?1,
	content = ?2,
	content_html = ?3,
	folder_id = ?4,
	updated_at = ?5
WHERE id = ?6
RETURNING id, title, content, content_html, folder_id, created_at, updated_at",
	)
	.bind(note.title.as_str())
	.bind(note.content.as_str())
	.bind(note.content_html.as_str())
	.bind(note.folder_id)
	.bind(updated_at.as_str())
	.bind(note.id)
	.fetch_one(executor)
	.await?;

	Ok(record)
}

pub async fn delete_note<'e, E>(executor: E, id: i64) -> Result<bool>
where
	E: Executor<'e, Database = Sqlite>,
{
	let result = sqlx::query("DELETE FROM notes WHERE id = ?1").bind(id).execute(executor).await?;

	Ok(result.rows_affected() > 0)
}
