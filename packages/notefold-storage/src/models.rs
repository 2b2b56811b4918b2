use time::OffsetDateTime;

#[derive(Debug, sqlx::FromRow)]
pub struct FolderRecord {
	pub id: i64,
	pub name: String,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}

#[derive(Debug, sqlx::FromRow)]
pub struct FolderWithNoteCount {
	pub id: i64,
	pub name: String,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
	pub note_count: i64,
}

#[derive(Debug, sqlx::FromRow)]
pub struct NoteRecord {
	pub id: i64,
	pub title: String,
	pub content: String,
	pub content_html: String,
	pub folder_id: Option<i64>,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}
