use axum::{
	Json, Router,
	extract::{Path, Query, State},
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{get, post, put},
};
use axum_extra::extract::SignedCookieJar;
use serde::Serialize;
use tower_http::{
	services::{ServeDir, ServeFile},
	trace::TraceLayer,
};

use notefold_service::{
	CreateFolderRequest, CreateNoteRequest, Error as ServiceError, FolderResponse, ListNotesRequest,
	LoginRequest, MoveNoteRequest, NoteResponse, UpdateFolderRequest, UpdateNoteRequest,
};

use crate::{
	session::{self, RequireAuth, SessionContext},
	state::AppState,
};

/// Builds the full application router: the `/api` surface plus a static
/// fallback that serves the frontend bundle, with unknown paths rewritten to
/// `index.html` so client-side routing works on deep links.
pub fn router(state: AppState, frontend_dir: &std::path::Path) -> Router {
	let spa = ServeDir::new(frontend_dir).fallback(ServeFile::new(frontend_dir.join("index.html")));

	Router::new()
		.route("/api/health", get(health))
		.route("/api/auth/check", get(auth_check))
		.route("/api/login", post(login))
		.route("/api/logout", post(logout))
		.route("/api/folders", get(list_folders).post(create_folder))
		.route("/api/folders/{id}", put(update_folder).delete(delete_folder))
		.route("/api/notes", get(list_notes).post(create_note))
		.route("/api/notes/{id}", get(get_note).put(update_note).delete(delete_note))
		.route("/api/notes/{id}/move", post(move_note))
		.fallback_service(spa)
		.layer(TraceLayer::new_for_http())
		.with_state(state)
}

async fn health(session: SessionContext) -> Json<HealthBody> {
	Json(HealthBody { status: "ok", authenticated: session.authenticated })
}

async fn auth_check(session: SessionContext) -> Json<AuthCheckBody> {
	Json(AuthCheckBody { authenticated: session.authenticated })
}

async fn login(
	State(state): State<AppState>,
	jar: SignedCookieJar,
	Json(payload): Json<LoginRequest>,
) -> Result<(SignedCookieJar, Json<MessageBody>), ApiError> {
	let grant = state.service.login(&payload)?;
	let jar = jar.add(session::session_cookie(grant.expires_at));

	Ok((jar, Json(MessageBody { message: "Logged in." })))
}

// Logging out without a session is fine; the removal cookie is sent either way.
async fn logout(jar: SignedCookieJar) -> (SignedCookieJar, Json<MessageBody>) {
	(jar.remove(session::removal_cookie()), Json(MessageBody { message: "Logged out." }))
}

async fn list_folders(
	_auth: RequireAuth,
	State(state): State<AppState>,
) -> Result<Json<Vec<FolderResponse>>, ApiError> {
	let folders = state.service.list_folders().await?;
	Ok(Json(folders))
}

async fn create_folder(
	_auth: RequireAuth,
	State(state): State<AppState>,
	Json(payload): Json<CreateFolderRequest>,
) -> Result<(StatusCode, Json<FolderResponse>), ApiError> {
	let folder = state.service.create_folder(payload).await?;
	Ok((StatusCode::CREATED, Json(folder)))
}

async fn update_folder(
	_auth: RequireAuth,
	State(state): State<AppState>,
	Path(id): Path<i64>,
	Json(payload): Json<UpdateFolderRequest>,
) -> Result<Json<FolderResponse>, ApiError> {
	let folder = state.service.update_folder(id, payload).await?;
	Ok(Json(folder))
}

async fn delete_folder(
	_auth: RequireAuth,
	State(state): State<AppState>,
	Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
	state.service.delete_folder(id).await?;
	Ok(StatusCode::NO_CONTENT)
}

async fn list_notes(
	_auth: RequireAuth,
	State(state): State<AppState>,
	Query(query): Query<ListNotesRequest>,
) -> Result<Json<Vec<NoteResponse>>, ApiError> {
	let notes = state.service.list_notes(query).await?;
	Ok(Json(notes))
}

async fn create_note(
	_auth: RequireAuth,
	State(state): State<AppState>,
	Json(payload): Json<CreateNoteRequest>,
) -> Result<(StatusCode, Json<NoteResponse>), ApiError> {
	let note = state.service.create_note(payload).await?;
	Ok((StatusCode::CREATED, Json(note)))
}

async fn get_note(
	_auth: RequireAuth,
	State(state): State<AppState>,
	Path(id): Path<i64>,
) -> Result<Json<NoteResponse>, ApiError> {
	let note = state.service.get_note(id).await?;
	Ok(Json(note))
}

async fn update_note(
	_auth: RequireAuth,
	State(state): State<AppState>,
	Path(id): Path<i64>,
	Json(payload): Json<UpdateNoteRequest>,
) -> Result<Json<NoteResponse>, ApiError> {
	let note = state.service.update_note(id, payload).await?;
	Ok(Json(note))
}

async fn delete_note(
	_auth: RequireAuth,
	State(state): State<AppState>,
	Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
	state.service.delete_note(id).await?;
	Ok(StatusCode::NO_CONTENT)
}

async fn move_note(
	_auth: RequireAuth,
	State(state): State<AppState>,
	Path(id): Path<i64>,
	Json(payload): Json<MoveNoteRequest>,
) -> Result<Json<NoteResponse>, ApiError> {
	let note = state.service.move_note(id, payload).await?;
	Ok(Json(note))
}

#[derive(Debug, Serialize)]
struct HealthBody {
	status: &'static str,
	authenticated: bool,
}

#[derive(Debug, Serialize)]
struct AuthCheckBody {
	authenticated: bool,
}

#[derive(Debug, Serialize)]
struct MessageBody {
	message: &'static str,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error: String,
	code: &'static str,
}

/// Error envelope shared by every `/api` route: a human-readable `error`
/// string next to a stable machine-readable `code`.
#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	code: &'static str,
	message: String,
}
impl ApiError {
	fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
		Self { status, code, message: message.into() }
	}

	pub fn auth_required() -> Self {
		Self::new(StatusCode::UNAUTHORIZED, "AUTH_REQUIRED", "Authentication required.")
	}
}
impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		match err {
			ServiceError::InvalidPassword =>
				Self::new(StatusCode::UNAUTHORIZED, "INVALID_PASSWORD", "Invalid password."),
			ServiceError::NotFound { message } =>
				Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", message),
			ServiceError::Storage { message } => {
				tracing::error!(%message, "Storage failure.");

				Self::new(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL", "Internal server error.")
			},
		}
	}
}
impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody { error: self.message, code: self.code };

		(self.status, Json(body)).into_response()
	}
}
