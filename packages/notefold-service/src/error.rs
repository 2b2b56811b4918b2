pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid password.")]
	InvalidPassword,
	#[error("{message}")]
	NotFound { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
}
impl From<sqlx::Error> for Error {
	fn from(err: sqlx::Error) -> Self {
		Self::Storage { message: err.to_string() }
	}
}
impl From<notefold_storage::Error> for Error {
	fn from(err: notefold_storage::Error) -> Self {
		Self::Storage { message: err.to_string() }
	}
}
