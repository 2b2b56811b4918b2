mod error;

pub use error::{Error, Result};

use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// An isolated on-disk database location for one test. The backing directory
/// is removed when this value drops.
pub struct TestDatabase {
	dir: TempDir,
}
impl TestDatabase {
	pub fn new() -> Result<Self> {
		Ok(Self { dir: TempDir::new()? })
	}

	pub fn db_path(&self) -> PathBuf {
		self.dir.path().join("notefold.db")
	}

	pub fn root(&self) -> &Path {
		self.dir.path()
	}
}
