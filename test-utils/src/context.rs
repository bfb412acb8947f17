use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::error::TestError;

const STORE_FILE_NAME: &str = "members.csv";

/// Test context owning a temporary directory for the member store.
///
/// The directory and everything in it is removed when the context is dropped, so
/// keep the context alive for as long as the test uses the store path.
pub struct TestContext {
    dir: TempDir,
}

impl TestContext {
    /// Creates a context with a fresh, empty temporary directory.
    ///
    /// # Returns
    /// - `Ok(TestContext)` - New context
    /// - `Err(TestError::Io)` - Failed to create the temporary directory
    pub fn new() -> Result<Self, TestError> {
        Ok(Self {
            dir: tempfile::tempdir()?,
        })
    }

    /// Path of the member store file inside the temporary directory.
    ///
    /// The file only exists if the builder seeded it or the store wrote it.
    pub fn store_path(&self) -> PathBuf {
        self.dir.path().join(STORE_FILE_NAME)
    }

    /// A store path whose parent directory does not exist.
    ///
    /// Any write to this path fails, which lets tests exercise persistence errors.
    pub fn unwritable_store_path(&self) -> PathBuf {
        self.dir.path().join("missing").join(STORE_FILE_NAME)
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    /// Reads the store file back as text.
    pub fn read_store(&self) -> Result<String, TestError> {
        Ok(std::fs::read_to_string(self.store_path())?)
    }

    /// Removes the temporary directory's contents so later writes fail.
    ///
    /// Useful after a store has been loaded from `store_path()`: the store keeps its
    /// path, but the directory it writes into is gone.
    pub fn break_store_dir(&self) -> Result<(), TestError> {
        std::fs::remove_dir_all(self.dir.path())?;
        Ok(())
    }
}
