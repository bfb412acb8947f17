use crate::{context::TestContext, error::TestError};

/// Header row of the member store file.
pub const STORE_HEADER: &str =
    "ID,DisplayName,MembershipStatus,StrikeCount,Reason1,Reason2,Reason3,Reason4,BanExpiry";

/// Builder for creating test contexts with a seeded member store file.
///
/// By default no store file is written, which exercises the "file absent" path of
/// the store. Adding rows with `with_row()` writes a file with the header followed by
/// the rows in the order they were added.
///
/// # Example
///
/// ```rust,ignore
/// use test_utils::builder::TestBuilder;
///
/// let test = TestBuilder::new()
///     .with_row("1,Alice,member,0,,,,,")
///     .with_row("2,Bob,guest,1,spam,,,,")
///     .build()?;
/// ```
pub struct TestBuilder {
    /// Raw contents of the store file, `None` leaves the file absent.
    contents: Option<String>,
}

impl TestBuilder {
    /// Creates a new test builder with no store file.
    pub fn new() -> Self {
        Self { contents: None }
    }

    /// Appends a data row to the store file, writing the header first if needed.
    ///
    /// The row is written verbatim, so malformed rows can be seeded too.
    ///
    /// # Arguments
    /// - `row` - One CSV line without the trailing newline
    ///
    /// # Returns
    /// - `Self` - Builder instance for method chaining
    pub fn with_row(mut self, row: &str) -> Self {
        let contents = self
            .contents
            .get_or_insert_with(|| format!("{}\n", STORE_HEADER));
        contents.push_str(row);
        contents.push('\n');
        self
    }

    /// Writes a store file containing only the header row.
    pub fn with_empty_store(mut self) -> Self {
        self.contents
            .get_or_insert_with(|| format!("{}\n", STORE_HEADER));
        self
    }

    /// Replaces the store file with exactly `contents`.
    pub fn with_raw_store(mut self, contents: &str) -> Self {
        self.contents = Some(contents.to_string());
        self
    }

    /// Builds the test context, creating the temporary directory and store file.
    ///
    /// # Returns
    /// - `Ok(TestContext)` - Context owning the temporary directory
    /// - `Err(TestError::Io)` - Failed to create the directory or write the file
    pub fn build(self) -> Result<TestContext, TestError> {
        let context = TestContext::new()?;

        if let Some(contents) = self.contents {
            std::fs::write(context.store_path(), contents)?;
        }

        Ok(context)
    }
}

impl Default for TestBuilder {
    fn default() -> Self {
        Self::new()
    }
}
