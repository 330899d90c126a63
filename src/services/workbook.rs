//! Workbook source service
//!
//! Locates workbook files in the data directory and decodes their worksheets
//! with `calamine`. Decoding is blocking work and runs on the blocking pool.

use super::records::{records_from_range, RecordCollection};
use async_trait::async_trait;
use calamine::{open_workbook_auto, Reader};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;

/// File extension served by the directory listing
pub const WORKBOOK_EXTENSION: &str = "xlsx";

/// Errors raised while resolving or decoding a source
#[derive(Error, Debug)]
pub enum SourceError {
    /// Source file, or a sheet inside it, does not exist
    #[error("{0}")]
    NotFound(String),

    /// Source exists but the decoder rejected it
    #[error("{0}")]
    Decode(String),

    /// The data directory itself could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SourceError {
    fn file_not_found() -> Self {
        SourceError::NotFound("File not found".to_string())
    }
}

/// A place records can be loaded from
///
/// Handlers only talk to this trait, so tests can swap in a counting or
/// failing implementation.
#[async_trait]
pub trait SheetSource: Send + Sync {
    /// Names of all available workbook files, sorted
    async fn list_files(&self) -> Result<Vec<String>, SourceError>;

    /// Whether `file` names an existing workbook
    async fn contains(&self, file: &str) -> bool;

    /// Sheet names of `file`, in workbook order
    async fn sheet_names(&self, file: &str) -> Result<Vec<String>, SourceError>;

    /// Decode one sheet of `file`; `None` selects the first sheet
    async fn load_sheet(
        &self,
        file: &str,
        sheet: Option<&str>,
    ) -> Result<RecordCollection, SourceError>;
}

/// Workbooks stored as files in a single directory
#[derive(Debug, Clone)]
pub struct WorkbookDirectory {
    root: PathBuf,
}

impl WorkbookDirectory {
    /// Create a source rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve a client-supplied file name to a path inside the root.
    ///
    /// Names that could escape the directory are reported as not found.
    pub async fn resolve(&self, file: &str) -> Result<PathBuf, SourceError> {
        if !is_plain_file_name(file) {
            tracing::debug!(file = %file, "Rejected unsafe file name");
            return Err(SourceError::file_not_found());
        }

        let path = self.root.join(file);
        if !is_regular_file(&path).await {
            return Err(SourceError::file_not_found());
        }
        Ok(path)
    }
}

fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0'])
}

/// Follows symlinks, so listing and resolving agree on linked workbooks
async fn is_regular_file(path: &Path) -> bool {
    fs::metadata(path)
        .await
        .is_ok_and(|metadata| metadata.is_file())
}

fn has_workbook_extension(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(WORKBOOK_EXTENSION))
}

#[async_trait]
impl SheetSource for WorkbookDirectory {
    async fn list_files(&self) -> Result<Vec<String>, SourceError> {
        let mut entries = fs::read_dir(&self.root).await?;
        let mut files = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if has_workbook_extension(&name) && is_regular_file(&entry.path()).await {
                files.push(name);
            }
        }

        files.sort();
        Ok(files)
    }

    async fn contains(&self, file: &str) -> bool {
        self.resolve(file).await.is_ok()
    }

    async fn sheet_names(&self, file: &str) -> Result<Vec<String>, SourceError> {
        let path = self.resolve(file).await?;

        run_blocking(move || {
            let workbook = open_workbook_auto(&path)
                .map_err(|e| SourceError::Decode(format!("Failed to read file: {}", e)))?;
            Ok(workbook.sheet_names().to_vec())
        })
        .await
    }

    async fn load_sheet(
        &self,
        file: &str,
        sheet: Option<&str>,
    ) -> Result<RecordCollection, SourceError> {
        let path = self.resolve(file).await?;
        let sheet = sheet.map(str::to_string);

        let records = run_blocking(move || decode_sheet(&path, sheet.as_deref())).await?;
        tracing::debug!(file = %file, rows = records.len(), "Decoded sheet");
        Ok(records)
    }
}

fn decode_sheet(path: &Path, sheet: Option<&str>) -> Result<RecordCollection, SourceError> {
    let mut workbook = open_workbook_auto(path).map_err(load_error)?;
    let names = workbook.sheet_names().to_vec();

    let name = match sheet {
        Some(requested) => {
            if !names.iter().any(|n| n == requested) {
                return Err(SourceError::NotFound(format!(
                    "Sheet not found: {}",
                    requested
                )));
            }
            requested.to_string()
        }
        None => names
            .first()
            .cloned()
            .ok_or_else(|| load_error("workbook has no worksheets"))?,
    };

    let range = workbook.worksheet_range(&name).map_err(load_error)?;
    Ok(records_from_range(&range))
}

fn load_error(e: impl std::fmt::Display) -> SourceError {
    SourceError::Decode(format!("Could not load sheet: {}", e))
}

async fn run_blocking<T, F>(task: F) -> Result<T, SourceError>
where
    F: FnOnce() -> Result<T, SourceError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|e| SourceError::Decode(format!("Decoding task failed: {}", e)))?
}
