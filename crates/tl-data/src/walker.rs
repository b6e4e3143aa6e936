//! Loading every CSV file of a directory

use std::fs;
use std::path::{Path, PathBuf};
use rusqlite::Connection;
use tracing::{error, info};

use crate::ident::CSV_SUFFIX;
use crate::loader::{BulkLoader, LoadReport};
use crate::LoadError;

/// A file that could not be loaded
#[derive(Debug)]
pub struct FileFailure {
    pub path: PathBuf,
    pub error: LoadError,
}

/// Result of one directory run
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Files loaded completely, in processing order
    pub loaded: Vec<LoadReport>,
    /// Files that failed, in processing order
    pub failed: Vec<FileFailure>,
}

impl RunSummary {
    /// Files attempted
    pub fn files_seen(&self) -> usize {
        self.loaded.len() + self.failed.len()
    }

    /// Rows inserted by fully loaded files
    pub fn total_rows(&self) -> usize {
        self.loaded.iter().map(|r| r.rows_inserted).sum()
    }

    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

/// Drives the bulk loader over a directory
pub struct DirectoryWalker<'conn> {
    loader: BulkLoader<'conn>,
}

impl<'conn> DirectoryWalker<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self {
            loader: BulkLoader::new(conn),
        }
    }

    /// CSV files directly inside `dir`, in listing order
    pub fn csv_files(dir: &Path) -> Result<Vec<PathBuf>, LoadError> {
        let list_err = |source: std::io::Error| LoadError::ListDir {
            path: dir.to_path_buf(),
            source,
        };

        let mut files = Vec::new();
        for entry in fs::read_dir(dir).map_err(list_err)? {
            let entry = entry.map_err(list_err)?;
            let file_type = entry.file_type().map_err(list_err)?;
            if file_type.is_dir() {
                continue;
            }
            if entry.file_name().to_string_lossy().ends_with(CSV_SUFFIX) {
                files.push(entry.path());
            }
        }
        Ok(files)
    }

    /// Load every CSV file in `dir`.
    ///
    /// A failing file is logged and recorded; only a failure to list the
    /// directory fails the run.
    pub fn run<P: AsRef<Path>>(&self, dir: P) -> Result<RunSummary, LoadError> {
        let dir = dir.as_ref();
        let files = Self::csv_files(dir)?;
        info!("Found {} CSV files in {}", files.len(), dir.display());

        let mut summary = RunSummary::default();
        for path in files {
            match self.loader.load(&path) {
                Ok(report) => summary.loaded.push(report),
                Err(err) => {
                    error!(
                        table = err.table().unwrap_or("-"),
                        "Failed to process file {}: {}",
                        path.display(),
                        err
                    );
                    summary.failed.push(FileFailure { path, error: err });
                }
            }
        }

        info!(
            "Loaded {} of {} files, {} rows",
            summary.loaded.len(),
            summary.files_seen(),
            summary.total_rows()
        );
        Ok(summary)
    }
}
