//! Output writing for generated files.
//!
//! A generated file is only rewritten when its content changed, so a
//! regeneration from an unchanged schema leaves enum mappings and the
//! manifest untouched on disk. Dry runs report what would be written.

use std::path::PathBuf;

use prisma_nestjs_dto::GeneratedFile;
use tracing::{debug, trace};

use crate::error::{CliResult, WriteError};

/// What a write pass did with one generated file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    /// New or changed content was written.
    Written { bytes: usize },
    /// The file on disk already holds this content.
    Unchanged,
    /// Dry run: the file would have been written.
    Previewed,
}

/// Status of one generated file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub status: FileStatus,
}

/// Per-file outcomes of a write pass, in generation order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteReport {
    pub outcomes: Vec<FileOutcome>,
}

impl WriteReport {
    /// Number of files actually written.
    pub fn written(&self) -> usize {
        self.count(|s| matches!(s, FileStatus::Written { .. }))
    }

    pub fn unchanged(&self) -> usize {
        self.count(|s| s == FileStatus::Unchanged)
    }

    pub fn previewed(&self) -> usize {
        self.count(|s| s == FileStatus::Previewed)
    }

    pub fn bytes_written(&self) -> usize {
        self.outcomes
            .iter()
            .map(|o| match o.status {
                FileStatus::Written { bytes } => bytes,
                _ => 0,
            })
            .sum()
    }

    fn count(&self, pred: impl Fn(FileStatus) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(o.status)).count()
    }
}

/// Whether the file on disk already holds the generated content.
pub fn is_current(file: &GeneratedFile) -> bool {
    std::fs::read_to_string(&file.path).is_ok_and(|existing| existing == file.content)
}

/// Writes generated files below their target paths.
#[derive(Debug, Clone, Copy)]
pub struct OutputWriter {
    dry_run: bool,
}

impl OutputWriter {
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    /// Write one file, creating parent directories.
    pub fn write_file(&self, file: &GeneratedFile) -> CliResult<FileStatus> {
        if self.dry_run {
            return Ok(FileStatus::Previewed);
        }
        if is_current(file) {
            trace!(path = %file.path.display(), "Content unchanged");
            return Ok(FileStatus::Unchanged);
        }

        if let Some(parent) = file.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| WriteError::CreateDir {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        std::fs::write(&file.path, &file.content).map_err(|e| WriteError::WriteFile {
            path: file.path.clone(),
            source: e,
        })?;

        debug!(path = %file.path.display(), bytes = file.content.len(), "Wrote file");
        Ok(FileStatus::Written {
            bytes: file.content.len(),
        })
    }

    /// Write every generated file, stopping at the first failure.
    pub fn write_all(&self, files: &[GeneratedFile]) -> CliResult<WriteReport> {
        let outcomes = files
            .iter()
            .map(|file| {
                Ok(FileOutcome {
                    path: file.path.clone(),
                    status: self.write_file(file)?,
                })
            })
            .collect::<CliResult<Vec<_>>>()?;

        Ok(WriteReport { outcomes })
    }
}
