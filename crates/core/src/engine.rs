//! Batch file-processing engine.
//!
//! The engine drives the read -> detect -> resolve -> overwrite cycle over an
//! ordered list of target files:
//!
//! 1. Read the file in full as UTF-8 text.
//! 2. If the buffer contains the start token, resolve it and rewrite the
//!    file in place.
//! 3. Otherwise leave the file untouched (no write, no timestamp churn).
//!
//! Processing is strictly sequential and fail-fast: the first per-file error
//! aborts the batch and no later file is touched.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::conflict::scanner::{self, ConflictBlock};
use crate::conflict::Resolver;
use crate::errors::EngineError;

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// Outcome of processing a single file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileStatus {
    /// The start token was present; the file was resolved and rewritten.
    Resolved {
        /// Number of well-formed blocks that were substituted. May be zero
        /// when the token appeared without ever forming a valid block.
        blocks: usize,
    },
    /// No start token found; the file was left untouched.
    Clean,
}

impl std::fmt::Display for FileStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Resolved { blocks: 1 } => write!(f, "resolved 1 conflict"),
            Self::Resolved { blocks } => write!(f, "resolved {} conflicts", blocks),
            Self::Clean => write!(f, "no conflicts"),
        }
    }
}

/// Per-file report from a batch run.
#[derive(Debug, Clone)]
pub struct FileReport {
    /// The file that was processed.
    pub path: PathBuf,
    /// What happened to it.
    pub status: FileStatus,
}

/// Totals from a completed batch run.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Per-file reports, in processing order.
    pub reports: Vec<FileReport>,
    /// Files that were rewritten.
    pub files_resolved: usize,
    /// Files without the start token.
    pub files_clean: usize,
    /// Total conflict blocks substituted across all files.
    pub blocks_resolved: usize,
}

/// Result of a read-only scan of one file.
#[derive(Debug, Clone)]
pub struct FileCheck {
    /// The file that was scanned.
    pub path: PathBuf,
    /// Well-formed blocks found, in buffer order.
    pub blocks: Vec<ConflictBlock>,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Stateless batch engine.
pub struct Engine;

impl Engine {
    /// Process one file: read, detect, resolve, overwrite.
    ///
    /// The file is rewritten whenever the buffer contains the start token,
    /// even if resolution ends up substituting nothing; a file without the
    /// token is never written.
    pub fn process_file(path: &Path) -> Result<FileStatus, EngineError> {
        debug!(path = %path.display(), "processing file");

        let content = fs::read_to_string(path).map_err(|source| EngineError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        if !scanner::contains_marker(&content) {
            debug!(path = %path.display(), "no conflict markers");
            return Ok(FileStatus::Clean);
        }

        let resolved = Resolver::resolve(&content);
        fs::write(path, &resolved.content).map_err(|source| EngineError::Write {
            path: path.to_path_buf(),
            source,
        })?;

        info!(
            path = %path.display(),
            blocks = resolved.blocks.len(),
            "conflicts resolved"
        );
        Ok(FileStatus::Resolved {
            blocks: resolved.blocks.len(),
        })
    }

    /// Process an ordered list of files.
    ///
    /// Fail-fast: the first error is returned immediately and no further
    /// path is read or written.
    pub fn run(files: &[PathBuf]) -> Result<RunSummary, EngineError> {
        info!(files = files.len(), "starting batch run");

        let mut summary = RunSummary::default();
        for path in files {
            let status = Self::process_file(path)?;
            match status {
                FileStatus::Resolved { blocks } => {
                    summary.files_resolved += 1;
                    summary.blocks_resolved += blocks;
                }
                FileStatus::Clean => summary.files_clean += 1,
            }
            summary.reports.push(FileReport {
                path: path.clone(),
                status,
            });
        }

        info!(
            resolved = summary.files_resolved,
            clean = summary.files_clean,
            blocks = summary.blocks_resolved,
            "batch run complete"
        );
        Ok(summary)
    }

    /// Read-only scan of an ordered list of files: report the well-formed
    /// blocks per file, writing nothing. Same fail-fast policy on read
    /// errors as [`run`](Self::run).
    pub fn check(files: &[PathBuf]) -> Result<Vec<FileCheck>, EngineError> {
        files
            .iter()
            .map(|path| {
                let content = fs::read_to_string(path).map_err(|source| EngineError::Read {
                    path: path.clone(),
                    source,
                })?;
                Ok(FileCheck {
                    path: path.clone(),
                    blocks: scanner::scan(&content),
                })
            })
            .collect()
    }
}
