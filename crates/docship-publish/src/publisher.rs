//! Directory-batch publisher with delivery verification.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::{PublishError, TransferError};
use crate::transfer::FileTransfer;

/// Default number of attempts per file, including the first.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Counts from a completed publish run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublishReport {
    /// Directories uploaded (including the site root).
    pub directories: usize,
    /// Files delivered across all batches.
    pub files: usize,
}

/// Mirrors a site tree onto a remote host, one directory batch at a time.
///
/// Verification is count-based: after each batch the number of files the
/// transport delivered must equal the number of files in the directory. A
/// mismatch aborts the run before the next batch.
pub struct Publisher<T> {
    transfer: T,
    max_attempts: u32,
}

impl<T: FileTransfer> Publisher<T> {
    #[must_use]
    pub fn new(transfer: T) -> Self {
        Self {
            transfer,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Set the number of attempts per file, including the first.
    #[must_use]
    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// Upload every file under `site_root`, preserving relative structure.
    ///
    /// Directories are processed depth-first with sorted children, the root
    /// first, so a given tree always publishes in the same order and a
    /// failure is reproducible.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError::Walk`] if the local tree cannot be read, or
    /// [`PublishError::VerificationFailed`] when a batch delivers fewer
    /// files than it contains.
    pub fn publish(&mut self, site_root: &Path) -> Result<PublishReport, PublishError> {
        let mut directories = Vec::new();
        collect_directories(site_root, String::new(), &mut directories)?;

        let mut report = PublishReport {
            directories: 0,
            files: 0,
        };

        for (dir, relative) in directories {
            let files = immediate_files(&dir)?;
            info!(
                directory = %display_dir(&relative),
                files = files.len(),
                "uploading batch"
            );

            let mut uploaded = 0;
            for file in &files {
                let name = file.file_name().unwrap_or_default().to_string_lossy();
                let remote = if relative.is_empty() {
                    name.into_owned()
                } else {
                    format!("{relative}/{name}")
                };
                if self.upload_with_retry(file, &remote) {
                    uploaded += 1;
                }
            }

            if uploaded != files.len() {
                return Err(PublishError::VerificationFailed {
                    directory: display_dir(&relative).to_owned(),
                    expected: files.len(),
                    uploaded,
                });
            }

            report.directories += 1;
            report.files += uploaded;
        }

        info!(
            directories = report.directories,
            files = report.files,
            "site published"
        );
        Ok(report)
    }

    fn upload_with_retry(&mut self, local: &Path, remote: &str) -> bool {
        let mut last_error: Option<TransferError> = None;
        for attempt in 1..=self.max_attempts {
            match self.transfer.upload(local, remote) {
                Ok(()) => return true,
                Err(e) => {
                    warn!(
                        file = remote,
                        attempt,
                        max_attempts = self.max_attempts,
                        error = %e,
                        "transfer failed"
                    );
                    last_error = Some(e);
                }
            }
        }
        if let Some(e) = last_error {
            warn!(file = remote, error = %e, "giving up on file");
        }
        false
    }
}

/// Depth-first directory enumeration with sorted children, root first.
fn collect_directories(
    dir: &Path,
    relative: String,
    out: &mut Vec<(PathBuf, String)>,
) -> Result<(), PublishError> {
    let mut subdirs = Vec::new();
    for entry in read_dir(dir)? {
        let entry = entry.map_err(|source| walk_error(dir, source))?;
        let path = entry.path();
        if path.is_dir() {
            subdirs.push(path);
        }
    }
    subdirs.sort();

    out.push((dir.to_path_buf(), relative.clone()));
    for sub in subdirs {
        let name = sub.file_name().unwrap_or_default().to_string_lossy();
        let child_relative = if relative.is_empty() {
            name.into_owned()
        } else {
            format!("{relative}/{name}")
        };
        collect_directories(&sub, child_relative, out)?;
    }
    Ok(())
}

/// Immediate files of one directory, sorted. Non-recursive so directory
/// structure maps 1:1 to remote folders.
fn immediate_files(dir: &Path) -> Result<Vec<PathBuf>, PublishError> {
    let mut files = Vec::new();
    for entry in read_dir(dir)? {
        let entry = entry.map_err(|source| walk_error(dir, source))?;
        let path = entry.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn read_dir(dir: &Path) -> Result<std::fs::ReadDir, PublishError> {
    std::fs::read_dir(dir).map_err(|source| walk_error(dir, source))
}

fn walk_error(dir: &Path, source: std::io::Error) -> PublishError {
    PublishError::Walk {
        path: dir.to_path_buf(),
        source,
    }
}

fn display_dir(relative: &str) -> &str {
    if relative.is_empty() { "." } else { relative }
}
