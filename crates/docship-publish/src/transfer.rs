//! File transfer abstraction.

use std::path::Path;

use crate::error::TransferError;

/// Transport that ships one local file to a remote relative path.
///
/// `remote` is the file's path relative to the remote site root, using `/`
/// separators (empty directory component for the root). Authentication and
/// wire protocol are the transport's concern; the publisher only sees
/// success or failure per file.
pub trait FileTransfer {
    fn upload(&mut self, local: &Path, remote: &str) -> Result<(), TransferError>;
}

impl<T: FileTransfer + ?Sized> FileTransfer for Box<T> {
    fn upload(&mut self, local: &Path, remote: &str) -> Result<(), TransferError> {
        (**self).upload(local, remote)
    }
}
