//! Verified site upload for Docship.
//!
//! The [`Publisher`] mirrors a built site tree onto a remote file host:
//! directories are enumerated depth-first with sorted children (so a given
//! tree always uploads in the same order), each directory's immediate files
//! form one batch, individual transfers are retried on failure, and after
//! each batch the count of delivered files must equal the batch size.
//! Any mismatch fails the run; later batches are not attempted.
//!
//! Transports implement [`FileTransfer`]; [`HttpTransfer`] ships files with
//! authenticated HTTP PUTs.

mod error;
mod http;
mod publisher;
mod transfer;

pub use error::{PublishError, TransferError};
pub use http::HttpTransfer;
pub use publisher::{DEFAULT_MAX_ATTEMPTS, PublishReport, Publisher};
pub use transfer::FileTransfer;
