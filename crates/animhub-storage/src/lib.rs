//! # animhub-storage
//!
//! Filesystem side of AnimHub. Every file a job touches lives in one of the
//! directories described by [`StorageLayout`] and carries the job identifier
//! as its name prefix.

pub mod layout;
pub mod lease;
pub mod library;
pub mod locator;
pub mod naming;
pub mod upload;

pub use layout::StorageLayout;
pub use lease::{JobLease, JobLeases};
pub use library::{AssetKind, AssetLibrary, LibraryEntry};
pub use locator::ArtifactLocator;
pub use upload::{StoredUpload, UploadStore};
