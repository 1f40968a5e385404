//! Virtual file store: file records keyed by name, a trash collection, persistence to the
//! preference store, and synchronous change notification.

mod seed;
mod store;
mod types;

pub use seed::default_files;
pub use store::{infer_type, preview, FileSubscription, VirtualFileStore};
pub use types::{FileChange, FileKind, FilePatch, FileRecord, TrashedFile};
