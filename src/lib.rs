//! fsentry
//!
//! A uniform handle abstraction over three kinds of filesystem entries:
//! regular files, directories, and zip archives. Callers resolve a path into
//! a single polymorphic handle without knowing the entry kind up front; the
//! handle then exposes the operations that make sense for its kind.
//!
//! # Features
//!
//! - **Entry resolution**: one `open` call yields a file, directory, or
//!   archive handle — or an explicit "no entry" result
//! - **Cached handle state**: existence, contents, and permissions are
//!   snapshots with a documented consistency contract
//! - **Archive sessions**: staged add/remove with explicit write-back and
//!   release
//! - **Injected primitives**: all I/O, hashing, and encoding go through a
//!   provider trait, so the handle layer tests without a filesystem
//!
//! # Usage
//!
//! ```rust
//! use fsentry::{EntryResolver, MockFsProvider};
//!
//! let provider = MockFsProvider::new();
//! provider.add_file("greeting.txt", b"hello".to_vec());
//!
//! let resolver = EntryResolver::new(provider);
//! let file = resolver
//!     .open("greeting.txt")
//!     .unwrap()
//!     .and_then(|entry| entry.into_file())
//!     .unwrap();
//!
//! assert_eq!(file.contents(), b"hello");
//! assert_eq!(file.basename().as_deref(), Some("greeting.txt"));
//! ```
//!
//! Against the real filesystem, use [`EntryResolver::standard`].

pub mod archive;
pub mod config;
pub mod core;
pub mod entry;
pub mod logging;

// Re-export the primary API surface
pub use config::{Compression, ProviderConfig};
pub use crate::core::{
    ArchiveError, ArchiveResult, FsError, FsProvider, FsResult, MockFsProvider, StdFsProvider,
};
pub use entry::{ArchiveEntry, DirectoryEntry, Entry, EntryKind, EntryResolver, FileEntry};

/// Current library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
