//! Core building blocks: the primitive provider interface, its standard and
//! mock implementations, and the error taxonomy shared by all handles.

pub mod errors;
pub mod provider;
pub mod std_provider;

pub use errors::{ArchiveError, ArchiveResult, FsError, FsResult};
pub use provider::{permission_flags, FsProvider, MockFsProvider, MockSession};
pub use std_provider::StdFsProvider;
