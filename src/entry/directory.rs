//! Handle over a directory.

use crate::core::errors::FsResult;
use crate::core::provider::FsProvider;

/// Handle over a directory
///
/// The `exists` flag is a snapshot taken at construction. The listing is
/// never cached: every call queries the provider.
pub struct DirectoryEntry<'a, P: FsProvider> {
    provider: &'a P,
    name: String,
    exists: bool,
}

impl<'a, P: FsProvider> DirectoryEntry<'a, P> {
    pub(crate) fn open(provider: &'a P, name: &str) -> Self {
        Self {
            provider,
            name: name.to_string(),
            exists: provider.is_dir(name),
        }
    }

    /// Path this handle was resolved from
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the directory existed at construction
    pub fn exists(&self) -> bool {
        self.exists
    }

    /// Immediate member names, queried live on every call
    ///
    /// `Ok(None)` means the directory does not exist — distinct from
    /// `Ok(Some(vec![]))`, an existing directory with no members.
    pub fn files(&self) -> FsResult<Option<Vec<String>>> {
        if !self.exists {
            return Ok(None);
        }
        self.provider.list_dir(&self.name).map(Some)
    }
}
