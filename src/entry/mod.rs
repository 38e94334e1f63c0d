//! Entry resolution and the polymorphic entry handle.
//!
//! [`EntryResolver::open`] is the single construction path for handles: it
//! inspects a path and yields exactly one of the three entry kinds, or
//! `Ok(None)` when nothing matches — absence is a normal outcome, not an
//! error.

pub mod archive;
pub mod directory;
pub mod file;

pub use archive::ArchiveEntry;
pub use directory::DirectoryEntry;
pub use file::FileEntry;

use std::path::Path;

use tracing::debug;

use crate::core::errors::FsResult;
use crate::core::provider::FsProvider;
use crate::core::std_provider::StdFsProvider;

/// Discriminant of a resolved entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    Archive,
}

/// A resolved filesystem entry: file, directory, or zip archive
pub enum Entry<'a, P: FsProvider> {
    File(FileEntry<'a, P>),
    Directory(DirectoryEntry<'a, P>),
    Archive(ArchiveEntry<'a, P>),
}

impl<'a, P: FsProvider> Entry<'a, P> {
    /// Which kind of entry this is
    pub fn kind(&self) -> EntryKind {
        match self {
            Entry::File(_) => EntryKind::File,
            Entry::Directory(_) => EntryKind::Directory,
            Entry::Archive(_) => EntryKind::Archive,
        }
    }

    /// Path this entry was resolved from
    pub fn name(&self) -> &str {
        match self {
            Entry::File(e) => e.name(),
            Entry::Directory(e) => e.name(),
            Entry::Archive(e) => e.name(),
        }
    }

    /// Existence snapshot of the underlying object
    pub fn exists(&self) -> bool {
        match self {
            Entry::File(e) => e.exists(),
            Entry::Directory(e) => e.exists(),
            Entry::Archive(e) => e.exists(),
        }
    }

    pub fn as_file(&self) -> Option<&FileEntry<'a, P>> {
        match self {
            Entry::File(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_file_mut(&mut self) -> Option<&mut FileEntry<'a, P>> {
        match self {
            Entry::File(e) => Some(e),
            _ => None,
        }
    }

    pub fn into_file(self) -> Option<FileEntry<'a, P>> {
        match self {
            Entry::File(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_directory(&self) -> Option<&DirectoryEntry<'a, P>> {
        match self {
            Entry::Directory(e) => Some(e),
            _ => None,
        }
    }

    pub fn into_directory(self) -> Option<DirectoryEntry<'a, P>> {
        match self {
            Entry::Directory(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_archive(&self) -> Option<&ArchiveEntry<'a, P>> {
        match self {
            Entry::Archive(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_archive_mut(&mut self) -> Option<&mut ArchiveEntry<'a, P>> {
        match self {
            Entry::Archive(e) => Some(e),
            _ => None,
        }
    }

    pub fn into_archive(self) -> Option<ArchiveEntry<'a, P>> {
        match self {
            Entry::Archive(e) => Some(e),
            _ => None,
        }
    }
}

/// Resolves paths into entry handles
///
/// Owns the primitive provider; every handle it produces borrows the provider
/// from the resolver, so handles live no longer than the resolver itself.
pub struct EntryResolver<P: FsProvider> {
    provider: P,
}

impl<P: FsProvider> EntryResolver<P> {
    /// Create a resolver over the given provider
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Provider in use
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Resolve `path` into a handle
    ///
    /// Priority order:
    /// 1. a `.zip` extension yields an [`ArchiveEntry`] whether or not the
    ///    archive exists on disk (this is how new archives are created);
    /// 2. an existing regular file yields a [`FileEntry`];
    /// 3. an existing directory yields a [`DirectoryEntry`];
    /// 4. otherwise `Ok(None)`.
    pub fn open(&self, path: &str) -> FsResult<Option<Entry<'_, P>>> {
        if has_zip_extension(path) {
            debug!("Resolved {path} as archive");
            return Ok(Some(Entry::Archive(ArchiveEntry::open(&self.provider, path))));
        }
        if self.provider.is_file(path) {
            debug!("Resolved {path} as file");
            return Ok(Some(Entry::File(FileEntry::open(&self.provider, path)?)));
        }
        if self.provider.is_dir(path) {
            debug!("Resolved {path} as directory");
            return Ok(Some(Entry::Directory(DirectoryEntry::open(
                &self.provider,
                path,
            ))));
        }
        debug!("No entry at {path}");
        Ok(None)
    }
}

impl EntryResolver<StdFsProvider> {
    /// Resolver over the real filesystem with default configuration
    pub fn standard() -> Self {
        Self::new(StdFsProvider::new())
    }
}

impl Default for EntryResolver<StdFsProvider> {
    fn default() -> Self {
        Self::standard()
    }
}

/// Whether the final extension segment of `path` is literally `zip`
fn has_zip_extension(path: &str) -> bool {
    Path::new(path)
        .extension()
        .map_or(false, |ext| ext.to_str() == Some("zip"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::provider::MockFsProvider;

    #[test]
    fn test_zip_extension_rule() {
        assert!(has_zip_extension("bundle.zip"));
        assert!(has_zip_extension("/a/b/c.tar.zip"));
        assert!(!has_zip_extension("bundle.zip.bak"));
        assert!(!has_zip_extension("bundle.ZIP"));
        assert!(!has_zip_extension("zip"));
        assert!(!has_zip_extension("plain.txt"));
        assert!(!has_zip_extension("noext"));
    }

    #[test]
    fn test_zip_path_wins_even_when_absent() {
        let resolver = EntryResolver::new(MockFsProvider::new());
        let entry = resolver.open("missing.zip").unwrap().unwrap();
        assert_eq!(entry.kind(), EntryKind::Archive);
        assert!(!entry.exists());
    }

    #[test]
    fn test_zip_path_wins_over_existing_file() {
        let provider = MockFsProvider::new();
        provider.add_file("data.zip", b"PK".to_vec());

        let resolver = EntryResolver::new(provider);
        let entry = resolver.open("data.zip").unwrap().unwrap();
        assert_eq!(entry.kind(), EntryKind::Archive);
        assert!(entry.exists());
    }

    #[test]
    fn test_existing_file_resolves_as_file() {
        let provider = MockFsProvider::new();
        provider.add_file("notes.txt", b"hello".to_vec());

        let resolver = EntryResolver::new(provider);
        let entry = resolver.open("notes.txt").unwrap().unwrap();
        let file = entry.as_file().unwrap();
        assert_eq!(file.contents(), b"hello");
    }

    #[test]
    fn test_existing_directory_resolves_as_directory() {
        let provider = MockFsProvider::new();
        provider.add_dir("projects", vec![]);

        let resolver = EntryResolver::new(provider);
        let entry = resolver.open("projects").unwrap().unwrap();
        assert_eq!(entry.kind(), EntryKind::Directory);
        assert!(entry.exists());
    }

    #[test]
    fn test_file_beats_directory() {
        let provider = MockFsProvider::new();
        provider.add_file("ambiguous", b"file".to_vec());
        provider.add_dir("ambiguous", vec![]);

        let resolver = EntryResolver::new(provider);
        let entry = resolver.open("ambiguous").unwrap().unwrap();
        assert_eq!(entry.kind(), EntryKind::File);
    }

    #[test]
    fn test_nothing_resolves_to_none() {
        let resolver = EntryResolver::new(MockFsProvider::new());
        assert!(resolver.open("does/not/exist").unwrap().is_none());
    }
}
