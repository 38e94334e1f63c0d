//! Handle over a regular file.

use tracing::debug;

use crate::core::errors::FsResult;
use crate::core::provider::FsProvider;

/// Handle over a regular file
///
/// Contents are loaded eagerly at construction when the file exists and are
/// held purely in memory until [`save`](FileEntry::save). The `exists` flag
/// and the permission string are snapshots: they change only when a mutating
/// operation on *this handle* succeeds, never on getter access.
pub struct FileEntry<'a, P: FsProvider> {
    provider: &'a P,
    name: String,
    exists: bool,
    contents: Vec<u8>,
    permissions: String,
}

impl<'a, P: FsProvider> FileEntry<'a, P> {
    pub(crate) fn open(provider: &'a P, name: &str) -> FsResult<Self> {
        let exists = provider.is_file(name);
        let contents = if exists {
            provider.read_bytes(name)?
        } else {
            Vec::new()
        };
        let permissions = if exists {
            provider.permissions(name)?
        } else {
            String::new()
        };
        Ok(Self {
            provider,
            name: name.to_string(),
            exists,
            contents,
            permissions,
        })
    }

    /// Path this handle was resolved from
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the file existed as of the last mutating operation
    pub fn exists(&self) -> bool {
        self.exists
    }

    /// In-memory contents
    pub fn contents(&self) -> &[u8] {
        &self.contents
    }

    /// Replace the in-memory contents; disk is untouched until `save`
    pub fn set_contents(&mut self, contents: impl Into<Vec<u8>>) {
        self.contents = contents.into();
    }

    /// Concatenate `data` onto the in-memory contents; no I/O
    pub fn append(&mut self, data: impl AsRef<[u8]>) {
        self.contents.extend_from_slice(data.as_ref());
    }

    /// Write the in-memory contents to disk
    ///
    /// On success the handle's `exists` flag is set and the cached permission
    /// string refreshed; on failure the handle state is unchanged.
    pub fn save(&mut self) -> FsResult<()> {
        self.provider.write_bytes(&self.name, &self.contents)?;
        self.exists = true;
        self.permissions = self.provider.permissions(&self.name)?;
        debug!("Saved {} ({} bytes)", self.name, self.contents.len());
        Ok(())
    }

    /// Remove the file from disk
    ///
    /// On success `exists` becomes false and the cached permissions are
    /// cleared; the in-memory contents stay available for a later `save`.
    pub fn delete(&mut self) -> FsResult<()> {
        self.provider.delete_file(&self.name)?;
        self.exists = false;
        self.permissions.clear();
        debug!("Deleted {}", self.name);
        Ok(())
    }

    /// Cached permission flag string (`r`/`w`/`x`)
    pub fn permissions(&self) -> &str {
        &self.permissions
    }

    /// Numeric mode, queried live from the provider
    pub fn mode(&self) -> FsResult<u32> {
        self.provider.mode(&self.name)
    }

    /// Change the on-disk mode; refreshes the cached permissions on success
    pub fn set_mode(&mut self, mode: u32) -> FsResult<()> {
        self.provider.set_mode(&self.name, mode)?;
        self.permissions = self.provider.permissions(&self.name)?;
        Ok(())
    }

    /// Whether the cached permissions carry the read flag
    pub fn can_read(&self) -> bool {
        self.permissions.contains('r')
    }

    /// Whether the cached permissions carry the write flag
    pub fn can_write(&self) -> bool {
        self.permissions.contains('w')
    }

    /// Whether the cached permissions carry the execute flag
    pub fn can_execute(&self) -> bool {
        self.permissions.contains('x')
    }

    /// On-disk size when the file exists, in-memory length otherwise
    ///
    /// The fallback covers contents staged before the first `save`.
    pub fn size(&self) -> FsResult<u64> {
        if self.exists {
            self.provider.file_size(&self.name)
        } else {
            Ok(self.contents.len() as u64)
        }
    }

    /// SHA-256 of the current in-memory contents (reflects unsaved edits)
    pub fn sha256(&self) -> String {
        self.provider.sha256(&self.contents)
    }

    /// SHA-512 of the current in-memory contents (reflects unsaved edits)
    pub fn sha512(&self) -> String {
        self.provider.sha512(&self.contents)
    }

    /// Base64 of the current in-memory contents (reflects unsaved edits)
    pub fn base64(&self) -> String {
        self.provider.base64(&self.contents)
    }

    /// Final path segment; `None` when the file does not exist
    pub fn basename(&self) -> Option<String> {
        if self.exists {
            Some(self.provider.basename(&self.name))
        } else {
            None
        }
    }

    /// Absolute location; `Ok(None)` when the file does not exist
    pub fn location(&self) -> FsResult<Option<String>> {
        if self.exists {
            self.provider.location(&self.name).map(Some)
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::provider::MockFsProvider;

    #[test]
    fn test_open_existing_file_loads_state() {
        let provider = MockFsProvider::new();
        provider.add_file("/notes.txt", b"alpha".to_vec());

        let entry = FileEntry::open(&provider, "/notes.txt").unwrap();
        assert!(entry.exists());
        assert_eq!(entry.contents(), b"alpha");
        assert_eq!(entry.permissions(), "rw");
        assert!(entry.can_read());
        assert!(entry.can_write());
        assert!(!entry.can_execute());
    }

    #[test]
    fn test_open_missing_file_is_empty() {
        let provider = MockFsProvider::new();
        let entry = FileEntry::open(&provider, "/new.txt").unwrap();
        assert!(!entry.exists());
        assert!(entry.contents().is_empty());
        assert_eq!(entry.permissions(), "");
        assert_eq!(entry.basename(), None);
        assert_eq!(entry.location().unwrap(), None);
    }

    #[test]
    fn test_append_and_save() {
        let provider = MockFsProvider::new();
        let mut entry = FileEntry::open(&provider, "/log.txt").unwrap();

        entry.append(b"first ");
        entry.append("second");
        assert_eq!(entry.contents(), b"first second");
        assert!(!entry.exists());

        entry.save().unwrap();
        assert!(entry.exists());
        assert_eq!(provider.file_bytes("/log.txt").unwrap(), b"first second");
        assert_eq!(entry.permissions(), "rw");
    }

    #[test]
    fn test_failed_save_leaves_state_unchanged() {
        let provider = MockFsProvider::with_failure();
        let mut entry = FileEntry::open(&provider, "/blocked.txt").unwrap();
        entry.append(b"data");

        assert!(entry.save().is_err());
        assert!(!entry.exists());
        assert_eq!(entry.permissions(), "");
        assert_eq!(entry.contents(), b"data");
    }

    #[test]
    fn test_delete_clears_flags() {
        let provider = MockFsProvider::new();
        provider.add_file("/gone.txt", b"bye".to_vec());

        let mut entry = FileEntry::open(&provider, "/gone.txt").unwrap();
        entry.delete().unwrap();
        assert!(!entry.exists());
        assert!(!entry.can_read());
        assert!(!entry.can_write());
        assert!(!entry.can_execute());
        // Contents stay staged in memory.
        assert_eq!(entry.contents(), b"bye");
    }

    #[test]
    fn test_size_prefers_disk_when_exists() {
        let provider = MockFsProvider::new();
        provider.add_file("/sized.txt", b"123456".to_vec());

        let mut entry = FileEntry::open(&provider, "/sized.txt").unwrap();
        entry.set_contents(b"xy".to_vec());
        // Unsaved edit: disk still wins while the file exists.
        assert_eq!(entry.size().unwrap(), 6);

        entry.delete().unwrap();
        assert_eq!(entry.size().unwrap(), 2);
    }

    #[test]
    fn test_digests_track_unsaved_edits() {
        let provider = MockFsProvider::new();
        provider.add_file("/hashme.txt", b"one".to_vec());

        let mut entry = FileEntry::open(&provider, "/hashme.txt").unwrap();
        let before = entry.sha256();
        entry.append(b"two");
        let after = entry.sha256();
        assert_ne!(before, after);
        assert_eq!(after, provider.sha256(b"onetwo"));
        assert_eq!(entry.base64(), provider.base64(b"onetwo"));
    }

    #[test]
    fn test_set_mode_refreshes_permissions() {
        let provider = MockFsProvider::new();
        provider.add_file("/tool", b"bin".to_vec());

        let mut entry = FileEntry::open(&provider, "/tool").unwrap();
        assert!(!entry.can_execute());
        entry.set_mode(0o755).unwrap();
        assert!(entry.can_execute());
        assert_eq!(entry.mode().unwrap(), 0o755);
    }

    #[test]
    fn test_failed_set_mode_keeps_cached_permissions() {
        let provider = MockFsProvider::with_failure();
        provider.add_file("/tool", b"bin".to_vec());

        let mut entry = FileEntry::open(&provider, "/tool").unwrap();
        let before = entry.permissions().to_string();
        assert!(entry.set_mode(0o755).is_err());
        assert_eq!(entry.permissions(), before);
    }
}
