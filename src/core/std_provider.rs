//! Standard provider backed by the real filesystem.
//!
//! Implements [`FsProvider`] over `std::fs` for file and directory work, zip
//! sessions for archives, and `sha2`/`base64` for digests and encoding.

use std::fs;
use std::path::Path;

use base64::prelude::*;
use sha2::{Digest, Sha256, Sha512};
use tracing::debug;

use crate::archive::{self, ZipSession};
use crate::config::ProviderConfig;
use crate::core::errors::{ArchiveResult, FsError, FsResult};
use crate::core::provider::{permission_flags, FsProvider};

/// Filesystem-backed provider
#[derive(Debug, Default)]
pub struct StdFsProvider {
    config: ProviderConfig,
}

impl StdFsProvider {
    /// Create a provider with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a provider with the given configuration
    pub fn with_config(config: ProviderConfig) -> Self {
        Self { config }
    }

    /// Configuration in effect
    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }
}

impl FsProvider for StdFsProvider {
    type Session = ZipSession;

    fn is_file(&self, path: &str) -> bool {
        Path::new(path).is_file()
    }

    fn is_dir(&self, path: &str) -> bool {
        Path::new(path).is_dir()
    }

    fn list_dir(&self, path: &str) -> FsResult<Vec<String>> {
        let entries = fs::read_dir(path).map_err(|e| FsError::from_io(path, e))?;
        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| FsError::from_io(path, e))?;
            names.push(entry.file_name().to_string_lossy().to_string());
        }
        names.sort();
        Ok(names)
    }

    fn read_bytes(&self, path: &str) -> FsResult<Vec<u8>> {
        fs::read(path).map_err(|e| FsError::from_io(path, e))
    }

    fn write_bytes(&self, path: &str, data: &[u8]) -> FsResult<()> {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| FsError::from_io(path, e))?;
            }
        }
        fs::write(path, data).map_err(|e| FsError::from_io(path, e))
    }

    fn delete_file(&self, path: &str) -> FsResult<()> {
        fs::remove_file(path).map_err(|e| FsError::from_io(path, e))
    }

    fn permissions(&self, path: &str) -> FsResult<String> {
        Ok(permission_flags(self.mode(path)?))
    }

    #[cfg(unix)]
    fn mode(&self, path: &str) -> FsResult<u32> {
        use std::os::unix::fs::PermissionsExt;
        let meta = fs::metadata(path).map_err(|e| FsError::from_io(path, e))?;
        Ok(meta.permissions().mode() & 0o7777)
    }

    #[cfg(not(unix))]
    fn mode(&self, path: &str) -> FsResult<u32> {
        let meta = fs::metadata(path).map_err(|e| FsError::from_io(path, e))?;
        Ok(if meta.permissions().readonly() {
            0o444
        } else {
            0o644
        })
    }

    #[cfg(unix)]
    fn set_mode(&self, path: &str, mode: u32) -> FsResult<()> {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(mode))
            .map_err(|e| FsError::from_io(path, e))
    }

    #[cfg(not(unix))]
    fn set_mode(&self, path: &str, mode: u32) -> FsResult<()> {
        let meta = fs::metadata(path).map_err(|e| FsError::from_io(path, e))?;
        let mut permissions = meta.permissions();
        permissions.set_readonly(mode & 0o200 == 0);
        fs::set_permissions(path, permissions).map_err(|e| FsError::from_io(path, e))
    }

    fn file_size(&self, path: &str) -> FsResult<u64> {
        let meta = fs::metadata(path).map_err(|e| FsError::from_io(path, e))?;
        Ok(meta.len())
    }

    fn basename(&self, path: &str) -> String {
        Path::new(path)
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string())
    }

    fn location(&self, path: &str) -> FsResult<String> {
        let absolute = fs::canonicalize(path).map_err(|e| FsError::from_io(path, e))?;
        Ok(absolute.to_string_lossy().to_string())
    }

    fn sha256(&self, data: &[u8]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(data);
        format!("{:x}", hasher.finalize())
    }

    fn sha512(&self, data: &[u8]) -> String {
        let mut hasher = Sha512::new();
        hasher.update(data);
        format!("{:x}", hasher.finalize())
    }

    fn base64(&self, data: &[u8]) -> String {
        BASE64_STANDARD.encode(data)
    }

    fn archive_open(&self, path: &str) -> ZipSession {
        ZipSession::open(path, &self.config)
    }

    fn archive_close(&self, session: ZipSession) {
        debug!("Closing archive session");
        drop(session);
    }

    fn archive_list(&self, path: &str) -> ArchiveResult<Vec<String>> {
        archive::list_members(path)
    }

    fn archive_member(&self, session: &ZipSession, member: &str) -> bool {
        session.contains(member)
    }

    fn archive_extract(&self, session: &ZipSession, target_dir: &str) -> ArchiveResult<()> {
        session.extract(target_dir)
    }

    fn archive_remove(&self, session: &mut ZipSession, member: &str) -> ArchiveResult<()> {
        session.remove(member)
    }

    fn archive_write(&self, session: &mut ZipSession) -> ArchiveResult<()> {
        session.write()
    }

    fn archive_add(&self, session: &mut ZipSession, path: &str) -> ArchiveResult<()> {
        session.add(path)
    }
}
