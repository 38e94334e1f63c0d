//! Primitive filesystem provider interface.
//!
//! This module defines the trait through which entry handles perform all
//! filesystem, archive, digest, and encoding work, allowing the handle layer
//! to stay pure and be tested against an in-memory double. The layer is
//! single-threaded by contract, so the trait carries no `Send`/`Sync` bounds
//! and the mock is free to use interior mutability.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::path::Path;

use crate::core::errors::{ArchiveError, ArchiveResult, FsError, FsResult};

/// Trait providing primitive operations to entry handles
///
/// Every method is synchronous and either completes or fails before
/// returning. Expected-false conditions (a mutation that cannot be performed)
/// surface as `Err`; absence of an object is never reported here — callers
/// check `is_file`/`is_dir` first.
pub trait FsProvider {
    /// Opaque archive session handle, created by [`archive_open`] and
    /// released by [`archive_close`].
    ///
    /// [`archive_open`]: FsProvider::archive_open
    /// [`archive_close`]: FsProvider::archive_close
    type Session;

    /// Whether a regular file exists at `path`
    fn is_file(&self, path: &str) -> bool;

    /// Whether a directory exists at `path`
    fn is_dir(&self, path: &str) -> bool;

    /// Immediate member names of the directory at `path`
    fn list_dir(&self, path: &str) -> FsResult<Vec<String>>;

    /// Read the full contents of the file at `path`
    fn read_bytes(&self, path: &str) -> FsResult<Vec<u8>>;

    /// Write `data` to `path`, replacing any existing file
    fn write_bytes(&self, path: &str, data: &[u8]) -> FsResult<()>;

    /// Remove the file at `path`
    fn delete_file(&self, path: &str) -> FsResult<()>;

    /// Permission flags of `path` as a string containing `r`, `w`, `x`
    fn permissions(&self, path: &str) -> FsResult<String>;

    /// Numeric mode of `path`
    fn mode(&self, path: &str) -> FsResult<u32>;

    /// Change the mode of `path`
    fn set_mode(&self, path: &str, mode: u32) -> FsResult<()>;

    /// On-disk size of the file at `path` in bytes
    fn file_size(&self, path: &str) -> FsResult<u64>;

    /// Final path segment of `path`
    fn basename(&self, path: &str) -> String;

    /// Absolute location of `path`
    fn location(&self, path: &str) -> FsResult<String>;

    /// Hex-encoded SHA-256 digest of `data`
    fn sha256(&self, data: &[u8]) -> String;

    /// Hex-encoded SHA-512 digest of `data`
    fn sha512(&self, data: &[u8]) -> String;

    /// Standard base64 encoding of `data`
    fn base64(&self, data: &[u8]) -> String;

    /// Open an archive session for `path`
    ///
    /// Always returns a session, even when no archive exists at `path` yet;
    /// a session over a nonexistent path starts empty and materializes the
    /// archive on [`archive_write`](FsProvider::archive_write). A session
    /// over an unreadable archive is returned too — operations through it
    /// fail instead of clobbering the original.
    fn archive_open(&self, path: &str) -> Self::Session;

    /// Release an archive session
    fn archive_close(&self, session: Self::Session);

    /// Member names of the archive at `path`, read fresh from storage
    fn archive_list(&self, path: &str) -> ArchiveResult<Vec<String>>;

    /// Whether `member` is present in the session
    fn archive_member(&self, session: &Self::Session, member: &str) -> bool;

    /// Extract all session members below `target_dir`
    ///
    /// There is no rollback: a failure part-way through leaves the members
    /// extracted so far on disk.
    fn archive_extract(&self, session: &Self::Session, target_dir: &str) -> ArchiveResult<()>;

    /// Remove `member` from the session
    fn archive_remove(&self, session: &mut Self::Session, member: &str) -> ArchiveResult<()>;

    /// Persist pending session changes to the underlying archive file
    fn archive_write(&self, session: &mut Self::Session) -> ArchiveResult<()>;

    /// Add the file at `path` to the session as a member
    fn archive_add(&self, session: &mut Self::Session, path: &str) -> ArchiveResult<()>;
}

/// Render mode bits as the `r`/`w`/`x` flag string used by handles
///
/// Only the owner bits are considered.
pub fn permission_flags(mode: u32) -> String {
    let mut flags = String::new();
    if mode & 0o400 != 0 {
        flags.push('r');
    }
    if mode & 0o200 != 0 {
        flags.push('w');
    }
    if mode & 0o100 != 0 {
        flags.push('x');
    }
    flags
}

/// Normalize a filesystem path into an archive member name
pub(crate) fn member_name(path: &str) -> String {
    path.trim_start_matches("./")
        .trim_start_matches('/')
        .to_string()
}

/// Archive session used by [`MockFsProvider`]
#[derive(Debug, Clone)]
pub struct MockSession {
    path: String,
    members: BTreeMap<String, Vec<u8>>,
}

/// In-memory provider for deterministic, filesystem-free tests
///
/// Files, directory listings, and archives are seeded up front; a failure
/// switch makes every mutating operation fail so that state-preservation
/// contracts can be exercised. Reads stay functional in failure mode.
#[derive(Debug, Default)]
pub struct MockFsProvider {
    files: RefCell<BTreeMap<String, Vec<u8>>>,
    dirs: RefCell<BTreeMap<String, Vec<String>>>,
    modes: RefCell<BTreeMap<String, u32>>,
    archives: RefCell<BTreeMap<String, BTreeMap<String, Vec<u8>>>>,
    should_fail: bool,
    add_calls: Cell<usize>,
}

impl MockFsProvider {
    /// Create an empty mock provider
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock provider whose mutating operations fail
    pub fn with_failure() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    /// Seed a regular file
    pub fn add_file(&self, path: impl Into<String>, data: impl Into<Vec<u8>>) {
        self.files.borrow_mut().insert(path.into(), data.into());
    }

    /// Seed a directory and its immediate member names
    pub fn add_dir(&self, path: impl Into<String>, members: Vec<String>) {
        self.dirs.borrow_mut().insert(path.into(), members);
    }

    /// Seed an archive with the given members
    pub fn add_archive(&self, path: impl Into<String>, members: BTreeMap<String, Vec<u8>>) {
        self.archives.borrow_mut().insert(path.into(), members);
    }

    /// Number of times `archive_add` hit the provider
    pub fn add_call_count(&self) -> usize {
        self.add_calls.get()
    }

    /// Stored members of the archive at `path`, if any
    pub fn archive_members(&self, path: &str) -> Option<BTreeMap<String, Vec<u8>>> {
        self.archives.borrow().get(path).cloned()
    }

    /// Bytes of the seeded or written file at `path`, if any
    pub fn file_bytes(&self, path: &str) -> Option<Vec<u8>> {
        self.files.borrow().get(path).cloned()
    }

    fn fail_check(&self, path: &str) -> FsResult<()> {
        if self.should_fail {
            return Err(FsError::PermissionDenied {
                path: path.to_string(),
            });
        }
        Ok(())
    }
}

impl FsProvider for MockFsProvider {
    type Session = MockSession;

    fn is_file(&self, path: &str) -> bool {
        self.files.borrow().contains_key(path) || self.archives.borrow().contains_key(path)
    }

    fn is_dir(&self, path: &str) -> bool {
        self.dirs.borrow().contains_key(path)
    }

    fn list_dir(&self, path: &str) -> FsResult<Vec<String>> {
        self.dirs
            .borrow()
            .get(path)
            .cloned()
            .ok_or_else(|| FsError::NotFound {
                path: path.to_string(),
            })
    }

    fn read_bytes(&self, path: &str) -> FsResult<Vec<u8>> {
        self.files
            .borrow()
            .get(path)
            .cloned()
            .ok_or_else(|| FsError::NotFound {
                path: path.to_string(),
            })
    }

    fn write_bytes(&self, path: &str, data: &[u8]) -> FsResult<()> {
        self.fail_check(path)?;
        self.files.borrow_mut().insert(path.to_string(), data.to_vec());
        Ok(())
    }

    fn delete_file(&self, path: &str) -> FsResult<()> {
        self.fail_check(path)?;
        self.files
            .borrow_mut()
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| FsError::NotFound {
                path: path.to_string(),
            })
    }

    fn permissions(&self, path: &str) -> FsResult<String> {
        Ok(permission_flags(self.mode(path)?))
    }

    fn mode(&self, path: &str) -> FsResult<u32> {
        if let Some(mode) = self.modes.borrow().get(path) {
            return Ok(*mode);
        }
        if self.is_file(path) {
            Ok(0o644)
        } else if self.is_dir(path) {
            Ok(0o755)
        } else {
            Err(FsError::NotFound {
                path: path.to_string(),
            })
        }
    }

    fn set_mode(&self, path: &str, mode: u32) -> FsResult<()> {
        self.fail_check(path)?;
        if !self.is_file(path) && !self.is_dir(path) {
            return Err(FsError::NotFound {
                path: path.to_string(),
            });
        }
        self.modes.borrow_mut().insert(path.to_string(), mode);
        Ok(())
    }

    fn file_size(&self, path: &str) -> FsResult<u64> {
        if let Some(data) = self.files.borrow().get(path) {
            return Ok(data.len() as u64);
        }
        if let Some(members) = self.archives.borrow().get(path) {
            return Ok(members.values().map(|m| m.len() as u64).sum());
        }
        Err(FsError::NotFound {
            path: path.to_string(),
        })
    }

    fn basename(&self, path: &str) -> String {
        Path::new(path)
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string())
    }

    fn location(&self, path: &str) -> FsResult<String> {
        if self.is_file(path) || self.is_dir(path) {
            Ok(format!("/{}", member_name(path)))
        } else {
            Err(FsError::NotFound {
                path: path.to_string(),
            })
        }
    }

    fn sha256(&self, data: &[u8]) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(data);
        format!("{:x}", hasher.finalize())
    }

    fn sha512(&self, data: &[u8]) -> String {
        use sha2::{Digest, Sha512};
        let mut hasher = Sha512::new();
        hasher.update(data);
        format!("{:x}", hasher.finalize())
    }

    fn base64(&self, data: &[u8]) -> String {
        use base64::prelude::*;
        BASE64_STANDARD.encode(data)
    }

    fn archive_open(&self, path: &str) -> MockSession {
        let members = self
            .archives
            .borrow()
            .get(path)
            .cloned()
            .unwrap_or_default();
        MockSession {
            path: path.to_string(),
            members,
        }
    }

    fn archive_close(&self, session: MockSession) {
        drop(session);
    }

    fn archive_list(&self, path: &str) -> ArchiveResult<Vec<String>> {
        self.archives
            .borrow()
            .get(path)
            .map(|members| members.keys().cloned().collect())
            .ok_or_else(|| {
                ArchiveError::Fs(FsError::NotFound {
                    path: path.to_string(),
                })
            })
    }

    fn archive_member(&self, session: &MockSession, member: &str) -> bool {
        session.members.contains_key(member)
    }

    fn archive_extract(&self, session: &MockSession, target_dir: &str) -> ArchiveResult<()> {
        if self.should_fail {
            return Err(ArchiveError::ExtractFailed {
                reason: "mock failure".to_string(),
            });
        }
        let mut files = self.files.borrow_mut();
        for (name, data) in &session.members {
            files.insert(format!("{target_dir}/{name}"), data.clone());
        }
        Ok(())
    }

    fn archive_remove(&self, session: &mut MockSession, member: &str) -> ArchiveResult<()> {
        if self.should_fail {
            return Err(ArchiveError::WriteFailed {
                reason: "mock failure".to_string(),
            });
        }
        session
            .members
            .remove(member)
            .map(|_| ())
            .ok_or_else(|| ArchiveError::MemberNotFound {
                name: member.to_string(),
            })
    }

    fn archive_write(&self, session: &mut MockSession) -> ArchiveResult<()> {
        if self.should_fail {
            return Err(ArchiveError::WriteFailed {
                reason: "mock failure".to_string(),
            });
        }
        self.archives
            .borrow_mut()
            .insert(session.path.clone(), session.members.clone());
        Ok(())
    }

    fn archive_add(&self, session: &mut MockSession, path: &str) -> ArchiveResult<()> {
        self.add_calls.set(self.add_calls.get() + 1);
        if self.should_fail {
            return Err(ArchiveError::AddFailed {
                reason: "mock failure".to_string(),
            });
        }
        let data = self
            .files
            .borrow()
            .get(path)
            .cloned()
            .ok_or_else(|| {
                ArchiveError::Fs(FsError::NotFound {
                    path: path.to_string(),
                })
            })?;
        session.members.insert(member_name(path), data);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_flags() {
        assert_eq!(permission_flags(0o644), "rw");
        assert_eq!(permission_flags(0o755), "rwx");
        assert_eq!(permission_flags(0o400), "r");
        assert_eq!(permission_flags(0o000), "");
    }

    #[test]
    fn test_member_name_normalization() {
        assert_eq!(member_name("./notes.txt"), "notes.txt");
        assert_eq!(member_name("/var/log/app.log"), "var/log/app.log");
        assert_eq!(member_name("plain.txt"), "plain.txt");
    }

    #[test]
    fn test_mock_file_operations() {
        let provider = MockFsProvider::new();
        provider.add_file("/data/notes.txt", b"hello".to_vec());

        assert!(provider.is_file("/data/notes.txt"));
        assert_eq!(provider.read_bytes("/data/notes.txt").unwrap(), b"hello");
        assert_eq!(provider.file_size("/data/notes.txt").unwrap(), 5);

        assert!(provider.read_bytes("/data/missing.txt").is_err());

        provider.write_bytes("/data/out.txt", b"abc").unwrap();
        assert_eq!(provider.read_bytes("/data/out.txt").unwrap(), b"abc");

        provider.delete_file("/data/out.txt").unwrap();
        assert!(!provider.is_file("/data/out.txt"));
    }

    #[test]
    fn test_mock_modes_and_permissions() {
        let provider = MockFsProvider::new();
        provider.add_file("/bin/tool", b"#!".to_vec());

        assert_eq!(provider.permissions("/bin/tool").unwrap(), "rw");
        provider.set_mode("/bin/tool", 0o755).unwrap();
        assert_eq!(provider.mode("/bin/tool").unwrap(), 0o755);
        assert_eq!(provider.permissions("/bin/tool").unwrap(), "rwx");
    }

    #[test]
    fn test_mock_archive_session_cycle() {
        let provider = MockFsProvider::new();
        provider.add_file("report.txt", b"quarterly".to_vec());

        let mut session = provider.archive_open("bundle.zip");
        assert!(!provider.archive_member(&session, "report.txt"));

        provider.archive_add(&mut session, "report.txt").unwrap();
        assert!(provider.archive_member(&session, "report.txt"));

        provider.archive_write(&mut session).unwrap();
        assert_eq!(
            provider.archive_list("bundle.zip").unwrap(),
            vec!["report.txt".to_string()]
        );

        provider.archive_remove(&mut session, "report.txt").unwrap();
        assert!(!provider.archive_member(&session, "report.txt"));

        provider.archive_close(session);
    }

    #[test]
    fn test_mock_failure_mode() {
        let provider = MockFsProvider::with_failure();
        assert!(provider.write_bytes("/x", b"1").is_err());
        assert!(provider.delete_file("/x").is_err());

        let mut session = provider.archive_open("a.zip");
        assert!(provider.archive_add(&mut session, "/x").is_err());
        assert!(provider.archive_write(&mut session).is_err());
    }

    #[test]
    fn test_mock_digests_are_deterministic() {
        let provider = MockFsProvider::new();
        assert_eq!(provider.sha256(b"abc"), provider.sha256(b"abc"));
        assert_ne!(provider.sha256(b"abc"), provider.sha256(b"abd"));
        assert_eq!(provider.base64(b"abc"), "YWJj");
    }
}
