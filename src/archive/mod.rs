//! Zip archive sessions for the standard provider.
//!
//! A session holds the archive's members in memory: opening loads the
//! existing archive (if any), add/remove mutate the in-memory state, and
//! writing rebuilds the archive file atomically through a temporary file.
//! An archive that exists but cannot be parsed yields a *poisoned* session;
//! member operations through it fail with [`ArchiveError::Corrupted`] so a
//! write can never clobber the original bytes.

use std::collections::BTreeMap;
use std::fs;
use std::io::{Read, Write};
use std::path::{Component, Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, warn};
use zip::write::FileOptions;
use zip::CompressionMethod;

use crate::config::{Compression, ProviderConfig};
use crate::core::errors::{ArchiveError, ArchiveResult, FsError};
use crate::core::provider::member_name;

/// Archive session used by [`StdFsProvider`](crate::core::StdFsProvider)
#[derive(Debug)]
pub struct ZipSession {
    path: PathBuf,
    members: BTreeMap<String, Vec<u8>>,
    modes: BTreeMap<String, u32>,
    load_error: Option<String>,
    compression: Compression,
    preserve_unix_permissions: bool,
}

impl ZipSession {
    /// Open a session for `path`
    ///
    /// Never fails: a nonexistent archive yields an empty session, an
    /// unreadable one yields a poisoned session.
    pub(crate) fn open(path: &str, config: &ProviderConfig) -> Self {
        let path_buf = PathBuf::from(path);
        let mut members = BTreeMap::new();
        let mut modes = BTreeMap::new();
        let mut load_error = None;

        if path_buf.is_file() {
            if let Err(reason) = load_members(&path_buf, &mut members, &mut modes) {
                warn!("Opening unreadable archive {path}: {reason}");
                members.clear();
                modes.clear();
                load_error = Some(reason);
            } else {
                debug!("Opened archive {path} with {} members", members.len());
            }
        } else {
            debug!("Opened session for new archive {path}");
        }

        Self {
            path: path_buf,
            members,
            modes,
            load_error,
            compression: config.compression,
            preserve_unix_permissions: config.preserve_unix_permissions,
        }
    }

    fn guarded(&self) -> ArchiveResult<()> {
        match &self.load_error {
            Some(reason) => Err(ArchiveError::Corrupted {
                reason: reason.clone(),
            }),
            None => Ok(()),
        }
    }

    pub(crate) fn contains(&self, member: &str) -> bool {
        self.members.contains_key(member)
    }

    /// Stage the file at `path` as a member
    pub(crate) fn add(&mut self, path: &str) -> ArchiveResult<()> {
        self.guarded()?;
        let data = fs::read(path).map_err(|e| FsError::from_io(path, e))?;
        let name = member_name(path);

        if self.preserve_unix_permissions {
            if let Some(mode) = read_unix_mode(path) {
                self.modes.insert(name.clone(), mode);
            }
        }
        self.members.insert(name, data);
        Ok(())
    }

    /// Drop `member` from the session
    pub(crate) fn remove(&mut self, member: &str) -> ArchiveResult<()> {
        self.guarded()?;
        self.modes.remove(member);
        self.members
            .remove(member)
            .map(|_| ())
            .ok_or_else(|| ArchiveError::MemberNotFound {
                name: member.to_string(),
            })
    }

    /// Rebuild the archive file from the session state
    pub(crate) fn write(&mut self) -> ArchiveResult<()> {
        self.guarded()?;
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let tmp = NamedTempFile::new_in(dir).map_err(write_failed)?;
        let mut writer = zip::ZipWriter::new(tmp);
        let method = compression_method(self.compression);

        for (name, data) in &self.members {
            let mut options = FileOptions::default().compression_method(method);
            if self.preserve_unix_permissions {
                if let Some(mode) = self.modes.get(name) {
                    options = options.unix_permissions(*mode);
                }
            }
            writer
                .start_file(name.as_str(), options)
                .map_err(write_failed)?;
            writer.write_all(data).map_err(write_failed)?;
        }

        let tmp = writer.finish().map_err(write_failed)?;
        tmp.persist(&self.path).map_err(write_failed)?;
        debug!(
            "Wrote archive {} with {} members",
            self.path.display(),
            self.members.len()
        );
        Ok(())
    }

    /// Extract every member below `target_dir`
    ///
    /// No rollback: a mid-way failure leaves the members written so far.
    pub(crate) fn extract(&self, target_dir: &str) -> ArchiveResult<()> {
        self.guarded()?;
        let target = Path::new(target_dir);
        fs::create_dir_all(target).map_err(extract_failed)?;

        for (name, data) in &self.members {
            let dest = target.join(sanitized_member_path(name)?);
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent).map_err(extract_failed)?;
            }
            fs::write(&dest, data).map_err(extract_failed)?;
            if self.preserve_unix_permissions {
                if let Some(mode) = self.modes.get(name) {
                    restore_unix_mode(&dest, *mode);
                }
            }
        }
        Ok(())
    }
}

/// List member names of the archive at `path`, read fresh from disk
pub(crate) fn list_members(path: &str) -> ArchiveResult<Vec<String>> {
    let file = fs::File::open(path).map_err(|e| FsError::from_io(path, e))?;
    let archive = zip::ZipArchive::new(file).map_err(|e| ArchiveError::Corrupted {
        reason: e.to_string(),
    })?;
    Ok(archive.file_names().map(str::to_string).collect())
}

fn load_members(
    path: &Path,
    members: &mut BTreeMap<String, Vec<u8>>,
    modes: &mut BTreeMap<String, u32>,
) -> Result<(), String> {
    let file = fs::File::open(path).map_err(|e| e.to_string())?;
    let mut archive = zip::ZipArchive::new(file).map_err(|e| e.to_string())?;

    for index in 0..archive.len() {
        let mut entry = archive.by_index(index).map_err(|e| e.to_string())?;
        if !entry.is_file() {
            continue;
        }
        let name = entry.name().to_string();
        let mut data = Vec::with_capacity(entry.size() as usize);
        entry.read_to_end(&mut data).map_err(|e| e.to_string())?;
        if let Some(mode) = entry.unix_mode() {
            modes.insert(name.clone(), mode & 0o777);
        }
        members.insert(name, data);
    }
    Ok(())
}

/// Reject member names that would escape the extraction directory
fn sanitized_member_path(name: &str) -> ArchiveResult<PathBuf> {
    let mut out = PathBuf::new();
    for component in Path::new(name).components() {
        match component {
            Component::Normal(part) => out.push(part),
            Component::CurDir => {}
            _ => {
                return Err(ArchiveError::ExtractFailed {
                    reason: format!("unsafe member path: {name}"),
                })
            }
        }
    }
    if out.as_os_str().is_empty() {
        return Err(ArchiveError::ExtractFailed {
            reason: format!("empty member path: {name}"),
        });
    }
    Ok(out)
}

fn compression_method(compression: Compression) -> CompressionMethod {
    match compression {
        Compression::Stored => CompressionMethod::Stored,
        Compression::Deflated => CompressionMethod::Deflated,
    }
}

#[cfg(unix)]
fn read_unix_mode(path: &str) -> Option<u32> {
    use std::os::unix::fs::PermissionsExt;
    fs::metadata(path)
        .ok()
        .map(|meta| meta.permissions().mode() & 0o777)
}

#[cfg(not(unix))]
fn read_unix_mode(_path: &str) -> Option<u32> {
    None
}

#[cfg(unix)]
fn restore_unix_mode(path: &Path, mode: u32) {
    use std::os::unix::fs::PermissionsExt;
    if let Err(err) = fs::set_permissions(path, fs::Permissions::from_mode(mode)) {
        warn!("Could not restore mode on {}: {err}", path.display());
    }
}

#[cfg(not(unix))]
fn restore_unix_mode(_path: &Path, _mode: u32) {}

fn write_failed(err: impl std::fmt::Display) -> ArchiveError {
    ArchiveError::WriteFailed {
        reason: err.to_string(),
    }
}

fn extract_failed(err: impl std::fmt::Display) -> ArchiveError {
    ArchiveError::ExtractFailed {
        reason: err.to_string(),
    }
}
