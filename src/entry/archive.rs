//! Handle over a zip archive.

use std::collections::HashSet;

use tracing::debug;

use crate::core::errors::{ArchiveError, ArchiveResult};
use crate::core::provider::FsProvider;

/// Handle over a zip archive
///
/// Construction always opens a provider session, even when no archive exists
/// at the path yet — that is how new archives are created. Adds and removes
/// stage changes in the session; [`write`](ArchiveEntry::write) persists
/// them. [`close`](ArchiveEntry::close) releases the session and is
/// idempotent; every other operation on a closed handle fails with
/// [`ArchiveError::SessionClosed`].
pub struct ArchiveEntry<'a, P: FsProvider> {
    provider: &'a P,
    name: String,
    exists: bool,
    session: Option<P::Session>,
    added: HashSet<String>,
}

impl<'a, P: FsProvider> ArchiveEntry<'a, P> {
    pub(crate) fn open(provider: &'a P, name: &str) -> Self {
        let exists = provider.is_file(name);
        let session = provider.archive_open(name);
        Self {
            provider,
            name: name.to_string(),
            exists,
            session: Some(session),
            added: HashSet::new(),
        }
    }

    /// Path this handle was resolved from
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether an archive file existed at construction
    pub fn exists(&self) -> bool {
        self.exists
    }

    /// Whether the session has been released
    pub fn is_closed(&self) -> bool {
        self.session.is_none()
    }

    fn session(&self) -> ArchiveResult<&P::Session> {
        self.session.as_ref().ok_or(ArchiveError::SessionClosed)
    }

    /// Extract the entire archive below `target_dir`
    ///
    /// No rollback: a failure may leave a partially extracted tree.
    pub fn extract(&self, target_dir: &str) -> ArchiveResult<()> {
        self.provider.archive_extract(self.session()?, target_dir)
    }

    /// Live membership test, no caching
    pub fn member(&self, member: &str) -> ArchiveResult<bool> {
        Ok(self.provider.archive_member(self.session()?, member))
    }

    /// Remove a member from the session
    ///
    /// Does not touch the set of members staged via [`add`](ArchiveEntry::add).
    pub fn remove(&mut self, member: &str) -> ArchiveResult<()> {
        self.provider.archive_remove(
            self.session.as_mut().ok_or(ArchiveError::SessionClosed)?,
            member,
        )
    }

    /// Persist pending session changes to the archive file
    pub fn write(&mut self) -> ArchiveResult<()> {
        self.provider.archive_write(
            self.session.as_mut().ok_or(ArchiveError::SessionClosed)?,
        )?;
        self.exists = true;
        Ok(())
    }

    /// Stage the file at `path` as an archive member
    ///
    /// Idempotent within the session: a path already added successfully
    /// returns `Ok` without re-invoking the provider.
    pub fn add(&mut self, path: &str) -> ArchiveResult<()> {
        if self.added.contains(path) {
            return Ok(());
        }
        self.provider.archive_add(
            self.session.as_mut().ok_or(ArchiveError::SessionClosed)?,
            path,
        )?;
        self.added.insert(path.to_string());
        Ok(())
    }

    /// Release the archive session; safe to call more than once
    pub fn close(&mut self) {
        if let Some(session) = self.session.take() {
            debug!("Closing archive {}", self.name);
            self.provider.archive_close(session);
        }
    }

    /// Live member listing from the archive file
    ///
    /// `Ok(None)` means no archive exists on disk — distinct from
    /// `Ok(Some(vec![]))`, an existing archive with no members. Staged but
    /// unwritten changes are not reflected here.
    pub fn files(&self) -> ArchiveResult<Option<Vec<String>>> {
        if !self.exists {
            return Ok(None);
        }
        self.provider.archive_list(&self.name).map(Some)
    }
}
