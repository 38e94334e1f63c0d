//! Configuration for the standard filesystem provider.
//!
//! These are plain data structures; nothing here touches the filesystem.
//! Persisting configuration is the responsibility of the embedding tool.

use serde::{Deserialize, Serialize};

/// Compression method used when writing archive members
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    /// Store members without compression
    Stored,

    /// Deflate compression
    #[default]
    Deflated,
}

/// Settings consumed by [`StdFsProvider`](crate::core::StdFsProvider)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Compression applied when an archive session is written back
    pub compression: Compression,

    /// Carry unix mode bits of added files into archive members, and restore
    /// them on extraction
    pub preserve_unix_permissions: bool,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            compression: Compression::Deflated,
            preserve_unix_permissions: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_config_default() {
        let config = ProviderConfig::default();
        assert_eq!(config.compression, Compression::Deflated);
        assert!(config.preserve_unix_permissions);
    }

    #[test]
    fn test_compression_default() {
        assert_eq!(Compression::default(), Compression::Deflated);
    }
}
