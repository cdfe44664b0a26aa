//! Service configuration and store path resolution.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use ldap_acl_authz::AuthorizationPolicy;
use ldap_acl_store::{FileStore, DEFAULT_FILE_NAME};
use serde::{Deserialize, Serialize};

use crate::error::{AclError, Result};

/// Directory created under the user config dir for [`StoreLocation::ConfigDir`].
pub const CONFIG_DIR_NAME: &str = "ldap-acl";

/// Turns a store file name into a full path.
pub trait PathResolver {
    fn resolve(&self, file_name: &str) -> Result<PathBuf>;
}

/// Where the ACL store file lives.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreLocation {
    /// Next to the running executable.
    #[default]
    BesideExecutable,
    /// In the per-user configuration directory.
    ConfigDir,
    /// In this directory.
    Path(PathBuf),
}

impl PathResolver for StoreLocation {
    fn resolve(&self, file_name: &str) -> Result<PathBuf> {
        match self {
            StoreLocation::BesideExecutable => {
                let exe = std::env::current_exe()
                    .map_err(|e| AclError::PathResolution(e.to_string()))?;
                let dir = exe.parent().ok_or_else(|| {
                    AclError::PathResolution(format!("{} has no parent", exe.display()))
                })?;
                Ok(dir.join(file_name))
            }
            StoreLocation::ConfigDir => {
                let dir = dirs_next::config_dir()
                    .ok_or_else(|| AclError::PathResolution("no user config directory".into()))?
                    .join(CONFIG_DIR_NAME);
                fs::create_dir_all(&dir)
                    .map_err(|e| AclError::PathResolution(format!("{}: {e}", dir.display())))?;
                Ok(dir.join(file_name))
            }
            StoreLocation::Path(dir) => Ok(dir.join(file_name)),
        }
    }
}

/// Service configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AclConfig {
    /// Where the store file lives.
    pub store: StoreLocation,
    /// Store file name.
    pub file_name: String,
    /// Mismatch handling.
    pub policy: AuthorizationPolicy,
    /// Connect timeout for the TCP reachability probe.
    pub probe_timeout_ms: u64,
    /// Log filter used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for AclConfig {
    fn default() -> Self {
        Self {
            store: StoreLocation::default(),
            file_name: DEFAULT_FILE_NAME.to_string(),
            policy: AuthorizationPolicy::default(),
            probe_timeout_ms: 3_000,
            log_filter: "info".to_string(),
        }
    }
}

impl AclConfig {
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| AclError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Keep the store in `dir`.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            store: StoreLocation::Path(dir.into()),
            ..Self::default()
        }
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    /// Full path of the store file.
    pub fn store_path(&self) -> Result<PathBuf> {
        self.store.resolve(&self.file_name)
    }

    pub fn open_store(&self) -> Result<FileStore> {
        Ok(FileStore::new(self.store_path()?))
    }
}
