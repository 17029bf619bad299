use crate::error::ZvmError;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const APP_NAME: &str = "zvm";
pub const ROOT_DIR_NAME: &str = ".zvm";
pub const MANIFEST_FILE_NAME: &str = "versions.json";
pub const DEFAULT_MANIFEST_URL: &str = "https://ziglang.org/download/index.json";
pub const USER_AGENT: &str = concat!("zvm (Zig Version Manager) ", env!("CARGO_PKG_VERSION"));

const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Managed root holding the manifest cache and one directory per version.
    pub root: PathBuf,
    pub manifest_url: String,
    pub connect_timeout: Duration,
}

impl Settings {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            manifest_url: DEFAULT_MANIFEST_URL.to_string(),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }

    /// Defaults plus `ZVM_*` environment overrides.
    pub fn load() -> Result<Self, ZvmError> {
        let root = match std::env::var_os("ZVM_ROOT") {
            Some(root) if !root.is_empty() => PathBuf::from(root),
            _ => resolve_root(dirs::home_dir(), env_flag("ZVM_STRICT_HOME"))?,
        };

        let mut settings = Settings::new(root);

        if let Ok(url) = std::env::var("ZVM_MANIFEST_URL") {
            if !url.is_empty() {
                settings.manifest_url = url;
            }
        }

        if let Ok(secs) = std::env::var("ZVM_CONNECT_TIMEOUT") {
            match secs.parse::<u64>() {
                Ok(secs) => settings.connect_timeout = Duration::from_secs(secs),
                Err(_) => tracing::warn!("Ignoring invalid ZVM_CONNECT_TIMEOUT={}", secs),
            }
        }

        tracing::debug!("Managed root: {}", settings.root.display());
        tracing::debug!("Manifest URL: {}", settings.manifest_url);
        Ok(settings)
    }

    pub fn manifest_cache_path(&self) -> PathBuf {
        self.root.join(MANIFEST_FILE_NAME)
    }

    pub fn version_dir(&self, version: &str) -> PathBuf {
        self.root.join(version)
    }
}

/// Rejects names that would not land directly under the managed root.
pub fn check_version_name(version: &str) -> Result<(), ZvmError> {
    let invalid = version.is_empty()
        || version == "."
        || version == ".."
        || version.contains(['/', '\\'])
        || Path::new(version).is_absolute();
    if invalid {
        return Err(ZvmError::InvalidVersionName(version.to_string()));
    }
    Ok(())
}

/// Picks the managed root from the home directory.
///
/// Without a home directory the lenient mode falls back to a literal `~`,
/// which most systems will treat as a relative directory named `~`.
pub fn resolve_root(home: Option<PathBuf>, strict: bool) -> Result<PathBuf, ZvmError> {
    match home {
        Some(home) => Ok(home.join(ROOT_DIR_NAME)),
        None if strict => Err(ZvmError::HomeDirUnavailable),
        None => {
            tracing::warn!(
                "Could not determine home directory, falling back to '~/{}'",
                ROOT_DIR_NAME
            );
            Ok(PathBuf::from("~").join(ROOT_DIR_NAME))
        }
    }
}

fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}
