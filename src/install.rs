use crate::config::{check_version_name, Settings};
use crate::download::{archive_file_name, download_file};
use crate::error::ZvmError;
use crate::manifest::ManifestStore;
use crate::platform::host_platform;
use crate::progress::ProgressObserver;
use crate::resolve::resolve_artifact;
use crate::types::{sort_versions, PlatformInfo};
use reqwest::Client;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const LOCK_FILE_NAME: &str = ".zvm.lock";

/// Drives manifest fetch, resolution and download for one version at a time.
pub struct Installer {
    settings: Settings,
    client: Client,
    platform: PlatformInfo,
}

impl Installer {
    pub fn new(settings: Settings) -> Result<Self, ZvmError> {
        let client = Client::builder()
            .connect_timeout(settings.connect_timeout)
            .build()
            .map_err(ZvmError::HttpClient)?;
        Ok(Self::with_client(settings, client))
    }

    pub fn with_client(settings: Settings, client: Client) -> Self {
        Self {
            settings,
            client,
            platform: host_platform(),
        }
    }

    /// Resolve against `platform` instead of the host.
    #[cfg(test)]
    pub fn with_platform(mut self, platform: PlatformInfo) -> Self {
        self.platform = platform;
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Downloads the artifact for `version` into its version directory and
    /// returns the artifact path.
    ///
    /// Nothing is retried or cleaned up; a broken download stays on disk.
    pub async fn install(
        &self,
        version: &str,
        progress: &dyn ProgressObserver,
    ) -> Result<PathBuf, ZvmError> {
        check_version_name(version)?;

        let root = &self.settings.root;
        create_dir(root)?;

        let manifest = ManifestStore::new(&self.client, &self.settings)
            .fetch()
            .await?;

        let artifact = resolve_artifact(version, &manifest, &self.platform)?;
        tracing::info!(
            "Resolved {} for {} to {}",
            version,
            self.platform.key(),
            artifact.tarball
        );
        tracing::debug!("Published checksum: {:?}", artifact.shasum());

        let version_dir = self.settings.version_dir(version);
        create_dir(&version_dir)?;
        let _lock = VersionLock::acquire(version, &version_dir)?;

        let dest = version_dir.join(archive_file_name(version, &artifact.tarball));
        download_file(
            &self.client,
            &artifact.tarball,
            &dest,
            artifact.size(),
            progress,
        )
        .await?;

        Ok(dest)
    }

    /// Version directories under the managed root that hold a downloaded
    /// artifact.
    pub fn installed_versions(&self) -> Result<Vec<String>, ZvmError> {
        let root = &self.settings.root;
        let entries = match fs::read_dir(root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(ZvmError::DestinationUnwritable {
                    path: root.clone(),
                    source,
                })
            }
        };

        let versions = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_dir())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|version| has_artifact(&root.join(version), version))
            .collect();

        Ok(sort_versions(versions))
    }

    /// Versions listed by the manifest, fetched fresh unless `offline`.
    pub async fn available_versions(&self, offline: bool) -> Result<Vec<String>, ZvmError> {
        let store = ManifestStore::new(&self.client, &self.settings);
        let manifest = if offline {
            store.load_cached().await?
        } else {
            create_dir(&self.settings.root)?;
            store.fetch().await?
        };
        Ok(manifest.versions())
    }
}

fn create_dir(path: &Path) -> Result<(), ZvmError> {
    fs::create_dir_all(path).map_err(|source| ZvmError::DestinationUnwritable {
        path: path.to_path_buf(),
        source,
    })
}

fn has_artifact(version_dir: &Path, version: &str) -> bool {
    let prefix = format!("{}.", version);
    fs::read_dir(version_dir)
        .map(|entries| {
            entries.filter_map(|entry| entry.ok()).any(|entry| {
                entry
                    .file_name()
                    .to_str()
                    .is_some_and(|name| name.starts_with(&prefix))
            })
        })
        .unwrap_or(false)
}

/// Advisory lock file inside a version directory, removed on drop.
struct VersionLock {
    path: PathBuf,
}

impl VersionLock {
    fn acquire(version: &str, version_dir: &Path) -> Result<Self, ZvmError> {
        let path = version_dir.join(LOCK_FILE_NAME);
        match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
        {
            Ok(_) => {
                tracing::debug!("Acquired {}", path.display());
                Ok(Self { path })
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Err(ZvmError::VersionLocked {
                version: version.to_string(),
                lock_path: path,
            }),
            Err(source) => Err(ZvmError::DestinationUnwritable { path, source }),
        }
    }
}

impl Drop for VersionLock {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            tracing::warn!("Could not remove lock {}: {}", self.path.display(), e);
        }
    }
}
