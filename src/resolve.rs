use crate::error::ZvmError;
use crate::types::{ArtifactDescriptor, Manifest, PlatformEntry, PlatformInfo};

/// Finds the artifact for `version` on `platform`; its `tarball` is the
/// download URL.
pub fn resolve_artifact<'m>(
    version: &str,
    manifest: &'m Manifest,
    platform: &PlatformInfo,
) -> Result<&'m ArtifactDescriptor, ZvmError> {
    let platforms = manifest
        .get(version)
        .ok_or_else(|| ZvmError::UnknownVersion(version.to_string()))?;

    let key = platform.key();
    tracing::debug!("Looking up {} for {}", key, version);

    match platforms.get(&key) {
        Some(PlatformEntry::Artifact(artifact)) => Ok(artifact),
        Some(PlatformEntry::Record(_)) => Err(ZvmError::MissingDownloadUrl {
            version: version.to_string(),
            platform: key,
        }),
        Some(PlatformEntry::Scalar(_)) => Err(ZvmError::MalformedManifestEntry {
            version: version.to_string(),
            platform: key,
        }),
        None => Err(ZvmError::UnsupportedPlatform {
            arch: platform.arch.clone(),
            os: platform.os.clone(),
        }),
    }
}
