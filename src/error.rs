use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Every way the acquisition pipeline can fail.
///
/// Variants are kept distinct so the caller can pick a remediation via
/// [`ZvmError::category`] without parsing messages.
#[derive(Debug, Error)]
pub enum ZvmError {
    #[error("could not determine the home directory")]
    HomeDirUnavailable,

    #[error("failed to fetch version manifest from {url}: {source}")]
    ManifestFetchFailed {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to write manifest cache to {}: {source}", path.display())]
    ManifestPersistFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("no cached manifest at {} (run without --offline first): {source}", path.display())]
    ManifestCacheUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("version manifest is malformed: {0}")]
    ManifestDecodeFailed(#[source] serde_json::Error),

    #[error("invalid Zig version: {0}")]
    UnknownVersion(String),

    #[error("'{0}' cannot be used as a version directory name")]
    InvalidVersionName(String),

    #[error("invalid/unsupported system: ARCH: {arch} OS: {os}")]
    UnsupportedPlatform { arch: String, os: String },

    #[error("manifest entry for {version} ({platform}) is not a record")]
    MalformedManifestEntry { version: String, platform: String },

    #[error("manifest entry for {version} ({platform}) has no download URL")]
    MissingDownloadUrl { version: String, platform: String },

    #[error("failed to set up the HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    #[error("failed to request artifact {url}: {source}")]
    ArtifactRequestFailed {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("cannot write to {}: {source}", path.display())]
    DestinationUnwritable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("transfer into {} was interrupted: {reason}", path.display())]
    TransferFailed { path: PathBuf, reason: String },

    #[error(
        "version {version} is being installed by another process (remove {} if it is stale)",
        lock_path.display()
    )]
    VersionLocked { version: String, lock_path: PathBuf },
}

/// Remediation groups for [`ZvmError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    WrongVersion,
    UnsupportedHost,
    UpstreamManifest,
    Transient,
}

impl ErrorCategory {
    pub fn hint(self) -> &'static str {
        match self {
            ErrorCategory::WrongVersion => {
                "Run 'zvm ls --remote' to see which versions are available."
            }
            ErrorCategory::UnsupportedHost => {
                "This version has no release build for your platform."
            }
            ErrorCategory::UpstreamManifest => {
                "The upstream version manifest looks broken; please report it."
            }
            ErrorCategory::Transient => "This may be a temporary network or disk issue; try again.",
        }
    }

    pub fn exit_code(self) -> u8 {
        match self {
            ErrorCategory::WrongVersion => 2,
            ErrorCategory::UnsupportedHost => 3,
            ErrorCategory::UpstreamManifest => 4,
            ErrorCategory::Transient => 1,
        }
    }
}

impl ZvmError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ZvmError::UnknownVersion(_) | ZvmError::InvalidVersionName(_) => {
                ErrorCategory::WrongVersion
            }
            ZvmError::UnsupportedPlatform { .. } => ErrorCategory::UnsupportedHost,
            ZvmError::MalformedManifestEntry { .. } | ZvmError::MissingDownloadUrl { .. } => {
                ErrorCategory::UpstreamManifest
            }
            _ => ErrorCategory::Transient,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories_drive_exit_codes() {
        let unknown = ZvmError::UnknownVersion("9.9.9".into());
        assert_eq!(unknown.category(), ErrorCategory::WrongVersion);
        assert_eq!(unknown.category().exit_code(), 2);

        let invalid = ZvmError::InvalidVersionName("../escape".into());
        assert_eq!(invalid.category(), ErrorCategory::WrongVersion);

        let platform = ZvmError::UnsupportedPlatform {
            arch: "riscv64".into(),
            os: "linux".into(),
        };
        assert_eq!(platform.category(), ErrorCategory::UnsupportedHost);
        assert_eq!(
            platform.to_string(),
            "invalid/unsupported system: ARCH: riscv64 OS: linux"
        );

        let missing = ZvmError::MissingDownloadUrl {
            version: "0.11.0".into(),
            platform: "x86_64-linux".into(),
        };
        assert_eq!(missing.category(), ErrorCategory::UpstreamManifest);

        let transfer = ZvmError::TransferFailed {
            path: PathBuf::from("/tmp/x"),
            reason: "reset".into(),
        };
        assert_eq!(transfer.category(), ErrorCategory::Transient);
        assert_eq!(transfer.category().exit_code(), 1);
    }

    #[test]
    fn test_client_setup_is_not_a_manifest_failure() {
        let source = crate::tests::local_client()
            .get("not a url")
            .build()
            .unwrap_err();
        let err = ZvmError::HttpClient(source);

        assert!(err.to_string().starts_with("failed to set up the HTTP client"));
        assert!(!err.to_string().contains("manifest"));
        assert_eq!(err.category(), ErrorCategory::Transient);
    }
}
