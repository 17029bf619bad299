use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Decoded `index.json`: version identifier to its platform map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    versions: BTreeMap<String, PlatformMap>,
}

/// Keys are `"<arch>-<os>"` for artifacts, but upstream also stores
/// metadata (`date`, `docs`, `src`, ...) alongside them.
pub type PlatformMap = BTreeMap<String, PlatformEntry>;

/// One value of a [`PlatformMap`], classified at decode time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PlatformEntry {
    /// An object carrying a string `tarball`.
    Artifact(ArtifactDescriptor),
    /// An object without a usable `tarball`.
    Record(Map<String, Value>),
    /// Anything that is not an object.
    Scalar(Value),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactDescriptor {
    pub tarball: String,
    /// Checksum, size, signature and whatever else upstream ships.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ArtifactDescriptor {
    pub fn shasum(&self) -> Option<&str> {
        self.extra.get("shasum").and_then(Value::as_str)
    }

    /// Upstream publishes `size` as a decimal string; accept a number too.
    pub fn size(&self) -> Option<u64> {
        match self.extra.get("size")? {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }
}

impl Manifest {
    pub fn get(&self, version: &str) -> Option<&PlatformMap> {
        self.versions.get(version)
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    /// Version identifiers in display order, see [`sort_versions`].
    pub fn versions(&self) -> Vec<String> {
        sort_versions(self.versions.keys().cloned().collect())
    }
}

/// Channel names such as `master` first, then semantic versions newest first.
pub fn sort_versions(mut versions: Vec<String>) -> Vec<String> {
    versions.sort_by(|a, b| {
        match (semver::Version::parse(a), semver::Version::parse(b)) {
            (Ok(a), Ok(b)) => b.cmp(&a),
            (Ok(_), Err(_)) => Ordering::Greater,
            (Err(_), Ok(_)) => Ordering::Less,
            (Err(_), Err(_)) => a.cmp(b),
        }
    });
    versions
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformInfo {
    pub arch: String,
    pub os: String,
}

impl PlatformInfo {
    pub fn new(arch: impl Into<String>, os: impl Into<String>) -> Self {
        Self {
            arch: arch.into(),
            os: os.into(),
        }
    }

    /// Manifest key, e.g. `x86_64-linux`.
    pub fn key(&self) -> String {
        format!("{}-{}", self.arch, self.os)
    }
}
