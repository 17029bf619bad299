use crate::types::PlatformInfo;

/// Host-reported architecture names that differ from the manifest's naming.
const ARCH_ALIASES: &[(&str, &str)] = &[("amd64", "x86_64")];

/// Host-reported OS names that differ from the manifest's naming.
const OS_ALIASES: &[(&str, &str)] = &[("darwin", "macos")];

fn lookup<'a>(table: &[(&str, &'a str)], reported: &'a str) -> &'a str {
    table
        .iter()
        .find(|(from, _)| *from == reported)
        .map(|(_, to)| *to)
        .unwrap_or(reported)
}

/// Maps a reported `(arch, os)` pair onto manifest names. Unknown names pass
/// through verbatim; unsupported hosts surface later at lookup time.
pub fn normalize(arch: &str, os: &str) -> PlatformInfo {
    PlatformInfo::new(lookup(ARCH_ALIASES, arch), lookup(OS_ALIASES, os))
}

pub fn host_platform() -> PlatformInfo {
    let platform = normalize(std::env::consts::ARCH, std::env::consts::OS);
    tracing::trace!("Host platform: {}", platform.key());
    platform
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amd64_is_normalized() {
        let platform = normalize("amd64", "linux");
        assert_eq!(platform.arch, "x86_64");
        assert_eq!(platform.key(), "x86_64-linux");
    }

    #[test]
    fn test_unknown_names_pass_through() {
        for arch in ["x86_64", "aarch64", "riscv64", "powerpc64le", "arm64"] {
            assert_eq!(normalize(arch, "linux").arch, arch);
        }
        assert_eq!(normalize("x86_64", "freebsd").os, "freebsd");
        assert_eq!(normalize("aarch64", "darwin").os, "macos");
    }

    #[test]
    fn test_host_platform() {
        let info = host_platform();
        assert!(!info.os.is_empty());
        assert!(!info.arch.is_empty());
        assert_eq!(info.os, std::env::consts::OS);
    }
}
