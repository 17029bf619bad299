/// HTTP client for the loopback test servers; ignores `*_PROXY` variables.
pub(crate) fn local_client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .build()
        .expect("Failed to build test client")
}

#[cfg(test)]
mod tests {
    use crate::config::Settings;
    use crate::error::{ErrorCategory, ZvmError};
    use crate::platform;
    use crate::resolve::resolve_artifact;
    use crate::types::Manifest;

    fn manifest_for_host() -> Manifest {
        let key = platform::host_platform().key();
        let json = serde_json::json!({
            "0.11.0": { (key): {"tarball": "https://example/z.tar.xz"} },
            "0.10.0": { "riscv64-plan9": {"tarball": "https://example/old.tar.xz"} }
        });
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_host_resolution() {
        let manifest = manifest_for_host();
        let host = platform::host_platform();

        assert_eq!(
            resolve_artifact("0.11.0", &manifest, &host).unwrap().tarball,
            "https://example/z.tar.xz"
        );

        let err = resolve_artifact("0.10.0", &manifest, &host).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::UnsupportedHost);

        let err = resolve_artifact("0.12.0", &manifest, &host).unwrap_err();
        assert!(matches!(err, ZvmError::UnknownVersion(_)));
    }

    #[test]
    fn test_settings_default() {
        let settings = Settings::new("/tmp/zvm-root");
        assert!(settings.manifest_url.ends_with("/download/index.json"));
        assert_eq!(settings.connect_timeout.as_secs(), 30);
    }
}
