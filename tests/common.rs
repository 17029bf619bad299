use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

/// Isolated managed root for running the `zvm` binary.
#[allow(dead_code)]
pub struct TestContext {
    pub _temp_dir: TempDir,
    pub root: PathBuf,
    pub bin_path: PathBuf,
}

#[allow(dead_code)]
impl TestContext {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let root = temp_dir.path().join(".zvm");
        let bin_path = PathBuf::from(env!("CARGO_BIN_EXE_zvm"));

        Self {
            _temp_dir: temp_dir,
            root,
            bin_path,
        }
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = Command::new(&self.bin_path);
        cmd.env("ZVM_ROOT", &self.root);
        cmd.env("HOME", self._temp_dir.path());
        cmd.env_remove("ZVM_MANIFEST_URL");
        cmd.env_remove("RUST_LOG");
        // The mock servers listen on loopback
        for var in ["HTTP_PROXY", "HTTPS_PROXY", "ALL_PROXY", "http_proxy", "https_proxy", "all_proxy"] {
            cmd.env_remove(var);
        }
        cmd
    }

    /// Command pointed at a manifest served from `base_url`.
    pub fn cmd_with_manifest(&self, base_url: &str) -> Command {
        let mut cmd = self.cmd();
        cmd.env("ZVM_MANIFEST_URL", format!("{}/download/index.json", base_url));
        cmd
    }

    /// Manifest key the binary resolves for this machine, read from
    /// `zvm version`.
    pub fn host_key(&self) -> String {
        let output: CommandOutput = self
            .cmd()
            .arg("version")
            .output()
            .expect("Failed to run zvm")
            .into();
        output.assert_success();
        output
            .stdout
            .lines()
            .find_map(|line| line.strip_prefix("host: "))
            .expect("zvm version did not report a host key")
            .trim()
            .to_string()
    }
}

#[allow(dead_code)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub status: std::process::ExitStatus,
}

impl From<Output> for CommandOutput {
    fn from(output: Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            status: output.status,
        }
    }
}

#[allow(dead_code)]
impl CommandOutput {
    pub fn assert_success(&self) -> &Self {
        if !self.status.success() {
            panic!(
                "Command failed with status {:?}\nstdout: {}\nstderr: {}",
                self.status.code(),
                self.stdout,
                self.stderr
            );
        }
        self
    }

    pub fn assert_exit_code(&self, code: i32) -> &Self {
        assert_eq!(
            self.status.code(),
            Some(code),
            "Unexpected exit status\nstdout: {}\nstderr: {}",
            self.stdout,
            self.stderr
        );
        self
    }

    pub fn assert_stdout_contains(&self, text: &str) -> &Self {
        assert!(
            self.stdout.contains(text),
            "Stdout did not contain '{}'\nActual stdout: {}",
            text,
            self.stdout
        );
        self
    }

    pub fn assert_stderr_contains(&self, text: &str) -> &Self {
        assert!(
            self.stderr.contains(text),
            "Stderr did not contain '{}'\nActual stderr: {}",
            text,
            self.stderr
        );
        self
    }
}
