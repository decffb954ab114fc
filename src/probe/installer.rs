//! Toolchain installation used by `--fix`.
//!
//! [`RustupInstaller`] downloads `rustup-init` for the host triple, verifies
//! it against the published `.sha256`, and runs it non-interactively.

use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{EnvReadyError, Result};
use crate::shell::{command_line, CommandRunner, Platform};

/// Installs the compiler toolchain manager.
pub trait ToolchainInstaller {
    /// Install the toolchain, running subprocesses through `runner`.
    fn install(&self, runner: &dyn CommandRunner, timeout: Duration) -> Result<()>;
}

/// Target triple of the running binary, as used in rustup dist paths.
pub fn host_triple() -> &'static str {
    if cfg!(all(target_os = "windows", target_arch = "x86_64")) {
        "x86_64-pc-windows-msvc"
    } else if cfg!(all(target_os = "windows", target_arch = "aarch64")) {
        "aarch64-pc-windows-msvc"
    } else if cfg!(all(target_os = "macos", target_arch = "aarch64")) {
        "aarch64-apple-darwin"
    } else if cfg!(target_os = "macos") {
        "x86_64-apple-darwin"
    } else if cfg!(all(target_os = "linux", target_arch = "aarch64")) {
        "aarch64-unknown-linux-gnu"
    } else {
        "x86_64-unknown-linux-gnu"
    }
}

/// Downloads and runs `rustup-init`.
pub struct RustupInstaller {
    dist_url: String,
    triple: String,
    platform: Platform,
    download_dir: PathBuf,
    http_timeout: Duration,
}

impl RustupInstaller {
    /// Installer for the host, fetching from `dist_url`.
    pub fn new(dist_url: impl Into<String>) -> Self {
        Self {
            dist_url: dist_url.into(),
            triple: host_triple().to_string(),
            platform: Platform::current(),
            download_dir: std::env::temp_dir().join("envready"),
            http_timeout: Duration::from_secs(120),
        }
    }

    /// Use a custom download directory.
    pub fn with_download_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.download_dir = dir.into();
        self
    }

    /// Override the target triple.
    pub fn with_triple(mut self, triple: impl Into<String>) -> Self {
        self.triple = triple.into();
        self
    }

    /// URL of the `rustup-init` binary.
    pub fn installer_url(&self) -> String {
        format!(
            "{}/{}/{}",
            self.dist_url.trim_end_matches('/'),
            self.triple,
            self.platform.exe_name("rustup-init")
        )
    }

    /// Download and verify the installer, returning its local path.
    pub fn download(&self) -> Result<PathBuf> {
        let url = self.installer_url();
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("envready/", env!("CARGO_PKG_VERSION")))
            .timeout(self.http_timeout)
            .build()
            .map_err(|e| download_error(&url, e))?;

        debug!("Downloading {}", url);
        let body = fetch_bytes(&client, &url)?;

        let checksum_url = format!("{}.sha256", url);
        let published = fetch_bytes(&client, &checksum_url)?;
        let published = String::from_utf8_lossy(&published);
        let expected = published
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();

        let actual = hex::encode(Sha256::digest(&body));
        if actual != expected {
            return Err(EnvReadyError::ChecksumMismatch {
                url,
                expected,
                actual,
            });
        }

        std::fs::create_dir_all(&self.download_dir)?;
        let path = self
            .download_dir
            .join(self.platform.exe_name("rustup-init"));
        std::fs::write(&path, &body)?;
        make_executable(&path)?;
        Ok(path)
    }
}

impl ToolchainInstaller for RustupInstaller {
    fn install(&self, runner: &dyn CommandRunner, timeout: Duration) -> Result<()> {
        let path = self.download()?;
        let args = ["-y", "--profile", "minimal"];
        info!("Running {}", command_line(&path.display().to_string(), &args));

        let output = runner.run(&path.to_string_lossy(), &args, timeout)?;
        if !output.success {
            return Err(EnvReadyError::CommandFailed {
                command: command_line("rustup-init", &args),
                code: output.exit_code,
            });
        }
        Ok(())
    }
}

fn fetch_bytes(client: &reqwest::blocking::Client, url: &str) -> Result<Vec<u8>> {
    let response = client.get(url).send().map_err(|e| download_error(url, e))?;
    if !response.status().is_success() {
        return Err(EnvReadyError::DownloadFailed {
            url: url.to_string(),
            message: format!("HTTP {}", response.status()),
        });
    }
    response
        .bytes()
        .map(|b| b.to_vec())
        .map_err(|e| download_error(url, e))
}

fn download_error(url: &str, err: reqwest::Error) -> EnvReadyError {
    EnvReadyError::DownloadFailed {
        url: url.to_string(),
        message: err.to_string(),
    }
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))?;
    Ok(())
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}
