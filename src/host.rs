//! The local machine: locating tools and running official installer scripts.
//!
//! Installer scripts are fetched with `curl` into a temporary file and then
//! executed with an explicit interpreter, arguments and environment. No shell
//! string is ever assembled at runtime.

use std::path::PathBuf;
use std::process::Stdio;

use anyhow::Context as _;
use async_trait::async_trait;
use tokio::process::Command;

use crate::error::{DevstrapError, Result};

/// An official remote installer, described structurally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoteScript {
    pub name: &'static str,
    pub url: &'static str,
    pub interpreter: &'static str,
    pub args: &'static [&'static str],
    pub env: &'static [(&'static str, &'static str)],
}

pub const HOMEBREW_INSTALL: RemoteScript = RemoteScript {
    name: "Homebrew installer",
    url: "https://raw.githubusercontent.com/Homebrew/install/HEAD/install.sh",
    interpreter: "/bin/bash",
    args: &[],
    env: &[],
};

pub const HOMEBREW_UNINSTALL: RemoteScript = RemoteScript {
    name: "Homebrew uninstaller",
    url: "https://raw.githubusercontent.com/Homebrew/install/HEAD/uninstall.sh",
    interpreter: "/bin/bash",
    args: &["--force"],
    env: &[],
};

pub const OH_MY_ZSH_INSTALL: RemoteScript = RemoteScript {
    name: "Oh My Zsh installer",
    url: "https://raw.githubusercontent.com/ohmyzsh/ohmyzsh/master/tools/install.sh",
    interpreter: "/bin/sh",
    args: &["--unattended"],
    env: &[("RUNZSH", "no"), ("CHSH", "no"), ("KEEP_ZSHRC", "yes")],
};

/// Homebrew prefixes checked when `brew` is not yet on PATH (fresh installs).
const BREW_LOCATIONS: &[&str] = &["/opt/homebrew/bin/brew", "/usr/local/bin/brew"];

#[async_trait]
pub trait Host: Send + Sync {
    /// Whether `binary` can be found and answers `--version` successfully.
    async fn tool_available(&self, binary: &str) -> bool;

    /// Download and run an installer script with the terminal attached.
    async fn run_script(&self, script: &RemoteScript) -> Result<()>;

    /// Run a program with the terminal attached.
    async fn run_command(&self, program: &str, args: &[&str]) -> Result<()>;
}

/// Locate the `brew` binary, checking standard prefixes when it's not on PATH.
pub fn locate_brew() -> Option<PathBuf> {
    if let Ok(path) = which::which("brew") {
        return Some(path);
    }

    BREW_LOCATIONS
        .iter()
        .map(PathBuf::from)
        .find(|path| path.exists())
}

#[derive(Debug, Default)]
pub struct LocalHost;

#[async_trait]
impl Host for LocalHost {
    async fn tool_available(&self, binary: &str) -> bool {
        let path = match binary {
            "brew" => locate_brew(),
            _ => which::which(binary).ok(),
        };

        let Some(path) = path else {
            return false;
        };

        // macOS ships stub binaries (e.g. /usr/bin/git) that exist but fail
        // until the Command Line Tools are installed.
        Command::new(&path)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map(|s| s.success())
            .unwrap_or(false)
    }

    async fn run_script(&self, script: &RemoteScript) -> Result<()> {
        let script_path =
            std::env::temp_dir().join(format!("devstrap-{}.sh", std::process::id()));

        tracing::debug!("Downloading {} from {}", script.name, script.url);
        let download = Command::new("curl")
            .args(["-fsSL", "-o"])
            .arg(&script_path)
            .arg(script.url)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .with_context(|| format!("could not start curl to download {}", script.name))?;

        if !download.status.success() {
            let _ = tokio::fs::remove_file(&script_path).await;
            return Err(DevstrapError::command(
                format!("Downloading {}", script.name),
                &download.stderr,
            ));
        }

        tracing::debug!("Running {} with {}", script.name, script.interpreter);
        let status = Command::new(script.interpreter)
            .arg(&script_path)
            .args(script.args)
            .envs(script.env.iter().copied())
            .status()
            .await;

        let _ = tokio::fs::remove_file(&script_path).await;

        let status = status
            .with_context(|| format!("could not start {} for {}", script.interpreter, script.name))?;
        if status.success() {
            Ok(())
        } else {
            Err(DevstrapError::CommandFailed {
                program: script.name.to_string(),
                message: format!("exited with {}", status),
            })
        }
    }

    async fn run_command(&self, program: &str, args: &[&str]) -> Result<()> {
        tracing::debug!("Running {} {}", program, args.join(" "));
        let status = Command::new(program)
            .args(args)
            .status()
            .await
            .with_context(|| format!("could not start {}", program))?;

        if status.success() {
            Ok(())
        } else {
            Err(DevstrapError::CommandFailed {
                program: program.to_string(),
                message: format!("exited with {}", status),
            })
        }
    }
}
