use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use super::PackageManager;
use crate::catalog::PackageKind;
use crate::error::{DevstrapError, Result};
use crate::host::locate_brew;

/// Homebrew driven through its CLI.
#[derive(Debug, Default)]
pub struct Homebrew;

impl Homebrew {
    fn brew() -> Result<PathBuf> {
        locate_brew().ok_or_else(|| DevstrapError::CommandFailed {
            program: "brew".to_string(),
            message: "Homebrew is not installed".to_string(),
        })
    }
}

#[async_trait]
impl PackageManager for Homebrew {
    fn name(&self) -> &'static str {
        "Homebrew"
    }

    async fn is_installed(&self, kind: PackageKind, name: &str) -> bool {
        let Ok(brew) = Self::brew() else {
            return false;
        };

        Command::new(brew)
            .args(["list", kind.flag(), name])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map(|s| s.success())
            .unwrap_or(false)
    }

    async fn install(&self, kind: PackageKind, ids: &[&str]) -> Result<()> {
        if ids.is_empty() {
            return Ok(());
        }

        tracing::debug!("brew install {} {}", kind.flag(), ids.join(" "));
        let output = Command::new(Self::brew()?)
            .args(["install", kind.flag()])
            .args(ids)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if output.status.success() {
            Ok(())
        } else {
            Err(DevstrapError::command("brew install", &output.stderr))
        }
    }
}
