//! Git operations used for source clones and the bare dotfiles repository.

use std::path::{Component, Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use crate::error::{DevstrapError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloneMode {
    /// Regular working-tree clone with history truncated to the last commit.
    Shallow,
    /// No working tree; paired later with an external work tree.
    Bare,
}

#[async_trait]
pub trait Vcs: Send + Sync {
    async fn clone_repo(&self, url: &str, dest: &Path, mode: CloneMode) -> Result<()>;

    /// Check out the bare repository's HEAD into `work_tree`.
    async fn checkout(&self, git_dir: &Path, work_tree: &Path) -> Result<()>;

    /// Re-run the checkout and report the paths (relative to `work_tree`) that block it.
    async fn checkout_conflicts(&self, git_dir: &Path, work_tree: &Path) -> Result<Vec<PathBuf>>;

    /// Set a repository-local configuration value.
    async fn set_config(&self, git_dir: &Path, key: &str, value: &str) -> Result<()>;
}

/// Extract the blocking paths from git's checkout diagnostics.
///
/// Git lists them tab-indented under a header ending in
/// "would be overwritten by checkout:". Absolute paths and paths that climb
/// out of the work tree are dropped, since callers delete what is returned.
pub fn parse_checkout_conflicts(stderr: &str) -> Vec<PathBuf> {
    let mut conflicts = Vec::new();
    let mut in_list = false;

    for line in stderr.lines() {
        if line.contains("would be overwritten by checkout") {
            in_list = true;
            continue;
        }
        if !in_list {
            continue;
        }
        if !line.starts_with(char::is_whitespace) || line.trim().is_empty() {
            in_list = false;
            continue;
        }

        let path = PathBuf::from(line.trim());
        let contained = path
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        if contained && !conflicts.contains(&path) {
            conflicts.push(path);
        }
    }

    conflicts
}

#[derive(Debug, Default)]
pub struct GitCli;

impl GitCli {
    fn with_repo(git_dir: &Path, work_tree: Option<&Path>) -> Command {
        let mut cmd = Command::new("git");
        cmd.arg("--git-dir").arg(git_dir);
        if let Some(work_tree) = work_tree {
            cmd.arg("--work-tree").arg(work_tree);
        }
        cmd.stdout(Stdio::null()).stderr(Stdio::piped());
        cmd
    }
}

#[async_trait]
impl Vcs for GitCli {
    async fn clone_repo(&self, url: &str, dest: &Path, mode: CloneMode) -> Result<()> {
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut cmd = Command::new("git");
        cmd.arg("clone");
        match mode {
            CloneMode::Shallow => cmd.args(["--depth", "1"]),
            CloneMode::Bare => cmd.arg("--bare"),
        };
        let output = cmd
            .arg(url)
            .arg(dest)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if output.status.success() {
            Ok(())
        } else {
            Err(DevstrapError::command("git clone", &output.stderr))
        }
    }

    async fn checkout(&self, git_dir: &Path, work_tree: &Path) -> Result<()> {
        let output = Self::with_repo(git_dir, Some(work_tree))
            .arg("checkout")
            .output()
            .await?;

        if output.status.success() {
            Ok(())
        } else {
            Err(DevstrapError::command("git checkout", &output.stderr))
        }
    }

    async fn checkout_conflicts(&self, git_dir: &Path, work_tree: &Path) -> Result<Vec<PathBuf>> {
        let output = Self::with_repo(git_dir, Some(work_tree))
            .arg("checkout")
            .output()
            .await?;

        if output.status.success() {
            return Ok(Vec::new());
        }
        Ok(parse_checkout_conflicts(&String::from_utf8_lossy(
            &output.stderr,
        )))
    }

    async fn set_config(&self, git_dir: &Path, key: &str, value: &str) -> Result<()> {
        let output = Self::with_repo(git_dir, None)
            .args(["config", "--local", key, value])
            .output()
            .await?;

        if output.status.success() {
            Ok(())
        } else {
            Err(DevstrapError::command("git config", &output.stderr))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_untracked_conflicts() {
        let stderr = "error: The following untracked working tree files would be overwritten by checkout:\n\
                      \t.zshrc\n\
                      \t.config/nvim/init.lua\n\
                      Please move or remove them before you switch branches.\n\
                      Aborting\n";
        assert_eq!(
            parse_checkout_conflicts(stderr),
            vec![PathBuf::from(".zshrc"), PathBuf::from(".config/nvim/init.lua")]
        );
    }

    #[test]
    fn test_parse_local_changes_conflicts() {
        let stderr = "error: Your local changes to the following files would be overwritten by checkout:\n\
                      \t.gitconfig\n\
                      Please commit your changes or stash them before you switch branches.\n";
        assert_eq!(parse_checkout_conflicts(stderr), vec![PathBuf::from(".gitconfig")]);
    }

    #[test]
    fn test_parse_ignores_unrelated_output() {
        assert!(parse_checkout_conflicts("fatal: not a git repository\n").is_empty());
        assert!(parse_checkout_conflicts("").is_empty());
    }

    #[test]
    fn test_parse_drops_paths_escaping_work_tree() {
        let stderr = "error: The following untracked working tree files would be overwritten by checkout:\n\
                      \t../outside\n\
                      \t/etc/hosts\n\
                      \t.bashrc\n\
                      \t.bashrc\n\
                      Aborting\n";
        assert_eq!(parse_checkout_conflicts(stderr), vec![PathBuf::from(".bashrc")]);
    }
}
