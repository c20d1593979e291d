//! Dotfiles tracked in a bare git repository with the home directory as work tree.
//!
//! A shell alias wrapping `git --git-dir=<repo> --work-tree=<home>` is written
//! into the user's shell startup file inside a marked block, so it can be
//! detected on later runs and removed cleanly on uninstall.

use std::path::{Path, PathBuf};

use crate::context::Context;
use crate::error::Result;
use crate::git::CloneMode;
use crate::tui::spinner;

pub const ALIAS_START: &str = "# >>> devstrap dotfiles >>>";
pub const ALIAS_END: &str = "# <<< devstrap dotfiles <<<";

/// Shell startup files, in the order the alias block target is chosen.
pub const STARTUP_FILES: &[&str] = &[".zshrc", ".bashrc", ".bash_profile", ".profile"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DotfilesOutcome {
    AlreadyConfigured,
    Configured { startup_file: PathBuf },
    Declined,
    NoRepository,
    /// Checkout was blocked and the user chose not to delete the blocking files.
    CheckoutAborted,
    Failed(String),
}

/// Render the alias block for a bare repository at `git_dir` checked out into `work_tree`.
pub fn alias_block(alias: &str, git_dir: &Path, work_tree: &Path) -> String {
    format!(
        "{}\nalias {}='git --git-dir={} --work-tree={}'\n{}\n",
        ALIAS_START,
        alias,
        git_dir.display(),
        work_tree.display(),
        ALIAS_END
    )
}

pub fn has_alias_block(content: &str) -> bool {
    content.lines().any(|line| line.trim() == ALIAS_START)
}

/// Strip the alias block (and the blank line written before it).
///
/// Returns `None` when there is no complete block to remove.
pub fn remove_alias_block(content: &str) -> Option<String> {
    let mut lines: Vec<&str> = content.lines().collect();
    let start = lines.iter().position(|line| line.trim() == ALIAS_START)?;
    let end = start + lines[start..].iter().position(|line| line.trim() == ALIAS_END)?;

    lines.drain(start..=end);
    if start > 0 && lines[start - 1].trim().is_empty() {
        lines.remove(start - 1);
    }

    let mut result = lines.join("\n");
    if !result.is_empty() && content.ends_with('\n') {
        result.push('\n');
    }
    Some(result)
}

pub struct DotfilesManager<'a, 'ctx> {
    ctx: &'a Context<'ctx>,
}

impl<'a, 'ctx> DotfilesManager<'a, 'ctx> {
    pub fn new(ctx: &'a Context<'ctx>) -> Self {
        Self { ctx }
    }

    fn git_dir(&self) -> &Path {
        &self.ctx.paths.dotfiles_dir
    }

    fn work_tree(&self) -> &Path {
        &self.ctx.paths.home
    }

    fn startup_files(&self) -> impl Iterator<Item = PathBuf> + '_ {
        STARTUP_FILES
            .iter()
            .map(move |name| self.ctx.paths.home.join(name))
    }

    /// Startup file already carrying the alias block, if any.
    fn startup_file_with_alias(&self) -> Option<PathBuf> {
        self.startup_files().find(|path| {
            std::fs::read_to_string(path)
                .map(|content| has_alias_block(&content))
                .unwrap_or(false)
        })
    }

    /// Whether any shell startup file still carries the alias block.
    pub fn has_alias(&self) -> bool {
        self.startup_file_with_alias().is_some()
    }

    /// The bare repository exists and a startup file carries the alias block.
    pub fn is_configured(&self) -> bool {
        self.git_dir().exists() && self.startup_file_with_alias().is_some()
    }

    /// Link the home directory to a dotfiles repository.
    ///
    /// Only prompt failures are returned as errors; every other problem ends
    /// the step with a logged outcome.
    pub async fn setup(&self, repo: Option<&str>) -> Result<DotfilesOutcome> {
        let journal = self.ctx.journal;

        if self.is_configured() {
            journal.success("Dotfiles already configured");
            return Ok(DotfilesOutcome::AlreadyConfigured);
        }

        if !self
            .ctx
            .prompter
            .confirm("Set up dotfiles from a git repository?", true)?
        {
            journal.skipped("Dotfiles setup skipped");
            return Ok(DotfilesOutcome::Declined);
        }

        let url = match repo {
            Some(url) => url.to_string(),
            None => self
                .ctx
                .prompter
                .input(
                    "Dotfiles repository URL",
                    "git@github.com:you/dotfiles.git",
                )?
                .trim()
                .to_string(),
        };
        if url.is_empty() {
            journal.error("No dotfiles repository URL provided");
            return Ok(DotfilesOutcome::NoRepository);
        }

        if self.git_dir().exists() {
            journal.info(format!(
                "Using existing repository at {}",
                self.git_dir().display()
            ));
        } else {
            let pb = spinner(format!("Cloning {}...", url));
            let cloned = self
                .ctx
                .vcs
                .clone_repo(&url, self.git_dir(), CloneMode::Bare)
                .await;
            pb.finish_and_clear();
            if let Err(e) = cloned {
                journal.error(format!("Failed to clone dotfiles repository: {}", e));
                return Ok(DotfilesOutcome::Failed(e.to_string()));
            }
            journal.success(format!("Cloned {}", url));
        }

        if let Err(e) = self.ctx.vcs.checkout(self.git_dir(), self.work_tree()).await {
            tracing::debug!("Dotfiles checkout failed: {}", e);
            journal.warn("Existing files block the dotfiles checkout");

            if !self
                .ctx
                .prompter
                .confirm("Delete the conflicting files and retry?", false)?
            {
                journal.warn("Dotfiles checkout left incomplete; resolve the conflicts manually");
                return Ok(DotfilesOutcome::CheckoutAborted);
            }

            if let Err(e) = self.resolve_conflicts().await {
                journal.error(format!("Dotfiles checkout failed: {}", e));
                return Ok(DotfilesOutcome::Failed(e.to_string()));
            }
        }
        journal.success("Dotfiles checked out");

        if let Err(e) = self
            .ctx
            .vcs
            .set_config(self.git_dir(), "status.showUntrackedFiles", "no")
            .await
        {
            journal.warn(format!("Could not hide untracked files: {}", e));
        }

        match self.ensure_alias_block() {
            Ok(startup_file) => {
                journal.success(format!(
                    "Alias '{}' available in {}",
                    self.ctx.config.dotfiles_alias,
                    startup_file.display()
                ));
                Ok(DotfilesOutcome::Configured { startup_file })
            }
            Err(e) => {
                journal.error(format!("Could not write the dotfiles alias: {}", e));
                Ok(DotfilesOutcome::Failed(e.to_string()))
            }
        }
    }

    /// Delete every path reported as blocking the checkout, then retry it once.
    async fn resolve_conflicts(&self) -> Result<()> {
        let home = self.work_tree();
        let conflicts = self
            .ctx
            .vcs
            .checkout_conflicts(self.git_dir(), home)
            .await?;

        for relative in conflicts {
            let path = home.join(&relative);
            let removed = match path.symlink_metadata() {
                Ok(meta) if meta.is_dir() => std::fs::remove_dir_all(&path),
                Ok(_) => std::fs::remove_file(&path),
                Err(_) => continue,
            };
            match removed {
                Ok(()) => self
                    .ctx
                    .journal
                    .info(format!("Removed ~/{}", relative.display())),
                Err(e) => self
                    .ctx
                    .journal
                    .warn(format!("Could not remove ~/{}: {}", relative.display(), e)),
            }
        }

        self.ctx.vcs.checkout(self.git_dir(), home).await
    }

    /// Append the alias block to the preferred startup file unless one already has it.
    fn ensure_alias_block(&self) -> std::io::Result<PathBuf> {
        if let Some(existing) = self.startup_file_with_alias() {
            return Ok(existing);
        }

        let target = self
            .startup_files()
            .find(|path| path.exists())
            .unwrap_or_else(|| self.ctx.paths.home.join(STARTUP_FILES[0]));

        let mut content = std::fs::read_to_string(&target).unwrap_or_default();
        if !content.is_empty() {
            if !content.ends_with('\n') {
                content.push('\n');
            }
            content.push('\n');
        }
        content.push_str(&alias_block(
            &self.ctx.config.dotfiles_alias,
            self.git_dir(),
            self.work_tree(),
        ));
        std::fs::write(&target, content)?;

        Ok(target)
    }

    /// Delete the bare repository and the alias block. Tracked files stay in place.
    pub fn remove(&self) -> Result<()> {
        let journal = self.ctx.journal;

        if self.git_dir().exists() {
            std::fs::remove_dir_all(self.git_dir())?;
            journal.success(format!("Removed {}", self.git_dir().display()));
        } else {
            journal.skipped("No dotfiles repository found");
        }

        for path in self.startup_files() {
            let Ok(content) = std::fs::read_to_string(&path) else {
                continue;
            };
            if let Some(stripped) = remove_alias_block(&content) {
                std::fs::write(&path, stripped)?;
                journal.success(format!("Removed dotfiles alias from {}", path.display()));
            }
        }

        Ok(())
    }
}
