use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DevstrapError, Result};

/// Environment variable that carries the dotfiles remote when no flag is given.
pub const DOTFILES_REPO_ENV: &str = "DOTFILES_REPO";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default = "default_backup_root")]
    pub backup_root: String,
    #[serde(default = "default_log_file")]
    pub log_file: String,
    #[serde(default = "default_work_dir")]
    pub work_dir: String,
    #[serde(default = "default_dotfiles_dir")]
    pub dotfiles_dir: String,
    /// Name of the shell alias that wraps git for the bare dotfiles repository.
    #[serde(default = "default_dotfiles_alias")]
    pub dotfiles_alias: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dotfiles_repo: Option<String>,
}

fn default_backup_root() -> String {
    "~/.devstrap/backups".to_string()
}

fn default_log_file() -> String {
    "~/.devstrap/devstrap.log".to_string()
}

fn default_work_dir() -> String {
    "~/Developer".to_string()
}

fn default_dotfiles_dir() -> String {
    "~/.dotfiles".to_string()
}

fn default_dotfiles_alias() -> String {
    "dotfiles".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backup_root: default_backup_root(),
            log_file: default_log_file(),
            work_dir: default_work_dir(),
            dotfiles_dir: default_dotfiles_dir(),
            dotfiles_alias: default_dotfiles_alias(),
            dotfiles_repo: None,
        }
    }
}

/// Absolute locations every workflow operates on, resolved against one home directory.
#[derive(Debug, Clone, PartialEq)]
pub struct Paths {
    pub home: PathBuf,
    pub backup_root: PathBuf,
    pub latest_pointer: PathBuf,
    pub log_file: PathBuf,
    pub work_dir: PathBuf,
    pub dotfiles_dir: PathBuf,
    pub shell_framework_dir: PathBuf,
}

impl Paths {
    /// Resolve a home-relative path (as used by catalog clone destinations).
    pub fn in_home(&self, relative: &str) -> PathBuf {
        expand(relative, &self.home)
    }
}

impl AppConfig {
    pub fn config_dir() -> Result<PathBuf> {
        let home = std::env::var("HOME")
            .map_err(|_| DevstrapError::Config("HOME environment variable not set".to_string()))?;
        Ok(PathBuf::from(home).join(".config").join("devstrap"))
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.yaml"))
    }

    /// Load the config file, falling back to defaults when it does not exist.
    pub fn load() -> Result<Self> {
        Self::load_or_default(&Self::config_path()?)
    }

    /// Defaults when `path` does not exist; a file that fails to parse is an error.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load_from(path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&content)
            .map_err(|e| DevstrapError::Config(format!("Invalid config {}: {}", path.display(), e)))
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Pick the dotfiles remote: explicit flag or environment first, then the config file.
    ///
    /// Blank values count as unset so the dotfiles step falls back to prompting.
    pub fn resolve_dotfiles_repo(&self, from_cli: Option<String>) -> Option<String> {
        from_cli
            .or_else(|| self.dotfiles_repo.clone())
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
    }

    pub fn paths(&self) -> Result<Paths> {
        let home = dirs::home_dir().ok_or_else(|| {
            DevstrapError::Config("Could not determine the home directory".to_string())
        })?;
        Ok(self.paths_in(&home))
    }

    pub fn paths_in(&self, home: &Path) -> Paths {
        let backup_root = expand(&self.backup_root, home);
        Paths {
            home: home.to_path_buf(),
            latest_pointer: backup_root.join("latest"),
            backup_root,
            log_file: expand(&self.log_file, home),
            work_dir: expand(&self.work_dir, home),
            dotfiles_dir: expand(&self.dotfiles_dir, home),
            shell_framework_dir: home.join(".oh-my-zsh"),
        }
    }

    /// Update a single key by name, as used by `devstrap config set`.
    pub fn set(&mut self, key: &str, value: String) -> Result<()> {
        match key {
            "backup_root" | "backup-root" => self.backup_root = value,
            "log_file" | "log-file" => self.log_file = value,
            "work_dir" | "work-dir" => self.work_dir = value,
            "dotfiles_dir" | "dotfiles-dir" => self.dotfiles_dir = value,
            "dotfiles_alias" | "dotfiles-alias" => self.dotfiles_alias = value,
            "dotfiles_repo" | "dotfiles-repo" => {
                self.dotfiles_repo = if value.trim().is_empty() {
                    None
                } else {
                    Some(value)
                }
            }
            _ => {
                return Err(DevstrapError::Config(format!(
                    "Unknown config key '{}'. Available keys: {}",
                    key,
                    Self::KEYS.join(", ")
                )))
            }
        }
        Ok(())
    }

    pub const KEYS: &'static [&'static str] = &[
        "backup_root",
        "log_file",
        "work_dir",
        "dotfiles_dir",
        "dotfiles_alias",
        "dotfiles_repo",
    ];
}

/// Expand `~` against `home`; relative results are taken as home-relative.
fn expand(raw: &str, home: &Path) -> PathBuf {
    let home_str = home.to_string_lossy().to_string();
    let expanded = shellexpand::tilde_with_context(raw, || Some(home_str.as_str()));
    let path = PathBuf::from(expanded.as_ref());
    if path.is_absolute() {
        path
    } else {
        home.join(path)
    }
}
