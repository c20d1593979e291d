//! Timestamped copies of shell and git configuration.
//!
//! Each backup lives in its own `backup_<YYYYmmdd_HHMMSS>` directory under
//! the backup root, next to a `manifest.json` describing what was copied.
//! The `latest` pointer file is rewritten only once the directory and its
//! manifest are complete.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::config::Paths;
use crate::error::Result;
use crate::journal::Journal;

/// Home-relative items captured by every backup.
pub const BACKUP_ITEMS: &[&str] = &[".zshrc", ".gitconfig", ".config"];

pub const MANIFEST_FILE: &str = "manifest.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CopyOutcome {
    Copied,
    Missing,
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub source: String,
    #[serde(flatten)]
    pub outcome: CopyOutcome,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupRecord {
    pub timestamp: DateTime<Local>,
    pub directory: PathBuf,
    pub entries: Vec<ManifestEntry>,
}

impl BackupRecord {
    pub fn copied(&self) -> impl Iterator<Item = &ManifestEntry> {
        self.entries
            .iter()
            .filter(|e| e.outcome == CopyOutcome::Copied)
    }
}

#[derive(Debug, Default)]
pub struct RestoreReport {
    pub source: PathBuf,
    pub restored: Vec<String>,
    pub failed: Vec<(String, String)>,
}

pub struct BackupManager<'a> {
    paths: &'a Paths,
    journal: &'a Journal,
}

impl<'a> BackupManager<'a> {
    pub fn new(paths: &'a Paths, journal: &'a Journal) -> Self {
        Self { paths, journal }
    }

    /// Snapshot the configuration items into a fresh backup directory.
    ///
    /// Missing items and copy failures are recorded in the manifest; only a
    /// failure to create the directory or write the manifest is an error.
    pub fn backup(&self) -> Result<BackupRecord> {
        self.backup_at(Local::now())
    }

    fn backup_at(&self, now: DateTime<Local>) -> Result<BackupRecord> {
        std::fs::create_dir_all(&self.paths.backup_root)?;
        let directory = self.fresh_directory(&now);
        std::fs::create_dir(&directory)?;

        self.journal
            .info(format!("Backing up configuration to {}", directory.display()));

        let mut entries = Vec::with_capacity(BACKUP_ITEMS.len());
        for item in BACKUP_ITEMS {
            let src = self.paths.home.join(item);
            let outcome = if src.symlink_metadata().is_err() {
                self.journal.skipped(format!("{} not found, nothing to back up", item));
                CopyOutcome::Missing
            } else {
                match copy_tree(&src, &directory.join(item)) {
                    Ok(()) => {
                        self.journal.success(format!("Backed up {}", item));
                        CopyOutcome::Copied
                    }
                    Err(e) => {
                        self.journal.warn(format!("Could not back up {}: {}", item, e));
                        CopyOutcome::Failed {
                            reason: e.to_string(),
                        }
                    }
                }
            };
            entries.push(ManifestEntry {
                source: item.to_string(),
                outcome,
            });
        }

        let record = BackupRecord {
            timestamp: now,
            directory,
            entries,
        };
        let manifest = serde_json::to_string_pretty(&record)?;
        std::fs::write(record.directory.join(MANIFEST_FILE), manifest)?;

        std::fs::write(
            &self.paths.latest_pointer,
            record.directory.to_string_lossy().as_bytes(),
        )?;
        tracing::debug!("Latest backup pointer now {}", record.directory.display());

        Ok(record)
    }

    fn fresh_directory(&self, now: &DateTime<Local>) -> PathBuf {
        let base = format!("backup_{}", now.format("%Y%m%d_%H%M%S"));
        let mut candidate = self.paths.backup_root.join(&base);
        let mut n = 1;
        while candidate.exists() {
            candidate = self.paths.backup_root.join(format!("{}_{}", base, n));
            n += 1;
        }
        candidate
    }

    /// Directory named by the latest pointer, if it still exists.
    pub fn latest(&self) -> Option<PathBuf> {
        let content = std::fs::read_to_string(&self.paths.latest_pointer).ok()?;
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return None;
        }
        let dir = PathBuf::from(trimmed);
        dir.is_dir().then_some(dir)
    }

    /// Copy every item of the latest backup back into the home directory.
    ///
    /// Returns `None` when there is no usable backup.
    pub fn restore_latest(&self) -> Option<RestoreReport> {
        let source = self.latest()?;
        let mut report = RestoreReport {
            source: source.clone(),
            ..Default::default()
        };

        let entries = match std::fs::read_dir(&source) {
            Ok(entries) => entries,
            Err(e) => {
                self.journal
                    .error(format!("Could not read {}: {}", source.display(), e));
                return Some(report);
            }
        };

        let mut names: Vec<_> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name())
            .filter(|name| name != MANIFEST_FILE)
            .collect();
        names.sort();

        for name in names {
            let label = name.to_string_lossy().to_string();
            match copy_tree(&source.join(&name), &self.paths.home.join(&name)) {
                Ok(()) => {
                    self.journal.success(format!("Restored {}", label));
                    report.restored.push(label);
                }
                Err(e) => {
                    self.journal.warn(format!("Could not restore {}: {}", label, e));
                    report.failed.push((label, e.to_string()));
                }
            }
        }

        Some(report)
    }
}

/// Recursively copy `src` to `dst`, merging into existing directories and
/// replacing existing files. Symlinks are recreated rather than followed.
/// FIFOs, sockets and device nodes are skipped, since opening them can block.
fn copy_tree(src: &Path, dst: &Path) -> std::io::Result<()> {
    let metadata = src.symlink_metadata()?;

    if metadata.is_dir() {
        if dst.symlink_metadata().map(|m| !m.is_dir()).unwrap_or(false) {
            std::fs::remove_file(dst)?;
        }
        std::fs::create_dir_all(dst)?;
        for entry in std::fs::read_dir(src)? {
            let entry = entry?;
            copy_tree(&entry.path(), &dst.join(entry.file_name()))?;
        }
        return Ok(());
    }

    let file_type = metadata.file_type();
    if !file_type.is_file() && !file_type.is_symlink() {
        tracing::debug!("Skipping special file {}", src.display());
        return Ok(());
    }

    if let Some(parent) = dst.parent() {
        std::fs::create_dir_all(parent)?;
    }
    if let Ok(existing) = dst.symlink_metadata() {
        if existing.is_dir() {
            std::fs::remove_dir_all(dst)?;
        } else {
            std::fs::remove_file(dst)?;
        }
    }

    #[cfg(unix)]
    if metadata.file_type().is_symlink() {
        let target = std::fs::read_link(src)?;
        std::os::unix::fs::symlink(target, dst)?;
        return Ok(());
    }

    std::fs::copy(src, dst)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestEnv;
    use chrono::TimeZone;

    fn dir_names(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_backup_copies_present_items_and_updates_pointer() {
        let env = TestEnv::new();
        env.write_home_file(".zshrc", "export PATH=$PATH\n");
        env.write_home_file(".gitconfig", "[user]\n\tname = dev\n");
        let manager = BackupManager::new(&env.paths, &env.journal);

        let record = manager.backup().unwrap();

        assert_eq!(
            dir_names(&record.directory),
            vec![".gitconfig", ".zshrc", MANIFEST_FILE]
        );
        assert_eq!(
            std::fs::read_to_string(record.directory.join(".zshrc")).unwrap(),
            "export PATH=$PATH\n"
        );
        assert_eq!(
            std::fs::read_to_string(&env.paths.latest_pointer).unwrap(),
            record.directory.to_string_lossy()
        );
        assert_eq!(manager.latest(), Some(record.directory.clone()));

        let config_entry = record
            .entries
            .iter()
            .find(|e| e.source == ".config")
            .unwrap();
        assert_eq!(config_entry.outcome, CopyOutcome::Missing);
        assert_eq!(record.copied().count(), 2);
    }

    #[test]
    fn test_backup_directory_name_and_collision_suffix() {
        let env = TestEnv::new();
        let manager = BackupManager::new(&env.paths, &env.journal);
        let at = Local.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap();

        let first = manager.backup_at(at).unwrap();
        let second = manager.backup_at(at).unwrap();

        assert_eq!(
            first.directory.file_name().unwrap(),
            "backup_20240501_093000"
        );
        assert_eq!(
            second.directory.file_name().unwrap(),
            "backup_20240501_093000_1"
        );
        assert_eq!(manager.latest(), Some(second.directory));
    }

    #[test]
    fn test_backup_copies_config_directory_recursively() {
        let env = TestEnv::new();
        env.write_home_file(".config/nvim/init.lua", "vim.o.number = true\n");
        env.write_home_file(".config/git/ignore", ".DS_Store\n");
        let manager = BackupManager::new(&env.paths, &env.journal);

        let record = manager.backup().unwrap();

        assert!(record.directory.join(".config/nvim/init.lua").is_file());
        assert!(record.directory.join(".config/git/ignore").is_file());
    }

    #[cfg(unix)]
    #[test]
    fn test_backup_preserves_symlinks() {
        let env = TestEnv::new();
        let target = env.write_home_file("dotfiles/zshrc", "# real\n");
        std::os::unix::fs::symlink(&target, env.home.path().join(".zshrc")).unwrap();
        let manager = BackupManager::new(&env.paths, &env.journal);

        let record = manager.backup().unwrap();

        let copied = record.directory.join(".zshrc");
        assert!(copied.symlink_metadata().unwrap().file_type().is_symlink());
        assert_eq!(std::fs::read_link(copied).unwrap(), target);
    }

    #[cfg(unix)]
    #[test]
    fn test_backup_skips_named_pipes() {
        let env = TestEnv::new();
        env.write_home_file(".config/app/settings.toml", "theme = \"dark\"\n");
        let pipe = env.home.path().join(".config/app/pipe");
        let status = std::process::Command::new("mkfifo")
            .arg(&pipe)
            .status()
            .unwrap();
        assert!(status.success());
        let manager = BackupManager::new(&env.paths, &env.journal);

        let (tx, rx) = std::sync::mpsc::channel();
        let paths = env.paths.clone();
        let log = env.paths.log_file.clone();
        std::thread::spawn(move || {
            let journal = Journal::new(log);
            let result = BackupManager::new(&paths, &journal).backup();
            let _ = tx.send(result.map(|r| (r.directory, r.entries)));
        });
        let (directory, entries) = rx
            .recv_timeout(std::time::Duration::from_secs(10))
            .expect("backup blocked on a named pipe")
            .unwrap();

        assert!(directory.join(".config/app/settings.toml").is_file());
        assert!(directory.join(".config/app/pipe").symlink_metadata().is_err());
        let config = entries.iter().find(|e| e.source == ".config").unwrap();
        assert_eq!(config.outcome, CopyOutcome::Copied);

        let report = manager.restore_latest().unwrap();
        assert!(report.failed.is_empty());
    }

    #[test]
    fn test_manifest_round_trips_from_disk() {
        let env = TestEnv::new();
        env.write_home_file(".gitconfig", "[core]\n");
        let manager = BackupManager::new(&env.paths, &env.journal);

        let record = manager.backup().unwrap();
        let raw = std::fs::read_to_string(record.directory.join(MANIFEST_FILE)).unwrap();
        let loaded: BackupRecord = serde_json::from_str(&raw).unwrap();

        assert_eq!(loaded.directory, record.directory);
        assert_eq!(loaded.entries, record.entries);
        assert!(raw.contains("\"status\": \"missing\""));
    }

    #[test]
    fn test_latest_is_none_without_usable_pointer() {
        let env = TestEnv::new();
        let manager = BackupManager::new(&env.paths, &env.journal);
        assert!(manager.latest().is_none());

        std::fs::create_dir_all(&env.paths.backup_root).unwrap();
        std::fs::write(&env.paths.latest_pointer, "").unwrap();
        assert!(manager.latest().is_none());

        std::fs::write(&env.paths.latest_pointer, "/nonexistent/backup_1").unwrap();
        assert!(manager.latest().is_none());
        assert!(manager.restore_latest().is_none());
    }

    #[test]
    fn test_restore_latest_overwrites_home_items() {
        let env = TestEnv::new();
        env.write_home_file(".zshrc", "original\n");
        env.write_home_file(".config/starship.toml", "format = \"$all\"\n");
        let manager = BackupManager::new(&env.paths, &env.journal);
        manager.backup().unwrap();

        env.write_home_file(".zshrc", "modified by installer\n");
        std::fs::remove_file(env.home.path().join(".config/starship.toml")).unwrap();

        let report = manager.restore_latest().unwrap();

        assert_eq!(report.restored, vec![".config", ".zshrc"]);
        assert!(report.failed.is_empty());
        assert_eq!(
            std::fs::read_to_string(env.home.path().join(".zshrc")).unwrap(),
            "original\n"
        );
        assert!(env.home.path().join(".config/starship.toml").is_file());
        assert!(!env.home.path().join(MANIFEST_FILE).exists());
    }
}
