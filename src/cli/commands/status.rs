use console::style;

use crate::backup::BackupManager;
use crate::catalog::source_clone_entry;
use crate::context::Context;
use crate::dotfiles::DotfilesManager;
use crate::error::Result;
use crate::package::PackageInstaller;
use crate::tui::{print_banner, StatusIndicator};

/// Read-only snapshot of what install has set up on this machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    pub homebrew: bool,
    pub shell_framework: bool,
    pub work_dir: bool,
    pub dotfiles: bool,
    /// Catalog id of the source-cloned tool and whether it is present.
    pub source_clone: Option<(&'static str, bool)>,
    /// Directory name of the latest backup.
    pub latest_backup: Option<String>,
}

impl StatusReport {
    pub async fn collect(ctx: &Context<'_>) -> Self {
        let installer = PackageInstaller::new(ctx);
        let source_clone = match source_clone_entry() {
            Some(entry) => Some((entry.id, installer.is_installed(entry).await)),
            None => None,
        };

        Self {
            homebrew: ctx.host.tool_available("brew").await,
            shell_framework: ctx.paths.shell_framework_dir.is_dir(),
            work_dir: ctx.paths.work_dir.is_dir(),
            dotfiles: DotfilesManager::new(ctx).is_configured(),
            source_clone,
            latest_backup: BackupManager::new(ctx.paths, ctx.journal)
                .latest()
                .and_then(|dir| dir.file_name().map(|n| n.to_string_lossy().to_string())),
        }
    }

    /// Rows of `(indicator, label, detail)` in display order.
    pub fn rows(&self) -> Vec<(StatusIndicator, &'static str, String)> {
        let mut rows = vec![
            (StatusIndicator::from_bool(self.homebrew), "Homebrew", present(self.homebrew)),
            (
                StatusIndicator::from_bool(self.shell_framework),
                "Oh My Zsh",
                present(self.shell_framework),
            ),
            (
                StatusIndicator::from_bool(self.work_dir),
                "Work directory",
                present(self.work_dir),
            ),
            (
                StatusIndicator::from_bool(self.dotfiles),
                "Dotfiles",
                if self.dotfiles {
                    "configured".to_string()
                } else {
                    "not configured".to_string()
                },
            ),
        ];
        if let Some((id, installed)) = self.source_clone {
            rows.push((StatusIndicator::from_bool(installed), id, present(installed)));
        }
        rows.push(match &self.latest_backup {
            Some(name) => (StatusIndicator::Present, "Latest backup", name.clone()),
            None => (
                StatusIndicator::Absent,
                "Latest backup",
                "no backups found".to_string(),
            ),
        });
        rows
    }
}

fn present(flag: bool) -> String {
    if flag { "installed" } else { "not installed" }.to_string()
}

pub async fn execute(ctx: &Context<'_>) -> Result<()> {
    let report = StatusReport::collect(ctx).await;

    print_banner();
    for (indicator, label, detail) in report.rows() {
        println!(
            "  {} {:<16}{}",
            indicator.styled(),
            label,
            style(detail).dim()
        );
    }
    println!();
    println!(
        "  {}  {}",
        style("Log file").dim(),
        ctx.journal.path().display()
    );
    println!();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dotfiles::alias_block;
    use crate::testing::TestEnv;

    #[tokio::test]
    async fn test_status_reflects_machine_state() {
        let env = TestEnv::new();
        env.host.make_available("brew");
        std::fs::create_dir_all(&env.paths.shell_framework_dir).unwrap();
        std::fs::create_dir_all(&env.paths.dotfiles_dir).unwrap();
        env.write_home_file(
            ".zshrc",
            &alias_block("dotfiles", &env.paths.dotfiles_dir, env.home.path()),
        );
        let ctx = env.context();

        let report = StatusReport::collect(&ctx).await;

        assert_eq!(
            report,
            StatusReport {
                homebrew: true,
                shell_framework: true,
                work_dir: false,
                dotfiles: true,
                source_clone: Some(("powerlevel10k", false)),
                latest_backup: None,
            }
        );
        let rows = report.rows();
        let backup = rows.last().unwrap();
        assert_eq!(backup.0, StatusIndicator::Absent);
        assert_eq!(backup.2, "no backups found");
    }

    #[tokio::test]
    async fn test_status_with_only_work_dir() {
        let env = TestEnv::new();
        std::fs::create_dir_all(&env.paths.work_dir).unwrap();
        let ctx = env.context();

        let report = StatusReport::collect(&ctx).await;

        assert_eq!(
            report,
            StatusReport {
                homebrew: false,
                shell_framework: false,
                work_dir: true,
                dotfiles: false,
                source_clone: Some(("powerlevel10k", false)),
                latest_backup: None,
            }
        );
        let rows = report.rows();
        let present: Vec<&str> = rows
            .iter()
            .filter(|row| row.0 == StatusIndicator::Present)
            .map(|row| row.1)
            .collect();
        assert_eq!(present, vec!["Work directory"]);
        let last = rows.last().unwrap();
        assert_eq!(last.1, "Latest backup");
        assert_eq!(last.2, "no backups found");
    }

    #[tokio::test]
    async fn test_status_names_latest_backup() {
        let env = TestEnv::new();
        env.write_home_file(".gitconfig", "[user]\n");
        let record = BackupManager::new(&env.paths, &env.journal).backup().unwrap();
        std::fs::create_dir_all(env.home.path().join(".oh-my-zsh/custom/themes/powerlevel10k"))
            .unwrap();
        let ctx = env.context();

        let report = StatusReport::collect(&ctx).await;

        let name = record.directory.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("backup_"));
        assert_eq!(report.latest_backup, Some(name));
        assert_eq!(report.source_clone, Some(("powerlevel10k", true)));
        assert!(!report.homebrew);
        assert!(!report.dotfiles);
    }

    #[tokio::test]
    async fn test_status_is_read_only() {
        let env = TestEnv::new();
        let ctx = env.context();

        execute(&ctx).await.unwrap();

        assert!(env.host.runs().is_empty());
        assert!(env.packages.install_calls().is_empty());
        assert!(env.vcs.calls.lock().unwrap().is_empty());
        assert_eq!(env.prompter.confirm_count(), 0);
        assert!(!env.paths.backup_root.exists());
    }
}
