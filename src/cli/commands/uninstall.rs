use crate::backup::BackupManager;
use crate::context::Context;
use crate::dotfiles::DotfilesManager;
use crate::error::Result;
use crate::host::HOMEBREW_UNINSTALL;
use crate::tui::print_panel;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    RestoreBackup,
    RemovePackageManager,
    RemoveShellFramework,
    RemoveWorkDirectory,
    RemoveDotfiles,
}

const ACTIONS: [Action; 5] = [
    Action::RestoreBackup,
    Action::RemovePackageManager,
    Action::RemoveShellFramework,
    Action::RemoveWorkDirectory,
    Action::RemoveDotfiles,
];

impl Action {
    fn prompt(&self, ctx: &Context<'_>) -> String {
        match self {
            Action::RestoreBackup => "Restore configuration from the latest backup?".to_string(),
            Action::RemovePackageManager => {
                "Remove Homebrew and every package it installed?".to_string()
            }
            Action::RemoveShellFramework => "Remove Oh My Zsh?".to_string(),
            Action::RemoveWorkDirectory => format!(
                "Delete {} and everything in it?",
                ctx.paths.work_dir.display()
            ),
            Action::RemoveDotfiles => "Remove the dotfiles repository and alias?".to_string(),
        }
    }

    async fn applies(&self, ctx: &Context<'_>) -> bool {
        match self {
            Action::RestoreBackup => BackupManager::new(ctx.paths, ctx.journal).latest().is_some(),
            Action::RemovePackageManager => ctx.host.tool_available("brew").await,
            Action::RemoveShellFramework => ctx.paths.shell_framework_dir.exists(),
            Action::RemoveWorkDirectory => ctx.paths.work_dir.exists(),
            Action::RemoveDotfiles => {
                ctx.paths.dotfiles_dir.exists() || DotfilesManager::new(ctx).has_alias()
            }
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Action::RestoreBackup => "Restoring the backup",
            Action::RemovePackageManager => "Removing Homebrew",
            Action::RemoveShellFramework => "Removing Oh My Zsh",
            Action::RemoveWorkDirectory => "Deleting the work directory",
            Action::RemoveDotfiles => "Removing dotfiles",
        }
    }

    fn absent_message(&self) -> &'static str {
        match self {
            Action::RestoreBackup => "No backup found to restore",
            Action::RemovePackageManager => "Homebrew is not installed",
            Action::RemoveShellFramework => "Oh My Zsh is not installed",
            Action::RemoveWorkDirectory => "Work directory does not exist",
            Action::RemoveDotfiles => "Dotfiles are not configured",
        }
    }
}

/// Undo what install set up, one confirmed action at a time.
///
/// Nothing is touched unless the initial confirmation is accepted.
pub async fn execute(ctx: &Context<'_>) -> Result<()> {
    print_panel(
        "devstrap uninstall",
        &[
            "You will be asked about each of these separately:".to_string(),
            "  • restore configuration from the latest backup".to_string(),
            "  • remove Homebrew and all packages".to_string(),
            "  • remove Oh My Zsh".to_string(),
            "  • delete the work directory".to_string(),
            "  • remove the dotfiles repository".to_string(),
        ],
    );

    if !ctx
        .prompter
        .confirm("Are you sure you want to uninstall?", false)?
    {
        ctx.journal.info("Uninstall cancelled");
        return Ok(());
    }

    ctx.journal.plain("Starting uninstall");
    for action in ACTIONS {
        if !action.applies(ctx).await {
            ctx.journal.skipped(action.absent_message());
            continue;
        }
        if !ctx.prompter.confirm(&action.prompt(ctx), false)? {
            ctx.journal.skipped(format!("{} skipped", action.label()));
            continue;
        }
        if let Err(e) = run(ctx, action).await {
            ctx.journal.error(format!("{} failed: {}", action.label(), e));
        }
    }
    ctx.journal.plain("Uninstall finished");

    Ok(())
}

async fn run(ctx: &Context<'_>, action: Action) -> Result<()> {
    match action {
        Action::RestoreBackup => {
            if let Some(report) = BackupManager::new(ctx.paths, ctx.journal).restore_latest() {
                ctx.journal.success(format!(
                    "Restored {} item(s) from {}",
                    report.restored.len(),
                    report.source.display()
                ));
                if !report.failed.is_empty() {
                    ctx.journal
                        .warn(format!("{} item(s) could not be restored", report.failed.len()));
                }
            }
        }
        Action::RemovePackageManager => {
            ctx.host.run_script(&HOMEBREW_UNINSTALL).await?;
            ctx.journal.success("Homebrew removed");
        }
        Action::RemoveShellFramework => {
            std::fs::remove_dir_all(&ctx.paths.shell_framework_dir)?;
            ctx.journal.success("Oh My Zsh removed");
        }
        Action::RemoveWorkDirectory => {
            std::fs::remove_dir_all(&ctx.paths.work_dir)?;
            ctx.journal
                .success(format!("Removed {}", ctx.paths.work_dir.display()));
        }
        Action::RemoveDotfiles => DotfilesManager::new(ctx).remove()?,
    }
    Ok(())
}
