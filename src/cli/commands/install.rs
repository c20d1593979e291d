use console::style;

use crate::backup::BackupManager;
use crate::catalog::CATALOG;
use crate::context::Context;
use crate::dotfiles::{DotfilesManager, DotfilesOutcome};
use crate::error::Result;
use crate::host::{HOMEBREW_INSTALL, OH_MY_ZSH_INSTALL};
use crate::package::PackageInstaller;
use crate::selection::select_packages;
use crate::tui::print_panel;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    PackageManager,
    ShellFramework,
    WorkDirectory,
    Packages,
    Dotfiles,
}

impl Step {
    pub const ALL: [Step; 5] = [
        Step::PackageManager,
        Step::ShellFramework,
        Step::WorkDirectory,
        Step::Packages,
        Step::Dotfiles,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Step::PackageManager => "Homebrew",
            Step::ShellFramework => "Oh My Zsh",
            Step::WorkDirectory => "Work directory",
            Step::Packages => "Packages",
            Step::Dotfiles => "Dotfiles",
        }
    }

    fn prompt(&self) -> &'static str {
        match self {
            Step::PackageManager => "Install Homebrew?",
            Step::ShellFramework => "Install Oh My Zsh?",
            Step::WorkDirectory => "Create the work directory?",
            Step::Packages => "Install applications and command-line tools?",
            // The dotfiles manager asks for itself.
            Step::Dotfiles => "",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepResult {
    Done,
    AlreadyDone,
    Skipped,
    Failed(String),
}

impl StepResult {
    fn describe(&self) -> String {
        match self {
            StepResult::Done => "done".to_string(),
            StepResult::AlreadyDone => "already set up".to_string(),
            StepResult::Skipped => "skipped".to_string(),
            StepResult::Failed(reason) => format!("failed ({})", reason),
        }
    }
}

/// Back up configuration, then walk the install steps in order.
///
/// Every step is optional and a failed step never stops the ones after it.
pub async fn execute(ctx: &Context<'_>) -> Result<Vec<(Step, StepResult)>> {
    print_panel(
        "devstrap install",
        &[
            "Sets up this Mac for development:".to_string(),
            "  1. Homebrew".to_string(),
            "  2. Oh My Zsh".to_string(),
            format!("  3. Work directory ({})", ctx.paths.work_dir.display()),
            "  4. Applications and command-line tools".to_string(),
            "  5. Dotfiles".to_string(),
            String::new(),
            "Your shell and git configuration is backed up first.".to_string(),
        ],
    );

    ctx.journal.plain("Starting installation");
    if let Err(e) = BackupManager::new(ctx.paths, ctx.journal).backup() {
        ctx.journal.error(format!("Backup failed: {}", e));
    }

    let mut results = Vec::with_capacity(Step::ALL.len());
    for step in Step::ALL {
        println!();
        println!("  {}", style(step.title()).cyan().bold());
        let result = match run_step(ctx, step).await {
            Ok(result) => result,
            Err(e) if !e.is_fatal() => {
                ctx.journal.error(format!("{} failed: {}", step.title(), e));
                StepResult::Failed(e.to_string())
            }
            Err(e) => return Err(e),
        };
        tracing::debug!("{:?} finished: {:?}", step, result);
        results.push((step, result));
    }

    let mut lines: Vec<String> = results
        .iter()
        .map(|(step, result)| format!("{:<16}{}", step.title(), result.describe()))
        .collect();
    lines.push(String::new());
    lines.push(format!("Log file: {}", ctx.journal.path().display()));
    lines.push("Open a new terminal to pick up shell changes.".to_string());
    print_panel("Installation complete", &lines);
    ctx.journal.plain("Installation finished");

    Ok(results)
}

async fn run_step(ctx: &Context<'_>, step: Step) -> Result<StepResult> {
    let journal = ctx.journal;

    let already = match step {
        Step::PackageManager => ctx.host.tool_available("brew").await,
        Step::ShellFramework => ctx.paths.shell_framework_dir.exists(),
        Step::WorkDirectory => ctx.paths.work_dir.is_dir(),
        Step::Packages | Step::Dotfiles => false,
    };
    if already {
        journal.success(format!("{} already set up", step.title()));
        return Ok(StepResult::AlreadyDone);
    }

    if step != Step::Dotfiles && !ctx.prompter.confirm(step.prompt(), true)? {
        journal.skipped(format!("{} skipped", step.title()));
        return Ok(StepResult::Skipped);
    }

    let outcome = match step {
        Step::PackageManager => ctx.host.run_script(&HOMEBREW_INSTALL).await,
        Step::ShellFramework => ctx.host.run_script(&OH_MY_ZSH_INSTALL).await,
        Step::WorkDirectory => std::fs::create_dir_all(&ctx.paths.work_dir).map_err(Into::into),
        Step::Packages => return install_packages(ctx).await,
        Step::Dotfiles => {
            let outcome = DotfilesManager::new(ctx)
                .setup(ctx.dotfiles_repo.as_deref())
                .await?;
            return Ok(match outcome {
                DotfilesOutcome::Configured { .. } => StepResult::Done,
                DotfilesOutcome::AlreadyConfigured => StepResult::AlreadyDone,
                DotfilesOutcome::Declined => StepResult::Skipped,
                DotfilesOutcome::NoRepository => {
                    StepResult::Failed("no repository URL".to_string())
                }
                DotfilesOutcome::CheckoutAborted => {
                    StepResult::Failed("checkout conflicts left in place".to_string())
                }
                DotfilesOutcome::Failed(reason) => StepResult::Failed(reason),
            });
        }
    };

    match outcome {
        Ok(()) => {
            journal.success(format!("{} set up", step.title()));
            Ok(StepResult::Done)
        }
        Err(e) => {
            journal.error(format!("{} failed: {}", step.title(), e));
            Ok(StepResult::Failed(e.to_string()))
        }
    }
}

async fn install_packages(ctx: &Context<'_>) -> Result<StepResult> {
    let Some(selection) = select_packages(ctx.prompter, CATALOG, ctx.journal)? else {
        return Ok(StepResult::Skipped);
    };

    let report = PackageInstaller::new(ctx).install_batch(&selection).await;
    ctx.journal.info(report.summary());

    Ok(if report.failed.is_empty() {
        StepResult::Done
    } else {
        let ids: Vec<&str> = report.failed.iter().map(|(id, _)| *id).collect();
        StepResult::Failed(ids.join(", "))
    })
}
