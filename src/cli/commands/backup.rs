use console::style;

use crate::backup::{BackupManager, CopyOutcome};
use crate::context::Context;
use crate::error::Result;

/// Take a backup without running the installer.
pub async fn execute(ctx: &Context<'_>) -> Result<()> {
    let record = BackupManager::new(ctx.paths, ctx.journal).backup()?;

    let failed = record
        .entries
        .iter()
        .filter(|e| matches!(e.outcome, CopyOutcome::Failed { .. }))
        .count();

    println!();
    println!(
        "  {} {} item(s) saved to {}",
        style("✓").green().bold(),
        record.copied().count(),
        style(record.directory.display()).cyan()
    );
    if failed > 0 {
        println!(
            "  {} {} item(s) could not be copied, see {}",
            style("!").yellow().bold(),
            failed,
            style("manifest.json").dim()
        );
    }
    println!();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestEnv;

    #[tokio::test]
    async fn test_backup_command_updates_latest_pointer() {
        let env = TestEnv::new();
        env.write_home_file(".zshrc", "export A=1\n");
        let ctx = env.context();

        execute(&ctx).await.unwrap();

        let latest = BackupManager::new(&env.paths, &env.journal)
            .latest()
            .unwrap();
        assert!(latest.join(".zshrc").is_file());
        assert_eq!(env.prompter.confirm_count(), 0);
    }
}
