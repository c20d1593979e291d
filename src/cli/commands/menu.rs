use crate::context::Context;
use crate::error::Result;
use crate::tui::print_banner;

use super::{install, preflight, status, uninstall};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Install,
    Uninstall,
    Status,
    Exit,
}

const CHOICES: [(MenuChoice, &str); 4] = [
    (MenuChoice::Install, "Install development environment"),
    (MenuChoice::Uninstall, "Uninstall development environment"),
    (MenuChoice::Status, "Show status"),
    (MenuChoice::Exit, "Exit"),
];

/// Check prerequisites, then run one choice from the main menu.
pub async fn execute(ctx: &Context<'_>) -> Result<MenuChoice> {
    preflight::check(ctx).await?;

    print_banner();
    let labels: Vec<&str> = CHOICES.iter().map(|(_, label)| *label).collect();
    let index = ctx
        .prompter
        .select("What would you like to do?", &labels, 0)?;
    let choice = CHOICES
        .get(index)
        .map(|(choice, _)| *choice)
        .unwrap_or(MenuChoice::Exit);
    tracing::debug!("Menu choice: {:?}", choice);

    match choice {
        MenuChoice::Install => {
            install::execute(ctx).await?;
        }
        MenuChoice::Uninstall => uninstall::execute(ctx).await?,
        MenuChoice::Status => status::execute(ctx).await?,
        MenuChoice::Exit => ctx.journal.info("Goodbye"),
    }

    Ok(choice)
}
