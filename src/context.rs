use crate::config::{AppConfig, Paths};
use crate::git::Vcs;
use crate::host::Host;
use crate::journal::Journal;
use crate::package::PackageManager;
use crate::tui::Prompter;

/// Everything a workflow needs, borrowed for the duration of one run.
pub struct Context<'a> {
    pub config: &'a AppConfig,
    pub paths: &'a Paths,
    pub journal: &'a Journal,
    pub prompter: &'a dyn Prompter,
    pub packages: &'a dyn PackageManager,
    pub vcs: &'a dyn Vcs,
    pub host: &'a dyn Host,
    /// Dotfiles remote resolved at startup; `None` means ask when needed.
    pub dotfiles_repo: Option<String>,
}
