pub mod commands;

use clap::{Parser, Subcommand};

use crate::config::{AppConfig, DOTFILES_REPO_ENV};
use crate::context::Context;
use crate::error::{DevstrapError, Result};
use crate::git::GitCli;
use crate::host::LocalHost;
use crate::journal::Journal;
use crate::package::Homebrew;
use crate::tui::{is_tty_available, DialoguerPrompter};

#[derive(Parser)]
#[command(name = "devstrap")]
#[command(version)]
#[command(about = "Set up a macOS development workstation")]
#[command(long_about = "Installs Homebrew, Oh My Zsh, your everyday tools and your dotfiles.\n\nEvery step asks first and can be re-run safely.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Dotfiles repository to clone (overrides the config file)
    #[arg(long, global = true, env = DOTFILES_REPO_ENV, value_name = "URL")]
    pub dotfiles_repo: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the install steps
    Install,

    /// Undo the install steps
    Uninstall,

    /// Show what is set up on this machine
    Status,

    /// Back up shell and git configuration
    Backup,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,
        /// Configuration value
        value: String,
    },
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        if let Some(Commands::Config { command }) = self.command {
            return match command {
                ConfigCommands::Show => commands::config::show().await,
                ConfigCommands::Set { key, value } => commands::config::set(key, value).await,
            };
        }

        let interactive = matches!(
            self.command,
            None | Some(Commands::Install) | Some(Commands::Uninstall)
        );
        if interactive && !is_tty_available() {
            return Err(DevstrapError::Config(
                "devstrap needs an interactive terminal".to_string(),
            ));
        }

        let config = AppConfig::load()?;
        let paths = config.paths()?;
        let journal = Journal::new(&paths.log_file);
        let prompter = DialoguerPrompter;
        let packages = Homebrew;
        let vcs = GitCli;
        let host = LocalHost;

        let ctx = Context {
            config: &config,
            paths: &paths,
            journal: &journal,
            prompter: &prompter,
            packages: &packages,
            vcs: &vcs,
            host: &host,
            dotfiles_repo: config.resolve_dotfiles_repo(self.dotfiles_repo),
        };
        tracing::debug!("Logging to {}", journal.path().display());

        match self.command {
            None => commands::menu::execute(&ctx).await.map(|_| ()),
            Some(Commands::Install) => {
                commands::preflight::check(&ctx).await?;
                commands::install::execute(&ctx).await.map(|_| ())
            }
            Some(Commands::Uninstall) => commands::uninstall::execute(&ctx).await,
            Some(Commands::Status) => commands::status::execute(&ctx).await,
            Some(Commands::Backup) => commands::backup::execute(&ctx).await,
            Some(Commands::Config { .. }) => Ok(()),
        }
    }
}
