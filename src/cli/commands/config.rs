use std::path::Path;

use console::style;

use crate::config::AppConfig;
use crate::error::Result;

pub async fn show() -> Result<()> {
    let config_path = AppConfig::config_path()?;
    let config = AppConfig::load()?;

    println!("{}", style("Current Configuration").bold().cyan());
    println!();
    println!("  Backup root:   {}", style(&config.backup_root).white());
    println!("  Log file:      {}", style(&config.log_file).white());
    println!("  Work dir:      {}", style(&config.work_dir).white());
    println!("  Dotfiles dir:  {}", style(&config.dotfiles_dir).white());
    println!("  Alias:         {}", style(&config.dotfiles_alias).yellow());
    print!("  Dotfiles repo: ");
    match &config.dotfiles_repo {
        Some(repo) => println!("{}", style(repo).white()),
        None => println!("{}", style("(ask during install)").dim()),
    }
    println!();
    if config_path.exists() {
        println!("Config file: {}", style(config_path.display()).dim());
    } else {
        println!(
            "{} {}",
            style("Using defaults, no file at").dim(),
            style(config_path.display()).dim()
        );
    }

    Ok(())
}

pub async fn set(key: String, value: String) -> Result<()> {
    set_in(&AppConfig::config_path()?, &key, value)
}

fn set_in(path: &Path, key: &str, value: String) -> Result<()> {
    let mut config = AppConfig::load_or_default(path)?;

    if let Err(e) = config.set(key, value.clone()) {
        println!("{} {}", style("!").yellow().bold(), e);
        return Ok(());
    }

    config.save_to(path)?;

    println!(
        "{} Set {} = {}",
        style("✓").green().bold(),
        style(key).cyan(),
        style(&value).white()
    );

    Ok(())
}
