use console::style;

use crate::context::Context;
use crate::error::{DevstrapError, Result};
use crate::host::{RemoteScript, HOMEBREW_INSTALL};
use crate::tui::print_panel;

/// How a missing prerequisite gets installed.
#[derive(Debug, Clone, Copy)]
enum Bootstrap {
    Script(RemoteScript),
    Command {
        program: &'static str,
        args: &'static [&'static str],
    },
}

#[derive(Debug, Clone, Copy)]
struct Prerequisite {
    name: &'static str,
    binary: &'static str,
    rationale: &'static [&'static str],
    manual: &'static [&'static str],
    bootstrap: Bootstrap,
}

const PREREQUISITES: &[Prerequisite] = &[
    Prerequisite {
        name: "Homebrew",
        binary: "brew",
        rationale: &[
            "Homebrew is the package manager devstrap uses",
            "to install applications and command-line tools.",
        ],
        manual: &[
            "Install it from https://brew.sh, then run devstrap again:",
            "/bin/bash -c \"$(curl -fsSL https://raw.githubusercontent.com/Homebrew/install/HEAD/install.sh)\"",
        ],
        bootstrap: Bootstrap::Script(HOMEBREW_INSTALL),
    },
    Prerequisite {
        name: "Git",
        binary: "git",
        rationale: &[
            "Git comes with the Xcode Command Line Tools and is",
            "needed to clone themes and your dotfiles repository.",
        ],
        manual: &[
            "Install the Command Line Tools, then run devstrap again:",
            "xcode-select --install",
        ],
        bootstrap: Bootstrap::Command {
            program: "xcode-select",
            args: &["--install"],
        },
    },
];

/// Make sure every prerequisite is present, offering to install missing ones.
///
/// Silent when nothing is missing. Fails with `PrerequisiteMissing` when the
/// user declines an install or a tool is still absent afterwards.
pub async fn check(ctx: &Context<'_>) -> Result<()> {
    let mut acted = false;

    for prerequisite in PREREQUISITES {
        if ctx.host.tool_available(prerequisite.binary).await {
            tracing::debug!("{} found", prerequisite.name);
            continue;
        }
        acted = true;
        ensure(ctx, prerequisite).await?;
    }

    if acted {
        ctx.journal.success("All prerequisites are installed");
        ctx.prompter.wait_for_key("Press any key to continue...")?;
    }

    Ok(())
}

async fn ensure(ctx: &Context<'_>, prerequisite: &Prerequisite) -> Result<()> {
    let lines: Vec<String> = prerequisite.rationale.iter().map(|s| s.to_string()).collect();
    print_panel(&format!("{} is required", prerequisite.name), &lines);

    let missing = || DevstrapError::PrerequisiteMissing {
        tool: prerequisite.name.to_string(),
    };

    if !ctx
        .prompter
        .confirm(&format!("Install {} now?", prerequisite.name), true)?
    {
        ctx.journal
            .error(format!("{} is required to continue", prerequisite.name));
        print_manual(prerequisite);
        return Err(missing());
    }

    ctx.journal.info(format!("Installing {}...", prerequisite.name));
    let result = match prerequisite.bootstrap {
        Bootstrap::Script(script) => ctx.host.run_script(&script).await,
        Bootstrap::Command { program, args } => ctx.host.run_command(program, args).await,
    };
    if let Err(e) = result {
        ctx.journal
            .error(format!("{} installation failed: {}", prerequisite.name, e));
    }

    // The Command Line Tools installer returns before it finishes, so git may
    // still be missing here even though the install was started.
    if !ctx.host.tool_available(prerequisite.binary).await {
        ctx.journal
            .error(format!("{} is still not available", prerequisite.name));
        print_manual(prerequisite);
        return Err(missing());
    }

    ctx.journal.success(format!("{} installed", prerequisite.name));
    Ok(())
}

fn print_manual(prerequisite: &Prerequisite) {
    println!();
    for line in prerequisite.manual {
        println!("    {}", style(line).dim());
    }
    println!();
}
