use console::{style, Term};
use dialoguer::{Confirm, Input, MultiSelect, Select};

use crate::error::Result;

/// Interactive primitives every workflow relies on.
///
/// Workflows only talk to this trait so tests can script the answers.
pub trait Prompter {
    /// Yes/no question.
    fn confirm(&self, prompt: &str, default: bool) -> Result<bool>;

    /// Free-text answer. `placeholder` is shown as a hint; empty input is allowed.
    fn input(&self, prompt: &str, placeholder: &str) -> Result<String>;

    /// Pick any number of items; returns chosen indices in list order.
    fn multi_select(&self, prompt: &str, items: &[String], preselected: &[bool])
        -> Result<Vec<usize>>;

    /// Pick exactly one item; returns its index.
    fn select(&self, prompt: &str, items: &[&str], default: usize) -> Result<usize>;

    /// Block until any key is pressed.
    fn wait_for_key(&self, prompt: &str) -> Result<()>;
}

/// Terminal prompter backed by dialoguer.
#[derive(Debug, Default)]
pub struct DialoguerPrompter;

impl Prompter for DialoguerPrompter {
    fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        Ok(Confirm::new()
            .with_prompt(format!("  {} {}", style("?").cyan().bold(), prompt))
            .default(default)
            .interact()?)
    }

    fn input(&self, prompt: &str, placeholder: &str) -> Result<String> {
        let prompt = if placeholder.is_empty() {
            format!("  {} {}", style("?").cyan().bold(), prompt)
        } else {
            format!(
                "  {} {} {}",
                style("?").cyan().bold(),
                prompt,
                style(format!("({})", placeholder)).dim()
            )
        };
        let value: String = Input::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()?;
        Ok(value.trim().to_string())
    }

    fn multi_select(
        &self,
        prompt: &str,
        items: &[String],
        preselected: &[bool],
    ) -> Result<Vec<usize>> {
        Ok(MultiSelect::new()
            .with_prompt(format!(
                "  {} {} {}",
                style("?").cyan().bold(),
                prompt,
                style("(space to toggle, enter to confirm)").dim()
            ))
            .items(items)
            .defaults(preselected)
            .interact()?)
    }

    fn select(&self, prompt: &str, items: &[&str], default: usize) -> Result<usize> {
        Ok(Select::new()
            .with_prompt(format!("  {} {}", style("?").cyan().bold(), prompt))
            .items(items)
            .default(default)
            .interact()?)
    }

    fn wait_for_key(&self, prompt: &str) -> Result<()> {
        println!("  {}", style(prompt).dim());
        Term::stdout().read_key()?;
        Ok(())
    }
}
