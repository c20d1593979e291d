use crate::catalog::CatalogEntry;
use crate::error::Result;
use crate::journal::Journal;
use crate::tui::Prompter;

const PROCEED: usize = 0;
const GO_BACK: usize = 1;

/// Let the user pick which catalog entries to install.
///
/// Everything starts preselected. After choosing, the user can proceed, go
/// back with the current choice kept, or skip the step. Returns `None` when
/// the step is skipped or nothing was chosen.
pub fn select_packages(
    prompter: &dyn Prompter,
    catalog: &'static [CatalogEntry],
    journal: &Journal,
) -> Result<Option<Vec<&'static CatalogEntry>>> {
    let labels: Vec<String> = catalog.iter().map(|entry| entry.label()).collect();
    let mut preselected = vec![true; catalog.len()];

    loop {
        let chosen = prompter.multi_select(
            "Select packages to install",
            &labels,
            &preselected,
        )?;

        if chosen.is_empty() {
            journal.skipped("No packages selected");
            return Ok(None);
        }

        let selection: Vec<&'static CatalogEntry> = chosen
            .iter()
            .filter_map(|&i| catalog.get(i))
            .collect();

        println!();
        println!("  Selected packages:");
        for entry in &selection {
            println!("    • {}", entry.id);
        }
        println!();

        match prompter.select(
            "What next?",
            &["Proceed with installation", "Go back and edit", "Skip package installation"],
            PROCEED,
        )? {
            PROCEED => return Ok(Some(selection)),
            GO_BACK => {
                preselected = (0..catalog.len()).map(|i| chosen.contains(&i)).collect();
            }
            _ => {
                journal.skipped("Package installation skipped");
                return Ok(None);
            }
        }
    }
}
