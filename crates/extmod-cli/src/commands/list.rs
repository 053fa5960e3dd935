use crate::common::load_config;
use crate::GlobalOpts;
use anyhow::Result;
use colored::Colorize;
use extmod_runtime::installed_modules;
use extmod_settings::ProjectId;

/// Print installed modules and the actions available for each
pub fn handle_list(project: Option<ProjectId>, opts: &GlobalOpts) -> Result<()> {
    let config = load_config()?;
    let entries = installed_modules(&config)?;

    if entries.is_empty() {
        println!("There are no modules installed.\n");
        println!(
            "To install a module, add it to the {} list in {}",
            "modules".bold().cyan(),
            extmod_config::Config::path().display()
        );
        return Ok(());
    }

    match project {
        Some(pid) => println!("{} {}", "Modules for project".bold().green(), pid),
        None => println!("{}", "Modules:".bold().green()),
    }

    for entry in &entries {
        let actions: Vec<String> = entry
            .actions(project)
            .iter()
            .map(ToString::to_string)
            .collect();
        println!(
            " {} {} [{}]",
            entry.display_name().bold().blue(),
            format!("({})", entry.identity).dimmed(),
            actions.join(", ")
        );
        if opts.verbosity_level() > 0 {
            if let Some(ref description) = entry.manifest.description {
                println!("   {}", description);
            }
        }
    }
    Ok(())
}
