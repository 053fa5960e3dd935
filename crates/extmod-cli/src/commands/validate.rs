use crate::logger;
use crate::GlobalOpts;
use anyhow::{bail, Context, Result};
use colored::Colorize;
use extmod_manifest::{validate_all, ModuleManifest};
use std::path::Path;

/// Check a manifest file and report every rule it violates
pub fn handle_validate(path: &Path, opts: &GlobalOpts) -> Result<()> {
    logger::debug(&format!("Validating manifest {}", path.display()));
    let manifest = ModuleManifest::load_from_path(path)
        .with_context(|| format!("Failed to read manifest {}", path.display()))?;

    let problems = validate_all(&manifest);
    if problems.is_empty() {
        println!("{} {}", path.display().to_string().bold(), "is valid".green());
        if opts.verbosity_level() > 0 {
            println!(
                "  {} system settings, {} project settings, {} permissions",
                manifest.system_settings.len(),
                manifest.project_settings.len(),
                manifest.permissions.len()
            );
        }
        return Ok(());
    }

    println!("{} {}", path.display().to_string().bold(), "is invalid:".red());
    for problem in &problems {
        println!("  - {}", problem);
    }
    bail!(
        "{} has {} configuration problem(s)",
        path.display(),
        problems.len()
    )
}
