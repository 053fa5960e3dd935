use crate::common::{load_config, open_module};
use crate::logger;
use crate::GlobalOpts;
use anyhow::{bail, Context, Result};
use clap::Subcommand;
use extmod_runtime::Module;
use extmod_settings::{ProjectId, SettingValue};

#[derive(Subcommand, Debug, Clone)]
pub enum SettingsAction {
    /// Print the effective value of a setting as JSON
    Get {
        prefix: String,
        key: String,
        /// Read in the context of this project (falls back to the system value)
        #[arg(long)]
        project: Option<ProjectId>,
    },
    /// Store a JSON value (e.g. `true`, `1`, `"text"`, `[1, 2]`)
    Set {
        prefix: String,
        key: String,
        value: String,
        /// Write at project scope instead of system scope
        #[arg(long)]
        project: Option<ProjectId>,
    },
    /// Remove a stored value
    Remove {
        prefix: String,
        key: String,
        /// Remove the project value only
        #[arg(long)]
        project: Option<ProjectId>,
    },
}

pub fn handle_settings(action: SettingsAction, _opts: &GlobalOpts) -> Result<()> {
    let config = load_config()?;
    match action {
        SettingsAction::Get {
            prefix,
            key,
            project,
        } => {
            let module = open_module(&config, &prefix)?;
            warn_if_undeclared(&module, &key);
            let value = match project {
                Some(pid) => module.get_project_setting(&key, pid)?,
                None => module.get_system_setting(&key)?,
            };
            println!("{}", value);
        }
        SettingsAction::Set {
            prefix,
            key,
            value,
            project,
        } => {
            let module = open_module(&config, &prefix)?;
            warn_if_undeclared(&module, &key);
            let value = parse_value(&value)?;
            match project {
                Some(pid) => module.set_project_setting(&key, value.clone(), pid)?,
                None => module.set_system_setting(&key, value.clone())?,
            }
            logger::success(&format!(
                "Set {} = {} ({})",
                key,
                value,
                scope_label(project)
            ));
        }
        SettingsAction::Remove {
            prefix,
            key,
            project,
        } => {
            let module = open_module(&config, &prefix)?;
            match project {
                Some(pid) => module.remove_project_setting(&key, pid)?,
                None => module.remove_system_setting(&key)?,
            }
            logger::success(&format!("Removed {} ({})", key, scope_label(project)));
        }
    }
    Ok(())
}

/// Parse a command-line JSON value into a setting value
///
/// Integer literals must fit in an i64; they are never widened to floats.
pub fn parse_value(raw: &str) -> Result<SettingValue> {
    let value = serde_json::from_str(raw)
        .with_context(|| format!("'{}' is not a valid JSON setting value", raw))?;
    if let Some(literal) = integer_literals(raw).find(|lit| lit.parse::<i64>().is_err()) {
        bail!(
            "Integer {} is out of range ({} to {})",
            literal,
            i64::MIN,
            i64::MAX
        );
    }
    Ok(value)
}

/// Number tokens without a fraction or exponent, skipping string contents
fn integer_literals(raw: &str) -> impl Iterator<Item = &str> {
    let bytes = raw.as_bytes();
    let mut literals = Vec::new();
    let mut in_string = false;
    let mut escaped = false;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if in_string {
            match b {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            i += 1;
        } else if b == b'"' {
            in_string = true;
            i += 1;
        } else if b == b'-' || b.is_ascii_digit() {
            let start = i;
            while i < bytes.len() && matches!(bytes[i], b'-' | b'+' | b'.' | b'e' | b'E' | b'0'..=b'9') {
                i += 1;
            }
            let token = &raw[start..i];
            if !token.contains(['.', 'e', 'E']) {
                literals.push(token);
            }
        } else {
            i += 1;
        }
    }
    literals.into_iter()
}

fn scope_label(project: Option<ProjectId>) -> String {
    match project {
        Some(pid) => format!("project {}", pid),
        None => "system".to_string(),
    }
}

fn warn_if_undeclared(module: &Module, key: &str) {
    if module.manifest().declaration(key).is_none() {
        logger::warn(&format!(
            "'{}' is not declared in the manifest of {}",
            key,
            module.identity()
        ));
    }
}
