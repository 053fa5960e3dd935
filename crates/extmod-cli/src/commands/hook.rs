use crate::common::{load_config, open_module};
use crate::logger;
use crate::GlobalOpts;
use anyhow::{Context, Result};
use clap::Args;
use extmod_runtime::{HookContext, RequestParams};
use extmod_settings::ProjectId;

#[derive(Args, Debug, Clone)]
pub struct HookCommand {
    /// Module prefix
    pub prefix: String,
    /// Hook name (e.g. project_home_page)
    pub hook: String,
    /// Project context the hook runs in
    #[arg(long)]
    pub project: Option<ProjectId>,
    /// Request parameter passed to the hook, as name=value (repeatable)
    #[arg(long = "param", value_parser = parse_param)]
    pub params: Vec<(String, String)>,
}

/// Dispatch a module hook and print whatever it renders
pub fn handle_hook(cmd: HookCommand, _opts: &GlobalOpts) -> Result<()> {
    let config = load_config()?;
    let module = open_module(&config, &cmd.prefix)?;

    let ctx = HookContext {
        project_id: cmd.project,
        params: cmd.params.into_iter().collect::<RequestParams>(),
    };
    let output = module
        .call_hook(&cmd.hook, &ctx)
        .with_context(|| format!("Hook '{}' of {} failed", cmd.hook, module.identity()))?;

    match output {
        Some(html) => println!("{}", html),
        None => logger::info(&format!(
            "{} produced no output for '{}'",
            module.identity(),
            cmd.hook
        )),
    }
    Ok(())
}

fn parse_param(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name.to_string(), value.to_string())),
        _ => Err(format!("expected name=value, got '{}'", raw)),
    }
}
