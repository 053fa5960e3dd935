use clap::{Parser, Subcommand};
use extmod::{
    commands::{
        config::{self, ConfigAction},
        hook, list,
        settings::{self, SettingsAction},
        validate,
    },
    logger, GlobalOpts,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "extmod")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(
    about = "External module framework",
    long_about = "extmod validates module manifests and manages their system and project settings."
)]
struct Cli {
    #[command(flatten)]
    global: GlobalOpts,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Configure extmod
    #[command(subcommand_required = false, arg_required_else_help = false)]
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
    /// Validate a module manifest (config.json or config.toml)
    Validate { manifest: PathBuf },
    /// List installed modules
    List {
        /// Show the actions available within this project
        #[arg(long)]
        project: Option<i64>,
    },
    /// Read and write module settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
    /// Run a module hook
    Hook(hook::HookCommand),
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logger::init_with_verbosity(cli.global.verbosity_level(), cli.global.no_stdout) {
        eprintln!("Warning: Failed to initialize logger: {}", e);
    }

    let result = match cli.command {
        Commands::Config { action } => config::handle_config(action, &cli.global),
        Commands::Validate { manifest } => validate::handle_validate(&manifest, &cli.global),
        Commands::List { project } => list::handle_list(project, &cli.global),
        Commands::Settings { action } => settings::handle_settings(action, &cli.global),
        Commands::Hook(cmd) => hook::handle_hook(cmd, &cli.global),
    };

    if let Err(e) = result {
        logger::error(&format!("{:#}", e));
        std::process::exit(1);
    }
}
