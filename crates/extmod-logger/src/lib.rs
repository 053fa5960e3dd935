//! Console and file logging for the extmod CLI
//!
//! Library crates emit `tracing` events; this crate owns the process-wide
//! verbosity, the log file and the colored console helpers used by the CLI.

use colored::Colorize;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

static LOG_FILE: Mutex<Option<PathBuf>> = Mutex::new(None);
static VERBOSITY: Mutex<u8> = Mutex::new(0);
static NO_STDOUT: Mutex<bool> = Mutex::new(false);

/// Get the current verbosity level
pub fn get_verbosity() -> u8 {
    VERBOSITY.lock().ok().map(|v| *v).unwrap_or(0)
}

fn set_verbosity(verbosity: u8) {
    if let Ok(mut v) = VERBOSITY.lock() {
        *v = verbosity;
    }
}

/// Get whether console output is suppressed
pub fn get_no_stdout() -> bool {
    NO_STDOUT.lock().ok().map(|v| *v).unwrap_or(false)
}

/// Set whether console output is suppressed
pub fn set_no_stdout(disabled: bool) {
    if let Ok(mut v) = NO_STDOUT.lock() {
        *v = disabled;
    }
}

/// Map a verbosity level to a tracing filter directive
/// 0 = warn only, 1 = debug (-v), 2 = trace (-vv)
pub fn verbosity_to_filter(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    }
}

/// Initialize the logger with the default log file location
pub fn init_with_verbosity(verbosity: u8, no_stdout: bool) -> Result<(), String> {
    let config_dir = get_config_dir()?;
    fs::create_dir_all(&config_dir)
        .map_err(|e| format!("Failed to create config directory: {}", e))?;

    init_with_log_file(verbosity, no_stdout, &config_dir.join("extmod.log"))
}

/// Initialize the logger writing to an explicit log file
///
/// The log file is truncated on each run. A `tracing` subscriber is installed
/// on stderr; `RUST_LOG` takes precedence over the verbosity level.
pub fn init_with_log_file(verbosity: u8, no_stdout: bool, log_file: &Path) -> Result<(), String> {
    set_verbosity(verbosity);
    set_no_stdout(no_stdout);

    if log_file.exists() {
        fs::remove_file(log_file).map_err(|e| format!("Failed to truncate log file: {}", e))?;
    }

    let mut log_file_guard = LOG_FILE
        .lock()
        .map_err(|_| "Log file lock poisoned".to_string())?;
    *log_file_guard = Some(log_file.to_path_buf());
    drop(log_file_guard);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity_to_filter(verbosity)));

    // A subscriber may already be installed (tests, repeated init); keep it.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();

    Ok(())
}

/// Get the config directory path
fn get_config_dir() -> Result<PathBuf, String> {
    #[cfg(not(target_os = "windows"))]
    let config_dir = dirs::home_dir()
        .ok_or("Could not determine home directory")?
        .join(".config")
        .join("extmod");

    #[cfg(target_os = "windows")]
    let config_dir = dirs::config_dir()
        .ok_or("Could not determine config directory")?
        .join("extmod");

    Ok(config_dir)
}

fn write_to_log(message: &str) {
    if let Ok(log_file_guard) = LOG_FILE.lock() {
        if let Some(ref log_path) = *log_file_guard {
            if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(log_path) {
                let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
                let _ = writeln!(file, "[{}] {}", timestamp, message);
            }
        }
    }
}

fn console(line: &str) {
    if !get_no_stdout() {
        eprintln!("{}", line);
    }
}

/// Log an informational message (to console if verbose >= 1, always to file)
pub fn info(message: &str) {
    write_to_log(&format!("INFO {}", message));
    if get_verbosity() >= 1 {
        console(message);
    }
}

/// Log a debug message (to console if verbose >= 1, always to file)
pub fn debug(message: &str) {
    write_to_log(&format!("DEBUG {}", message));
    if get_verbosity() >= 1 {
        console(&format!("{} {}", "DEBUG:".blue().bold(), message));
    }
}

/// Log a warning message (to both file and console)
pub fn warn(message: &str) {
    write_to_log(&format!("WARN {}", message));
    console(&format!("{} {}", "warning:".yellow().bold(), message));
}

/// Log an error message (to both file and console)
pub fn error(message: &str) {
    write_to_log(&format!("ERROR {}", message));
    console(&format!("{} {}", "Error:".red().bold(), message));
}

/// Log a success message
pub fn success(message: &str) {
    write_to_log(&format!("SUCCESS {}", message));
    console(&format!("{} {}", "\u{2714}".green().bold(), message));
}

/// Get the log file path for display
pub fn get_log_path() -> Option<PathBuf> {
    LOG_FILE.lock().ok().and_then(|guard| guard.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_verbosity_to_filter() {
        assert_eq!(verbosity_to_filter(0), "warn");
        assert_eq!(verbosity_to_filter(1), "debug");
        assert_eq!(verbosity_to_filter(2), "trace");
        assert_eq!(verbosity_to_filter(9), "trace");
    }

    #[test]
    fn test_messages_written_to_log_file() {
        let Ok(temp_dir) = TempDir::new() else {
            return;
        };
        let log_path = temp_dir.path().join("extmod.log");

        assert!(init_with_log_file(0, true, &log_path).is_ok());
        assert_eq!(get_log_path().as_deref(), Some(log_path.as_path()));

        warn("settings store unavailable");
        success("manifest is valid");

        let contents = fs::read_to_string(&log_path).unwrap_or_default();
        assert!(contents.contains("WARN settings store unavailable"));
        assert!(contents.contains("SUCCESS manifest is valid"));
    }
}
