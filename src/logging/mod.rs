//! Application logging functionality
//!
//! Handles log file management and output redirection

use std::fs;
use std::fs::OpenOptions;
use std::os::unix::io::AsRawFd;
use std::path::{Path, PathBuf};

use crate::core::config::ConfigFile;

/// Get the path to the logs directory
pub fn logs_dir() -> PathBuf {
    ConfigFile::config_dir().join("logs")
}

/// Name of today's log file
pub fn log_file_name(date: chrono::NaiveDate) -> String {
    format!("ricochet-{}.log", date.format("%Y-%m-%d"))
}

/// Get the path to the current log file
pub fn current_log_file() -> PathBuf {
    logs_dir().join(log_file_name(chrono::Utc::now().date_naive()))
}

/// Initialize the logs directory
pub fn initialize_logs_directory(logs_dir: &Path) -> anyhow::Result<()> {
    fs::create_dir_all(logs_dir)?;
    Ok(())
}

/// Set up log redirection to ~/.config/ricochet/logs/
///
/// Used with `--log-file`. The config directory must exist already
/// (`--new-config` creates it); otherwise logs stay on the terminal.
pub fn setup_log_redirection() -> anyhow::Result<()> {
    let config_dir = ConfigFile::config_dir();
    if !config_dir.exists() {
        return Err(anyhow::anyhow!(
            "Config directory {:?} doesn't exist, run with --new-config first",
            config_dir
        ));
    }

    initialize_logs_directory(&logs_dir())?;
    let log_file_path = current_log_file();

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file_path)?;

    // Redirect stdout and stderr to the log file
    unsafe {
        libc::dup2(log_file.as_raw_fd(), libc::STDOUT_FILENO);
        libc::dup2(log_file.as_raw_fd(), libc::STDERR_FILENO);
    }

    println!(
        "=== Ricochet started at {} ===",
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!("Logs redirected to: {:?}", log_file_path);

    Ok(())
}
