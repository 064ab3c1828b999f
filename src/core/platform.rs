//! Platform-specific startup and error reporting.

use crate::core::config::{CliArgs, ConfigFile};
use crate::core::errors::EngineError;

/// Initialize platform-specific panic handling.
///
/// On WebAssembly, Rust panics are forwarded to the browser console.
pub fn init_panic_handling() {
    #[cfg(target_arch = "wasm32")]
    {
        console_error_panic_hook::set_once();
    }
}

/// True when the failure came from user theme or settings data
fn is_config_error(error: &anyhow::Error) -> bool {
    error.chain().any(|cause| {
        cause.is::<serde_json::Error>()
            || matches!(cause.downcast_ref::<EngineError>(), Some(EngineError::Config(_)))
    })
}

/// The message shown when startup fails, with a hint matching the cause
pub fn error_report(error: &anyhow::Error) -> String {
    let hint = if is_config_error(error) {
        format!(
            "Check the files in {} or run with --new-config to restore the defaults.",
            ConfigFile::config_dir().display()
        )
    } else {
        "Try running with --help for usage information.".to_string()
    };
    format!("Error starting Ricochet:\n{error:#}\n\n{hint}")
}

/// Report a startup failure. Native builds exit with code 1; on
/// WebAssembly the report goes to the browser console.
pub fn handle_error(error: anyhow::Error) {
    let report = error_report(&error);
    #[cfg(not(target_arch = "wasm32"))]
    {
        eprintln!();
        eprintln!("{report}");
        eprintln!();
        std::process::exit(1);
    }
    #[cfg(target_arch = "wasm32")]
    {
        web_sys::console::error_1(&report.into());
    }
}

/// Command line arguments on native builds, web defaults otherwise
pub fn get_cli_args() -> CliArgs {
    #[cfg(not(target_arch = "wasm32"))]
    {
        use clap::Parser;
        CliArgs::parse()
    }
    #[cfg(target_arch = "wasm32")]
    {
        CliArgs::default_for_web()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn broken_theme_json_points_at_the_config_directory() {
        let parse = serde_json::from_str::<serde_json::Value>("{ nope").unwrap_err();
        let error = anyhow::Error::new(parse).context("failed to load themes");
        let report = error_report(&error);

        assert!(report.contains("failed to load themes"));
        assert!(report.contains("--new-config"));
    }

    #[test]
    fn engine_config_errors_are_recognised_through_context() {
        let error = Err::<(), _>(EngineError::Config("bad palette".into()))
            .context("loading settings")
            .unwrap_err();
        assert!(error_report(&error).contains("--new-config"));
    }

    #[test]
    fn other_failures_suggest_help() {
        let error = anyhow::anyhow!("CLI validation failed: --items must be at least 1");
        let report = error_report(&error);
        assert!(report.starts_with("Error starting Ricochet:\nCLI validation failed"));
        assert!(report.ends_with("--help for usage information."));
    }
}
