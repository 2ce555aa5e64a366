//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent
//! formatting and appropriate exit codes.

use std::fmt;
use std::process;

use seismogrid::cache::CacheError;
use seismogrid::config::ConfigError;
use seismogrid::engine::EngineError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(String),
    /// Cache backend error
    Cache(CacheError),
    /// Failed to read or validate a model file
    Input { path: String, error: EngineError },
    /// Computation failed
    Compute(EngineError),
    /// Failed to write the result grid
    FileWrite { path: String, error: std::io::Error },
}

impl CliError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::LoggingInit(_) => 1,
            CliError::Config(_) => 2,
            CliError::Cache(_) => 3,
            CliError::Input { .. } => 4,
            CliError::Compute(_) => 5,
            CliError::FileWrite { .. } => 6,
        }
    }

    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        // Print additional help for specific errors
        match self {
            CliError::Config(_) => {
                eprintln!();
                eprintln!("Run 'seismogrid config show' to inspect the active configuration,");
                eprintln!("or 'seismogrid config path' to locate the file.");
            }
            CliError::Cache(_) => {
                eprintln!();
                eprintln!("If using the memcached backend, make sure:");
                eprintln!("  1. The server is running and reachable");
                eprintln!("  2. [cache] host and port point at it");
                eprintln!("Or set [cache] backend = memory to run without a server.");
            }
            CliError::Input { .. } => {
                eprintln!();
                eprintln!("Model files are JSON documents; every site the region grid");
                eprintln!("visits must have a row in each per-site file.");
            }
            _ => {}
        }

        process::exit(self.exit_code())
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Cache(e) => write!(f, "Cache backend error: {}", e),
            CliError::Input { path, error } => {
                write!(f, "Invalid model file '{}': {}", path, error)
            }
            CliError::Compute(e) => write!(f, "Computation failed: {}", e),
            CliError::FileWrite { path, error } => {
                write!(f, "Failed to write file '{}': {}", path, error)
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Cache(e) => Some(e),
            CliError::Input { error, .. } => Some(error),
            CliError::Compute(e) => Some(e),
            CliError::FileWrite { error, .. } => Some(error),
            _ => None,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<CacheError> for CliError {
    fn from(e: CacheError) -> Self {
        CliError::Cache(e)
    }
}

impl From<EngineError> for CliError {
    fn from(e: EngineError) -> Self {
        CliError::Compute(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_are_distinct() {
        let errors = [
            CliError::LoggingInit("x".into()),
            CliError::Config("x".into()),
            CliError::Cache(CacheError::EmptyKey),
            CliError::Input {
                path: "m.json".into(),
                error: EngineError::InvalidArgument("x".into()),
            },
            CliError::Compute(EngineError::InvalidArgument("x".into())),
            CliError::FileWrite {
                path: "out.asc".into(),
                error: std::io::Error::new(std::io::ErrorKind::Other, "x"),
            },
        ];
        let mut codes: Vec<i32> = errors.iter().map(|e| e.exit_code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_display_names_the_file() {
        let error = CliError::Input {
            path: "models.json".into(),
            error: EngineError::InvalidArgument("bad row".into()),
        };
        assert!(error.to_string().contains("models.json"));
    }
}
