use std::path::PathBuf;

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `crewboard=debug`.
pub const LOG_ENV: &str = "CREWBOARD_LOG";

/// Resolves where state is stored: an explicit directory (flag or
/// `CREWBOARD_DATA_DIR`) wins over the platform data directory.
pub fn data_dir(explicit: Option<PathBuf>) -> PathBuf {
    explicit.unwrap_or_else(|| {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("crewboard")
    })
}

/// Logs go to stderr so they never mix with command output.
pub fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_data_dir_wins() {
        let dir = PathBuf::from("/tmp/crewboard-test");
        assert_eq!(data_dir(Some(dir.clone())), dir);
    }

    #[test]
    fn test_default_data_dir_is_namespaced() {
        assert!(data_dir(None).ends_with("crewboard"));
    }
}
