//! Diagnostic logging setup.
//!
//! Everything goes to stderr. While serving the generator protocol,
//! stderr also carries the JSON-RPC responses, so ANSI colour is turned
//! off there and the default level stays at `warn`.

use tracing::Level;
use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable holding the log filter directive.
pub const LOG_ENV: &str = "PRISMA_NESTJS_DTO_LOG";

/// Logging options.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Level used when the environment does not set a filter.
    pub level: Level,
    /// Colour output.
    pub ansi: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::WARN,
            ansi: true,
        }
    }
}

impl LogConfig {
    /// Settings for the protocol loop.
    pub fn protocol() -> Self {
        Self {
            ansi: false,
            ..Self::default()
        }
    }

    /// Build the filter from `PRISMA_NESTJS_DTO_LOG`, falling back to the level.
    pub fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(self.level.to_string()))
    }

    /// Install the global subscriber. Later calls are ignored.
    pub fn init(self) {
        let _ = fmt()
            .with_env_filter(self.filter())
            .with_writer(std::io::stderr)
            .with_ansi(self.ansi)
            .with_target(false)
            .try_init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LogConfig::default();
        assert_eq!(config.level, Level::WARN);
        assert!(config.ansi);
    }

    #[test]
    fn test_protocol_disables_colour() {
        let config = LogConfig::protocol();
        assert!(!config.ansi);
        assert_eq!(config.level, Level::WARN);
    }
}
