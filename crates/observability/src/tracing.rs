//! Tracing/logging initialization.

use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "info";

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// One JSON object per line, for log shippers.
    #[default]
    Json,
    /// Human-readable single-line output, for local runs.
    Compact,
}

impl LogFormat {
    /// Parse a format name (`json` or `compact`); anything else is `None`.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "json" => Some(LogFormat::Json),
            "compact" | "text" | "pretty" => Some(LogFormat::Compact),
            _ => None,
        }
    }
}

fn filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Initialize tracing/logging for the process, filtered by `RUST_LOG`.
///
/// Returns `false` when a global subscriber was already installed.
pub fn init(format: LogFormat) -> bool {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter())
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false);

    match format {
        LogFormat::Json => builder.json().try_init().is_ok(),
        LogFormat::Compact => builder.compact().try_init().is_ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_format_names() {
        assert_eq!(LogFormat::parse("JSON"), Some(LogFormat::Json));
        assert_eq!(LogFormat::parse(" text "), Some(LogFormat::Compact));
        assert_eq!(LogFormat::parse("xml"), None);
    }

    #[test]
    fn second_init_is_a_no_op() {
        init(LogFormat::Compact);
        assert!(!init(LogFormat::Json));
    }
}
