//! Logging setup for the Blogcast binary
//!
//! Output goes to stderr so dry-run previews on stdout stay clean. A bare
//! level such as `debug` applies to Blogcast's own crates only; HTTP and TLS
//! crates stay at `warn`. `RUST_LOG` replaces the whole filter when set.
//!
//! # Examples
//!
//! ```no_run
//! use libblogcast::logging::{LoggingConfig, LogFormat};
//!
//! LoggingConfig::new(LogFormat::Json, "info".to_string(), false).init();
//! ```

use std::io::IsTerminal;
use std::str::FromStr;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

const OWN_CRATES: [&str; 2] = ["libblogcast", "blogcast_post"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// One line per event, colored only on a terminal
    Text,
    /// One JSON object per line
    Json,
    /// Multi-line with source locations
    Pretty,
}

impl LogFormat {
    pub const ALL: [LogFormat; 3] = [LogFormat::Text, LogFormat::Json, LogFormat::Pretty];

    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Text => "text",
            LogFormat::Json => "json",
            LogFormat::Pretty => "pretty",
        }
    }
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|format| format.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown log format '{}' (expected text, json or pretty)", s))
    }
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub struct LoggingConfig {
    pub format: LogFormat,
    /// A level name, or a full filter directive such as `libblogcast=trace`
    pub level: String,
    pub verbose: bool,
}

impl LoggingConfig {
    /// `verbose` forces the `debug` level unless `RUST_LOG` is set
    pub fn new(format: LogFormat, level: String, verbose: bool) -> Self {
        Self {
            format,
            level,
            verbose,
        }
    }

    /// Filter directive used when `RUST_LOG` is unset
    pub fn default_directive(&self) -> String {
        let level = if self.verbose {
            "debug"
        } else {
            self.level.trim()
        };

        if level.contains('=') || level.contains(',') {
            return level.to_string();
        }

        let mut directive = String::from("warn");
        for krate in OWN_CRATES {
            directive.push_str(&format!(",{}={}", krate, level));
        }
        directive
    }

    /// Install the global subscriber
    ///
    /// # Panics
    ///
    /// Panics if a global subscriber has already been installed
    pub fn init(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.default_directive()));

        let layer = match self.format {
            LogFormat::Json => fmt::layer()
                .json()
                .flatten_event(true)
                .with_writer(std::io::stderr)
                .boxed(),
            LogFormat::Pretty => fmt::layer()
                .pretty()
                .with_file(true)
                .with_line_number(true)
                .with_writer(std::io::stderr)
                .boxed(),
            LogFormat::Text => fmt::layer()
                .with_target(false)
                .with_ansi(std::io::stderr().is_terminal())
                .with_writer(std::io::stderr)
                .boxed(),
        };

        tracing_subscriber::registry().with(filter).with(layer).init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_from_str() {
        assert_eq!("text".parse::<LogFormat>().unwrap(), LogFormat::Text);
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("Pretty".parse::<LogFormat>().unwrap(), LogFormat::Pretty);

        let err = "xml".parse::<LogFormat>().unwrap_err();
        assert!(err.contains("unknown log format 'xml'"));
    }

    #[test]
    fn test_log_format_display_round_trips() {
        for format in LogFormat::ALL {
            assert_eq!(format.to_string().parse::<LogFormat>().unwrap(), format);
        }
    }

    #[test]
    fn test_level_scoped_to_own_crates() {
        let config = LoggingConfig::new(LogFormat::Text, "info".to_string(), false);
        assert_eq!(
            config.default_directive(),
            "warn,libblogcast=info,blogcast_post=info"
        );
    }

    #[test]
    fn test_verbose_overrides_level() {
        let verbose = LoggingConfig::new(LogFormat::Text, "warn".to_string(), true);
        assert_eq!(
            verbose.default_directive(),
            "warn,libblogcast=debug,blogcast_post=debug"
        );
    }

    #[test]
    fn test_full_directive_passes_through() {
        let config = LoggingConfig::new(
            LogFormat::Json,
            "libblogcast::history=trace,reqwest=debug".to_string(),
            false,
        );
        assert_eq!(
            config.default_directive(),
            "libblogcast::history=trace,reqwest=debug"
        );
    }
}
