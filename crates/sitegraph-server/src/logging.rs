//! Structured logging configuration.
//!
//! Logs go to stderr so that command output on stdout stays machine readable.
//! `RUST_LOG`, when set, overrides the configured level.
//!
//! # Log Format
//!
//! When JSON formatting is enabled, log entries are output as JSON objects:
//!
//! ```json
//! {"timestamp":"2024-01-15T10:30:00.000Z","level":"WARN","fields":{"message":"Large site listing truncated, ...","max_list_size":10000},"target":"sitegraph_domain::membership::builder"}
//! ```

use std::str::FromStr;

use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::LoggingSettings;

/// Configuration for structured logging.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Whether to use JSON format (true) or text format (false)
    pub json_format: bool,
    /// The default log level if RUST_LOG is not set
    pub default_level: Level,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            json_format: false,
            default_level: Level::INFO,
        }
    }
}

impl LoggingConfig {
    /// Create a new logging configuration for JSON output.
    pub fn json() -> Self {
        Self {
            json_format: true,
            ..Default::default()
        }
    }

    /// Create a new logging configuration for text output (development).
    pub fn text() -> Self {
        Self {
            json_format: false,
            ..Default::default()
        }
    }

    /// Set the default log level.
    pub fn with_level(mut self, level: Level) -> Self {
        self.default_level = level;
        self
    }

    /// Builds the logging configuration from loaded settings. An unknown
    /// level falls back to INFO; settings are validated before this point.
    pub fn from_settings(settings: &LoggingSettings) -> Self {
        let level = Level::from_str(&settings.level).unwrap_or(Level::INFO);
        let base = if settings.json {
            Self::json()
        } else {
            Self::text()
        };
        base.with_level(level)
    }
}

/// Initialize the logging subsystem with the given configuration.
///
/// This should be called once at startup. Later calls have no effect
/// (the subscriber is global).
pub fn init_logging(config: LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.default_level.to_string()));

    if config.json_format {
        let subscriber = tracing_subscriber::registry().with(filter).with(
            fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_current_span(true)
                .with_target(true)
                .with_file(false)
                .with_line_number(false),
        );
        let _ = tracing::subscriber::set_global_default(subscriber);
    } else {
        let subscriber = tracing_subscriber::registry().with(filter).with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true),
        );
        let _ = tracing::subscriber::set_global_default(subscriber);
    }
}

/// Creates a JSON-formatted subscriber writing to `writer`, for capturing
/// log output in tests.
pub fn create_json_layer<W>(writer: W) -> impl tracing::Subscriber + Send + Sync
where
    W: for<'writer> tracing_subscriber::fmt::MakeWriter<'writer> + Send + Sync + 'static,
{
    tracing_subscriber::registry()
        .with(EnvFilter::new("trace"))
        .with(
            fmt::layer()
                .json()
                .with_writer(writer)
                .with_target(true)
                .with_current_span(true),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use sitegraph_domain::model::{AuthorizableId, ContentNode, Group, Profile, User};
    use sitegraph_domain::{MembershipConfig, MembershipGraphBuilder};
    use sitegraph_storage::MemoryEntityStore;

    /// A writer that captures output to a shared buffer.
    #[derive(Clone)]
    struct CaptureWriter {
        buffer: Arc<Mutex<Vec<u8>>>,
    }

    impl CaptureWriter {
        fn new() -> Self {
            Self {
                buffer: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn get_output(&self) -> String {
            let buffer = self.buffer.lock().unwrap();
            String::from_utf8_lossy(&buffer).to_string()
        }
    }

    impl std::io::Write for CaptureWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            let mut buffer = self.buffer.lock().unwrap();
            buffer.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for CaptureWriter {
        type Writer = CaptureWriter;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn test_logging_config_from_settings() {
        let settings = LoggingSettings {
            level: "debug".to_string(),
            json: true,
        };
        let config = LoggingConfig::from_settings(&settings);
        assert!(config.json_format);
        assert_eq!(config.default_level, Level::DEBUG);

        let config = LoggingConfig::from_settings(&LoggingSettings::default());
        assert!(!config.json_format);
        assert_eq!(config.default_level, Level::INFO);
    }

    #[test]
    fn test_logging_config_text_and_json() {
        assert!(LoggingConfig::json().json_format);
        assert!(!LoggingConfig::text().json_format);
        assert_eq!(
            LoggingConfig::default().with_level(Level::WARN).default_level,
            Level::WARN
        );
    }

    /// Truncation warnings carry the cap as a structured field.
    #[test]
    fn test_truncation_warning_is_structured_json() {
        let writer = CaptureWriter::new();
        let subscriber = create_json_layer(writer.clone());

        let store = Arc::new(MemoryEntityStore::new());
        for id in ["a", "b", "c"] {
            store.insert_user(User::new(id)).unwrap();
            store.insert_profile(Profile::new(id, id, id));
        }
        store
            .insert_group(Group::new("g-1"), ["a", "b", "c"].map(AuthorizableId::from))
            .unwrap();
        let builder = MembershipGraphBuilder::with_config(
            Arc::clone(&store),
            Arc::clone(&store),
            MembershipConfig::default().with_max_list_size(2),
        );

        tracing::subscriber::with_default(subscriber, || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .build()
                .unwrap();
            let graph = runtime
                .block_on(builder.build(&ContentNode::site("/sites/big", ["g-1"])))
                .unwrap();
            assert!(graph.is_partial());
        });

        let output = writer.get_output();
        let truncation = output
            .lines()
            .filter_map(|line| serde_json::from_str::<serde_json::Value>(line).ok())
            .find(|entry| {
                entry["fields"]["message"]
                    .as_str()
                    .is_some_and(|m| m.starts_with("Large site listing truncated"))
            })
            .expect("truncation warning should be logged");

        assert_eq!(truncation["level"], "WARN");
        assert_eq!(truncation["fields"]["max_list_size"], 2);
        assert_eq!(truncation["fields"]["parent"], "g-1");
    }
}
