//! Logging infrastructure
//!
//! Structured logging using tracing and tracing-subscriber:
//! - Compact, pretty or JSON console output on stderr
//! - Optional rotating JSON log files
//! - Credential scrubbing for connection URLs

pub mod config;
pub mod logger;
pub mod secret_scrubbing;

pub use config::{LogConfig, LogFormat, RotationPolicy};
pub use logger::{parse_log_level, LoggerImpl};
pub use secret_scrubbing::{redact_connection_url, SecretScrubber};
