//! # dialwatch infra-common
//!
//! Infrastructure shared by dialwatch binaries. Currently this is the
//! tracing subscriber setup used by the CLI.

pub mod error;
pub mod logging;

pub use error::{Error, Result};
pub use logging::{log_welcome, parse_log_level, setup_logging, LoggingConfig};
