//! Shared utilities for the Turing token client.

pub mod logging;

pub use logging::{init_logging, LogFormat, LogFormatError};
