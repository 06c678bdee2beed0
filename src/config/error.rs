//! Configuration error types.

use thiserror::Error;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A numeric variable could not be parsed.
    #[error("failed to parse {name}='{value}': {source}")]
    InvalidNumber {
        name: &'static str,
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    /// A boolean variable was not one of `true|false|1|0|yes|no|on|off`.
    #[error("invalid boolean {name}='{value}'")]
    InvalidBool { name: &'static str, value: String },

    /// The cache error policy was not `throw`, `log` or `ignore`.
    #[error("invalid cache error policy '{value}': expected throw, log or ignore")]
    InvalidPolicy { value: String },

    /// Runtime memory needs room for at least one object.
    #[error("runtime capacity must be at least 1")]
    ZeroRuntimeCapacity,
}
