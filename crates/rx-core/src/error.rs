//! Error types for the retrix libretro adapter
//!
//! Only construction and configuration report errors through these types.
//! Operations that cross the native boundary report plain `bool` results,
//! matching the libretro convention.

use thiserror::Error;

/// Main error type for the adapter
#[derive(Error, Debug)]
pub enum RetroError {
    #[error("Invalid system info: {0}")]
    InvalidSystemInfo(String),

    #[error("String contains an interior NUL byte: {0:?}")]
    InvalidString(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("Config write error: {0}")]
    TomlSer(#[from] toml::ser::Error),
}

/// Result type alias for adapter operations
pub type Result<T> = std::result::Result<T, RetroError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RetroError::InvalidSystemInfo("library name is null".to_string());
        assert_eq!(format!("{}", err), "Invalid system info: library name is null");

        let err = RetroError::InvalidString("a\0b".to_string());
        assert_eq!(
            format!("{}", err),
            "String contains an interior NUL byte: \"a\\0b\""
        );
    }

    #[test]
    fn test_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: RetroError = io_err.into();
        assert!(matches!(err, RetroError::Io(_)));

        let toml_err = toml::from_str::<toml::Value>("= broken").unwrap_err();
        let err: RetroError = toml_err.into();
        assert!(matches!(err, RetroError::TomlDe(_)));
    }
}
