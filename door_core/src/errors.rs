//! # Error Types
//!
//! Structured error types for door_core. The engine stages themselves never
//! fail: degenerate input yields degenerate output and an unsuccessful frame
//! search is an ordinary [`FrameSelection::NoMatch`] value. Errors only come
//! from the edges of the crate - configuration validation, catalogue lookups
//! by name, and file I/O.
//!
//! [`FrameSelection::NoMatch`]: crate::calculations::frame_selection::FrameSelection::NoMatch
//!
//! ## Example
//!
//! ```rust
//! use door_core::errors::{DoorError, DoorResult};
//!
//! fn validate_kerf(kerf_mm: f64) -> DoorResult<()> {
//!     if kerf_mm < 0.0 {
//!         return Err(DoorError::InvalidInput {
//!             field: "saw_kerf_mm".to_string(),
//!             value: kerf_mm.to_string(),
//!             reason: "Kerf cannot be negative".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for door_core operations
pub type DoorResult<T> = Result<T, DoorError>;

/// Structured error type for configuration and catalogue operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum DoorError {
    /// A value is invalid (out of range, not finite, duplicated, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// Timber species key not recognised
    #[error("Unknown timber species: {name}")]
    UnknownSpecies { name: String },

    /// Core type key not recognised
    #[error("Unknown core type: {name}")]
    UnknownCoreType { name: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// Another process is saving the same file
    #[error("File is locked: '{path}' is being saved by another process")]
    FileLocked { path: String },

    /// JSON/TOML serialization or deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },
}

impl DoorError {
    /// Create an InvalidInput error
    pub fn invalid_input(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        DoorError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create an UnknownSpecies error
    pub fn unknown_species(name: impl Into<String>) -> Self {
        DoorError::UnknownSpecies { name: name.into() }
    }

    /// Create an UnknownCoreType error
    pub fn unknown_core_type(name: impl Into<String>) -> Self {
        DoorError::UnknownCoreType { name: name.into() }
    }

    /// Create a FileError
    pub fn file_error(
        operation: impl Into<String>,
        path: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        DoorError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileLocked error
    pub fn file_locked(path: impl Into<String>) -> Self {
        DoorError::FileLocked { path: path.into() }
    }

    /// Create a SerializationError
    pub fn serialization(reason: impl Into<String>) -> Self {
        DoorError::SerializationError {
            reason: reason.into(),
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            DoorError::InvalidInput { .. } => "INVALID_INPUT",
            DoorError::UnknownSpecies { .. } => "UNKNOWN_SPECIES",
            DoorError::UnknownCoreType { .. } => "UNKNOWN_CORE_TYPE",
            DoorError::FileError { .. } => "FILE_ERROR",
            DoorError::FileLocked { .. } => "FILE_LOCKED",
            DoorError::SerializationError { .. } => "SERIALIZATION_ERROR",
        }
    }
}

impl From<serde_json::Error> for DoorError {
    fn from(e: serde_json::Error) -> Self {
        DoorError::serialization(e.to_string())
    }
}

impl From<toml::de::Error> for DoorError {
    fn from(e: toml::de::Error) -> Self {
        DoorError::serialization(e.to_string())
    }
}

impl From<toml::ser::Error> for DoorError {
    fn from(e: toml::ser::Error) -> Self {
        DoorError::serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = DoorError::invalid_input("saw_kerf_mm", "-5", "Kerf cannot be negative");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"type\":\"InvalidInput\""));
        let roundtrip: DoorError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(DoorError::unknown_species("oak").error_code(), "UNKNOWN_SPECIES");
        assert_eq!(DoorError::unknown_core_type("cork").error_code(), "UNKNOWN_CORE_TYPE");
        assert_eq!(
            DoorError::file_error("read", "x.toml", "missing").error_code(),
            "FILE_ERROR"
        );
        assert_eq!(DoorError::file_locked("x.toml").error_code(), "FILE_LOCKED");
    }

    #[test]
    fn test_error_display() {
        let error = DoorError::unknown_species("oak");
        assert_eq!(error.to_string(), "Unknown timber species: oak");
    }
}
