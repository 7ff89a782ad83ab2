//! Error types for the weka-bridge crate.
//!
//! This module defines [`WekaError`], the error type used throughout the
//! crate. All public API functions return [`Result<T>`](Result).
//!
//! # Categories
//!
//! - **Configuration**: a wrong Java type handed to a proxy, a malformed
//!   command-line string, an unregistered class name, an invalid container key
//! - **Bridge**: a Java exception raised by a delegated call, a JNI failure,
//!   a runtime that failed to start or was already stopped
//! - **Precondition**: paired value lists of unequal length, missing values
//!   where none are allowed
//!
//! Environment problems (a missing package directory, a missing classpath
//! entry) are never errors; they are logged and skipped during bootstrap.
//!
//! Errors are serializable so they can be reported as JSON by the CLI.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for weka-bridge operations.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new variants
/// in future versions without breaking downstream code.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum WekaError {
    /// Invalid configuration provided to the runtime or a helper.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The JVM could not be created.
    ///
    /// Common causes:
    /// - `JAVA_HOME` does not point at a JDK/JRE
    /// - A JVM was already created (and possibly destroyed) in this process
    /// - Invalid VM options (e.g. a malformed max heap size)
    #[error("Failed to start JVM: {0}")]
    RuntimeStart(String),

    /// A bridge call was attempted through a runtime handle that has been stopped.
    #[error("JVM has been stopped")]
    RuntimeStopped,

    /// A Java object does not implement or extend the type a proxy requires.
    #[error("Object does not implement or subclass {expected}: {actual}")]
    TypeMismatch {
        /// The required Java interface or class (dot notation).
        expected: String,
        /// The actual class of the object (dot notation).
        actual: String,
    },

    /// A class name is not known to the [`ClassRegistry`](crate::classes::ClassRegistry).
    #[error("Unregistered class: {0}")]
    UnregisteredClass(String),

    /// A command-line string could not be parsed.
    #[error("Malformed command-line: {0}")]
    MalformedCommandLine(String),

    /// A key outside the container's allowed key set was used.
    #[error("Key '{key}' not allowed in {container} container")]
    InvalidContainerKey {
        /// The rejected key.
        key: String,
        /// The container kind.
        container: &'static str,
    },

    /// Two value lists that must be paired differ in length.
    #[error("Lists differ in length: {left} != {right}")]
    LengthMismatch {
        /// Length of the first list.
        left: usize,
        /// Length of the second list.
        right: usize,
    },

    /// A missing value was found where missing values are not accepted.
    #[error("Missing value at index {index}")]
    MissingValue {
        /// Position of the missing value.
        index: usize,
    },

    /// A size or index does not fit a Java `int`, or Java returned a negative count.
    #[error("Integer out of range: {0}")]
    IntegerOutOfRange(String),

    /// A Java exception was thrown by a delegated call.
    #[error("Java exception {class}: {message}")]
    Java {
        /// Class of the throwable (dot notation).
        class: String,
        /// The throwable's message, or its `toString()` when it has none.
        message: String,
    },

    /// Low-level JNI failure.
    #[error("JNI error: {0}")]
    Jni(#[from] jni::errors::Error),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<WekaError>,
    },
}

impl WekaError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        WekaError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Get a stable error code, e.g. for JSON reports.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::RuntimeStart(_) => "RUNTIME_START_FAILED",
            Self::RuntimeStopped => "RUNTIME_STOPPED",
            Self::TypeMismatch { .. } => "TYPE_MISMATCH",
            Self::UnregisteredClass(_) => "UNREGISTERED_CLASS",
            Self::MalformedCommandLine(_) => "MALFORMED_COMMANDLINE",
            Self::InvalidContainerKey { .. } => "INVALID_CONTAINER_KEY",
            Self::LengthMismatch { .. } => "LENGTH_MISMATCH",
            Self::MissingValue { .. } => "MISSING_VALUE",
            Self::IntegerOutOfRange(_) => "INTEGER_OUT_OF_RANGE",
            Self::Java { .. } => "JAVA_EXCEPTION",
            Self::Jni(_) => "JNI_ERROR",
            Self::Io(_) => "IO_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if this error was raised synchronously by a configuration check
    /// (as opposed to the JVM or the environment).
    pub fn is_configuration_error(&self) -> bool {
        match self {
            Self::InvalidConfig(_)
            | Self::TypeMismatch { .. }
            | Self::UnregisteredClass(_)
            | Self::MalformedCommandLine(_)
            | Self::InvalidContainerKey { .. } => true,
            Self::WithContext { source, .. } => source.is_configuration_error(),
            _ => false,
        }
    }
}

impl Serialize for WekaError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("WekaError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for weka-bridge operations.
pub type Result<T> = std::result::Result<T, WekaError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| WekaError::Io(e).with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        assert_eq!(WekaError::RuntimeStopped.error_code(), "RUNTIME_STOPPED");
        assert_eq!(
            WekaError::LengthMismatch { left: 3, right: 2 }.error_code(),
            "LENGTH_MISMATCH"
        );
    }

    #[test]
    fn test_length_mismatch_message() {
        let error = WekaError::LengthMismatch { left: 3, right: 2 };
        assert_eq!(error.to_string(), "Lists differ in length: 3 != 2");
    }

    #[test]
    fn test_type_mismatch_message() {
        let error = WekaError::TypeMismatch {
            expected: "weka.classifiers.Classifier".to_string(),
            actual: "java.lang.String".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Object does not implement or subclass weka.classifiers.Classifier: java.lang.String"
        );
        assert!(error.is_configuration_error());
    }

    #[test]
    fn test_with_context() {
        let error = WekaError::UnregisteredClass("foo.Bar".to_string())
            .with_context("While building classifier");
        assert!(error.to_string().contains("While building classifier"));
        assert_eq!(error.error_code(), "UNREGISTERED_CLASS");
        assert!(error.is_configuration_error());
    }

    #[test]
    fn test_error_serialization() {
        let error = WekaError::MissingValue { index: 4 };
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("MISSING_VALUE"));
        assert!(json.contains("index 4"));
    }

    #[test]
    fn test_bridge_errors_are_not_configuration_errors() {
        assert!(!WekaError::RuntimeStopped.is_configuration_error());
        assert!(
            !WekaError::Java {
                class: "java.lang.Exception".to_string(),
                message: "boom".to_string(),
            }
            .is_configuration_error()
        );
    }
}
