// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error types for object marshalling and type introspection.
//!
//! Every failure raised by this crate falls in one of four families:
//!
//! - **Native**: a native library call reported a non-success status. The
//!   diagnostic text is carried verbatim.
//! - **Unsupported conversion**: a host value kind or a native type tag has
//!   no mapping. The message names the attribute and owning type, or just
//!   the owning type for collection elements.
//! - **Validation**: wrong argument count or argument kind at a public
//!   operation boundary, unknown attribute, element operation on a
//!   non-collection. Raised before any native call is attempted.
//! - **Allocation**: a table could not be reserved. Distinct from native
//!   failures.
//!
//! None of these are retried inside the crate.

use crate::config::ConfigError;
use std::fmt;
use thiserror::Error;

/// Failure reported by a native library call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeError {
    /// Native entry point that reported the failure.
    pub function: &'static str,
    /// Diagnostic text, verbatim from the native library.
    pub message: String,
}

impl NativeError {
    pub fn new(function: &'static str, message: impl Into<String>) -> Self {
        Self {
            function,
            message: message.into(),
        }
    }
}

impl fmt::Display for NativeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for NativeError {}

/// Result of a raw native call.
pub type NativeResult<T> = core::result::Result<T, NativeError>;

/// Direction of a conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Host value written into a native slot.
    ToNative,
    /// Native value read out to the host.
    FromNative,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::ToNative => f.write_str("host value to native value"),
            Direction::FromNative => f.write_str("native value to host value"),
        }
    }
}

/// Slot a failed conversion was reading from or writing to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionTarget {
    /// Attribute of a structured type.
    Attribute { name: String, type_name: String },
    /// Element of a collection type.
    Element { type_name: String },
}

impl fmt::Display for ConversionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversionTarget::Attribute { name, type_name } => {
                write!(f, "attribute \"{}\" of type \"{}\"", name, type_name)
            }
            ConversionTarget::Element { type_name } => {
                write!(f, "element of collection \"{}\"", type_name)
            }
        }
    }
}

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Native,
    UnsupportedConversion,
    Validation,
    Allocation,
    Config,
}

/// Errors raised by the object binding.
#[derive(Debug, Error)]
pub enum Error {
    /// A native call failed.
    #[error("{0}")]
    Native(#[from] NativeError),

    /// No conversion exists for the value or type tag.
    #[error("unsupported conversion from {direction} for {target}")]
    UnsupportedConversion {
        direction: Direction,
        target: ConversionTarget,
    },

    /// Wrong number of arguments at an operation boundary.
    #[error("wrong number of arguments: expected {expected}, got {actual}")]
    InvalidArgumentCount { expected: usize, actual: usize },

    /// An argument has the wrong kind or is out of range.
    #[error("invalid value for argument {position}: {reason}")]
    InvalidArgument { position: usize, reason: String },

    /// Attribute name not declared by the type.
    #[error("attribute \"{name}\" is not defined on type \"{type_name}\"")]
    UnknownAttribute { name: String, type_name: String },

    /// Element operation on a structured (non-collection) type.
    #[error("type \"{type_name}\" is not a collection")]
    NotACollection { type_name: String },

    /// Host class has never been populated from a native type.
    #[error("class \"{type_name}\" has no resolved object type")]
    UnresolvedType { type_name: String },

    /// Allocation of a table or output sequence failed.
    #[error("insufficient memory: {context}")]
    OutOfMemory { context: String },

    /// Invalid binding configuration.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Native(_) => ErrorKind::Native,
            Error::UnsupportedConversion { .. } => ErrorKind::UnsupportedConversion,
            Error::InvalidArgumentCount { .. }
            | Error::InvalidArgument { .. }
            | Error::UnknownAttribute { .. }
            | Error::NotACollection { .. }
            | Error::UnresolvedType { .. } => ErrorKind::Validation,
            Error::OutOfMemory { .. } => ErrorKind::Allocation,
            Error::Config(_) => ErrorKind::Config,
        }
    }

    pub(crate) fn unsupported(direction: Direction, target: ConversionTarget) -> Self {
        Error::UnsupportedConversion { direction, target }
    }

    pub(crate) fn out_of_memory(context: impl Into<String>) -> Self {
        Error::OutOfMemory {
            context: context.into(),
        }
    }
}

/// Convenient alias for results using the crate [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_native_error_is_verbatim() {
        let err: Error = NativeError::new("get_size", "ORA-22160: element does not exist").into();
        assert_eq!(err.to_string(), "ORA-22160: element does not exist");
        assert_eq!(err.kind(), ErrorKind::Native);
    }

    #[test]
    fn test_unsupported_attribute_message() {
        let err = Error::unsupported(
            Direction::FromNative,
            ConversionTarget::Attribute {
                name: "AMOUNT".into(),
                type_name: "HR.ORDER_LINE".into(),
            },
        );
        let msg = err.to_string();
        assert!(msg.contains("\"AMOUNT\""));
        assert!(msg.contains("\"HR.ORDER_LINE\""));
        assert_eq!(err.kind(), ErrorKind::UnsupportedConversion);
    }

    #[test]
    fn test_unsupported_element_message() {
        let err = Error::unsupported(
            Direction::ToNative,
            ConversionTarget::Element {
                type_name: "HR.NUMBER_LIST".into(),
            },
        );
        let msg = err.to_string();
        assert!(msg.contains("host value to native value"));
        assert!(msg.contains("collection \"HR.NUMBER_LIST\""));
    }

    #[test]
    fn test_validation_kinds() {
        let err = Error::InvalidArgumentCount {
            expected: 1,
            actual: 2,
        };
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(
            Error::out_of_memory("attribute table").kind(),
            ErrorKind::Allocation
        );
    }
}
