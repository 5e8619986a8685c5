//! Error types for UDT marshaling
//!
//! This module defines all error types that can occur while registering
//! domain types against Oracle UDTs, converting values across the wire
//! boundary, and binding procedure parameters.

use thiserror::Error;

use crate::constants::ParamDirection;
use crate::wire::WireKind;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for UDT marshaling
#[derive(Error, Debug)]
#[allow(missing_docs)]
pub enum Error {
    // =========================================================================
    // Registration Errors
    // =========================================================================
    /// No UDT name was supplied and the type carries no name annotation
    #[error("no UDT name for type {type_name}: annotate the type or pass the name when registering")]
    MissingWireName { type_name: String },

    /// UDT name does not follow the SCHEMA.NAME format
    #[error("invalid UDT name {name:?}: expected the format \"SCHEMA.NAME\"")]
    InvalidWireNameFormat { name: String },

    /// UDT name already claimed
    #[error("UDT name {name} is already registered (while registering {type_name})")]
    DuplicateWireName { name: String, type_name: String },

    /// A collection field or parameter whose element type has no collection UDT
    #[error("collection of {element} used by {owner} has no UDT collection name; register one for {element}")]
    CollectionUdtMissing { owner: String, element: String },

    /// Field type can't be mapped to an Oracle attribute
    #[error("field {field} of type {field_type} in {type_name} is neither a scalar, an object nor a collection of those")]
    UnsupportedFieldType {
        type_name: String,
        field: String,
        field_type: String,
    },

    /// Binding to a UDT name that was never registered
    #[error("UDT name {name} is not registered (while binding {type_name})")]
    UnknownWireName { name: String, type_name: String },

    /// Binding to a UDT name that is claimed but has no descriptor of the
    /// wanted kind (claimed by hand, or owned by the other kind of type)
    #[error("UDT name {name} is claimed but no {expected} type is registered under it (while binding {type_name})")]
    UnboundWireName {
        name: String,
        expected: &'static str,
        type_name: String,
    },

    /// Blank attribute name given as a field override
    #[error("blank UDT attribute name for field {field} of {type_name}")]
    InvalidPropertyName { type_name: String, field: String },

    // =========================================================================
    // Conversion Errors
    // =========================================================================
    /// No conversion rule for the wire value and the requested type
    #[error("can't convert {from} to {to}")]
    UnsupportedConversion { from: String, to: String },

    /// NULL wire value requested as a non-nullable type
    #[error("can't convert a NULL {wire_kind} to non-nullable {target}")]
    NullToNonNullable { wire_kind: WireKind, target: String },

    /// Numeric value outside the target range
    #[error("numeric value {value} doesn't fit in {target}")]
    NumericOverflow { value: String, target: String },

    /// Data conversion error
    #[error("data conversion error: {0}")]
    DataConversionError(String),

    /// Failure converting one field of an object
    #[error("error converting field {field} of {type_name}")]
    FieldConversionFailed {
        type_name: String,
        field: String,
        #[source]
        source: Box<Error>,
    },

    /// Failure writing back an OUT or IN OUT parameter
    #[error("error setting value for parameter of type {type_name} with direction {direction}")]
    ParameterConversionFailed {
        type_name: String,
        direction: ParamDirection,
        #[source]
        source: Box<Error>,
    },

    /// Failure converting a function's return value
    #[error("error converting the return value to {type_name} in function {function}")]
    ReturnConversionFailed {
        type_name: String,
        function: String,
        #[source]
        source: Box<Error>,
    },

    // =========================================================================
    // Parameter Errors
    // =========================================================================
    /// Type is not usable as a procedure parameter
    #[error("the type {type_name} doesn't conform with the guidelines for parameters: register it or give it a UDT name")]
    InvalidParameterType { type_name: String },

    /// Parameters and wire arguments don't line up
    #[error("expected {expected} wire arguments, got {actual}")]
    ArgumentCountMismatch { expected: usize, actual: usize },

    // =========================================================================
    // Execution Errors
    // =========================================================================
    /// Blank procedure or function name
    #[error("missing procedure or function name")]
    MissingCommandText,

    /// The command executor failed
    #[error("error executing {command}")]
    ExecutionFailed {
        command: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    // =========================================================================
    // Internal Errors
    // =========================================================================
    /// Internal error (should not happen)
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Build an `UnsupportedConversion` for a wire kind and a Rust target type
    pub fn unsupported(from: impl std::fmt::Display, to: impl Into<String>) -> Self {
        Error::UnsupportedConversion {
            from: from.to_string(),
            to: to.into(),
        }
    }

    /// Check if this error was raised while registering a type
    pub fn is_registration_error(&self) -> bool {
        matches!(
            self,
            Error::MissingWireName { .. }
                | Error::InvalidWireNameFormat { .. }
                | Error::DuplicateWireName { .. }
                | Error::CollectionUdtMissing { .. }
                | Error::UnsupportedFieldType { .. }
                | Error::UnknownWireName { .. }
                | Error::UnboundWireName { .. }
                | Error::InvalidPropertyName { .. }
        )
    }

    /// Check if this error was raised while converting a value
    pub fn is_conversion_error(&self) -> bool {
        matches!(
            self,
            Error::UnsupportedConversion { .. }
                | Error::NullToNonNullable { .. }
                | Error::NumericOverflow { .. }
                | Error::DataConversionError(_)
                | Error::FieldConversionFailed { .. }
                | Error::ParameterConversionFailed { .. }
                | Error::ReturnConversionFailed { .. }
        )
    }

    /// Walk wrapped conversion errors down to the first unwrapped one
    pub fn root_cause(&self) -> &Error {
        match self {
            Error::FieldConversionFailed { source, .. }
            | Error::ParameterConversionFailed { source, .. }
            | Error::ReturnConversionFailed { source, .. } => source.root_cause(),
            other => other,
        }
    }
}
