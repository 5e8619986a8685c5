//! Binding constants
//!
//! Parameter directions, the driver-side type codes a bound argument carries,
//! and the size limits used when choosing between VARCHAR2 and CLOB.

use std::fmt;

// =============================================================================
// Size Limits
// =============================================================================

/// Maximum VARCHAR2 length bindable from PL/SQL, in characters
pub const VARCHAR_MAX_SIZE: usize = 32000;

/// Separator between schema and type in a UDT name
pub const UDT_NAME_SEPARATOR: char = '.';

// =============================================================================
// Parameter Directions
// =============================================================================

/// Direction of a procedure/function parameter as declared in PL/SQL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum ParamDirection {
    /// Output only parameter (server writes, client reads)
    Output = 16,
    /// Input only parameter (client writes, server reads) - default
    #[default]
    Input = 32,
    /// Input/Output parameter (bidirectional)
    InputOutput = 48,
}

impl ParamDirection {
    /// Check if this direction includes input (IN or IN OUT)
    pub fn is_input(&self) -> bool {
        matches!(self, ParamDirection::Input | ParamDirection::InputOutput)
    }

    /// Check if this direction includes output (OUT or IN OUT)
    pub fn is_output(&self) -> bool {
        matches!(self, ParamDirection::Output | ParamDirection::InputOutput)
    }
}

impl fmt::Display for ParamDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamDirection::Input => f.write_str("IN"),
            ParamDirection::Output => f.write_str("OUT"),
            ParamDirection::InputOutput => f.write_str("IN OUT"),
        }
    }
}

/// Direction of a wire argument handed to the executor
///
/// Same as [`ParamDirection`] plus the slot for a function's return value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindDirection {
    /// IN
    Input,
    /// OUT
    Output,
    /// IN OUT
    InputOutput,
    /// Function return value
    ReturnValue,
}

impl BindDirection {
    /// Check if the executor must send a value for this argument
    pub fn is_input(&self) -> bool {
        matches!(self, BindDirection::Input | BindDirection::InputOutput)
    }

    /// Check if the executor writes a value back into this argument
    pub fn is_output(&self) -> bool {
        !matches!(self, BindDirection::Input)
    }
}

impl From<ParamDirection> for BindDirection {
    fn from(direction: ParamDirection) -> Self {
        match direction {
            ParamDirection::Input => BindDirection::Input,
            ParamDirection::Output => BindDirection::Output,
            ParamDirection::InputOutput => BindDirection::InputOutput,
        }
    }
}

// =============================================================================
// Driver Bind Types
// =============================================================================

/// Driver-side type of a bound argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OracleDbType {
    /// 8-bit integer
    Byte,
    /// 16-bit integer
    Int16,
    /// 32-bit integer
    Int32,
    /// 64-bit integer
    Int64,
    /// BINARY_FLOAT
    Single,
    /// BINARY_DOUBLE
    Double,
    /// NUMBER
    Decimal,
    /// DATE
    Date,
    /// TIMESTAMP
    TimeStamp,
    /// INTERVAL DAY TO SECOND
    IntervalDs,
    /// INTERVAL YEAR TO MONTH
    IntervalYm,
    /// CHAR
    Char,
    /// VARCHAR2
    Varchar2,
    /// CLOB
    Clob,
    /// BLOB
    Blob,
    /// BFILE
    BFile,
    /// RAW
    Raw,
    /// REF
    Ref,
    /// Object UDT
    Object,
    /// Collection UDT (VARRAY, nested table)
    Array,
}

impl OracleDbType {
    /// Check if this type needs a UDT name when bound
    pub fn is_udt(&self) -> bool {
        matches!(self, OracleDbType::Object | OracleDbType::Array)
    }

    /// Check if this type is a LOB
    pub fn is_lob(&self) -> bool {
        matches!(
            self,
            OracleDbType::Clob | OracleDbType::Blob | OracleDbType::BFile
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_param_direction_flags() {
        assert!(ParamDirection::Input.is_input());
        assert!(!ParamDirection::Input.is_output());
        assert!(ParamDirection::Output.is_output());
        assert!(!ParamDirection::Output.is_input());
        assert!(ParamDirection::InputOutput.is_input());
        assert!(ParamDirection::InputOutput.is_output());
        assert_eq!(ParamDirection::default(), ParamDirection::Input);
    }

    #[test]
    fn test_param_direction_repr() {
        assert_eq!(ParamDirection::Output as u8, 16);
        assert_eq!(ParamDirection::Input as u8, 32);
        assert_eq!(ParamDirection::InputOutput as u8, 48);
    }

    #[test]
    fn test_bind_direction_from_param() {
        assert_eq!(BindDirection::from(ParamDirection::InputOutput), BindDirection::InputOutput);
        assert!(BindDirection::ReturnValue.is_output());
        assert!(!BindDirection::ReturnValue.is_input());
    }

    #[test]
    fn test_db_type_classes() {
        assert!(OracleDbType::Object.is_udt());
        assert!(OracleDbType::Array.is_udt());
        assert!(!OracleDbType::Varchar2.is_udt());
        assert!(OracleDbType::Clob.is_lob());
        assert!(!OracleDbType::Raw.is_lob());
    }
}
