//! Wire values
//!
//! A [`WireValue`] is what the driver reads and writes for a single bind
//! variable or UDT attribute. Scalar variants carry their own null flag as an
//! `Option`, so a NULL keeps its type (a NULL NUMBER is `Decimal(None)`).
//! [`WireValue::Null`] is an untyped NULL, used for absent OUT values.
//!
//! # Example
//!
//! ```rust
//! use oracle_udt::{WireKind, WireValue};
//!
//! let value = WireValue::from("hello");
//! assert_eq!(value.kind(), WireKind::Varchar);
//! assert!(!value.is_null());
//! assert!(WireValue::Decimal(None).is_null());
//! ```

use std::fmt;

use bytes::Bytes;
use rust_decimal::Decimal;

use crate::dbobject::DbObject;
use crate::types::{IntervalDs, IntervalYm, OracleDate, OracleTimestamp};

/// A value in Oracle wire representation
#[derive(Debug, Clone, PartialEq, Default)]
pub enum WireValue {
    /// Untyped NULL
    #[default]
    Null,
    /// NUMBER
    Decimal(Option<Decimal>),
    /// BINARY_FLOAT
    BinaryFloat(Option<f32>),
    /// BINARY_DOUBLE
    BinaryDouble(Option<f64>),
    /// VARCHAR2, CHAR
    Varchar(Option<String>),
    /// CLOB
    Clob(Option<String>),
    /// BLOB
    Blob(Option<Bytes>),
    /// BFILE
    BFile(Option<Bytes>),
    /// RAW
    Raw(Option<Bytes>),
    /// DATE
    Date(Option<OracleDate>),
    /// TIMESTAMP, TIMESTAMP WITH TIME ZONE, TIMESTAMP WITH LOCAL TIME ZONE
    Timestamp(Option<OracleTimestamp>),
    /// INTERVAL DAY TO SECOND
    IntervalDs(Option<IntervalDs>),
    /// INTERVAL YEAR TO MONTH
    IntervalYm(Option<IntervalYm>),
    /// REF, carried as its hex string form
    Ref(Option<String>),
    /// Object UDT instance
    Object(DbObject),
    /// Collection UDT instance
    Collection(DbObject),
}

/// Runtime tag of a [`WireValue`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WireKind {
    /// Untyped NULL
    Null,
    /// NUMBER
    Decimal,
    /// BINARY_FLOAT
    BinaryFloat,
    /// BINARY_DOUBLE
    BinaryDouble,
    /// VARCHAR2
    Varchar,
    /// CLOB
    Clob,
    /// BLOB
    Blob,
    /// BFILE
    BFile,
    /// RAW
    Raw,
    /// DATE
    Date,
    /// TIMESTAMP
    Timestamp,
    /// INTERVAL DAY TO SECOND
    IntervalDs,
    /// INTERVAL YEAR TO MONTH
    IntervalYm,
    /// REF
    Ref,
    /// Object UDT
    Object,
    /// Collection UDT
    Collection,
}

impl WireKind {
    /// Oracle's name for this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            WireKind::Null => "NULL",
            WireKind::Decimal => "DECIMAL",
            WireKind::BinaryFloat => "BINARY_FLOAT",
            WireKind::BinaryDouble => "BINARY_DOUBLE",
            WireKind::Varchar => "VARCHAR2",
            WireKind::Clob => "CLOB",
            WireKind::Blob => "BLOB",
            WireKind::BFile => "BFILE",
            WireKind::Raw => "RAW",
            WireKind::Date => "DATE",
            WireKind::Timestamp => "TIMESTAMP",
            WireKind::IntervalDs => "INTERVAL DAY TO SECOND",
            WireKind::IntervalYm => "INTERVAL YEAR TO MONTH",
            WireKind::Ref => "REF",
            WireKind::Object => "OBJECT",
            WireKind::Collection => "COLLECTION",
        }
    }
}

impl fmt::Display for WireKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl WireValue {
    /// Runtime tag of this value
    pub fn kind(&self) -> WireKind {
        match self {
            WireValue::Null => WireKind::Null,
            WireValue::Decimal(_) => WireKind::Decimal,
            WireValue::BinaryFloat(_) => WireKind::BinaryFloat,
            WireValue::BinaryDouble(_) => WireKind::BinaryDouble,
            WireValue::Varchar(_) => WireKind::Varchar,
            WireValue::Clob(_) => WireKind::Clob,
            WireValue::Blob(_) => WireKind::Blob,
            WireValue::BFile(_) => WireKind::BFile,
            WireValue::Raw(_) => WireKind::Raw,
            WireValue::Date(_) => WireKind::Date,
            WireValue::Timestamp(_) => WireKind::Timestamp,
            WireValue::IntervalDs(_) => WireKind::IntervalDs,
            WireValue::IntervalYm(_) => WireKind::IntervalYm,
            WireValue::Ref(_) => WireKind::Ref,
            WireValue::Object(_) => WireKind::Object,
            WireValue::Collection(_) => WireKind::Collection,
        }
    }

    /// Check if this value is NULL, typed or not
    pub fn is_null(&self) -> bool {
        match self {
            WireValue::Null => true,
            WireValue::Decimal(v) => v.is_none(),
            WireValue::BinaryFloat(v) => v.is_none(),
            WireValue::BinaryDouble(v) => v.is_none(),
            WireValue::Varchar(v) | WireValue::Clob(v) | WireValue::Ref(v) => v.is_none(),
            WireValue::Blob(v) | WireValue::BFile(v) | WireValue::Raw(v) => v.is_none(),
            WireValue::Date(v) => v.is_none(),
            WireValue::Timestamp(v) => v.is_none(),
            WireValue::IntervalDs(v) => v.is_none(),
            WireValue::IntervalYm(v) => v.is_none(),
            WireValue::Object(obj) | WireValue::Collection(obj) => obj.is_null(),
        }
    }

    /// Text payload of a character value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            WireValue::Varchar(Some(s)) | WireValue::Clob(Some(s)) | WireValue::Ref(Some(s)) => {
                Some(s)
            }
            _ => None,
        }
    }

    /// Length in characters of a character value, 0 for anything else
    pub fn char_len(&self) -> usize {
        self.as_str().map(|s| s.chars().count()).unwrap_or(0)
    }

    /// Numeric payload
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            WireValue::Decimal(d) => *d,
            _ => None,
        }
    }

    /// UDT instance carried by an object or collection value
    pub fn as_object(&self) -> Option<&DbObject> {
        match self {
            WireValue::Object(obj) | WireValue::Collection(obj) => Some(obj),
            _ => None,
        }
    }
}

impl From<Decimal> for WireValue {
    fn from(v: Decimal) -> Self {
        WireValue::Decimal(Some(v))
    }
}

impl From<i64> for WireValue {
    fn from(v: i64) -> Self {
        WireValue::Decimal(Some(Decimal::from(v)))
    }
}

impl From<i32> for WireValue {
    fn from(v: i32) -> Self {
        WireValue::Decimal(Some(Decimal::from(v)))
    }
}

impl From<f32> for WireValue {
    fn from(v: f32) -> Self {
        WireValue::BinaryFloat(Some(v))
    }
}

impl From<f64> for WireValue {
    fn from(v: f64) -> Self {
        WireValue::BinaryDouble(Some(v))
    }
}

impl From<String> for WireValue {
    fn from(v: String) -> Self {
        WireValue::Varchar(Some(v))
    }
}

impl From<&str> for WireValue {
    fn from(v: &str) -> Self {
        WireValue::Varchar(Some(v.to_string()))
    }
}

impl From<Bytes> for WireValue {
    fn from(v: Bytes) -> Self {
        WireValue::Blob(Some(v))
    }
}

impl From<OracleDate> for WireValue {
    fn from(v: OracleDate) -> Self {
        WireValue::Date(Some(v))
    }
}

impl From<OracleTimestamp> for WireValue {
    fn from(v: OracleTimestamp) -> Self {
        WireValue::Timestamp(Some(v))
    }
}

impl From<IntervalDs> for WireValue {
    fn from(v: IntervalDs) -> Self {
        WireValue::IntervalDs(Some(v))
    }
}

impl From<IntervalYm> for WireValue {
    fn from(v: IntervalYm) -> Self {
        WireValue::IntervalYm(Some(v))
    }
}

impl From<DbObject> for WireValue {
    fn from(obj: DbObject) -> Self {
        if obj.is_collection {
            WireValue::Collection(obj)
        } else {
            WireValue::Object(obj)
        }
    }
}
