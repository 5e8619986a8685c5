//! Validated Oracle UDT names
//!
//! A UDT name is `SCHEMA.NAME`. It is trimmed and uppercased on parse, so
//! `hr.client_obj` and `HR.CLIENT_OBJ` name the same type.

use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

use crate::constants::UDT_NAME_SEPARATOR;
use crate::error::{Error, Result};

/// A validated, uppercased `SCHEMA.NAME`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UdtName(String);

impl UdtName {
    /// Parse and normalize a UDT name
    ///
    /// The name must contain exactly one `.` with a non-empty schema and type
    /// on either side and no whitespace inside.
    pub fn parse(name: &str) -> Result<Self> {
        let trimmed = name.trim();
        let invalid = || Error::InvalidWireNameFormat {
            name: name.to_string(),
        };

        let mut parts = trimmed.split(UDT_NAME_SEPARATOR);
        let schema = parts.next().ok_or_else(invalid)?;
        let object = parts.next().ok_or_else(invalid)?;
        if parts.next().is_some() || !valid_part(schema) || !valid_part(object) {
            return Err(invalid());
        }

        Ok(Self(trimmed.to_uppercase()))
    }

    /// Schema part (before the dot)
    pub fn schema(&self) -> &str {
        self.split().0
    }

    /// Type part (after the dot)
    pub fn object_name(&self) -> &str {
        self.split().1
    }

    /// The full `SCHEMA.NAME`
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn split(&self) -> (&str, &str) {
        self.0
            .split_once(UDT_NAME_SEPARATOR)
            .unwrap_or((self.0.as_str(), ""))
    }
}

fn valid_part(part: &str) -> bool {
    !part.is_empty() && !part.chars().any(char::is_whitespace)
}

impl fmt::Display for UdtName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for UdtName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for UdtName {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        Self::parse(value)
    }
}

impl AsRef<str> for UdtName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for UdtName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for UdtName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for UdtName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_uppercases() {
        let name = UdtName::parse("hr.client_obj").unwrap();
        assert_eq!(name, "HR.CLIENT_OBJ");
        assert_eq!(name.schema(), "HR");
        assert_eq!(name.object_name(), "CLIENT_OBJ");
    }

    #[test]
    fn test_parse_trims() {
        let name: UdtName = "  hr.obj ".parse().unwrap();
        assert_eq!(name.as_str(), "HR.OBJ");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in ["", "HR", "HR.", ".OBJ", "A.B.C", "HR. OBJ", "H R.OBJ", "   "] {
            let err = UdtName::parse(bad).unwrap_err();
            assert!(
                matches!(err, Error::InvalidWireNameFormat { .. }),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_equal_after_normalization() {
        assert_eq!(
            UdtName::parse("Hr.Obj").unwrap(),
            UdtName::parse("HR.OBJ").unwrap()
        );
    }
}
