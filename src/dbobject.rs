//! Oracle UDT instances
//!
//! A [`DbObject`] is the driver-side instance of an Oracle object or
//! collection type:
//! - Object types (CREATE TYPE ... AS OBJECT) hold named attributes
//! - Collection types (VARRAY, nested tables) hold an ordered element array
//!
//! Both carry a null flag separating an atomically NULL instance from an
//! instance whose attributes happen to be NULL.
//!
//! # Example
//!
//! ```rust
//! use oracle_udt::{DbObject, WireValue};
//!
//! let mut obj = DbObject::new("HR.EMPLOYEE_TYPE");
//! obj.set("first_name", "John");
//! obj.set("LAST_NAME", "Doe");
//! assert_eq!(obj.get("FIRST_NAME"), Some(&WireValue::from("John")));
//!
//! let mut list = DbObject::collection("HR.NUMBER_LIST");
//! list.append(1i64);
//! list.append(2i64);
//! assert_eq!(list.len(), 2);
//! ```

use indexmap::IndexMap;

use crate::wire::WireValue;

/// An instance of an Oracle object or collection type
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DbObject {
    /// Fully qualified UDT name
    pub type_name: String,
    /// Attribute values keyed by uppercased attribute name (for object types)
    pub values: IndexMap<String, WireValue>,
    /// Element values (for collections)
    pub elements: Vec<WireValue>,
    /// Whether this is a collection
    pub is_collection: bool,
    /// Whether the instance itself is NULL
    is_null: bool,
}

impl DbObject {
    /// Create a new object instance
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            ..Self::default()
        }
    }

    /// Create a new collection instance
    pub fn collection(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            is_collection: true,
            ..Self::default()
        }
    }

    /// Create an atomically NULL object instance
    pub fn null(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            is_null: true,
            ..Self::default()
        }
    }

    /// Create an atomically NULL collection instance
    pub fn null_collection(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            is_collection: true,
            is_null: true,
            ..Self::default()
        }
    }

    /// Check if the instance is NULL
    pub fn is_null(&self) -> bool {
        self.is_null
    }

    /// Set or clear the null flag
    ///
    /// Marking an instance NULL drops its attributes and elements.
    pub fn set_null(&mut self, is_null: bool) {
        self.is_null = is_null;
        if is_null {
            self.values.clear();
            self.elements.clear();
        }
    }

    /// Set an attribute value
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<WireValue>) {
        self.is_null = false;
        self.values.insert(name.into().to_uppercase(), value.into());
    }

    /// Get an attribute value
    pub fn get(&self, name: &str) -> Option<&WireValue> {
        self.values.get(&name.to_uppercase())
    }

    /// Remove and return an attribute value
    pub fn take(&mut self, name: &str) -> Option<WireValue> {
        self.values.shift_remove(&name.to_uppercase())
    }

    /// Check if an attribute is set
    pub fn has(&self, name: &str) -> bool {
        self.values.contains_key(&name.to_uppercase())
    }

    /// Iterate over attributes in insertion order
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &WireValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Append an element to a collection
    pub fn append(&mut self, value: impl Into<WireValue>) {
        self.is_null = false;
        self.elements.push(value.into());
    }

    /// Get collection elements
    pub fn elements(&self) -> &[WireValue] {
        &self.elements
    }

    /// Consume the collection, returning its elements
    pub fn into_elements(self) -> Vec<WireValue> {
        self.elements
    }

    /// Get collection length
    pub fn len(&self) -> usize {
        if self.is_collection {
            self.elements.len()
        } else {
            self.values.len()
        }
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        if self.is_collection {
            self.elements.is_empty()
        } else {
            self.values.is_empty()
        }
    }
}
