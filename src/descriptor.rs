//! Wire type descriptors
//!
//! A [`UdtDescriptor`] is the registry's record of how one Rust type maps
//! onto an Oracle object type: the UDT name, one [`FieldMapping`] per
//! marshaled field and the typed accessor table the mappings index into.
//! A [`UdtCollectionDescriptor`] does the same for a collection element type.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::dbobject::DbObject;
use crate::error::{Error, Result};
use crate::udt::{Field, ScalarKind, TypeKey};
use crate::udt_name::UdtName;
use crate::wire::WireValue;

/// What a mapped field holds
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// A scalar attribute
    Scalar(ScalarKind),
    /// A nested object
    Object {
        /// Rust type of the nested object
        domain: TypeKey,
        /// Its UDT name
        udt_name: UdtName,
    },
    /// A nested collection
    Collection {
        /// Rust type of the element
        element: TypeKey,
        /// UDT name of the collection type
        udt_collection_name: UdtName,
    },
}

impl FieldKind {
    /// Typed NULL of the attribute
    pub fn null_wire(&self) -> WireValue {
        match self {
            FieldKind::Scalar(kind) => kind.null_wire(),
            FieldKind::Object { udt_name, .. } => WireValue::Object(DbObject::null(udt_name.as_str())),
            FieldKind::Collection {
                udt_collection_name,
                ..
            } => WireValue::Collection(DbObject::null_collection(udt_collection_name.as_str())),
        }
    }
}

/// One marshaled field of an object type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMapping {
    /// Rust field name
    pub field_name: &'static str,
    /// UDT attribute name, uppercased
    pub udt_property: String,
    /// What the field holds
    pub kind: FieldKind,
    /// Position of the field's accessor in the type's field table
    pub index: usize,
}

/// How a Rust type maps onto an Oracle object type
pub struct UdtDescriptor {
    pub(crate) domain: TypeKey,
    pub(crate) udt_name: UdtName,
    pub(crate) fields: Vec<FieldMapping>,
    pub(crate) accessors: Arc<dyn Any + Send + Sync>,
}

impl UdtDescriptor {
    /// Rust type described
    pub fn domain(&self) -> TypeKey {
        self.domain
    }

    /// UDT name the type maps to
    pub fn udt_name(&self) -> &UdtName {
        &self.udt_name
    }

    /// Marshaled fields in declaration order
    pub fn fields(&self) -> &[FieldMapping] {
        &self.fields
    }

    /// Mapping for a UDT attribute, matched case-insensitively
    pub fn mapping_for(&self, udt_property: &str) -> Option<&FieldMapping> {
        self.fields
            .iter()
            .find(|m| m.udt_property.eq_ignore_ascii_case(udt_property))
    }

    /// Mapping for a Rust field name
    pub fn mapping_for_field(&self, field_name: &str) -> Option<&FieldMapping> {
        self.fields.iter().find(|m| m.field_name == field_name)
    }

    /// A NULL instance of the UDT
    ///
    /// The instance carries a typed NULL for every mapped attribute. Nested
    /// objects and collections are atomically NULL instances of their own UDT.
    pub fn null_instance(&self) -> DbObject {
        let mut instance = DbObject::null(self.udt_name.as_str());
        for mapping in &self.fields {
            instance
                .values
                .insert(mapping.udt_property.clone(), mapping.kind.null_wire());
        }
        instance
    }

    /// Typed accessor table
    pub(crate) fn accessors<T: 'static>(&self) -> Result<&[Field<T>]> {
        self.accessors
            .downcast_ref::<Vec<Field<T>>>()
            .map(Vec::as_slice)
            .ok_or_else(|| {
                Error::Internal(format!(
                    "descriptor for {} holds no field table for {}",
                    self.domain.short_name(),
                    std::any::type_name::<T>()
                ))
            })
    }
}

impl fmt::Debug for UdtDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UdtDescriptor")
            .field("domain", &self.domain)
            .field("udt_name", &self.udt_name)
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}

/// What a collection's elements are
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementKind {
    /// Scalar elements
    Scalar(ScalarKind),
    /// Object elements
    Object {
        /// Rust type of the element
        domain: TypeKey,
        /// UDT name of the element type
        udt_name: UdtName,
    },
}

/// How a collection of a Rust element type maps onto an Oracle collection type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UdtCollectionDescriptor {
    pub(crate) element: TypeKey,
    pub(crate) element_kind: ElementKind,
    pub(crate) udt_collection_name: UdtName,
}

impl UdtCollectionDescriptor {
    /// Rust element type
    pub fn element(&self) -> TypeKey {
        self.element
    }

    /// What the elements are
    pub fn element_kind(&self) -> &ElementKind {
        &self.element_kind
    }

    /// UDT name of the collection type
    pub fn udt_collection_name(&self) -> &UdtName {
        &self.udt_collection_name
    }

    /// A NULL instance of the collection
    pub fn null_instance(&self) -> DbObject {
        DbObject::null_collection(self.udt_collection_name.as_str())
    }
}
