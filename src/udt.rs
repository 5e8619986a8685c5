//! Domain type model
//!
//! Rust types describe themselves to the registry through a [`Shape`]:
//! scalars carry their [`ScalarKind`], objects carry an [`ObjectInfo`] whose
//! field table is built lazily, and collections carry the shape of their
//! element. Object types implement [`UdtObject`], usually through the
//! [`udt_object!`](crate::udt_object) macro, which supplies a static field
//! table with typed accessors.

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::error::Result;
use crate::registry::MarshalRegistry;
use crate::wire::WireValue;

// =============================================================================
// Type Identity
// =============================================================================

/// Identity of a Rust type, with its name kept for messages
#[derive(Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    /// Key for `T`
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// The `TypeId`
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Full type path
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Type name without its module path
    ///
    /// Generic types keep their full path since the parameters carry paths of
    /// their own.
    pub fn short_name(&self) -> &'static str {
        if self.name.contains('<') {
            self.name
        } else {
            self.name.rsplit("::").next().unwrap_or(self.name)
        }
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

// =============================================================================
// Shapes
// =============================================================================

/// Scalar families understood by the marshaling engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    /// i8
    Int8,
    /// i16
    Int16,
    /// i32
    Int32,
    /// i64
    Int64,
    /// u8
    UInt8,
    /// u16
    UInt16,
    /// u32
    UInt32,
    /// u64
    UInt64,
    /// f32
    Float32,
    /// f64
    Float64,
    /// rust_decimal::Decimal
    Decimal,
    /// chrono::NaiveDateTime
    Date,
    /// chrono::TimeDelta
    Interval,
    /// char
    Char,
    /// String
    Text,
    /// bytes::Bytes
    Binary,
}

impl ScalarKind {
    /// Typed NULL this family travels as
    pub fn null_wire(self) -> WireValue {
        match self {
            ScalarKind::Int8
            | ScalarKind::Int16
            | ScalarKind::Int32
            | ScalarKind::Int64
            | ScalarKind::UInt8
            | ScalarKind::UInt16
            | ScalarKind::UInt32
            | ScalarKind::UInt64
            | ScalarKind::Decimal => WireValue::Decimal(None),
            ScalarKind::Float32 => WireValue::BinaryFloat(None),
            ScalarKind::Float64 => WireValue::BinaryDouble(None),
            ScalarKind::Date => WireValue::Date(None),
            ScalarKind::Interval => WireValue::IntervalDs(None),
            ScalarKind::Char | ScalarKind::Text => WireValue::Varchar(None),
            ScalarKind::Binary => WireValue::Blob(None),
        }
    }
}

/// Container flavour of a collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKind {
    /// `Vec<T>`
    List,
    /// `Box<[T]>`
    Array,
}

/// How a Rust type maps onto the wire
#[derive(Debug, Clone)]
pub enum Shape {
    /// Maps to a single wire scalar
    Scalar {
        /// The Rust type
        key: TypeKey,
        /// Its scalar family
        kind: ScalarKind,
    },
    /// Maps to an Oracle object type
    Object(ObjectInfo),
    /// Maps to an Oracle collection type
    Collection {
        /// The container type
        key: TypeKey,
        /// Shape of the element type
        element: Box<Shape>,
        /// Container flavour
        kind: CollectionKind,
    },
    /// Already in wire form ([`DbObject`](crate::DbObject)); passed through as is
    Wire(TypeKey),
}

impl Shape {
    /// Key of the type this shape describes
    pub fn key(&self) -> TypeKey {
        match self {
            Shape::Scalar { key, .. } | Shape::Collection { key, .. } | Shape::Wire(key) => *key,
            Shape::Object(info) => info.key,
        }
    }

    /// Check if this shape is a scalar
    pub fn is_scalar(&self) -> bool {
        matches!(self, Shape::Scalar { .. })
    }

    /// Check if this shape can be a collection element
    pub fn is_element(&self) -> bool {
        matches!(self, Shape::Scalar { .. } | Shape::Object(_))
    }
}

/// Static description of an object type
#[derive(Clone, Copy)]
pub struct ObjectInfo {
    /// The Rust type
    pub key: TypeKey,
    /// Annotated UDT name
    pub udt_name: Option<&'static str>,
    /// Annotated UDT collection name
    pub udt_collection_name: Option<&'static str>,
    /// Builds the field table
    pub layout: fn() -> ObjectLayout,
}

impl ObjectInfo {
    /// Info for an object type
    pub fn of<T: UdtObject>() -> Self {
        Self {
            key: TypeKey::of::<T>(),
            udt_name: T::UDT_NAME,
            udt_collection_name: T::UDT_COLLECTION_NAME,
            layout: ObjectLayout::of::<T>,
        }
    }
}

impl fmt::Debug for ObjectInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectInfo")
            .field("key", &self.key)
            .field("udt_name", &self.udt_name)
            .field("udt_collection_name", &self.udt_collection_name)
            .finish_non_exhaustive()
    }
}

/// Field table of an object type
///
/// `accessors` holds the `Vec<Field<T>>` the infos were taken from, aligned
/// by index.
pub struct ObjectLayout {
    /// Untyped view of each field
    pub fields: Vec<FieldInfo>,
    /// The typed `Vec<Field<T>>`
    pub accessors: Arc<dyn Any + Send + Sync>,
}

impl ObjectLayout {
    /// Layout of `T`
    pub fn of<T: UdtObject>() -> Self {
        let fields = T::fields();
        let infos = fields.iter().map(Field::info).collect();
        Self {
            fields: infos,
            accessors: Arc::new(fields),
        }
    }
}

/// Untyped view of one field
#[derive(Debug, Clone)]
pub struct FieldInfo {
    /// Rust field name
    pub name: &'static str,
    /// Annotated UDT attribute name
    pub udt_property: Option<&'static str>,
    /// Excluded from marshaling
    pub ignore: bool,
    /// Shape of the field type
    pub shape: Shape,
}

// =============================================================================
// Object Types
// =============================================================================

/// Reads one field into its wire value
pub type FieldReader<T> = fn(&T, &MarshalRegistry) -> Result<WireValue>;

/// Writes a wire value into one field
pub type FieldWriter<T> = fn(&mut T, WireValue, &MarshalRegistry) -> Result<()>;

/// A field of an object type with its typed accessors
pub struct Field<T> {
    /// Rust field name
    pub name: &'static str,
    /// Annotated UDT attribute name
    pub udt_property: Option<&'static str>,
    /// Excluded from marshaling
    pub ignore: bool,
    /// Shape of the field type
    pub shape: Shape,
    /// Reads the field
    pub read: FieldReader<T>,
    /// Writes the field
    pub write: FieldWriter<T>,
}

impl<T> Field<T> {
    /// A marshaled field
    pub fn new(name: &'static str, shape: Shape, read: FieldReader<T>, write: FieldWriter<T>) -> Self {
        Self {
            name,
            udt_property: None,
            ignore: false,
            shape,
            read,
            write,
        }
    }

    /// A field excluded from marshaling
    pub fn ignored(name: &'static str) -> Self {
        Self {
            name,
            udt_property: None,
            ignore: true,
            shape: Shape::Wire(TypeKey::of::<()>()),
            read: |_, _| Ok(WireValue::Null),
            write: |_, _, _| Ok(()),
        }
    }

    /// Set the UDT attribute name
    pub fn with_property(mut self, property: &'static str) -> Self {
        self.udt_property = Some(property);
        self
    }

    fn info(&self) -> FieldInfo {
        FieldInfo {
            name: self.name,
            udt_property: self.udt_property,
            ignore: self.ignore,
            shape: self.shape.clone(),
        }
    }
}

impl<T> fmt::Debug for Field<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("udt_property", &self.udt_property)
            .field("ignore", &self.ignore)
            .field("shape", &self.shape)
            .finish_non_exhaustive()
    }
}

/// A Rust type mapped onto an Oracle object type
///
/// Fields are listed in declaration order. When two fields share a name the
/// later one wins, which lets a type extend a base field list and override
/// entries of it.
///
/// Prefer [`udt_object!`](crate::udt_object), which also implements
/// [`Marshal`](crate::Marshal) for the type.
pub trait UdtObject: Default + Send + Sync + 'static {
    /// UDT name (`SCHEMA.NAME`) used when none is given at registration
    const UDT_NAME: Option<&'static str> = None;

    /// UDT name of the collection type whose elements are this type
    const UDT_COLLECTION_NAME: Option<&'static str> = None;

    /// The field table
    fn fields() -> Vec<Field<Self>>;
}
