//! Value marshaling
//!
//! [`Marshal`] moves a Rust value to its [`WireValue`] and back. Scalars go
//! through [`WireScalar`], which dispatches on the runtime [`WireKind`] of the
//! incoming value:
//!
//! | Wire kind            | Rust targets                                        |
//! |----------------------|-----------------------------------------------------|
//! | DECIMAL              | integers (truncating), f32, f64, Decimal, String    |
//! | BINARY_FLOAT/DOUBLE  | f32, f64, integers (truncating), Decimal, String    |
//! | VARCHAR2, CLOB, REF  | String; VARCHAR2 of one character also `char`       |
//! | DATE, TIMESTAMP      | NaiveDateTime                                       |
//! | INTERVAL DAY TO SEC  | TimeDelta                                           |
//! | INTERVAL YEAR TO MON | i64, f32, f64 (total months)                        |
//! | BLOB, BFILE, RAW     | Bytes                                               |
//! | COLLECTION           | `Vec<T>`, `Box<[T]>`                                |
//!
//! A NULL becomes `None` for `Option<T>`, empty for `String`, `Bytes` and
//! collections, and fails with `NullToNonNullable` for everything else.
//! Object types (see [`udt_object!`](crate::udt_object)) are converted
//! attribute by attribute through the descriptor registered for them.

use bytes::Bytes;
use chrono::{NaiveDateTime, TimeDelta};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;

use crate::config::MarshalConfig;
use crate::dbobject::DbObject;
use crate::error::{Error, Result};
use crate::registry::MarshalRegistry;
use crate::types::{IntervalDs, OracleDate};
use crate::udt::{CollectionKind, ObjectInfo, ScalarKind, Shape, TypeKey, UdtObject};
use crate::wire::{WireKind, WireValue};

// =============================================================================
// Traits
// =============================================================================

/// A Rust type that can cross the wire
pub trait Marshal: Sized + Send + Sync + 'static {
    /// How this type maps onto the wire
    fn shape() -> Shape;

    /// Convert to the wire representation
    fn to_wire(&self, registry: &MarshalRegistry) -> Result<WireValue>;

    /// Convert from the wire representation
    fn from_wire(value: WireValue, registry: &MarshalRegistry) -> Result<Self>;

    /// The NULL of this type's wire representation
    fn null_wire(_registry: &MarshalRegistry) -> Result<WireValue> {
        Ok(WireValue::Null)
    }
}

/// A Rust type that maps onto a single wire scalar
pub trait WireScalar: Sized {
    /// Scalar family
    const KIND: ScalarKind;

    /// Name used in conversion errors
    const NAME: &'static str;

    /// Convert to the wire representation
    fn to_wire_scalar(&self, config: &MarshalConfig) -> Result<WireValue>;

    /// Typed NULL for this scalar
    fn null_wire_scalar() -> WireValue;

    /// Convert from the wire representation
    fn from_wire_scalar(value: WireValue) -> Result<Self>;
}

/// Convert a wire scalar to `T`
///
/// # Example
///
/// ```rust
/// use oracle_udt::{from_wire_scalar, WireValue};
/// use rust_decimal::Decimal;
///
/// let value = WireValue::Decimal(Some(Decimal::new(425, 1)));
/// assert_eq!(from_wire_scalar::<i32>(value).unwrap(), 42);
/// assert_eq!(from_wire_scalar::<Option<i32>>(WireValue::Decimal(None)).unwrap(), None);
/// ```
pub fn from_wire_scalar<T: WireScalar>(value: WireValue) -> Result<T> {
    T::from_wire_scalar(value)
}

fn mismatch(value: &WireValue, target: &str) -> Error {
    if value.is_null() {
        Error::NullToNonNullable {
            wire_kind: value.kind(),
            target: target.to_string(),
        }
    } else {
        Error::unsupported(value.kind(), target)
    }
}

fn overflow(value: impl ToString, target: &str) -> Error {
    Error::NumericOverflow {
        value: value.to_string(),
        target: target.to_string(),
    }
}

// =============================================================================
// Scalars
// =============================================================================

macro_rules! integer_scalar {
    ($($ty:ty => $kind:ident, $to:ident, months: $months:literal;)*) => {$(
        impl WireScalar for $ty {
            const KIND: ScalarKind = ScalarKind::$kind;
            const NAME: &'static str = stringify!($ty);

            fn to_wire_scalar(&self, _config: &MarshalConfig) -> Result<WireValue> {
                Ok(WireValue::Decimal(Some(Decimal::from(*self))))
            }

            fn null_wire_scalar() -> WireValue {
                WireValue::Decimal(None)
            }

            fn from_wire_scalar(value: WireValue) -> Result<Self> {
                match value {
                    WireValue::Decimal(Some(d)) => {
                        d.trunc().$to().ok_or_else(|| overflow(d, Self::NAME))
                    }
                    WireValue::BinaryDouble(Some(f)) => {
                        f.trunc().$to().ok_or_else(|| overflow(f, Self::NAME))
                    }
                    WireValue::BinaryFloat(Some(f)) => {
                        f.trunc().$to().ok_or_else(|| overflow(f, Self::NAME))
                    }
                    WireValue::IntervalYm(Some(i)) if $months => {
                        let months = i.total_months();
                        <$ty>::try_from(months).map_err(|_| overflow(months, Self::NAME))
                    }
                    other => Err(mismatch(&other, Self::NAME)),
                }
            }
        }
    )*};
}

integer_scalar! {
    i8 => Int8, to_i8, months: false;
    i16 => Int16, to_i16, months: false;
    i32 => Int32, to_i32, months: false;
    i64 => Int64, to_i64, months: true;
    u8 => UInt8, to_u8, months: false;
    u16 => UInt16, to_u16, months: false;
    u32 => UInt32, to_u32, months: false;
    u64 => UInt64, to_u64, months: false;
}

macro_rules! float_scalar {
    ($($ty:ty => $kind:ident, $variant:ident, $to:ident;)*) => {$(
        impl WireScalar for $ty {
            const KIND: ScalarKind = ScalarKind::$kind;
            const NAME: &'static str = stringify!($ty);

            fn to_wire_scalar(&self, _config: &MarshalConfig) -> Result<WireValue> {
                Ok(WireValue::$variant(Some(*self)))
            }

            fn null_wire_scalar() -> WireValue {
                WireValue::$variant(None)
            }

            fn from_wire_scalar(value: WireValue) -> Result<Self> {
                match value {
                    WireValue::BinaryDouble(Some(f)) => Ok(f as $ty),
                    WireValue::BinaryFloat(Some(f)) => Ok(f as $ty),
                    WireValue::Decimal(Some(d)) => d.$to().ok_or_else(|| overflow(d, Self::NAME)),
                    WireValue::IntervalYm(Some(i)) => Ok(i.total_months() as $ty),
                    other => Err(mismatch(&other, Self::NAME)),
                }
            }
        }
    )*};
}

float_scalar! {
    f32 => Float32, BinaryFloat, to_f32;
    f64 => Float64, BinaryDouble, to_f64;
}

impl WireScalar for Decimal {
    const KIND: ScalarKind = ScalarKind::Decimal;
    const NAME: &'static str = "Decimal";

    fn to_wire_scalar(&self, _config: &MarshalConfig) -> Result<WireValue> {
        Ok(WireValue::Decimal(Some(*self)))
    }

    fn null_wire_scalar() -> WireValue {
        WireValue::Decimal(None)
    }

    fn from_wire_scalar(value: WireValue) -> Result<Self> {
        match value {
            WireValue::Decimal(Some(d)) => Ok(d),
            WireValue::BinaryDouble(Some(f)) => {
                Decimal::from_f64(f).ok_or_else(|| overflow(f, Self::NAME))
            }
            WireValue::BinaryFloat(Some(f)) => {
                Decimal::from_f32(f).ok_or_else(|| overflow(f, Self::NAME))
            }
            other => Err(mismatch(&other, Self::NAME)),
        }
    }
}

impl WireScalar for String {
    const KIND: ScalarKind = ScalarKind::Text;
    const NAME: &'static str = "String";

    /// Text over the VARCHAR2 capacity travels as CLOB
    fn to_wire_scalar(&self, config: &MarshalConfig) -> Result<WireValue> {
        if config.exceeds_varchar(self.chars().count()) {
            Ok(WireValue::Clob(Some(self.clone())))
        } else {
            Ok(WireValue::Varchar(Some(self.clone())))
        }
    }

    fn null_wire_scalar() -> WireValue {
        WireValue::Varchar(None)
    }

    fn from_wire_scalar(value: WireValue) -> Result<Self> {
        match value {
            WireValue::Varchar(s) | WireValue::Clob(s) | WireValue::Ref(s) => {
                Ok(s.unwrap_or_default())
            }
            WireValue::Decimal(d) => Ok(d.map(|d| d.to_string()).unwrap_or_default()),
            WireValue::BinaryDouble(f) => Ok(f.map(|f| f.to_string()).unwrap_or_default()),
            WireValue::BinaryFloat(f) => Ok(f.map(|f| f.to_string()).unwrap_or_default()),
            WireValue::Null => Ok(String::new()),
            other => Err(Error::unsupported(other.kind(), Self::NAME)),
        }
    }
}

impl WireScalar for char {
    const KIND: ScalarKind = ScalarKind::Char;
    const NAME: &'static str = "char";

    fn to_wire_scalar(&self, _config: &MarshalConfig) -> Result<WireValue> {
        Ok(WireValue::Varchar(Some(self.to_string())))
    }

    fn null_wire_scalar() -> WireValue {
        WireValue::Varchar(None)
    }

    fn from_wire_scalar(value: WireValue) -> Result<Self> {
        match value {
            WireValue::Varchar(Some(s)) => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(c),
                    _ => Err(Error::DataConversionError(format!(
                        "expected a single character, got {:?}",
                        s
                    ))),
                }
            }
            other => Err(mismatch(&other, Self::NAME)),
        }
    }
}

impl WireScalar for Bytes {
    const KIND: ScalarKind = ScalarKind::Binary;
    const NAME: &'static str = "Bytes";

    fn to_wire_scalar(&self, _config: &MarshalConfig) -> Result<WireValue> {
        Ok(WireValue::Blob(Some(self.clone())))
    }

    fn null_wire_scalar() -> WireValue {
        WireValue::Blob(None)
    }

    fn from_wire_scalar(value: WireValue) -> Result<Self> {
        match value {
            WireValue::Blob(b) | WireValue::BFile(b) | WireValue::Raw(b) => {
                Ok(b.unwrap_or_default())
            }
            WireValue::Null => Ok(Bytes::new()),
            other => Err(Error::unsupported(other.kind(), Self::NAME)),
        }
    }
}

impl WireScalar for NaiveDateTime {
    const KIND: ScalarKind = ScalarKind::Date;
    const NAME: &'static str = "NaiveDateTime";

    /// Binds as DATE, dropping sub-second precision
    fn to_wire_scalar(&self, _config: &MarshalConfig) -> Result<WireValue> {
        Ok(WireValue::Date(Some(OracleDate::from(*self))))
    }

    fn null_wire_scalar() -> WireValue {
        WireValue::Date(None)
    }

    fn from_wire_scalar(value: WireValue) -> Result<Self> {
        match value {
            WireValue::Date(Some(d)) => d.to_naive(),
            WireValue::Timestamp(Some(t)) => t.to_naive(),
            other => Err(mismatch(&other, Self::NAME)),
        }
    }
}

impl WireScalar for TimeDelta {
    const KIND: ScalarKind = ScalarKind::Interval;
    const NAME: &'static str = "TimeDelta";

    fn to_wire_scalar(&self, _config: &MarshalConfig) -> Result<WireValue> {
        Ok(WireValue::IntervalDs(Some(IntervalDs::from(*self))))
    }

    fn null_wire_scalar() -> WireValue {
        WireValue::IntervalDs(None)
    }

    fn from_wire_scalar(value: WireValue) -> Result<Self> {
        match value {
            WireValue::IntervalDs(Some(i)) => i.to_time_delta(),
            other => Err(mismatch(&other, Self::NAME)),
        }
    }
}

impl<T: WireScalar> WireScalar for Option<T> {
    const KIND: ScalarKind = T::KIND;
    const NAME: &'static str = T::NAME;

    fn to_wire_scalar(&self, config: &MarshalConfig) -> Result<WireValue> {
        match self {
            Some(v) => v.to_wire_scalar(config),
            None => Ok(T::null_wire_scalar()),
        }
    }

    fn null_wire_scalar() -> WireValue {
        T::null_wire_scalar()
    }

    fn from_wire_scalar(value: WireValue) -> Result<Self> {
        if value.is_null() {
            Ok(None)
        } else {
            T::from_wire_scalar(value).map(Some)
        }
    }
}

macro_rules! scalar_marshal {
    ($($ty:ty),* $(,)?) => {$(
        impl Marshal for $ty {
            fn shape() -> Shape {
                Shape::Scalar {
                    key: TypeKey::of::<$ty>(),
                    kind: <$ty as WireScalar>::KIND,
                }
            }

            fn to_wire(&self, registry: &MarshalRegistry) -> Result<WireValue> {
                self.to_wire_scalar(registry.config())
            }

            fn from_wire(value: WireValue, _registry: &MarshalRegistry) -> Result<Self> {
                <$ty as WireScalar>::from_wire_scalar(value)
            }

            fn null_wire(_registry: &MarshalRegistry) -> Result<WireValue> {
                Ok(<$ty as WireScalar>::null_wire_scalar())
            }
        }
    )*};
}

scalar_marshal!(
    i8,
    i16,
    i32,
    i64,
    u8,
    u16,
    u32,
    u64,
    f32,
    f64,
    Decimal,
    String,
    char,
    Bytes,
    NaiveDateTime,
    TimeDelta,
);

// =============================================================================
// Containers
// =============================================================================

impl<T: Marshal> Marshal for Option<T> {
    fn shape() -> Shape {
        T::shape()
    }

    fn to_wire(&self, registry: &MarshalRegistry) -> Result<WireValue> {
        match self {
            Some(v) => v.to_wire(registry),
            None => T::null_wire(registry),
        }
    }

    fn from_wire(value: WireValue, registry: &MarshalRegistry) -> Result<Self> {
        if value.is_null() {
            Ok(None)
        } else {
            T::from_wire(value, registry).map(Some)
        }
    }

    fn null_wire(registry: &MarshalRegistry) -> Result<WireValue> {
        T::null_wire(registry)
    }
}

impl<T: Marshal> Marshal for Vec<T> {
    fn shape() -> Shape {
        Shape::Collection {
            key: TypeKey::of::<Self>(),
            element: Box::new(T::shape()),
            kind: CollectionKind::List,
        }
    }

    fn to_wire(&self, registry: &MarshalRegistry) -> Result<WireValue> {
        collection_to_wire(&Self::shape(), self.iter(), registry)
    }

    fn from_wire(value: WireValue, registry: &MarshalRegistry) -> Result<Self> {
        collection_from_wire(value, registry, std::any::type_name::<Self>())
    }

    fn null_wire(registry: &MarshalRegistry) -> Result<WireValue> {
        collection_null_wire(&Self::shape(), registry)
    }
}

impl<T: Marshal> Marshal for Box<[T]> {
    fn shape() -> Shape {
        Shape::Collection {
            key: TypeKey::of::<Self>(),
            element: Box::new(T::shape()),
            kind: CollectionKind::Array,
        }
    }

    fn to_wire(&self, registry: &MarshalRegistry) -> Result<WireValue> {
        collection_to_wire(&Self::shape(), self.iter(), registry)
    }

    fn from_wire(value: WireValue, registry: &MarshalRegistry) -> Result<Self> {
        collection_from_wire(value, registry, std::any::type_name::<Self>())
            .map(Vec::into_boxed_slice)
    }

    fn null_wire(registry: &MarshalRegistry) -> Result<WireValue> {
        collection_null_wire(&Self::shape(), registry)
    }
}

fn collection_to_wire<'a, T: Marshal>(
    shape: &Shape,
    items: impl Iterator<Item = &'a T>,
    registry: &MarshalRegistry,
) -> Result<WireValue> {
    let descriptor = registry.ensure_collection(shape)?;
    let mut collection = DbObject::collection(descriptor.udt_collection_name().as_str());
    for item in items {
        collection.append(item.to_wire(registry)?);
    }
    Ok(WireValue::Collection(collection))
}

fn collection_from_wire<T: Marshal>(
    value: WireValue,
    registry: &MarshalRegistry,
    target: &str,
) -> Result<Vec<T>> {
    match value {
        WireValue::Null => Ok(Vec::new()),
        WireValue::Collection(collection) if collection.is_null() => Ok(Vec::new()),
        WireValue::Collection(collection) => collection
            .into_elements()
            .into_iter()
            .map(|element| T::from_wire(element, registry))
            .collect(),
        other => Err(Error::unsupported(other.kind(), target)),
    }
}

fn collection_null_wire(shape: &Shape, registry: &MarshalRegistry) -> Result<WireValue> {
    let descriptor = registry.ensure_collection(shape)?;
    Ok(WireValue::Collection(DbObject::null_collection(
        descriptor.udt_collection_name().as_str(),
    )))
}

/// Instances already in wire form pass through unchanged
impl Marshal for DbObject {
    fn shape() -> Shape {
        Shape::Wire(TypeKey::of::<DbObject>())
    }

    fn to_wire(&self, _registry: &MarshalRegistry) -> Result<WireValue> {
        Ok(WireValue::from(self.clone()))
    }

    fn from_wire(value: WireValue, _registry: &MarshalRegistry) -> Result<Self> {
        match value {
            WireValue::Object(obj) | WireValue::Collection(obj) if obj.is_null() => {
                Ok(DbObject::default())
            }
            WireValue::Object(obj) | WireValue::Collection(obj) => Ok(obj),
            WireValue::Null => Ok(DbObject::default()),
            other => Err(Error::unsupported(other.kind(), "DbObject")),
        }
    }
}

// =============================================================================
// Object Types
// =============================================================================

/// Shape of a field, taken from a value of its type
pub fn shape_of<F: Marshal>(_field: &F) -> Shape {
    F::shape()
}

/// Overwrite a field from a wire value
pub fn assign<F: Marshal>(slot: &mut F, value: WireValue, registry: &MarshalRegistry) -> Result<()> {
    *slot = F::from_wire(value, registry)?;
    Ok(())
}

/// Shape of an object type
pub fn object_shape<T: UdtObject>() -> Shape {
    Shape::Object(ObjectInfo::of::<T>())
}

/// Convert an object to its wire instance, attribute by attribute
pub fn object_to_wire<T: UdtObject>(value: &T, registry: &MarshalRegistry) -> Result<WireValue> {
    let descriptor = registry.ensure_object(&ObjectInfo::of::<T>())?;
    let accessors = descriptor.accessors::<T>()?;

    let mut obj = DbObject::new(descriptor.udt_name().as_str());
    for mapping in descriptor.fields() {
        let field = accessors
            .get(mapping.index)
            .ok_or_else(|| Error::Internal(format!("no accessor for {}", mapping.field_name)))?;
        let wire = (field.read)(value, registry).map_err(|e| Error::FieldConversionFailed {
            type_name: descriptor.domain().short_name().to_string(),
            field: mapping.field_name.to_string(),
            source: Box::new(e),
        })?;
        obj.set(mapping.udt_property.clone(), wire);
    }
    Ok(WireValue::Object(obj))
}

/// Rebuild an object from its wire instance
///
/// A NULL instance yields `T::default()`.
pub fn object_from_wire<T: UdtObject>(value: WireValue, registry: &MarshalRegistry) -> Result<T> {
    let obj = match value {
        WireValue::Null => return Ok(T::default()),
        WireValue::Object(obj) if obj.is_null() => return Ok(T::default()),
        WireValue::Object(obj) => obj,
        other => return Err(Error::unsupported(other.kind(), TypeKey::of::<T>().short_name())),
    };

    let descriptor = registry.ensure_object(&ObjectInfo::of::<T>())?;
    let type_name = descriptor.domain().short_name();
    if !obj.type_name.eq_ignore_ascii_case(descriptor.udt_name().as_str()) {
        return Err(Error::unsupported(
            format!("{} {}", WireKind::Object, obj.type_name),
            type_name,
        ));
    }

    let accessors = descriptor.accessors::<T>()?;
    let mut out = T::default();
    for (property, wire) in obj.values {
        let mapping = descriptor.mapping_for(&property).ok_or_else(|| {
            Error::unsupported(format!("attribute {} of {}", property, obj.type_name), type_name)
        })?;
        let field = accessors
            .get(mapping.index)
            .ok_or_else(|| Error::Internal(format!("no accessor for {}", mapping.field_name)))?;
        (field.write)(&mut out, wire, registry).map_err(|e| Error::FieldConversionFailed {
            type_name: type_name.to_string(),
            field: mapping.field_name.to_string(),
            source: Box::new(e),
        })?;
    }
    Ok(out)
}

/// NULL instance of an object type
pub fn object_null_wire<T: UdtObject>(registry: &MarshalRegistry) -> Result<WireValue> {
    let descriptor = registry.ensure_object(&ObjectInfo::of::<T>())?;
    Ok(WireValue::Object(descriptor.null_instance()))
}
