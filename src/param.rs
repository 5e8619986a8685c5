//! Procedure parameters
//!
//! A [`Param`] is a typed bind variable for a PL/SQL call: its direction,
//! its declared Rust type, an optional wire type override and the value
//! itself. After the call the [`Binder`](crate::Binder) writes OUT and IN OUT
//! results back into the parameter, where they are read with
//! [`Param::value`] or [`Param::take_value`].
//!
//! # Examples
//!
//! ```rust
//! use oracle_udt::{OracleDbType, Param, ParamDirection};
//!
//! // IN parameter (default)
//! let id = Param::input(42i32);
//!
//! // OUT parameter - only the type is known before the call
//! let total = Param::output::<i64>();
//!
//! // IN OUT parameter
//! let name = Param::input_output(String::from("hello"));
//!
//! // Explicit wire type
//! let code = Param::create(ParamDirection::Input, Some(String::from("X")), Some(OracleDbType::Char));
//!
//! assert_eq!(total.direction(), ParamDirection::Output);
//! assert_eq!(id.value::<i32>(), Some(&42));
//! ```

use std::any::Any;
use std::fmt;

use crate::constants::{OracleDbType, ParamDirection};
use crate::error::Result;
use crate::marshal::Marshal;
use crate::registry::MarshalRegistry;
use crate::udt::{Shape, TypeKey};
use crate::wire::WireValue;

/// Type-erased storage for a parameter's value
pub(crate) trait ParamSlot: Send + Sync {
    fn key(&self) -> TypeKey;
    fn shape(&self) -> Shape;
    fn has_value(&self) -> bool;
    fn value_any(&self) -> Option<&dyn Any>;
    fn to_wire(&self, registry: &MarshalRegistry) -> Result<WireValue>;
    fn capture(&mut self, value: WireValue, registry: &MarshalRegistry) -> Result<()>;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

struct TypedSlot<T> {
    value: Option<T>,
}

impl<T: Marshal> ParamSlot for TypedSlot<T> {
    fn key(&self) -> TypeKey {
        TypeKey::of::<T>()
    }

    fn shape(&self) -> Shape {
        T::shape()
    }

    fn has_value(&self) -> bool {
        self.value.is_some()
    }

    fn value_any(&self) -> Option<&dyn Any> {
        self.value.as_ref().map(|v| v as &dyn Any)
    }

    /// A missing value binds as the type's NULL
    fn to_wire(&self, registry: &MarshalRegistry) -> Result<WireValue> {
        match &self.value {
            Some(value) => value.to_wire(registry),
            None => T::null_wire(registry),
        }
    }

    fn capture(&mut self, value: WireValue, registry: &MarshalRegistry) -> Result<()> {
        self.value = Some(T::from_wire(value, registry)?);
        Ok(())
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A bind parameter for a PL/SQL procedure or function call
pub struct Param {
    direction: ParamDirection,
    override_type: Option<OracleDbType>,
    slot: Box<dyn ParamSlot>,
}

impl Param {
    /// Create a parameter
    ///
    /// `override_type` bypasses the type the binder would pick for `T`.
    pub fn create<T: Marshal>(
        direction: ParamDirection,
        value: Option<T>,
        override_type: Option<OracleDbType>,
    ) -> Self {
        Self {
            direction,
            override_type,
            slot: Box::new(TypedSlot { value }),
        }
    }

    /// Create an IN parameter
    pub fn input<T: Marshal>(value: T) -> Self {
        Self::create(ParamDirection::Input, Some(value), None)
    }

    /// Create an OUT parameter of type `T`
    pub fn output<T: Marshal>() -> Self {
        Self::create::<T>(ParamDirection::Output, None, None)
    }

    /// Create an IN OUT parameter
    pub fn input_output<T: Marshal>(value: T) -> Self {
        Self::create(ParamDirection::InputOutput, Some(value), None)
    }

    /// Set the wire type, bypassing the type the binder would pick
    pub fn with_type(mut self, db_type: OracleDbType) -> Self {
        self.override_type = Some(db_type);
        self
    }

    /// Parameter direction
    pub fn direction(&self) -> ParamDirection {
        self.direction
    }

    /// Declared Rust type
    pub fn declared_type(&self) -> TypeKey {
        self.slot.key()
    }

    /// Wire type override
    pub fn override_type(&self) -> Option<OracleDbType> {
        self.override_type
    }

    /// Check if the parameter holds a value
    pub fn has_value(&self) -> bool {
        self.slot.has_value()
    }

    /// The value, if the parameter holds a `T`
    pub fn value<T: Marshal>(&self) -> Option<&T> {
        self.slot.value_any().and_then(|v| v.downcast_ref::<T>())
    }

    /// Take the value out, if the parameter holds a `T`
    pub fn take_value<T: Marshal>(&mut self) -> Option<T> {
        self.slot
            .as_any_mut()
            .downcast_mut::<TypedSlot<T>>()
            .and_then(|slot| slot.value.take())
    }

    pub(crate) fn shape(&self) -> Shape {
        self.slot.shape()
    }

    pub(crate) fn to_wire(&self, registry: &MarshalRegistry) -> Result<WireValue> {
        self.slot.to_wire(registry)
    }

    pub(crate) fn capture(&mut self, value: WireValue, registry: &MarshalRegistry) -> Result<()> {
        self.slot.capture(value, registry)
    }
}

impl fmt::Debug for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Param")
            .field("direction", &self.direction)
            .field("declared_type", &self.slot.key())
            .field("override_type", &self.override_type)
            .field("has_value", &self.slot.has_value())
            .finish()
    }
}
