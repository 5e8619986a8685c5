//! Parameter binding
//!
//! The [`Binder`] turns [`Param`]s into [`WireArgument`]s before a call and
//! writes OUT and IN OUT results back into them afterwards.
//!
//! Scalar parameters bind with the following driver types:
//!
//! | Rust type                | Driver type                                |
//! |--------------------------|--------------------------------------------|
//! | `i8`                     | Byte                                       |
//! | `i16`, `u8`              | Int16                                      |
//! | `i32`, `u16`             | Int32                                      |
//! | `i64`, `u32`             | Int64                                      |
//! | `u64`, `Decimal`         | Decimal                                    |
//! | `f32`                    | Single                                     |
//! | `f64`                    | Double                                     |
//! | `NaiveDateTime`          | Date                                       |
//! | `TimeDelta`              | IntervalDs                                 |
//! | `char`                   | Char                                       |
//! | `Bytes`                  | Blob                                       |
//! | `String`                 | Varchar2, or Clob for output and long text |
//!
//! Object types bind as Object and collections as Array, both carrying their
//! UDT name.

use tracing::{debug, trace};

use crate::constants::{BindDirection, OracleDbType};
use crate::error::{Error, Result};
use crate::marshal::Marshal;
use crate::param::Param;
use crate::registry::MarshalRegistry;
use crate::udt::{ScalarKind, Shape, TypeKey};
use crate::udt_name::UdtName;
use crate::wire::{WireKind, WireValue};

/// A bound argument as handed to the command executor
#[derive(Debug, Clone, PartialEq)]
pub struct WireArgument {
    /// Argument direction
    pub direction: BindDirection,
    /// Driver type
    pub db_type: OracleDbType,
    /// UDT name for Object and Array arguments
    pub udt_type_name: Option<UdtName>,
    /// Buffer size in characters for VARCHAR2 arguments
    pub size: Option<usize>,
    /// Value sent with the call, replaced by the executor for output arguments
    pub value: Option<WireValue>,
}

impl WireArgument {
    /// Take the value the executor wrote back, NULL if none
    pub fn take_value(&mut self) -> WireValue {
        self.value.take().unwrap_or(WireValue::Null)
    }
}

/// Binds parameters against a registry
#[derive(Debug, Clone, Copy)]
pub struct Binder<'r> {
    registry: &'r MarshalRegistry,
}

impl<'r> Binder<'r> {
    /// Create a binder
    pub fn new(registry: &'r MarshalRegistry) -> Self {
        Self { registry }
    }

    /// Bind every parameter, in order
    pub fn bind(&self, params: &[Param]) -> Result<Vec<WireArgument>> {
        debug!(count = params.len(), "binding parameters");
        params.iter().map(|param| self.bind_param(param)).collect()
    }

    /// Bind one parameter
    ///
    /// Fails with `InvalidParameterType` when the declared type is an object
    /// or collection the registry can't resolve.
    pub fn bind_param(&self, param: &Param) -> Result<WireArgument> {
        let key = param.declared_type();
        let shape = param.shape();
        let direction = param.direction();
        self.check_parameter_type(key, &shape)?;

        let value = if direction.is_input() {
            Some(param.to_wire(self.registry)?)
        } else {
            None
        };

        let argument =
            self.argument(key, &shape, direction.into(), param.override_type(), value)?;
        trace!(
            declared = %key,
            direction = %direction,
            db_type = ?argument.db_type,
            udt = ?argument.udt_type_name,
            "parameter bound"
        );
        Ok(argument)
    }

    /// Write OUT and IN OUT results back into their parameters
    ///
    /// `arguments` must be the output of [`bind`](Self::bind) for the same
    /// parameters after the call. IN parameters are left untouched. A missing
    /// output value is read as NULL.
    pub fn capture(&self, params: &mut [Param], arguments: Vec<WireArgument>) -> Result<()> {
        if params.len() != arguments.len() {
            return Err(Error::ArgumentCountMismatch {
                expected: params.len(),
                actual: arguments.len(),
            });
        }

        for (param, mut argument) in params.iter_mut().zip(arguments) {
            let direction = param.direction();
            if !direction.is_output() {
                continue;
            }
            let value = argument.take_value();
            trace!(
                declared = %param.declared_type(),
                direction = %direction,
                kind = %value.kind(),
                "capturing output"
            );
            param
                .capture(value, self.registry)
                .map_err(|e| Error::ParameterConversionFailed {
                    type_name: param.declared_type().short_name().to_string(),
                    direction,
                    source: Box::new(e),
                })?;
        }
        Ok(())
    }

    /// Argument receiving a function's return value of type `T`
    pub fn return_argument<T: Marshal>(&self) -> Result<WireArgument> {
        let shape = T::shape();
        self.check_parameter_type(shape.key(), &shape)?;
        self.argument(shape.key(), &shape, BindDirection::ReturnValue, None, None)
    }

    /// Convert a function's return value
    pub fn capture_return<T: Marshal>(&self, mut argument: WireArgument, function: &str) -> Result<T> {
        T::from_wire(argument.take_value(), self.registry).map_err(|e| {
            Error::ReturnConversionFailed {
                type_name: TypeKey::of::<T>().short_name().to_string(),
                function: function.to_string(),
                source: Box::new(e),
            }
        })
    }

    fn argument(
        &self,
        key: TypeKey,
        shape: &Shape,
        direction: BindDirection,
        override_type: Option<OracleDbType>,
        value: Option<WireValue>,
    ) -> Result<WireArgument> {
        let max_size = self.registry.config().varchar_max_size();
        let (db_type, udt_type_name) = match shape {
            Shape::Scalar { kind, .. } => {
                let db_type = override_type
                    .unwrap_or_else(|| self.scalar_type(*kind, direction, value.as_ref()));
                (db_type, None)
            }
            Shape::Object(info) => {
                let descriptor = self.registry.ensure_object(info)?;
                (
                    override_type.unwrap_or(OracleDbType::Object),
                    Some(descriptor.udt_name().clone()),
                )
            }
            Shape::Collection { .. } => {
                let descriptor = self.registry.ensure_collection(shape)?;
                (
                    override_type.unwrap_or(OracleDbType::Array),
                    Some(descriptor.udt_collection_name().clone()),
                )
            }
            Shape::Wire(_) => match value.as_ref().and_then(WireValue::as_object) {
                Some(obj) => {
                    let db_type = if obj.is_collection {
                        OracleDbType::Array
                    } else {
                        OracleDbType::Object
                    };
                    (
                        override_type.unwrap_or(db_type),
                        Some(UdtName::parse(&obj.type_name)?),
                    )
                }
                None => {
                    return Err(Error::InvalidParameterType {
                        type_name: key.short_name().to_string(),
                    })
                }
            },
        };

        let size = (db_type == OracleDbType::Varchar2).then_some(max_size);
        Ok(WireArgument {
            direction,
            db_type,
            udt_type_name,
            size,
            value,
        })
    }

    fn check_parameter_type(&self, key: TypeKey, shape: &Shape) -> Result<()> {
        if self.registry.is_valid_shape(shape) {
            Ok(())
        } else {
            Err(Error::InvalidParameterType {
                type_name: key.short_name().to_string(),
            })
        }
    }

    fn scalar_type(
        &self,
        kind: ScalarKind,
        direction: BindDirection,
        value: Option<&WireValue>,
    ) -> OracleDbType {
        match kind {
            ScalarKind::Int8 => OracleDbType::Byte,
            ScalarKind::Int16 | ScalarKind::UInt8 => OracleDbType::Int16,
            ScalarKind::Int32 | ScalarKind::UInt16 => OracleDbType::Int32,
            ScalarKind::Int64 | ScalarKind::UInt32 => OracleDbType::Int64,
            ScalarKind::UInt64 | ScalarKind::Decimal => OracleDbType::Decimal,
            ScalarKind::Float32 => OracleDbType::Single,
            ScalarKind::Float64 => OracleDbType::Double,
            ScalarKind::Date => OracleDbType::Date,
            ScalarKind::Interval => OracleDbType::IntervalDs,
            ScalarKind::Char => OracleDbType::Char,
            ScalarKind::Binary => OracleDbType::Blob,
            ScalarKind::Text => {
                let config = self.registry.config();
                let long_output = direction.is_output() && config.large_text_for_output();
                let long_input = value.is_some_and(|v| {
                    v.kind() == WireKind::Clob || config.exceeds_varchar(v.char_len())
                });
                if long_output || long_input {
                    OracleDbType::Clob
                } else {
                    OracleDbType::Varchar2
                }
            }
        }
    }
}
