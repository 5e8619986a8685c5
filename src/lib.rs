#![warn(missing_docs)]

//! # oracle-udt
//!
//! Marshaling between Rust types and Oracle user-defined types (UDTs) for
//! PL/SQL procedure and function calls.
//!
//! Oracle object types and collections (nested tables, VARRAYs) can't be bound
//! as plain scalars. This crate maps Rust structs onto object types, `Vec`s and
//! boxed slices onto collection types, and converts values both ways through a
//! driver-neutral [`WireValue`] representation.
//!
//! ## Features
//!
//! - **Declarative mapping** - `udt_object!` maps a struct onto an object type
//! - **Lazy registration** - annotated types register on first use
//! - **Nested types** - objects inside objects, collections of objects, cycles
//!   through `Option<Box<T>>`
//! - **Parameter binding** - typed IN, OUT and IN OUT parameters with driver
//!   type selection
//! - **Thread-safe registry** - one registry can be shared across tasks
//!
//! ## Quick Start
//!
//! ```rust
//! use oracle_udt::{udt_object, MarshalRegistry, WireValue};
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Client {
//!     id: i64,
//!     name: String,
//! }
//!
//! udt_object! { Client { id, name => "FULL_NAME" } }
//!
//! # fn main() -> oracle_udt::Result<()> {
//! let registry = MarshalRegistry::new();
//! registry.register_type::<Client>("hr.client_obj", &[])?;
//! registry.register_collection_type::<Client>("hr.client_list")?;
//!
//! let clients = vec![Client { id: 1, name: "Ada".into() }];
//! let wire = registry.to_wire(&clients)?;
//! assert!(matches!(wire, WireValue::Collection(_)));
//!
//! let back: Vec<Client> = registry.from_wire(wire)?;
//! assert_eq!(back, clients);
//! # Ok(())
//! # }
//! ```
//!
//! ## Calling Procedures
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use oracle_udt::{MarshalRegistry, OracleService, Param};
//!
//! let service = OracleService::new(executor, Arc::new(MarshalRegistry::new()));
//!
//! let mut params = [Param::input(clients), Param::output::<i32>()];
//! service.execute_procedure("hr.pkg_client.save_all", &mut params).await?;
//! let saved = params[1].take_value::<i32>();
//! ```
//!
//! The executor implements [`CommandExecutor`] and performs the actual call.
//!
//! ## Data Types
//!
//! | Rust Type | Wire Value |
//! |-----------|------------|
//! | `i8` .. `i64`, `u8` .. `u64`, `Decimal` | `Decimal` |
//! | `f32` | `BinaryFloat` |
//! | `f64` | `BinaryDouble` |
//! | `String` | `Varchar`, `Clob` above the VARCHAR2 limit |
//! | `char` | `Varchar` |
//! | `Bytes` | `Blob` |
//! | `chrono::NaiveDateTime` | `Date` |
//! | `chrono::TimeDelta` | `IntervalDs` |
//! | `Option<T>` | as `T`, NULL for `None` |
//! | `udt_object!` structs, `Box<T>` | `Object` |
//! | `Vec<T>`, `Box<[T]>` | `Collection` |
//! | `DbObject` | passed through |

mod macros;

pub mod binder;
pub mod config;
pub mod constants;
pub mod dbobject;
pub mod descriptor;
pub mod error;
pub mod marshal;
pub mod param;
pub mod registry;
pub mod service;
mod synth;
pub mod types;
pub mod udt;
pub mod udt_name;
pub mod wire;

// Re-export commonly used types
pub use binder::{Binder, WireArgument};
pub use config::MarshalConfig;
pub use constants::{BindDirection, OracleDbType, ParamDirection, VARCHAR_MAX_SIZE};
pub use dbobject::DbObject;
pub use descriptor::{
    ElementKind, FieldKind, FieldMapping, UdtCollectionDescriptor, UdtDescriptor,
};
pub use error::{Error, Result};
pub use marshal::{from_wire_scalar, Marshal, WireScalar};
pub use param::Param;
pub use registry::MarshalRegistry;
pub use service::{CommandExecutor, OracleService};
pub use types::{IntervalDs, IntervalYm, OracleDate, OracleTimestamp};
pub use udt::{CollectionKind, Field, ScalarKind, Shape, TypeKey, UdtObject};
pub use udt_name::UdtName;
pub use wire::{WireKind, WireValue};
