//! Wire type registry
//!
//! The [`MarshalRegistry`] owns every descriptor derived for a Rust type,
//! the set of claimed UDT names and the markers for types being synthesized.
//! It is the context object every conversion and the [`Binder`](crate::Binder)
//! work against.
//!
//! # Example
//!
//! ```rust
//! use oracle_udt::{udt_object, MarshalRegistry};
//!
//! #[derive(Debug, Default)]
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
//! assert!(registry.is_claimed("HR.CLIENT_LIST"));
//!
//! let wire = registry.to_wire(&vec![Client::default()])?;
//! let list = wire.as_object().map(|list| list.type_name.as_str());
//! assert_eq!(list, Some("HR.CLIENT_LIST"));
//! # Ok(())
//! # }
//! ```
//!
//! # Thread Safety
//!
//! All state sits behind one `parking_lot::RwLock`. Lookups take the read
//! lock. Registration takes the write lock for the whole synthesis, so a
//! descriptor is never visible half-built and two threads racing to claim the
//! same name see exactly one `DuplicateWireName`.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::config::MarshalConfig;
use crate::descriptor::{UdtCollectionDescriptor, UdtDescriptor};
use crate::error::{Error, Result};
use crate::marshal::Marshal;
use crate::synth::{RegistryState, Synthesizer};
use crate::udt::{ObjectInfo, Shape, TypeKey, UdtObject};
use crate::udt_name::UdtName;
use crate::wire::WireValue;

/// Registry of wire types derived for Rust types
#[derive(Debug, Default)]
pub struct MarshalRegistry {
    config: MarshalConfig,
    state: RwLock<RegistryState>,
}

impl MarshalRegistry {
    /// Create an empty registry with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty registry with the given configuration
    pub fn with_config(config: MarshalConfig) -> Self {
        Self {
            config,
            state: RwLock::new(RegistryState::default()),
        }
    }

    /// The registry's configuration
    pub fn config(&self) -> &MarshalConfig {
        &self.config
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    /// Descriptor registered for `T`
    pub fn resolve<T: 'static>(&self) -> Option<Arc<UdtDescriptor>> {
        self.state.read().objects.get(&TypeKey::of::<T>().id()).cloned()
    }

    /// Collection descriptor registered for element type `E`
    pub fn resolve_collection<E: 'static>(&self) -> Option<Arc<UdtCollectionDescriptor>> {
        self.state
            .read()
            .collections
            .get(&TypeKey::of::<E>().id())
            .cloned()
    }

    /// Check if a UDT name is claimed
    pub fn is_claimed(&self, name: &str) -> bool {
        match UdtName::parse(name) {
            Ok(name) => self.state.read().claimed.contains(&name),
            Err(_) => false,
        }
    }

    /// Claim a UDT name without registering a type for it
    ///
    /// Returns false if the name was already claimed. Claims are permanent.
    pub fn claim(&self, name: &str) -> Result<bool> {
        let name = parse_name(name, "claim")?;
        Ok(self.state.write().claim(&name))
    }

    /// Check if `T` can be bound as a procedure parameter
    ///
    /// Scalars always can. Object types can once registered or when they
    /// carry a UDT name annotation; collections likewise through their
    /// element type.
    pub fn is_valid_parameter_type<T: Marshal>(&self) -> bool {
        self.is_valid_shape(&T::shape())
    }

    pub(crate) fn is_valid_shape(&self, shape: &Shape) -> bool {
        match shape {
            Shape::Scalar { .. } | Shape::Wire(_) => true,
            Shape::Object(info) => {
                let registered = self.state.read().objects.contains_key(&info.key.id());
                registered || info.udt_name.is_some()
            }
            Shape::Collection { element, .. } => {
                let key = element.key();
                let registered = self.state.read().collections.contains_key(&key.id());
                match element.as_ref() {
                    Shape::Scalar { .. } => registered,
                    Shape::Object(info) => {
                        registered
                            || (info.udt_collection_name.is_some() && self.is_valid_shape(element))
                    }
                    _ => false,
                }
            }
        }
    }

    // =========================================================================
    // Registration
    // =========================================================================

    /// Register `T` against a UDT name
    ///
    /// `overrides` maps Rust field names to UDT attribute names and wins over
    /// the type's own annotations. Registering a type twice returns the first
    /// descriptor.
    pub fn register_type<T: UdtObject>(
        &self,
        name: &str,
        overrides: &[(&str, &str)],
    ) -> Result<Arc<UdtDescriptor>> {
        let key = TypeKey::of::<T>();
        let name = parse_name(name, key.short_name())?;
        debug!(domain = %key, udt = %name, "registering object type");
        self.synthesize(|synth| synth.object(&ObjectInfo::of::<T>(), Some(name), overrides))?;
        self.descriptor_for(key)
    }

    /// Register `T` using its own annotations
    ///
    /// Registers the collection type too when `T` names one.
    pub fn register_annotated<T: UdtObject>(&self) -> Result<Arc<UdtDescriptor>> {
        let key = TypeKey::of::<T>();
        let info = ObjectInfo::of::<T>();
        debug!(domain = %key, "registering annotated object type");
        self.synthesize(|synth| {
            synth.object(&info, None, &[])?;
            if info.udt_collection_name.is_some() {
                synth.collection(&Shape::Object(info), None, key)?;
            }
            Ok(())
        })?;
        self.descriptor_for(key)
    }

    /// Register the collection type whose elements are `E`
    pub fn register_collection_type<E: Marshal>(
        &self,
        name: &str,
    ) -> Result<Arc<UdtCollectionDescriptor>> {
        let shape = E::shape();
        let key = shape.key();
        let name = parse_name(name, key.short_name())?;
        debug!(element = %key, udt = %name, "registering collection type");
        self.synthesize(|synth| synth.collection(&shape, Some(name), key))?;
        self.collection_descriptor_for(key)
    }

    /// Register `T` and the collection type of `T` in one step
    ///
    /// Either both succeed or neither is registered.
    pub fn register_type_and_collection<T: UdtObject>(
        &self,
        name: &str,
        collection_name: &str,
        overrides: &[(&str, &str)],
    ) -> Result<(Arc<UdtDescriptor>, Arc<UdtCollectionDescriptor>)> {
        let key = TypeKey::of::<T>();
        let name = parse_name(name, key.short_name())?;
        let collection_name = parse_name(collection_name, key.short_name())?;
        let info = ObjectInfo::of::<T>();
        self.synthesize(|synth| {
            synth.object(&info, Some(name), overrides)?;
            synth.collection(&Shape::Object(info), Some(collection_name), key)
        })?;
        Ok((self.descriptor_for(key)?, self.collection_descriptor_for(key)?))
    }

    /// Bind `T` to a UDT name if another type owns it, otherwise register it
    pub fn register_or_bind_type<T: UdtObject>(
        &self,
        name: &str,
        overrides: &[(&str, &str)],
    ) -> Result<Arc<UdtDescriptor>> {
        let key = TypeKey::of::<T>();
        let name = parse_name(name, key.short_name())?;
        let info = ObjectInfo::of::<T>();
        self.synthesize(|synth| {
            if synth.is_object_name(&name) {
                synth.bind_object(&info, &name, overrides)
            } else {
                synth.object(&info, Some(name), overrides)
            }
        })?;
        self.descriptor_for(key)
    }

    /// Map `T` onto a UDT name already registered for another type
    ///
    /// Fields are matched to the existing UDT's attributes by name.
    pub fn bind_existing_type<T: UdtObject>(
        &self,
        name: &str,
        overrides: &[(&str, &str)],
    ) -> Result<Arc<UdtDescriptor>> {
        let key = TypeKey::of::<T>();
        let name = parse_name(name, key.short_name())?;
        self.synthesize(|synth| synth.bind_object(&ObjectInfo::of::<T>(), &name, overrides))?;
        self.descriptor_for(key)
    }

    /// Map collections of `E` onto a collection UDT already registered for
    /// another element type
    pub fn bind_existing_collection_type<E: Marshal>(
        &self,
        name: &str,
    ) -> Result<Arc<UdtCollectionDescriptor>> {
        let shape = E::shape();
        let key = shape.key();
        let name = parse_name(name, key.short_name())?;
        self.synthesize(|synth| synth.bind_collection(&shape, &name))?;
        self.collection_descriptor_for(key)
    }

    // =========================================================================
    // Lazy Resolution
    // =========================================================================

    /// Descriptor for an object type, synthesizing it from annotations on
    /// first use
    pub(crate) fn ensure_object(&self, info: &ObjectInfo) -> Result<Arc<UdtDescriptor>> {
        let cached = self.state.read().objects.get(&info.key.id()).cloned();
        if let Some(descriptor) = cached {
            return Ok(descriptor);
        }
        self.synthesize(|synth| synth.object(info, None, &[]))?;
        self.descriptor_for(info.key)
    }

    /// Collection descriptor for a collection shape, synthesizing it from the
    /// element's annotations on first use
    pub(crate) fn ensure_collection(&self, shape: &Shape) -> Result<Arc<UdtCollectionDescriptor>> {
        let (owner, element) = match shape {
            Shape::Collection { key, element, .. } => (*key, element.as_ref()),
            other => {
                return Err(Error::Internal(format!(
                    "{} is not a collection",
                    other.key().name()
                )))
            }
        };
        let key = element.key();
        let cached = self.state.read().collections.get(&key.id()).cloned();
        if let Some(descriptor) = cached {
            return Ok(descriptor);
        }
        if !element.is_element() {
            return Err(Error::UnsupportedFieldType {
                type_name: owner.short_name().to_string(),
                field: "element".to_string(),
                field_type: key.name().to_string(),
            });
        }
        self.synthesize(|synth| synth.collection(element, None, owner))?;
        self.collection_descriptor_for(key)
    }

    fn synthesize<T>(&self, f: impl FnOnce(&mut Synthesizer<'_>) -> Result<T>) -> Result<T> {
        let mut state = self.state.write();
        let mut synth = Synthesizer::new(&mut state);
        let result = f(&mut synth);
        synth.settle(result)
    }

    fn descriptor_for(&self, key: TypeKey) -> Result<Arc<UdtDescriptor>> {
        self.state
            .read()
            .objects
            .get(&key.id())
            .cloned()
            .ok_or_else(|| Error::Internal(format!("no descriptor published for {}", key.name())))
    }

    fn collection_descriptor_for(&self, key: TypeKey) -> Result<Arc<UdtCollectionDescriptor>> {
        self.state
            .read()
            .collections
            .get(&key.id())
            .cloned()
            .ok_or_else(|| {
                Error::Internal(format!("no collection descriptor published for {}", key.name()))
            })
    }

    // =========================================================================
    // Conversion
    // =========================================================================

    /// Convert a value to its wire representation
    pub fn to_wire<T: Marshal>(&self, value: &T) -> Result<WireValue> {
        value.to_wire(self)
    }

    /// Convert a wire value to `T`
    pub fn from_wire<T: Marshal>(&self, value: WireValue) -> Result<T> {
        T::from_wire(value, self)
    }

    /// NULL wire value of `T`
    pub fn null_wire<T: Marshal>(&self) -> Result<WireValue> {
        T::null_wire(self)
    }
}

/// Blank names mean "no name"; anything else must parse
fn parse_name(name: &str, type_name: &str) -> Result<UdtName> {
    if name.trim().is_empty() {
        return Err(Error::MissingWireName {
            type_name: type_name.to_string(),
        });
    }
    UdtName::parse(name)
}
