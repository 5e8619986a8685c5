//! Wire type synthesis
//!
//! Derives descriptors from a type's field table, recursing into nested
//! objects and collections. Runs with the registry's write lock held, so the
//! claimed-name set, the in-progress markers and the published descriptors
//! change together. Every change is journaled; a failed synthesis undoes the
//! whole journal, leaving no claim or descriptor behind.

use std::any::TypeId;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::{debug, trace, warn};

use crate::descriptor::{
    ElementKind, FieldKind, FieldMapping, UdtCollectionDescriptor, UdtDescriptor,
};
use crate::error::{Error, Result};
use crate::udt::{FieldInfo, ObjectInfo, Shape, TypeKey};
use crate::udt_name::UdtName;

/// Everything the registry guards with its lock
#[derive(Debug, Default)]
pub(crate) struct RegistryState {
    pub(crate) objects: HashMap<TypeId, Arc<UdtDescriptor>>,
    pub(crate) collections: HashMap<TypeId, Arc<UdtCollectionDescriptor>>,
    pub(crate) claimed: HashSet<UdtName>,
    pending_objects: HashMap<TypeId, UdtName>,
    pending_collections: HashMap<TypeId, UdtName>,
}

impl RegistryState {
    /// Claim a name; false if already taken
    pub(crate) fn claim(&mut self, name: &UdtName) -> bool {
        self.claimed.insert(name.clone())
    }

    /// Object descriptor registered under a UDT name
    pub(crate) fn object_named(&self, name: &UdtName) -> Option<&Arc<UdtDescriptor>> {
        self.objects.values().find(|d| d.udt_name == *name)
    }

    /// Collection descriptor registered under a UDT name
    pub(crate) fn collection_named(&self, name: &UdtName) -> Option<&Arc<UdtCollectionDescriptor>> {
        self.collections
            .values()
            .find(|d| d.udt_collection_name == *name)
    }

    fn begin_synthesis(&mut self, id: TypeId, name: UdtName) {
        self.pending_objects.insert(id, name);
    }

    fn end_synthesis(&mut self, id: TypeId) {
        self.pending_objects.remove(&id);
    }

    fn begin_collection_synthesis(&mut self, id: TypeId, name: UdtName) {
        self.pending_collections.insert(id, name);
    }

    fn end_collection_synthesis(&mut self, id: TypeId) {
        self.pending_collections.remove(&id);
    }
}

#[derive(Debug)]
enum Change {
    Claimed(UdtName),
    Pending(TypeId),
    PendingCollection(TypeId),
    Object(TypeId),
    Collection(TypeId),
}

/// One registration transaction
pub(crate) struct Synthesizer<'s> {
    state: &'s mut RegistryState,
    journal: Vec<Change>,
}

impl<'s> Synthesizer<'s> {
    pub(crate) fn new(state: &'s mut RegistryState) -> Self {
        Self {
            state,
            journal: Vec::new(),
        }
    }

    /// Keep the changes on success, undo them on failure
    pub(crate) fn settle<T>(mut self, result: Result<T>) -> Result<T> {
        if result.is_err() {
            self.rollback();
        }
        result
    }

    fn rollback(&mut self) {
        if !self.journal.is_empty() {
            debug!(changes = self.journal.len(), "rolling back failed registration");
        }
        while let Some(change) = self.journal.pop() {
            match change {
                Change::Claimed(name) => {
                    self.state.claimed.remove(&name);
                }
                Change::Pending(id) => self.state.end_synthesis(id),
                Change::PendingCollection(id) => self.state.end_collection_synthesis(id),
                Change::Object(id) => {
                    self.state.objects.remove(&id);
                }
                Change::Collection(id) => {
                    self.state.collections.remove(&id);
                }
            }
        }
    }

    fn claim(&mut self, name: &UdtName, domain: TypeKey) -> Result<()> {
        if !self.state.claim(name) {
            return Err(Error::DuplicateWireName {
                name: name.to_string(),
                type_name: domain.short_name().to_string(),
            });
        }
        self.journal.push(Change::Claimed(name.clone()));
        Ok(())
    }

    /// Check if an object type is already registered under `name`
    pub(crate) fn is_object_name(&self, name: &UdtName) -> bool {
        self.state.object_named(name).is_some()
    }

    // =========================================================================
    // Objects
    // =========================================================================

    /// Synthesize the descriptor for an object type
    ///
    /// Returns the UDT name the type maps to. While the type is being built
    /// that is its pending name, which is how cycles terminate.
    pub(crate) fn object(
        &mut self,
        info: &ObjectInfo,
        name: Option<UdtName>,
        overrides: &[(&str, &str)],
    ) -> Result<UdtName> {
        let id = info.key.id();
        if let Some(existing) = self.state.objects.get(&id) {
            return Ok(existing.udt_name.clone());
        }
        if let Some(pending) = self.state.pending_objects.get(&id) {
            trace!(domain = %info.key, udt = %pending, "type in progress, using pending name");
            return Ok(pending.clone());
        }

        let name = match name {
            Some(name) => name,
            None => annotated_name(info.udt_name, info.key)?,
        };
        self.claim(&name, info.key)?;
        self.state.begin_synthesis(id, name.clone());
        self.journal.push(Change::Pending(id));

        debug!(domain = %info.key, udt = %name, "synthesizing object descriptor");

        let layout = (info.layout)();
        for (field, _) in overrides {
            if !layout.fields.iter().any(|f| f.name == *field) {
                warn!(domain = %info.key, field = %field, "UDT attribute override names an unknown field");
            }
        }

        let mut fields = Vec::with_capacity(layout.fields.len());
        for (index, field) in layout.fields.iter().enumerate() {
            if field.ignore {
                trace!(domain = %info.key, field = field.name, "field ignored");
                continue;
            }
            if layout.fields[index + 1..].iter().any(|f| f.name == field.name) {
                trace!(domain = %info.key, field = field.name, "field shadowed by a later declaration");
                continue;
            }

            let udt_property = property_name(info.key, field, overrides)?;
            let kind = self.field_kind(info.key, field)?;
            trace!(domain = %info.key, field = field.name, udt_property = %udt_property, "field mapped");
            fields.push(FieldMapping {
                field_name: field.name,
                udt_property,
                kind,
                index,
            });
        }

        let descriptor = UdtDescriptor {
            domain: info.key,
            udt_name: name.clone(),
            fields,
            accessors: layout.accessors,
        };
        self.state.objects.insert(id, Arc::new(descriptor));
        self.journal.push(Change::Object(id));
        self.state.end_synthesis(id);

        Ok(name)
    }

    /// Map an object type onto a UDT name another type already owns
    ///
    /// Fields are matched by attribute name against the existing descriptor;
    /// fields the UDT doesn't have are left out.
    pub(crate) fn bind_object(
        &mut self,
        info: &ObjectInfo,
        name: &UdtName,
        overrides: &[(&str, &str)],
    ) -> Result<UdtName> {
        let id = info.key.id();
        if let Some(existing) = self.state.objects.get(&id) {
            return Ok(existing.udt_name.clone());
        }

        let existing = self
            .state
            .object_named(name)
            .cloned()
            .ok_or_else(|| self.unbound(name, "object", info.key))?;

        debug!(domain = %info.key, udt = %name, owner = %existing.domain, "binding to existing object type");

        self.state.begin_synthesis(id, name.clone());
        self.journal.push(Change::Pending(id));

        let layout = (info.layout)();
        let mut fields = Vec::new();
        for (index, field) in layout.fields.iter().enumerate() {
            if field.ignore || layout.fields[index + 1..].iter().any(|f| f.name == field.name) {
                continue;
            }
            let udt_property = property_name(info.key, field, overrides)?;
            if existing.mapping_for(&udt_property).is_none() {
                warn!(domain = %info.key, field = field.name, udt = %name, "field has no attribute in the bound UDT");
                continue;
            }
            let kind = self.field_kind(info.key, field)?;
            fields.push(FieldMapping {
                field_name: field.name,
                udt_property,
                kind,
                index,
            });
        }

        let descriptor = UdtDescriptor {
            domain: info.key,
            udt_name: name.clone(),
            fields,
            accessors: layout.accessors,
        };
        self.state.objects.insert(id, Arc::new(descriptor));
        self.journal.push(Change::Object(id));
        self.state.end_synthesis(id);

        Ok(name.clone())
    }

    /// Error for binding to `name` when no descriptor of the wanted kind owns it
    fn unbound(&self, name: &UdtName, expected: &'static str, domain: TypeKey) -> Error {
        if self.state.claimed.contains(name) {
            Error::UnboundWireName {
                name: name.to_string(),
                expected,
                type_name: domain.short_name().to_string(),
            }
        } else {
            Error::UnknownWireName {
                name: name.to_string(),
                type_name: domain.short_name().to_string(),
            }
        }
    }

    fn field_kind(&mut self, owner: TypeKey, field: &FieldInfo) -> Result<FieldKind> {
        match &field.shape {
            Shape::Scalar { kind, .. } => Ok(FieldKind::Scalar(*kind)),
            Shape::Object(info) => {
                let udt_name = self.object(info, None, &[])?;
                Ok(FieldKind::Object {
                    domain: info.key,
                    udt_name,
                })
            }
            Shape::Collection { element, .. } if element.is_element() => {
                let udt_collection_name = self.collection(element, None, owner)?;
                Ok(FieldKind::Collection {
                    element: element.key(),
                    udt_collection_name,
                })
            }
            Shape::Collection { key, .. } | Shape::Wire(key) => Err(Error::UnsupportedFieldType {
                type_name: owner.short_name().to_string(),
                field: field.name.to_string(),
                field_type: key.name().to_string(),
            }),
        }
    }

    // =========================================================================
    // Collections
    // =========================================================================

    /// Synthesize the descriptor for a collection of `element`
    ///
    /// Without an explicit name the element's collection annotation is used;
    /// `owner` names the type that asked for it in errors.
    pub(crate) fn collection(
        &mut self,
        element: &Shape,
        name: Option<UdtName>,
        owner: TypeKey,
    ) -> Result<UdtName> {
        let key = element.key();
        let id = key.id();
        if let Some(existing) = self.state.collections.get(&id) {
            return Ok(existing.udt_collection_name.clone());
        }
        if let Some(pending) = self.state.pending_collections.get(&id) {
            return Ok(pending.clone());
        }

        let name = match name {
            Some(name) => name,
            None => match element {
                Shape::Object(info) if info.udt_collection_name.is_some() => {
                    annotated_name(info.udt_collection_name, info.key)?
                }
                _ => {
                    return Err(Error::CollectionUdtMissing {
                        owner: owner.short_name().to_string(),
                        element: key.short_name().to_string(),
                    })
                }
            },
        };
        self.claim(&name, key)?;
        self.state.begin_collection_synthesis(id, name.clone());
        self.journal.push(Change::PendingCollection(id));

        debug!(element = %key, udt = %name, "synthesizing collection descriptor");

        let element_kind = self.element_kind(element, owner)?;
        let descriptor = UdtCollectionDescriptor {
            element: key,
            element_kind,
            udt_collection_name: name.clone(),
        };
        self.state.collections.insert(id, Arc::new(descriptor));
        self.journal.push(Change::Collection(id));
        self.state.end_collection_synthesis(id);

        Ok(name)
    }

    /// Map a collection of `element` onto a collection UDT another element
    /// type already owns
    pub(crate) fn bind_collection(&mut self, element: &Shape, name: &UdtName) -> Result<UdtName> {
        let key = element.key();
        if let Some(existing) = self.state.collections.get(&key.id()) {
            return Ok(existing.udt_collection_name.clone());
        }
        if self.state.collection_named(name).is_none() {
            return Err(self.unbound(name, "collection", key));
        }

        debug!(element = %key, udt = %name, "binding to existing collection type");

        let element_kind = self.element_kind(element, key)?;
        let descriptor = UdtCollectionDescriptor {
            element: key,
            element_kind,
            udt_collection_name: name.clone(),
        };
        self.state.collections.insert(key.id(), Arc::new(descriptor));
        self.journal.push(Change::Collection(key.id()));

        Ok(name.clone())
    }

    fn element_kind(&mut self, element: &Shape, owner: TypeKey) -> Result<ElementKind> {
        match element {
            Shape::Scalar { kind, .. } => Ok(ElementKind::Scalar(*kind)),
            Shape::Object(info) => {
                let udt_name = self.object(info, None, &[])?;
                Ok(ElementKind::Object {
                    domain: info.key,
                    udt_name,
                })
            }
            Shape::Collection { key, .. } | Shape::Wire(key) => Err(Error::UnsupportedFieldType {
                type_name: owner.short_name().to_string(),
                field: "element".to_string(),
                field_type: key.name().to_string(),
            }),
        }
    }
}

fn annotated_name(annotation: Option<&'static str>, domain: TypeKey) -> Result<UdtName> {
    match annotation {
        Some(name) if !name.trim().is_empty() => UdtName::parse(name),
        _ => Err(Error::MissingWireName {
            type_name: domain.short_name().to_string(),
        }),
    }
}

/// Attribute name for a field: override, else annotation, else the
/// uppercased field name
fn property_name(domain: TypeKey, field: &FieldInfo, overrides: &[(&str, &str)]) -> Result<String> {
    if let Some((_, property)) = overrides.iter().rev().find(|(name, _)| *name == field.name) {
        let property = property.trim();
        if property.is_empty() {
            return Err(Error::InvalidPropertyName {
                type_name: domain.short_name().to_string(),
                field: field.name.to_string(),
            });
        }
        return Ok(property.to_uppercase());
    }
    match field.udt_property {
        Some(property) if !property.trim().is_empty() => Ok(property.trim().to_uppercase()),
        Some(_) => Err(Error::InvalidPropertyName {
            type_name: domain.short_name().to_string(),
            field: field.name.to_string(),
        }),
        None => Ok(field.name.to_uppercase()),
    }
}
