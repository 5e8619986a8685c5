//! Tests for UDT registration
//!
//! These tests cover name validation, idempotent registration, duplicate
//! claims, cyclic type graphs, binding to existing UDTs and rollback of failed
//! registrations.

use std::sync::Arc;

use oracle_udt::{
    udt_object, ElementKind, Error, FieldKind, MarshalRegistry, ScalarKind, TypeKey, UdtName,
};

#[derive(Debug, Default, PartialEq)]
struct Client {
    id: i64,
    name: String,
    notes: String,
}

udt_object! { Client { id, name => "FULL_NAME", #[ignore] notes } }

#[derive(Debug, Default, PartialEq)]
struct ClientView {
    id: i64,
    name: String,
    score: f64,
}

udt_object! { ClientView { id, name => "FULL_NAME", score } }

#[derive(Debug, Default, PartialEq)]
struct Department {
    id: i32,
    name: String,
    manager: Option<Box<Employee>>,
}

#[derive(Debug, Default, PartialEq)]
struct Employee {
    id: i32,
    name: String,
    department: Option<Box<Department>>,
}

udt_object! { Department as "HR.DEPARTMENT_OBJ" { id, name, manager } }
udt_object! { Employee as "HR.EMPLOYEE_OBJ", collection "HR.EMPLOYEE_LIST" { id, name, department } }

#[derive(Debug, Default)]
struct Unnamed {
    id: i32,
}

udt_object! { Unnamed { id } }

#[derive(Debug, Default)]
struct Holder {
    id: i32,
    child: Option<Unnamed>,
}

udt_object! { Holder as "APP.HOLDER_OBJ" { id, child } }

#[derive(Debug, Default)]
struct Series {
    points: Vec<i32>,
}

udt_object! { Series as "APP.SERIES_OBJ" { points } }

#[derive(Debug, Default)]
struct Matrix {
    rows: Vec<Vec<i32>>,
}

udt_object! { Matrix as "APP.MATRIX_OBJ" { rows } }

mod name_format_tests {
    use super::*;

    #[test]
    fn test_rejected_names() {
        for name in ["HR", "HR.", ".OBJ", "", "HR.OBJ.X", "HR .OBJ"] {
            assert!(
                matches!(UdtName::parse(name), Err(Error::InvalidWireNameFormat { .. })),
                "{name:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_normalized_to_uppercase() {
        let name = UdtName::parse("hr.obj").unwrap();
        assert_eq!(name, "HR.OBJ");
        assert_eq!(name.schema(), "HR");
        assert_eq!(name.object_name(), "OBJ");
    }

    #[test]
    fn test_registration_validates_before_touching_registry() {
        let registry = MarshalRegistry::new();
        assert!(matches!(
            registry.register_type::<Client>("HR", &[]),
            Err(Error::InvalidWireNameFormat { .. })
        ));
        assert!(matches!(
            registry.register_type::<Client>("", &[]),
            Err(Error::MissingWireName { .. })
        ));
        assert!(registry.resolve::<Client>().is_none());
    }
}

mod register_tests {
    use super::*;

    #[test]
    fn test_register_type_maps_fields() {
        let registry = MarshalRegistry::new();
        let descriptor = registry.register_type::<Client>("hr.client_obj", &[]).unwrap();

        assert_eq!(descriptor.udt_name(), "HR.CLIENT_OBJ");
        assert_eq!(descriptor.domain(), TypeKey::of::<Client>());
        let props: Vec<_> = descriptor.fields().iter().map(|m| m.udt_property.as_str()).collect();
        assert_eq!(props, ["ID", "FULL_NAME"]);
        assert!(descriptor.mapping_for_field("notes").is_none());
        assert_eq!(
            descriptor.mapping_for("full_name").map(|m| m.field_name),
            Some("name")
        );
        assert_eq!(descriptor.fields()[0].kind, FieldKind::Scalar(ScalarKind::Int64));
    }

    #[test]
    fn test_overrides_win() {
        let registry = MarshalRegistry::new();
        let descriptor = registry
            .register_type::<Client>("HR.CLIENT_OBJ", &[("name", "client_name")])
            .unwrap();
        assert_eq!(
            descriptor.mapping_for_field("name").unwrap().udt_property,
            "CLIENT_NAME"
        );
    }

    #[test]
    fn test_blank_override_is_rejected() {
        let registry = MarshalRegistry::new();
        let err = registry
            .register_type::<Client>("HR.CLIENT_OBJ", &[("name", "  ")])
            .unwrap_err();
        assert!(matches!(err, Error::InvalidPropertyName { .. }));
        assert!(!registry.is_claimed("HR.CLIENT_OBJ"));
    }

    #[test]
    fn test_idempotent_registration() {
        let registry = MarshalRegistry::new();
        let first = registry.register_type::<Client>("HR.CLIENT_OBJ", &[]).unwrap();
        let second = registry.register_type::<Client>("HR.CLIENT_OBJ", &[]).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_duplicate_name_for_other_type() {
        let registry = MarshalRegistry::new();
        registry.register_type::<Client>("HR.CLIENT_OBJ", &[]).unwrap();
        let err = registry
            .register_type::<ClientView>("hr.client_obj", &[])
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateWireName { .. }));
        assert!(err.is_registration_error());
        assert!(registry.resolve::<ClientView>().is_none());
    }

    #[test]
    fn test_missing_name() {
        let registry = MarshalRegistry::new();
        let err = registry.register_annotated::<Unnamed>().unwrap_err();
        assert!(matches!(err, Error::MissingWireName { .. }));
    }

    #[test]
    fn test_scalar_collection_without_name() {
        let registry = MarshalRegistry::new();
        let err = registry.register_annotated::<Series>().unwrap_err();
        assert!(matches!(err, Error::CollectionUdtMissing { .. }));
        assert!(!registry.is_claimed("APP.SERIES_OBJ"));

        registry.register_collection_type::<i32>("APP.INT_LIST").unwrap();
        let descriptor = registry.register_annotated::<Series>().unwrap();
        assert_eq!(
            descriptor.fields()[0].kind,
            FieldKind::Collection {
                element: TypeKey::of::<i32>(),
                udt_collection_name: UdtName::parse("APP.INT_LIST").unwrap(),
            }
        );
    }

    #[test]
    fn test_nested_collection_field_is_unsupported() {
        let registry = MarshalRegistry::new();
        let err = registry.register_annotated::<Matrix>().unwrap_err();
        assert!(matches!(err, Error::UnsupportedFieldType { .. }));
        assert!(!registry.is_claimed("APP.MATRIX_OBJ"));
    }

    #[test]
    fn test_failed_nested_registration_rolls_back() {
        let registry = MarshalRegistry::new();
        let err = registry.register_annotated::<Holder>().unwrap_err();
        assert!(matches!(err, Error::MissingWireName { .. }));
        assert!(!registry.is_claimed("APP.HOLDER_OBJ"));
        assert!(registry.resolve::<Holder>().is_none());

        registry.register_type::<Unnamed>("APP.UNNAMED_OBJ", &[]).unwrap();
        let descriptor = registry.register_annotated::<Holder>().unwrap();
        assert_eq!(
            descriptor.mapping_for("CHILD").unwrap().kind,
            FieldKind::Object {
                domain: TypeKey::of::<Unnamed>(),
                udt_name: UdtName::parse("APP.UNNAMED_OBJ").unwrap(),
            }
        );
    }

    #[test]
    fn test_type_and_collection() {
        let registry = MarshalRegistry::new();
        let (object, collection) = registry
            .register_type_and_collection::<Client>("hr.client_obj", "hr.client_list", &[])
            .unwrap();
        assert_eq!(object.udt_name(), "HR.CLIENT_OBJ");
        assert_eq!(collection.udt_collection_name(), "HR.CLIENT_LIST");
        assert_eq!(
            collection.element_kind(),
            &ElementKind::Object {
                domain: TypeKey::of::<Client>(),
                udt_name: UdtName::parse("HR.CLIENT_OBJ").unwrap(),
            }
        );
        assert!(registry.is_valid_parameter_type::<Vec<Client>>());
    }

    #[test]
    fn test_type_and_collection_all_or_nothing() {
        let registry = MarshalRegistry::new();
        registry.claim("HR.CLIENT_LIST").unwrap();
        let err = registry
            .register_type_and_collection::<Client>("HR.CLIENT_OBJ", "HR.CLIENT_LIST", &[])
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateWireName { .. }));
        assert!(registry.resolve::<Client>().is_none());
        assert!(!registry.is_claimed("HR.CLIENT_OBJ"));
    }
}

mod cycle_tests {
    use super::*;

    #[test]
    fn test_cycle_synthesizes_each_type_once() {
        let registry = MarshalRegistry::new();
        let department = registry.register_annotated::<Department>().unwrap();

        assert_eq!(department.udt_name(), "HR.DEPARTMENT_OBJ");
        let employee = registry.resolve::<Employee>().expect("employee registered");
        assert_eq!(employee.udt_name(), "HR.EMPLOYEE_OBJ");
        assert_eq!(
            employee.mapping_for("DEPARTMENT").unwrap().kind,
            FieldKind::Object {
                domain: TypeKey::of::<Department>(),
                udt_name: UdtName::parse("HR.DEPARTMENT_OBJ").unwrap(),
            }
        );

        let again = registry.register_annotated::<Employee>().unwrap();
        assert!(Arc::ptr_eq(&employee, &again));
        assert!(registry.is_claimed("HR.EMPLOYEE_LIST"));
    }

    #[test]
    fn test_cycle_resolved_lazily() {
        let registry = MarshalRegistry::new();
        assert!(registry.is_valid_parameter_type::<Employee>());
        let wire = registry.to_wire(&Employee::default()).unwrap();
        assert_eq!(wire.as_object().unwrap().type_name, "HR.EMPLOYEE_OBJ");
        assert!(registry.resolve::<Department>().is_some());
    }
}

mod bind_existing_tests {
    use super::*;

    #[test]
    fn test_bind_existing_type() {
        let registry = MarshalRegistry::new();
        registry.register_type::<Client>("HR.CLIENT_OBJ", &[]).unwrap();

        let view = registry.bind_existing_type::<ClientView>("hr.client_obj", &[]).unwrap();
        assert_eq!(view.udt_name(), "HR.CLIENT_OBJ");
        // SCORE has no attribute in HR.CLIENT_OBJ
        let fields: Vec<_> = view.fields().iter().map(|m| m.field_name).collect();
        assert_eq!(fields, ["id", "name"]);
    }

    #[test]
    fn test_bind_unknown_name() {
        let registry = MarshalRegistry::new();
        let err = registry
            .bind_existing_type::<ClientView>("HR.CLIENT_OBJ", &[])
            .unwrap_err();
        assert!(matches!(err, Error::UnknownWireName { .. }));
    }

    #[test]
    fn test_bind_claimed_name_without_type() {
        let registry = MarshalRegistry::new();
        assert!(registry.claim("HR.RESERVED_OBJ").unwrap());
        let err = registry
            .bind_existing_type::<ClientView>("HR.RESERVED_OBJ", &[])
            .unwrap_err();
        match &err {
            Error::UnboundWireName { name, expected, .. } => {
                assert_eq!(name, "HR.RESERVED_OBJ");
                assert_eq!(*expected, "object");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().contains("claimed"), "{err}");
        assert!(err.is_registration_error());

        // A collection name does not own an object type
        registry.register_collection_type::<i32>("HR.NUMBER_LIST").unwrap();
        let err = registry
            .bind_existing_type::<ClientView>("HR.NUMBER_LIST", &[])
            .unwrap_err();
        assert!(matches!(err, Error::UnboundWireName { expected: "object", .. }));

        let err = registry
            .bind_existing_collection_type::<i64>("HR.RESERVED_OBJ")
            .unwrap_err();
        assert!(matches!(err, Error::UnboundWireName { expected: "collection", .. }));
        assert!(registry.resolve::<ClientView>().is_none());
    }

    #[test]
    fn test_register_or_bind() {
        let registry = MarshalRegistry::new();
        let client = registry.register_or_bind_type::<Client>("HR.CLIENT_OBJ", &[]).unwrap();
        let view = registry
            .register_or_bind_type::<ClientView>("HR.CLIENT_OBJ", &[])
            .unwrap();
        assert_eq!(client.udt_name(), view.udt_name());
    }

    #[test]
    fn test_bind_existing_collection_type() {
        let registry = MarshalRegistry::new();
        registry.register_collection_type::<i32>("HR.NUMBER_LIST").unwrap();
        let bound = registry
            .bind_existing_collection_type::<i64>("HR.NUMBER_LIST")
            .unwrap();
        assert_eq!(bound.udt_collection_name(), "HR.NUMBER_LIST");
        assert!(registry.is_valid_parameter_type::<Vec<i64>>());

        let err = registry
            .bind_existing_collection_type::<f64>("HR.FLOAT_LIST")
            .unwrap_err();
        assert!(matches!(err, Error::UnknownWireName { .. }));
    }
}

mod concurrency_tests {
    use super::*;

    #[test]
    fn test_racing_claims_yield_one_duplicate() {
        let registry = Arc::new(MarshalRegistry::new());

        let (a, b) = std::thread::scope(|s| {
            let a = s.spawn(|| registry.register_type::<Client>("HR.SHARED_OBJ", &[]));
            let b = s.spawn(|| registry.register_type::<ClientView>("HR.SHARED_OBJ", &[]));
            (a.join().unwrap(), b.join().unwrap())
        });

        let failures = [&a, &b]
            .iter()
            .filter(|r| matches!(r, Err(Error::DuplicateWireName { .. })))
            .count();
        assert_eq!(failures, 1);
        assert_eq!(a.is_ok() as usize + b.is_ok() as usize, 1);
    }

    #[test]
    fn test_lazy_synthesis_from_many_threads() {
        let registry = Arc::new(MarshalRegistry::new());
        std::thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| {
                    registry.to_wire(&vec![Employee::default()]).unwrap();
                });
            }
        });
        assert!(registry.resolve::<Employee>().is_some());
        assert!(registry.resolve_collection::<Employee>().is_some());
    }
}
