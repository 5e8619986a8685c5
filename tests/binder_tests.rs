//! Tests for parameter binding and output capture

use oracle_udt::{
    udt_object, BindDirection, Binder, DbObject, Error, MarshalRegistry, OracleDbType, Param,
    ParamDirection, UdtName, WireValue,
};

#[derive(Debug, Default, Clone, PartialEq)]
struct Order {
    id: i64,
    total: f64,
    lines: Vec<OrderLine>,
}

#[derive(Debug, Default, Clone, PartialEq)]
struct OrderLine {
    sku: String,
    quantity: i32,
}

udt_object! { Order as "SALES.ORDER_OBJ", collection "SALES.ORDER_LIST" { id, total, lines } }
udt_object! { OrderLine as "SALES.ORDER_LINE_OBJ", collection "SALES.ORDER_LINE_LIST" { sku, quantity => "QTY" } }

#[derive(Debug, Default)]
struct Anonymous {
    id: i32,
}

udt_object! { Anonymous { id } }

fn order() -> Order {
    Order {
        id: 10,
        total: 99.5,
        lines: vec![
            OrderLine { sku: "A-1".to_string(), quantity: 2 },
            OrderLine { sku: "B-7".to_string(), quantity: 1 },
        ],
    }
}

mod bind_tests {
    use super::*;

    #[test]
    fn test_bind_keeps_order_and_direction() {
        let registry = MarshalRegistry::new();
        let params = [
            Param::input(1i32),
            Param::output::<i64>(),
            Param::input_output(String::from("x")),
        ];
        let args = Binder::new(&registry).bind(&params).unwrap();

        assert_eq!(args.len(), 3);
        assert_eq!(args[0].direction, BindDirection::Input);
        assert_eq!(args[0].value, Some(WireValue::from(1i32)));
        assert_eq!(args[1].direction, BindDirection::Output);
        assert_eq!(args[1].value, None);
        assert_eq!(args[2].direction, BindDirection::InputOutput);
        assert_eq!(args[2].db_type, OracleDbType::Clob);
    }

    #[test]
    fn test_object_parameter() {
        let registry = MarshalRegistry::new();
        let arg = Binder::new(&registry).bind_param(&Param::input(order())).unwrap();

        assert_eq!(arg.db_type, OracleDbType::Object);
        assert_eq!(arg.udt_type_name, Some(UdtName::parse("SALES.ORDER_OBJ").unwrap()));
        let obj = arg.value.as_ref().and_then(WireValue::as_object).unwrap();
        let lines = obj.get("LINES").and_then(WireValue::as_object).unwrap();
        assert_eq!(lines.type_name, "SALES.ORDER_LINE_LIST");
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_collection_parameter() {
        let registry = MarshalRegistry::new();
        let arg = Binder::new(&registry)
            .bind_param(&Param::input(vec![order(), Order::default()]))
            .unwrap();
        assert_eq!(arg.db_type, OracleDbType::Array);
        assert_eq!(arg.udt_type_name, Some(UdtName::parse("SALES.ORDER_LIST").unwrap()));
    }

    #[test]
    fn test_null_object_input_binds_null_instance() {
        let registry = MarshalRegistry::new();
        let param = Param::create::<Order>(ParamDirection::Input, None, None);
        let arg = Binder::new(&registry).bind_param(&param).unwrap();
        let obj = arg.value.as_ref().and_then(WireValue::as_object).unwrap();
        assert!(obj.is_null());
        assert_eq!(obj.type_name, "SALES.ORDER_OBJ");
    }

    #[test]
    fn test_dbobject_parameter_uses_its_own_name() {
        let registry = MarshalRegistry::new();
        let binder = Binder::new(&registry);

        let arg = binder
            .bind_param(&Param::input(DbObject::collection("hr.any_list")))
            .unwrap();
        assert_eq!(arg.db_type, OracleDbType::Array);
        assert_eq!(arg.udt_type_name, Some(UdtName::parse("HR.ANY_LIST").unwrap()));

        let err = binder.bind_param(&Param::output::<DbObject>()).unwrap_err();
        assert!(matches!(err, Error::InvalidParameterType { .. }));
    }

    #[test]
    fn test_unnamed_object_is_invalid() {
        let registry = MarshalRegistry::new();
        assert!(!registry.is_valid_parameter_type::<Anonymous>());
        let err = Binder::new(&registry)
            .bind_param(&Param::input(Anonymous::default()))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidParameterType { .. }));

        registry.register_type::<Anonymous>("APP.ANON_OBJ", &[]).unwrap();
        assert!(registry.is_valid_parameter_type::<Anonymous>());
    }
}

mod capture_tests {
    use super::*;

    #[test]
    fn test_out_parameter_captured() {
        let registry = MarshalRegistry::new();
        let binder = Binder::new(&registry);
        let mut params = [Param::input(7i32), Param::output::<i32>()];

        let mut args = binder.bind(&params).unwrap();
        args[0].value = Some(WireValue::from(1000i32));
        args[1].value = Some(WireValue::from(42i32));
        binder.capture(&mut params, args).unwrap();

        assert_eq!(params[1].value::<i32>(), Some(&42));
        assert_eq!(params[0].value::<i32>(), Some(&7));
    }

    #[test]
    fn test_in_out_object_captured() {
        let registry = MarshalRegistry::new();
        let binder = Binder::new(&registry);
        let mut params = [Param::input_output(order())];

        let mut args = binder.bind(&params).unwrap();
        let mut updated = order();
        updated.total = 120.0;
        updated.lines.pop();
        args[0].value = Some(registry.to_wire(&updated).unwrap());
        binder.capture(&mut params, args).unwrap();

        assert_eq!(params[0].take_value::<Order>(), Some(updated));
    }

    #[test]
    fn test_missing_output_reads_null() {
        let registry = MarshalRegistry::new();
        let binder = Binder::new(&registry);
        let mut params = [Param::output::<Option<i32>>(), Param::output::<Vec<OrderLine>>()];

        let args = binder.bind(&params).unwrap();
        binder.capture(&mut params, args).unwrap();

        assert_eq!(params[0].value::<Option<i32>>(), Some(&None));
        assert_eq!(params[1].value::<Vec<OrderLine>>(), Some(&Vec::new()));
    }

    #[test]
    fn test_conversion_failure_names_parameter() {
        let registry = MarshalRegistry::new();
        let binder = Binder::new(&registry);
        let mut params = [Param::output::<i32>()];

        let mut args = binder.bind(&params).unwrap();
        args[0].value = Some(WireValue::from("not a number"));
        let err = binder.capture(&mut params, args).unwrap_err();

        match &err {
            Error::ParameterConversionFailed { type_name, direction, .. } => {
                assert_eq!(type_name, "i32");
                assert_eq!(*direction, ParamDirection::Output);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(matches!(err.root_cause(), Error::UnsupportedConversion { .. }));
        assert!(!params[0].has_value());
    }
}
