//! Tests for procedure and function execution
//!
//! A mock executor records each call and fills in output arguments the way a
//! database driver would.

use std::future::Future;
use std::sync::Arc;

use parking_lot::Mutex;

use oracle_udt::{
    udt_object, BindDirection, CommandExecutor, Error, MarshalRegistry, OracleDbType,
    OracleService, Param, WireArgument, WireValue,
};

#[derive(Debug, thiserror::Error)]
#[error("ORA-{0:05}: mock failure")]
struct MockError(u32);

type Responder = fn(&str, &mut [WireArgument]) -> Result<(), MockError>;

struct MockExecutor {
    calls: Mutex<Vec<(String, Vec<WireArgument>)>>,
    respond: Responder,
}

impl MockExecutor {
    fn new(respond: Responder) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            respond,
        }
    }

    fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

impl CommandExecutor for MockExecutor {
    type Error = MockError;

    fn execute(
        &self,
        command: &str,
        arguments: &mut [WireArgument],
    ) -> impl Future<Output = Result<(), Self::Error>> + Send {
        self.calls.lock().push((command.to_string(), arguments.to_vec()));
        std::future::ready((self.respond)(command, arguments))
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
struct Account {
    id: i64,
    owner: String,
    balance: f64,
}

udt_object! { Account as "BANK.ACCOUNT_OBJ", collection "BANK.ACCOUNT_LIST" { id, owner, balance } }

fn service(respond: Responder) -> OracleService<MockExecutor> {
    OracleService::new(MockExecutor::new(respond), Arc::new(MarshalRegistry::new()))
}

mod procedure_tests {
    use super::*;

    #[tokio::test]
    async fn test_out_parameter_filled() {
        let service = service(|_, args| {
            args[1].value = Some(WireValue::from(42i32));
            Ok(())
        });
        let mut params = [Param::input(5i32), Param::output::<i32>()];

        service.execute_procedure("BANK.PKG.COUNT", &mut params).await.unwrap();

        assert_eq!(params[0].value::<i32>(), Some(&5));
        assert_eq!(params[1].value::<i32>(), Some(&42));
        assert_eq!(service.executor().call_count(), 1);
    }

    #[tokio::test]
    async fn test_command_text_normalized() {
        let service = service(|_, _| Ok(()));
        service
            .execute_procedure("BEGIN\r\n  BANK.PKG.RUN;\r\nEND;", &mut [])
            .await
            .unwrap();

        let calls = service.executor().calls.lock();
        assert_eq!(calls[0].0, "BEGIN\n  BANK.PKG.RUN;\nEND;");
    }

    #[tokio::test]
    async fn test_collection_in_out() {
        let service = service(|_, args| {
            match &args[0].value {
                Some(WireValue::Collection(list)) => {
                    assert_eq!(list.type_name, "BANK.ACCOUNT_LIST");
                    assert_eq!(list.len(), 2);
                }
                other => panic!("expected a collection, got {other:?}"),
            }
            let merged = vec![Account {
                id: 9,
                owner: "bank".to_string(),
                balance: 0.0,
            }];
            let wire = MarshalRegistry::new().to_wire(&merged).map_err(|_| MockError(1))?;
            args[0].value = Some(wire);
            Ok(())
        });

        let accounts = vec![
            Account { id: 1, owner: "ann".to_string(), balance: 10.0 },
            Account { id: 2, owner: "bob".to_string(), balance: 20.0 },
        ];
        let mut params = [Param::input_output(accounts)];
        service.execute_procedure("BANK.PKG.MERGE", &mut params).await.unwrap();

        let merged = params[0].take_value::<Vec<Account>>().unwrap();
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].id, 9);

        let calls = service.executor().calls.lock();
        let bound = &calls[0].1[0];
        assert_eq!(bound.direction, BindDirection::InputOutput);
        assert_eq!(bound.db_type, OracleDbType::Array);
    }

    #[tokio::test]
    async fn test_blank_command_rejected() {
        let service = service(|_, _| Ok(()));
        let err = service.execute_procedure("  ", &mut []).await.unwrap_err();
        assert!(matches!(err, Error::MissingCommandText));
        assert_eq!(service.executor().call_count(), 0);
    }

    #[tokio::test]
    async fn test_executor_failure_wrapped() {
        let service = service(|_, _| Err(MockError(6550)));
        let err = service
            .execute_procedure("BANK.PKG.FAIL", &mut [Param::input(1i32)])
            .await
            .unwrap_err();

        match &err {
            Error::ExecutionFailed { command, source } => {
                assert_eq!(command, "BANK.PKG.FAIL");
                assert_eq!(source.to_string(), "ORA-06550: mock failure");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_invalid_parameter_never_executes() {
        let service = service(|_, _| Ok(()));
        let mut params = [Param::input(vec![1.5f64])];
        let err = service
            .execute_procedure("BANK.PKG.RUN", &mut params)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidParameterType { .. }));
        assert_eq!(service.executor().call_count(), 0);
    }
}

mod function_tests {
    use super::*;

    #[tokio::test]
    async fn test_return_value_comes_first() {
        let service = service(|_, args| {
            assert_eq!(args[0].direction, BindDirection::ReturnValue);
            assert_eq!(args.len(), 2);
            args[0].value = Some(WireValue::from(1234i64));
            Ok(())
        });
        let mut params = [Param::input(String::from("ann"))];

        let total: i64 = service
            .execute_function("BANK.PKG.TOTAL_FOR", &mut params)
            .await
            .unwrap();
        assert_eq!(total, 1234);
    }

    #[tokio::test]
    async fn test_object_return_value() {
        let service = service(|_, args| {
            let registry = MarshalRegistry::new();
            let account = Account { id: 3, owner: "cy".to_string(), balance: 7.25 };
            args[0].value = Some(registry.to_wire(&account).map_err(|_| MockError(1))?);
            args[1].value = Some(WireValue::from(1i32));
            Ok(())
        });
        let mut params = [Param::output::<i32>()];

        let account: Option<Account> = service
            .execute_function("BANK.PKG.FIND", &mut params)
            .await
            .unwrap();

        assert_eq!(account.map(|a| a.owner), Some("cy".to_string()));
        assert_eq!(params[0].value::<i32>(), Some(&1));
    }

    #[tokio::test]
    async fn test_return_conversion_failure() {
        let service = service(|_, args| {
            args[0].value = Some(WireValue::from("oops"));
            Ok(())
        });
        let err = service
            .execute_function::<i64>("BANK.PKG.TOTAL", &mut [])
            .await
            .unwrap_err();
        match &err {
            Error::ReturnConversionFailed { function, .. } => assert_eq!(function, "BANK.PKG.TOTAL"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
