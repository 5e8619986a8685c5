//! Procedure and function execution
//!
//! [`OracleService`] binds parameters, hands the resulting
//! [`WireArgument`]s to a [`CommandExecutor`] and captures the outputs. The
//! executor is whatever actually talks to the database; this crate only
//! prepares and reads back the arguments.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use oracle_udt::{MarshalRegistry, OracleService, Param};
//!
//! let service = OracleService::new(executor, Arc::new(MarshalRegistry::new()));
//!
//! let mut params = [Param::input(7i64), Param::output::<String>()];
//! service.execute_procedure("hr.pkg_client.get_name", &mut params).await?;
//! let name: Option<String> = params[1].take_value();
//!
//! let count: i64 = service.execute_function("hr.pkg_client.count", &mut []).await?;
//! ```

use std::future::Future;
use std::sync::Arc;

use tracing::debug;

use crate::binder::{Binder, WireArgument};
use crate::error::{Error, Result};
use crate::marshal::Marshal;
use crate::param::Param;
use crate::registry::MarshalRegistry;

/// Executes a stored procedure call with bound arguments
///
/// On return every output argument's `value` holds what the database wrote.
/// For function calls the first argument is the return value.
pub trait CommandExecutor: Send + Sync {
    /// Error raised by the executor
    type Error: std::error::Error + Send + Sync + 'static;

    /// Run `command` as a stored procedure
    fn execute(
        &self,
        command: &str,
        arguments: &mut [WireArgument],
    ) -> impl Future<Output = std::result::Result<(), Self::Error>> + Send;
}

/// Runs PL/SQL procedures and functions with marshaled parameters
#[derive(Debug)]
pub struct OracleService<E> {
    executor: E,
    registry: Arc<MarshalRegistry>,
}

impl<E: CommandExecutor> OracleService<E> {
    /// Create a service over an executor and a shared registry
    pub fn new(executor: E, registry: Arc<MarshalRegistry>) -> Self {
        Self { executor, registry }
    }

    /// The registry parameters are marshaled against
    pub fn registry(&self) -> &Arc<MarshalRegistry> {
        &self.registry
    }

    /// The underlying executor
    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Execute a stored procedure
    ///
    /// OUT and IN OUT results are written back into `params`.
    pub async fn execute_procedure(&self, name: &str, params: &mut [Param]) -> Result<()> {
        let command = command_text(name)?;
        debug!(procedure = %command, params = params.len(), "executing procedure");
        let binder = Binder::new(&self.registry);
        let mut arguments = binder.bind(params)?;

        self.run(&command, &mut arguments).await?;

        binder.capture(params, arguments)
    }

    /// Execute a stored function and return its result
    ///
    /// OUT and IN OUT results are written back into `params`.
    pub async fn execute_function<T: Marshal>(
        &self,
        name: &str,
        params: &mut [Param],
    ) -> Result<T> {
        let command = command_text(name)?;
        debug!(function = %command, params = params.len(), "executing function");
        let binder = Binder::new(&self.registry);
        let mut arguments = Vec::with_capacity(params.len() + 1);
        arguments.push(binder.return_argument::<T>()?);
        arguments.extend(binder.bind(params)?);

        self.run(&command, &mut arguments).await?;

        let mut arguments = arguments.into_iter();
        let returned = arguments
            .next()
            .ok_or_else(|| Error::Internal("return argument missing after call".to_string()))?;
        binder.capture(params, arguments.collect())?;
        binder.capture_return(returned, &command)
    }

    async fn run(&self, command: &str, arguments: &mut [WireArgument]) -> Result<()> {
        tracing::trace!(command, arguments = arguments.len(), "calling executor");
        self.executor
            .execute(command, arguments)
            .await
            .map_err(|e| Error::ExecutionFailed {
                command: command.to_string(),
                source: Box::new(e),
            })
    }
}

/// Normalize a command name, rejecting blank ones
fn command_text(name: &str) -> Result<String> {
    if name.trim().is_empty() {
        return Err(Error::MissingCommandText);
    }
    Ok(name.replace("\r\n", "\n"))
}
