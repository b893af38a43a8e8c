//! # Instance Handle
//!
//! Provides a thread-safe handle to a running Wasm instance. Encapsulates the
//! Store and Instance in a mutex to allow async operations from multiple tasks.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::trace;
use wasmtime::Store;
use wasmtime::component::Component;
use wasmtime::component::Instance;
use wasmtime::component::Val;

use crate::context::CalcrunCtx;

#[derive(Debug)]
pub enum Error {
    ExportNotFound(String),
    Execution(wasmtime::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ExportNotFound(name) => write!(f, "Export not found: {}", name),
            Self::Execution(e) => write!(f, "Execution error: {}", e),
        }
    }
}

impl std::error::Error for Error {}

impl From<wasmtime::Error> for Error {
    fn from(e: wasmtime::Error) -> Self {
        Self::Execution(e)
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Thread-safe handle to a Wasm instance.
///
/// Wasmtime's Store is !Send + !Sync, so we wrap it in Arc<Mutex<...>> to
/// enable async access from multiple tasks. This allows one instance to call
/// into another instance without data races. Linking an instance to itself
/// would deadlock on the mutex; each link must target a different instance.
///
/// The component is kept outside the mutex: its export metadata is immutable
/// and must be reachable while the store is locked elsewhere.
#[derive(Clone)]
pub struct InstanceHandle {
    pub(crate) inner: Arc<Mutex<State>>,
    component: Component,
}

impl std::fmt::Debug for InstanceHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InstanceHandle").finish_non_exhaustive()
    }
}

pub(crate) struct State {
    pub store: Store<CalcrunCtx>,
    pub instance: Instance,
}

impl InstanceHandle {
    /// Creates a new instance handle wrapping the store and instance.
    pub(crate) fn new(store: Store<CalcrunCtx>, instance: Instance, component: Component) -> Self {
        Self {
            inner: Arc::new(Mutex::new(State { store, instance })),
            component,
        }
    }

    /// Returns the component this instance was instantiated from.
    pub fn component(&self) -> &Component {
        &self.component
    }

    /// Calls an exported function from an interface dynamically using Vals.
    ///
    /// When a component exports an interface (e.g., `calc:demo/add`), the
    /// functions within that interface must be accessed via the component's
    /// export indices. This method uses dynamic Val types to support any
    /// function signature without compile-time type constraints.
    ///
    /// `results` must have exactly as many slots as the function returns;
    /// the placeholder values are overwritten.
    ///
    /// # Example
    /// ```ignore
    /// let mut results = vec![Val::U32(0)];
    /// handle.call_interface_func(
    ///     "calc:demo/add",
    ///     "add",
    ///     &[Val::U32(2), Val::U32(2)],
    ///     &mut results,
    /// ).await?;
    /// ```
    pub async fn call_interface_func(
        &self,
        interface: &str,
        function: &str,
        args: &[Val],
        results: &mut [Val],
    ) -> Result<()> {
        let inst_idx = self
            .component
            .get_export_index(None, interface)
            .ok_or_else(|| Error::ExportNotFound(interface.to_string()))?;

        let func_idx = self
            .component
            .get_export_index(Some(&inst_idx), function)
            .ok_or_else(|| Error::ExportNotFound(format!("{}#{}", interface, function)))?;

        trace!("calling {}#{}", interface, function);

        let mut guard = self.inner.lock().await;
        let State { store, instance } = &mut *guard;

        let func = instance
            .get_func(&mut *store, func_idx)
            .ok_or_else(|| Error::ExportNotFound(format!("{}#{}", interface, function)))?;

        func.call_async(&mut *store, args, results).await?;
        // Required before the next call on this instance.
        func.post_return_async(&mut *store).await?;
        Ok(())
    }

    /// Executes a closure with exclusive access to the store and instance.
    ///
    /// This handles the locking ceremony, allowing the caller to operate on
    /// the Store and Instance safely. The lock is released when the closure
    /// completes.
    pub async fn exec<F, R>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&mut Store<CalcrunCtx>, &Instance) -> Result<R>,
    {
        let mut guard = self.inner.lock().await;
        let State { store, instance } = &mut *guard;
        f(store, instance)
    }

    /// Executes an async closure with exclusive access to the store and
    /// instance.
    ///
    /// This is the async version of `exec`, allowing the closure to perform
    /// async operations (like calling async Wasm functions) while holding the
    /// lock.
    pub async fn exec_async<F, Fut, R>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&mut Store<CalcrunCtx>, &Instance) -> Fut,
        Fut: std::future::Future<Output = Result<R>>,
    {
        let mut guard = self.inner.lock().await;
        let State { store, instance } = &mut *guard;
        f(store, instance).await
    }
}
