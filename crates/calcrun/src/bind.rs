//! # Dynamic Linker & Closure Factory
//!
//! Wires one instance's imports to another local instance's exports. It
//! iterates over the importing component's `Manifest`, generates
//! Wasmtime-compatible async host closures, and installs them into the
//! `Linker`. Each closure forwards its `Val` arguments to the same-named
//! export of the target instance.

use wasmtime::component::ComponentExportIndex;
use wasmtime::component::Linker;
use wasmtime::component::LinkerInstance;
use wasmtime::component::Val;

use crate::context::CalcrunCtx;
use crate::instance::InstanceHandle;
use crate::instance::State;
use crate::manifest::Manifest;

#[derive(Debug)]
pub enum Error {
    /// The interface requested for linking was not found in the importer's Manifest.
    InterfaceNotFound(String),
    /// The target instance does not export the function being linked.
    ExportNotFound { interface: String, function: String },
    /// Wasmtime linker error (e.g., duplicate definition, shadow disabled).
    Wasmtime(wasmtime::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InterfaceNotFound(name) => {
                write!(f, "Interface '{}' not found in importer's manifest", name)
            }
            Self::ExportNotFound { interface, function } => {
                write!(f, "Target does not export '{}#{}'", interface, function)
            }
            Self::Wasmtime(e) => write!(f, "Wasmtime linker error: {}", e),
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;

/// The Binder orchestrates the wiring of imports.
pub struct Binder;

impl Binder {
    /// Links a specific interface (e.g., `calc:demo/add`) to a local instance.
    ///
    /// This iterates over all functions the importing component expects on
    /// this interface and generates a forwarding stub for each one. Export
    /// indices into the target are resolved here, at link time, so the hot
    /// path of a call is lock, lookup, invoke.
    pub fn link_instance(
        linker: &mut Linker<CalcrunCtx>,
        manifest: &Manifest,
        interface_name: &str,
        target: InstanceHandle,
    ) -> Result<()> {
        let schema = manifest.imports.get(interface_name)
            .ok_or_else(|| Error::InterfaceNotFound(interface_name.to_string()))?;

        let inst_idx = target.component()
            .get_export_index(None, interface_name)
            .ok_or_else(|| Error::ExportNotFound {
                interface: interface_name.to_string(),
                function: String::new(),
            })?;

        let mut linker_instance = linker.instance(interface_name)
            .map_err(Error::Wasmtime)?;

        for (method_name, signature) in schema.funcs.iter() {
            let func_idx = target.component()
                .get_export_index(Some(&inst_idx), method_name)
                .ok_or_else(|| Error::ExportNotFound {
                    interface: interface_name.to_string(),
                    function: method_name.clone(),
                })?;

            bind_method(
                &mut linker_instance,
                method_name,
                target.clone(),
                func_idx,
                signature.results.len(),
            )?;
        }

        Ok(())
    }
}

/// Generates the async closure forwarding one method to the target instance.
fn bind_method(
    linker_instance: &mut LinkerInstance<CalcrunCtx>,
    method_name: &str,
    target: InstanceHandle,
    func_idx: ComponentExportIndex,
    result_count: usize,
) -> Result<()> {
    let method_name_owned = method_name.to_string();

    linker_instance.func_new_async(method_name, move |_store, _func_ty, args, results| {
        let target = target.clone();
        let method_name = method_name_owned.clone();
        let args_vec: Vec<Val> = args.to_vec();

        Box::new(async move {
            // Lock the target instance and call the function. The target's
            // store is distinct from the caller's, so re-entering wasmtime
            // here is safe; only a self-link would deadlock.
            let mut guard = target.inner.lock().await;
            let State { store, instance } = &mut *guard;

            let func = instance
                .get_func(&mut *store, func_idx)
                .ok_or_else(|| wasmtime::Error::msg(format!("Method '{}' not found", method_name)))?;

            let mut call_results = vec![Val::Bool(false); result_count];
            func.call_async(&mut *store, &args_vec, &mut call_results)
                .await?;
            func.post_return_async(&mut *store).await?;

            if call_results.len() != results.len() {
                return Err(wasmtime::Error::msg(format!(
                    "Result count mismatch: expected {}, got {}",
                    results.len(),
                    call_results.len()
                )));
            }

            for (i, val) in call_results.into_iter().enumerate() {
                results[i] = val;
            }

            Ok(())
        })
    }).map_err(Error::Wasmtime)?;

    Ok(())
}
