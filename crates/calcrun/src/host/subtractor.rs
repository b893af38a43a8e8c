//! # Native subtractor host component
//!
//! Provides the `calc:demo/sub` interface directly from the host, so a
//! calculator component can run without a separate subtractor component.

use wasmtime::component::Linker;

use crate::context::CalcrunCtx;
use crate::context::ContextBuilder;
use crate::host::Error;
use crate::host::HostComponent;
use crate::host::Result;
use crate::ops;

/// Host-side implementation of the `calc:demo/sub` interface.
#[derive(Clone, Debug, Default)]
pub struct NativeSubtractor;

impl NativeSubtractor {
    pub fn new() -> Self {
        Self
    }
}

impl HostComponent for NativeSubtractor {
    fn install(&self, linker: &mut Linker<CalcrunCtx>) -> Result<()> {
        let mut instance = linker
            .instance("calc:demo/sub")
            .map_err(|e| Error::Link(e.to_string()))?;

        instance
            .func_wrap(
                "sub",
                |_caller: wasmtime::StoreContextMut<'_, CalcrunCtx>, (x, y): (i32, i32)| {
                    Ok((ops::sub(x, y),))
                },
            )
            .map_err(|e| Error::Link(e.to_string()))?;

        Ok(())
    }

    fn configure(&self, _builder: &mut ContextBuilder) -> Result<()> {
        Ok(())
    }
}
