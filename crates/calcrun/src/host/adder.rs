//! # Native adder host component
//!
//! Provides the `calc:demo/add` interface directly from the host, so a
//! calculator component can run without a separate adder component.

use wasmtime::component::Linker;

use crate::context::CalcrunCtx;
use crate::context::ContextBuilder;
use crate::host::Error;
use crate::host::HostComponent;
use crate::host::Result;
use crate::ops;

/// Host-side implementation of the `calc:demo/add` interface.
#[derive(Clone, Debug, Default)]
pub struct NativeAdder;

impl NativeAdder {
    pub fn new() -> Self {
        Self
    }
}

impl HostComponent for NativeAdder {
    fn install(&self, linker: &mut Linker<CalcrunCtx>) -> Result<()> {
        let mut instance = linker
            .instance("calc:demo/add")
            .map_err(|e| Error::Link(e.to_string()))?;

        instance
            .func_wrap(
                "add",
                |_caller: wasmtime::StoreContextMut<'_, CalcrunCtx>, (x, y): (u32, u32)| {
                    Ok((ops::add(x, y),))
                },
            )
            .map_err(|e| Error::Link(e.to_string()))?;

        Ok(())
    }

    fn configure(&self, _builder: &mut ContextBuilder) -> Result<()> {
        Ok(())
    }
}
