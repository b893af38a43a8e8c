//! # WASI host component
//!
//! Provides standard WASI (WebAssembly System Interface) functionality to
//! Wasm components: stdio, clocks, random, and the rest of the p2 surface.

use wasmtime::component::Linker;

use crate::context::CalcrunCtx;
use crate::context::ContextBuilder;
use crate::host::HostComponent;
use crate::host::Result;

/// WASI host component that provides standard WASI functionality.
#[derive(Clone, Debug, Default)]
pub struct Wasi;

impl Wasi {
    pub fn new() -> Self {
        Self
    }
}

impl HostComponent for Wasi {
    fn install(&self, linker: &mut Linker<CalcrunCtx>) -> Result<()> {
        wasmtime_wasi::p2::add_to_linker_async(linker)?;
        Ok(())
    }

    /// Guests inherit the host's stdio; nothing else is provisioned.
    fn configure(&self, builder: &mut ContextBuilder) -> Result<()> {
        builder.wasi.inherit_stdio();
        Ok(())
    }
}
