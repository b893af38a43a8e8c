//! Store context for running component instances.

use wasmtime::component::ResourceTable;
use wasmtime_wasi::WasiCtx;
use wasmtime_wasi::WasiCtxBuilder;
use wasmtime_wasi::WasiCtxView;
use wasmtime_wasi::WasiView;

/// A staging area for state that will be baked into the CalcrunCtx.
/// Host components inject configuration (WASI stdio, preopens) here
/// before the Store is actually created.
pub struct ContextBuilder {
    pub wasi: WasiCtxBuilder,
}

impl ContextBuilder {
    pub fn new() -> Self {
        Self {
            wasi: WasiCtxBuilder::new(),
        }
    }

    /// Consumes the builder, producing the context stored per instance.
    pub fn build(mut self) -> CalcrunCtx {
        CalcrunCtx {
            wasi: self.wasi.build(),
            table: ResourceTable::new(),
        }
    }
}

impl Default for ContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-instance execution state stored in Wasmtime's Store.
///
/// Wasmtime's Store is single-threaded; each instance gets an independent
/// WASI context and resource table.
pub struct CalcrunCtx {
    wasi: WasiCtx,
    table: ResourceTable,
}

impl WasiView for CalcrunCtx {
    fn ctx(&mut self) -> WasiCtxView<'_> {
        WasiCtxView {
            ctx: &mut self.wasi,
            table: &mut self.table,
        }
    }
}
