//! # Host components implemented natively
//!
//! Host components are native Rust implementations that provide functionality
//! to Wasm components through host-defined interfaces: WASI, or the
//! arithmetic interfaces themselves when no provider component is wired in.
//!
//! Each component is implemented in its own module under `src/host/`.

pub mod adder;
pub mod subtractor;
pub mod wasi;

pub use adder::NativeAdder;
pub use subtractor::NativeSubtractor;
pub use wasi::Wasi;

use wasmtime::component::Linker;

use crate::context::CalcrunCtx;
use crate::context::ContextBuilder;

#[derive(Debug)]
pub enum Error {
    Link(String),
    Config(String),
    Wasmtime(wasmtime::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Link(msg) => write!(f, "Linker error: {}", msg),
            Self::Config(msg) => write!(f, "Configuration error: {}", msg),
            Self::Wasmtime(e) => write!(f, "Wasmtime error: {}", e),
        }
    }
}

impl std::error::Error for Error {}

impl From<wasmtime::Error> for Error {
    fn from(e: wasmtime::Error) -> Self {
        Self::Wasmtime(e)
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Trait for host components that provide functionality to Wasm guests.
///
/// Host components represent the contract between native Rust code and Wasm
/// interfaces. They must be able to:
/// 1. Install their interface definitions into a linker (what functions are
///    available)
/// 2. Configure context resources (what capabilities are provisioned)
pub trait HostComponent: Send + Sync + 'static {
    /// Installs this component's interface into the linker.
    fn install(&self, linker: &mut Linker<CalcrunCtx>) -> Result<()>;

    /// Configures the context builder with any required resources.
    fn configure(&self, builder: &mut ContextBuilder) -> Result<()>;
}
