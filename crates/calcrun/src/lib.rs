//! # calcrun
//!
//! A Wasmtime component runtime for arithmetic calculator components.
//!
//! ## Architecture
//!
//! calcrun runs WebAssembly components that export or import the `calc:demo`
//! arithmetic interfaces, with two ways to satisfy a component's imports:
//!
//! - **Host components**: native Rust implementations installed directly into
//!   the linker (WASI, or the arithmetic interfaces themselves)
//! - **Local instances**: another Wasm instance in the same process whose
//!   exports are forwarded to dynamically
//!
//! ## Core Concepts
//!
//! - **Runtime**: the registry for compiled components and running instances
//! - **InstanceBuilder**: fluent API for wiring up imports and instantiating
//! - **InstanceHandle**: thread-safe handle for invoking exported functions
//! - **Manifest**: introspected catalog of a component's interfaces, used to
//!   validate links before instantiation
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use calcrun::builder::InstanceBuilder;
//! use calcrun::host::NativeAdder;
//! use calcrun::runtime::Runtime;
//!
//! # async fn example(wasm_bytes: &[u8]) -> anyhow::Result<()> {
//! let rt = Arc::new(Runtime::new()?);
//! let id = rt.register_component(wasm_bytes)?;
//!
//! let handle = InstanceBuilder::new(Arc::clone(&rt), id)
//!     .link_host(Box::new(NativeAdder::new()))
//!     .instantiate()
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod bind;
pub mod builder;
pub mod context;
pub mod host;
pub mod instance;
pub mod manifest;
pub mod ops;
pub mod runtime;

pub use builder::InstanceBuilder;
pub use builder::Linkable;
pub use context::CalcrunCtx;
pub use context::ContextBuilder;
pub use host::HostComponent;
pub use instance::InstanceHandle;
pub use manifest::Manifest;
pub use ops::Op;
pub use runtime::ComponentId;
pub use runtime::InstanceId;
pub use runtime::Runtime;
