//! # Instance Builder
//!
//! Provides a fluent API for composing an instance with various linking
//! strategies.

use std::sync::Arc;

use tracing::debug;
use wasmtime::Store;
use wasmtime::component::Linker;

use crate::bind;
use crate::bind::Binder;
use crate::context::ContextBuilder;
use crate::host;
use crate::host::HostComponent;
use crate::instance::InstanceHandle;
use crate::manifest;
use crate::manifest::Manifest;
use crate::runtime;
use crate::runtime::ComponentId;
use crate::runtime::Runtime;

#[derive(Debug)]
pub enum Error {
    Runtime(runtime::Error),
    Host(host::Error),
    Bind(bind::Error),
    Manifest(manifest::Error),
    Instantiate(wasmtime::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Runtime(e) => write!(f, "Runtime error: {}", e),
            Self::Host(e) => write!(f, "Host error: {}", e),
            Self::Bind(e) => write!(f, "Bind error: {}", e),
            Self::Manifest(e) => write!(f, "Link validation error: {}", e),
            Self::Instantiate(e) => write!(f, "Instantiate error: {}", e),
        }
    }
}

impl std::error::Error for Error {}

impl From<runtime::Error> for Error {
    fn from(e: runtime::Error) -> Self {
        Self::Runtime(e)
    }
}

impl From<host::Error> for Error {
    fn from(e: host::Error) -> Self {
        Self::Host(e)
    }
}

impl From<bind::Error> for Error {
    fn from(e: bind::Error) -> Self {
        Self::Bind(e)
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Linking strategy for an interface.
pub enum Linkable {
    Host(Box<dyn HostComponent>),
    Instance { interface: String, target: InstanceHandle },
}

/// Fluent builder for creating instances with configured links.
pub struct InstanceBuilder {
    runtime: Arc<Runtime>,
    component_id: ComponentId,
    links: Vec<Linkable>,
    context_builder: ContextBuilder,
}

impl InstanceBuilder {
    pub fn new(runtime: Arc<Runtime>, component_id: ComponentId) -> Self {
        Self {
            runtime,
            component_id,
            links: Vec::new(),
            context_builder: ContextBuilder::new(),
        }
    }

    /// Satisfies imports from a native host component.
    pub fn link_host(mut self, component: Box<dyn HostComponent>) -> Self {
        self.links.push(Linkable::Host(component));
        self
    }

    /// Satisfies an imported interface from another local instance's exports.
    pub fn link_instance(mut self, interface: impl Into<String>, target: InstanceHandle) -> Self {
        self.links.push(Linkable::Instance {
            interface: interface.into(),
            target,
        });
        self
    }

    pub fn context(mut self, f: impl FnOnce(&mut ContextBuilder)) -> Self {
        f(&mut self.context_builder);
        self
    }

    pub async fn instantiate(mut self) -> Result<InstanceHandle> {
        let component = self.runtime.get_component(self.component_id)?;
        let manifest = Manifest::from_component(&component);

        let mut linker = Linker::new(self.runtime.engine());
        debug!("instantiating {} with {} links", self.component_id, self.links.len());

        // Process links (consuming them to transfer ownership)
        for link in self.links {
            match link {
                Linkable::Host(host) => {
                    host.install(&mut linker)?;
                    host.configure(&mut self.context_builder)?;
                }
                Linkable::Instance { interface, target } => {
                    let provider = Manifest::from_component(target.component());
                    if let (Some(import), Some(export)) =
                        (manifest.imports.get(&interface), provider.exports.get(&interface))
                    {
                        manifest::validate_link(&interface, import, export)
                            .map_err(Error::Manifest)?;
                    }
                    Binder::link_instance(&mut linker, &manifest, &interface, target)?;
                }
            }
        }

        let ctx = self.context_builder.build();
        let mut store = Store::new(self.runtime.engine(), ctx);

        let instance = linker
            .instantiate_async(&mut store, &component)
            .await
            .map_err(Error::Instantiate)?;

        Ok(InstanceHandle::new(store, instance, component))
    }
}
