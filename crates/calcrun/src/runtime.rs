//! # Runtime Registry
//!
//! Central registry for the component lifecycle. Manages compiled components
//! and active executions (Instances).
//!
//! Uses DashMap for concurrent access without global locking, so multiple
//! tasks can register components or spawn instances simultaneously.

use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use dashmap::DashMap;
use tracing::debug;
use wasmtime::Engine;
use wasmtime::component::Component;

use crate::instance::InstanceHandle;

/// Strong type for component identifiers.
#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq)]
pub struct ComponentId(pub u64);

impl std::fmt::Display for ComponentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "component-{}", self.0)
    }
}

/// Strong type for instance identifiers.
#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq)]
pub struct InstanceId(pub u64);

impl std::fmt::Display for InstanceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "instance-{}", self.0)
    }
}

#[derive(Debug)]
pub enum Error {
    ComponentNotFound(ComponentId),
    InstanceNotFound(InstanceId),
    Engine(wasmtime::Error),
    Compile(wasmtime::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ComponentNotFound(id) => write!(f, "Component not found: {}", id),
            Self::InstanceNotFound(id) => write!(f, "Instance not found: {}", id),
            Self::Engine(e) => write!(f, "Engine error: {}", e),
            Self::Compile(e) => write!(f, "Compile error: {}", e),
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;

/// The central runtime for managing Wasm components and their instances.
///
/// Provides concurrent registration and lookup for:
/// - Components: compiled Wasm components ready for instantiation
/// - Instances: running component instances
pub struct Runtime {
    pub(crate) engine: Engine,
    pub(crate) components: DashMap<ComponentId, Component>,
    pub(crate) instances: DashMap<InstanceId, InstanceHandle>,
    next_component_id: AtomicU64,
    next_instance_id: AtomicU64,
}

impl Runtime {
    /// Creates a new runtime with default engine configuration.
    pub fn new() -> Result<Self> {
        let mut config = wasmtime::Config::new();
        config.async_support(true);
        config.wasm_component_model(true);

        let engine = Engine::new(&config).map_err(Error::Engine)?;

        Ok(Self::with_engine(engine))
    }

    /// Creates a new runtime with a custom engine configuration.
    ///
    /// The engine must have async support and the component model enabled.
    pub fn with_engine(engine: Engine) -> Self {
        Self {
            engine,
            components: DashMap::new(),
            instances: DashMap::new(),
            next_component_id: AtomicU64::new(1),
            next_instance_id: AtomicU64::new(1),
        }
    }

    /// Returns a reference to the wasmtime Engine.
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Compiles component bytes (binary or wat) and registers the result.
    pub fn register_component(&self, bytes: &[u8]) -> Result<ComponentId> {
        let component = Component::new(&self.engine, bytes).map_err(Error::Compile)?;
        Ok(self.register_compiled(component))
    }

    /// Registers a pre-compiled component and returns its unique ID.
    pub fn register_compiled(&self, component: Component) -> ComponentId {
        let id = ComponentId(self.next_component_id.fetch_add(1, Ordering::Relaxed));
        self.components.insert(id, component);
        debug!("registered {}", id);
        id
    }

    /// Registers an instance handle and returns its unique ID.
    pub fn add_instance(&self, handle: InstanceHandle) -> InstanceId {
        let id = InstanceId(self.next_instance_id.fetch_add(1, Ordering::Relaxed));
        self.instances.insert(id, handle);
        debug!("registered {}", id);
        id
    }

    /// Retrieves a component by ID.
    pub fn get_component(&self, id: ComponentId) -> Result<Component> {
        self.components
            .get(&id)
            .map(|entry| entry.value().clone())
            .ok_or(Error::ComponentNotFound(id))
    }

    /// Retrieves an instance handle by ID.
    pub fn get_instance(&self, id: InstanceId) -> Result<InstanceHandle> {
        self.instances
            .get(&id)
            .map(|entry| entry.value().clone())
            .ok_or(Error::InstanceNotFound(id))
    }

    /// Removes an instance from the registry.
    pub fn remove_instance(&self, id: InstanceId) -> Result<()> {
        self.instances
            .remove(&id)
            .ok_or(Error::InstanceNotFound(id))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_ids_are_reported() {
        let rt = Runtime::new().unwrap();

        let err = match rt.get_component(ComponentId(7)) {
            Ok(_) => panic!("expected error"),
            Err(e) => e,
        };
        assert_eq!(err.to_string(), "Component not found: component-7");

        let err = rt.remove_instance(InstanceId(7)).unwrap_err();
        assert_eq!(err.to_string(), "Instance not found: instance-7");
    }

    #[test]
    fn component_ids_are_unique() {
        let rt = Runtime::new().unwrap();
        let a = rt.register_component(b"(component)").unwrap();
        let b = rt.register_component(b"(component)").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn compile_failure_is_reported() {
        let rt = Runtime::new().unwrap();
        let err = rt.register_component(b"(not a component)").unwrap_err();
        assert!(matches!(err, Error::Compile(_)));
    }
}
