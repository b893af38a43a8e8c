//! # Manifest of component interfaces
//!
//! The Manifest is the source of truth for what a component imports and
//! exports. It maps the abstract shape of a WIT interface to the concrete
//! schema needed to wire imports to providers, allowing link mistakes to be
//! reported before instantiation instead of from deep inside wasmtime.

use std::collections::HashMap;

use wasmtime::component::Component;
use wasmtime::component::Type;
use wasmtime::component::types::ComponentFunc;
use wasmtime::component::types::ComponentInstance;
use wasmtime::component::types::ComponentItem;

/// Link validation errors.
#[derive(Debug, Clone)]
pub enum Error {
    /// The importer expects a function the provider does not export.
    FunctionMissing { interface: String, function: String },
    /// Parameter counts differ between importer and provider.
    ParamCountMismatch {
        interface: String,
        function: String,
        expected: usize,
        found: usize,
    },
    /// Result counts differ between importer and provider.
    ResultCountMismatch {
        interface: String,
        function: String,
        expected: usize,
        found: usize,
    },
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::FunctionMissing { interface, function } => {
                write!(f, "'{}#{}' not found in provider's exports", interface, function)
            }
            Error::ParamCountMismatch { interface, function, expected, found } => {
                write!(
                    f,
                    "'{}#{}' parameter count mismatch: import expects {}, provider has {}",
                    interface, function, expected, found
                )
            }
            Error::ResultCountMismatch { interface, function, expected, found } => {
                write!(
                    f,
                    "'{}#{}' result count mismatch: import expects {}, provider has {}",
                    interface, function, expected, found
                )
            }
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;

/// A registry of all imported and exported interfaces of a component.
///
/// Built once per instantiation; lookups during linking are plain map hits.
#[derive(Clone, Debug)]
pub struct Manifest {
    pub imports: HashMap<String, InterfaceSchema>,
    pub exports: HashMap<String, InterfaceSchema>,
}

impl Manifest {
    /// Introspects a Component to build a Manifest of its imports and exports.
    ///
    /// Only component instance items are cataloged; interfaces with no
    /// functions are skipped, as there is nothing to link.
    pub fn from_component(component: &Component) -> Self {
        let engine = component.engine();
        let comp_ty = component.component_type();

        let imports = Self::extract_interfaces(engine, comp_ty.imports(engine));
        let exports = Self::extract_interfaces(engine, comp_ty.exports(engine));

        Self { imports, exports }
    }

    fn extract_interfaces<'a>(
        engine: &wasmtime::Engine,
        items: impl Iterator<Item = (&'a str, ComponentItem)>,
    ) -> HashMap<String, InterfaceSchema> {
        let mut interfaces = HashMap::new();

        for (name, item) in items {
            let ComponentItem::ComponentInstance(inst_ty) = item else { continue };

            let interface = InterfaceSchema::from_inst_ty(engine, inst_ty);
            if interface.funcs.is_empty() { continue; }
            interfaces.insert(name.to_string(), interface);
        }

        interfaces
    }

    /// Looks up the signature for an interface method in imports.
    pub fn import_func(&self, interface: &str, method: &str) -> Option<&FuncSignature> {
        self.imports.get(interface).and_then(|i| i.funcs.get(method))
    }

    /// Looks up the signature for an interface method in exports.
    pub fn export_func(&self, interface: &str, method: &str) -> Option<&FuncSignature> {
        self.exports.get(interface).and_then(|i| i.funcs.get(method))
    }
}

/// Validates that an import interface can be satisfied by an export interface.
///
/// Checks that:
/// - Every function in the import exists in the export
/// - Parameter counts match
/// - Result counts match
///
/// Deep type equality is left to wasmtime at instantiation; this validation
/// provides early, clear errors for the common wiring mistakes.
pub fn validate_link(
    interface_name: &str,
    import: &InterfaceSchema,
    export: &InterfaceSchema,
) -> Result<()> {
    for (func_name, import_sig) in &import.funcs {
        let export_sig = export.funcs.get(func_name).ok_or_else(|| Error::FunctionMissing {
            interface: interface_name.to_string(),
            function: func_name.clone(),
        })?;

        if import_sig.params.len() != export_sig.params.len() {
            return Err(Error::ParamCountMismatch {
                interface: interface_name.to_string(),
                function: func_name.clone(),
                expected: import_sig.params.len(),
                found: export_sig.params.len(),
            });
        }

        if import_sig.results.len() != export_sig.results.len() {
            return Err(Error::ResultCountMismatch {
                interface: interface_name.to_string(),
                function: func_name.clone(),
                expected: import_sig.results.len(),
                found: export_sig.results.len(),
            });
        }
    }

    Ok(())
}

/// The schema for a named interface (e.g., "calc:demo/add").
#[derive(Clone, Debug)]
pub struct InterfaceSchema {
    pub funcs: HashMap<String, FuncSignature>,
}

impl InterfaceSchema {
    /// Extracts all exported functions from a ComponentInstance.
    fn from_inst_ty(engine: &wasmtime::Engine, inst_ty: ComponentInstance) -> Self {
        let mut funcs = HashMap::new();

        for (func_name, func_item) in inst_ty.exports(engine) {
            let ComponentItem::ComponentFunc(func_ty) = func_item else { continue };
            funcs.insert(func_name.to_string(), FuncSignature::from_func_ty(&func_ty));
        }

        Self { funcs }
    }
}

/// The type signature of a specific function.
#[derive(Clone, Debug)]
pub struct FuncSignature {
    pub params: Vec<Type>,
    pub results: Vec<Type>,
}

impl FuncSignature {
    fn from_func_ty(func_ty: &ComponentFunc) -> Self {
        Self {
            params: func_ty.params().map(|(_, ty)| ty).collect(),
            results: func_ty.results().collect(),
        }
    }
}
