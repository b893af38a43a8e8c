//! A CLI for evaluating arithmetic expressions using WebAssembly components.
//!
//! Loads a calculator component and evaluates `x <op> y` through its
//! `calc:demo/calculate` interface. The calculator's arithmetic imports are
//! satisfied by adder/subtractor component files when given, and by the
//! native host implementations otherwise. Without a calculator component the
//! expression is evaluated natively.

use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use wasmtime::component::Val;

use calcrun::builder::InstanceBuilder;
use calcrun::host::NativeAdder;
use calcrun::host::NativeSubtractor;
use calcrun::host::Wasi;
use calcrun::instance::InstanceHandle;
use calcrun::ops;
use calcrun::ops::Op;
use calcrun::runtime::ComponentId;
use calcrun::runtime::Runtime;

fn parse_operator(op: &str) -> anyhow::Result<Op> {
    Ok(op.parse()?)
}

/// A CLI for evaluating arithmetic expressions
/// using WebAssembly components.
#[derive(Parser)]
#[clap(name = "calchost", version = env!("CARGO_PKG_VERSION"))]
struct CalcApp {
    /// The first operand
    x: u32,

    /// The second operand
    y: u32,

    /// Expression operator (add/+ or sub/-)
    #[clap(value_parser = parse_operator)]
    op: Op,

    /// The path to a calculator component; without it the expression is
    /// evaluated natively
    #[clap(long, value_name = "COMPONENT_PATH")]
    calculator: Option<PathBuf>,

    /// The path to an adder component backing the calculator's add import;
    /// the native host adder is used if omitted
    #[clap(long, value_name = "COMPONENT_PATH")]
    adder: Option<PathBuf>,

    /// The path to a subtractor component backing the calculator's sub
    /// import; the native host subtractor is used if omitted
    #[clap(long, value_name = "COMPONENT_PATH")]
    subtractor: Option<PathBuf>,
}

impl CalcApp {
    async fn run(self) -> anyhow::Result<()> {
        let result = match &self.calculator {
            Some(path) => self.eval_component(path.clone()).await?,
            None => ops::eval(self.op, self.x, self.y),
        };
        println!("{} {} {} = {result}", self.x, self.op, self.y);
        Ok(())
    }

    async fn eval_component(&self, path: PathBuf) -> anyhow::Result<u32> {
        let rt = Arc::new(Runtime::new().context("Failed to create runtime")?);

        let calculator_id = register(&rt, &path)?;
        let mut builder = InstanceBuilder::new(Arc::clone(&rt), calculator_id)
            .link_host(Box::new(Wasi::new()));

        builder = match &self.adder {
            Some(path) => {
                let provider = instantiate_provider(&rt, path).await?;
                builder.link_instance("calc:demo/add", provider)
            }
            None => builder.link_host(Box::new(NativeAdder::new())),
        };

        builder = match &self.subtractor {
            Some(path) => {
                let provider = instantiate_provider(&rt, path).await?;
                builder.link_instance("calc:demo/sub", provider)
            }
            None => builder.link_host(Box::new(NativeSubtractor::new())),
        };

        let calculator = builder
            .instantiate()
            .await
            .context("Failed to instantiate the calculator component")?;

        let args = [
            Val::Enum(self.op.case_name().to_string()),
            Val::U32(self.x),
            Val::U32(self.y),
        ];
        let mut results = vec![Val::Bool(false)];
        calculator
            .call_interface_func("calc:demo/calculate", "eval-expression", &args, &mut results)
            .await
            .context("Failed to call eval-expression")?;

        match results[0] {
            Val::U32(n) => Ok(n),
            ref other => anyhow::bail!("Unexpected eval-expression result: {:?}", other),
        }
    }
}

fn register(rt: &Arc<Runtime>, path: &Path) -> anyhow::Result<ComponentId> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Component file not found: {}", path.display()))?;
    rt.register_component(&bytes)
        .with_context(|| format!("Failed to compile component: {}", path.display()))
}

async fn instantiate_provider(rt: &Arc<Runtime>, path: &Path) -> anyhow::Result<InstanceHandle> {
    let id = register(rt, path)?;
    debug!("instantiating provider {} from {}", id, path.display());
    InstanceBuilder::new(Arc::clone(rt), id)
        .link_host(Box::new(Wasi::new()))
        .instantiate()
        .await
        .with_context(|| format!("Failed to instantiate provider: {}", path.display()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    CalcApp::parse().run().await
}
