//! End-to-end tests for the runtime: registration, linking, and invocation.
//!
//! Fixtures are hand-written component WAT rather than prebuilt binaries;
//! wasmtime compiles the text directly. Each fixture mirrors one of the
//! guest apps: an adder, a subtractor, and a consumer that imports the
//! adder interface.

use std::sync::Arc;

use wasmtime::component::Val;

use calcrun::builder::InstanceBuilder;
use calcrun::host::NativeAdder;
use calcrun::instance::InstanceHandle;
use calcrun::runtime::Runtime;

/// Exports `calc:demo/add` with core wasm `i32.add` (wrapping by definition).
const ADDER_WAT: &str = r#"
    (component
        (core module $m
            (func (export "add") (param i32 i32) (result i32)
                local.get 0
                local.get 1
                i32.add))
        (core instance $i (instantiate $m))
        (func $add (param "x" u32) (param "y" u32) (result u32)
            (canon lift (core func $i "add")))
        (instance $add-inst (export "add" (func $add)))
        (export "calc:demo/add" (instance $add-inst))
    )
"#;

/// Exports `calc:demo/sub` with core wasm `i32.sub`.
const SUBTRACTOR_WAT: &str = r#"
    (component
        (core module $m
            (func (export "sub") (param i32 i32) (result i32)
                local.get 0
                local.get 1
                i32.sub))
        (core instance $i (instantiate $m))
        (func $sub (param "x" s32) (param "y" s32) (result s32)
            (canon lift (core func $i "sub")))
        (instance $sub-inst (export "sub" (func $sub)))
        (export "calc:demo/sub" (instance $sub-inst))
    )
"#;

/// Imports `calc:demo/add` and exports `test:fixture/runner` whose `run`
/// forwards its two operands to the imported adder.
const CONSUMER_WAT: &str = r#"
    (component
        (import "calc:demo/add" (instance $imp
            (export "add" (func (param "x" u32) (param "y" u32) (result u32)))))
        (core func $add-lowered (canon lower (func $imp "add")))
        (core module $m
            (import "calc" "add" (func $add (param i32 i32) (result i32)))
            (func (export "run") (param i32 i32) (result i32)
                local.get 0
                local.get 1
                call $add))
        (core instance $i (instantiate $m
            (with "calc" (instance (export "add" (func $add-lowered))))))
        (func $run (param "x" u32) (param "y" u32) (result u32)
            (canon lift (core func $i "run")))
        (instance $run-inst (export "run" (func $run)))
        (export "test:fixture/runner" (instance $run-inst))
    )
"#;

/// Exports `calc:demo/add` with the wrong arity (one parameter).
const BAD_ADDER_WAT: &str = r#"
    (component
        (core module $m
            (func (export "add") (param i32) (result i32)
                local.get 0))
        (core instance $i (instantiate $m))
        (func $add (param "x" u32) (result u32)
            (canon lift (core func $i "add")))
        (instance $add-inst (export "add" (func $add)))
        (export "calc:demo/add" (instance $add-inst))
    )
"#;

async fn instantiate(rt: &Arc<Runtime>, wat: &str) -> InstanceHandle {
    let id = rt.register_component(wat.as_bytes()).expect("Failed to compile fixture");
    InstanceBuilder::new(Arc::clone(rt), id)
        .instantiate()
        .await
        .expect("Failed to instantiate fixture")
}

async fn call_u32(handle: &InstanceHandle, interface: &str, function: &str, x: u32, y: u32) -> u32 {
    let mut results = vec![Val::Bool(false)];
    handle
        .call_interface_func(interface, function, &[Val::U32(x), Val::U32(y)], &mut results)
        .await
        .expect("Call failed");
    match results[0] {
        Val::U32(n) => n,
        ref other => panic!("Expected u32 result, got {:?}", other),
    }
}

#[tokio::test]
async fn adder_component_wraps_on_overflow() {
    let rt = Arc::new(Runtime::new().expect("Failed to create runtime"));
    let adder = instantiate(&rt, ADDER_WAT).await;

    assert_eq!(call_u32(&adder, "calc:demo/add", "add", 2, 2).await, 4);
    assert_eq!(call_u32(&adder, "calc:demo/add", "add", u32::MAX, 1).await, 0);
}

#[tokio::test]
async fn subtractor_component_wraps_two_complement() {
    let rt = Arc::new(Runtime::new().expect("Failed to create runtime"));
    let sub = instantiate(&rt, SUBTRACTOR_WAT).await;

    for (x, y, expected) in [(5, 3, 2), (3, 5, -2), (i32::MIN, 1, i32::MAX)] {
        let mut results = vec![Val::Bool(false)];
        sub.call_interface_func("calc:demo/sub", "sub", &[Val::S32(x), Val::S32(y)], &mut results)
            .await
            .expect("Call failed");
        match results[0] {
            Val::S32(n) => assert_eq!(n, expected, "{} - {}", x, y),
            ref other => panic!("Expected s32 result, got {:?}", other),
        }
    }
}

#[tokio::test]
async fn native_adder_satisfies_consumer_import() {
    let rt = Arc::new(Runtime::new().expect("Failed to create runtime"));
    let id = rt.register_component(CONSUMER_WAT.as_bytes()).expect("Failed to compile fixture");

    let consumer = InstanceBuilder::new(Arc::clone(&rt), id)
        .link_host(Box::new(NativeAdder::new()))
        .instantiate()
        .await
        .expect("Failed to instantiate consumer");

    assert_eq!(call_u32(&consumer, "test:fixture/runner", "run", 40, 2).await, 42);
    assert_eq!(call_u32(&consumer, "test:fixture/runner", "run", u32::MAX, 1).await, 0);
}

#[tokio::test]
async fn instance_link_forwards_to_provider() {
    let rt = Arc::new(Runtime::new().expect("Failed to create runtime"));
    let adder = instantiate(&rt, ADDER_WAT).await;

    let id = rt.register_component(CONSUMER_WAT.as_bytes()).expect("Failed to compile fixture");
    let consumer = InstanceBuilder::new(Arc::clone(&rt), id)
        .link_instance("calc:demo/add", adder.clone())
        .instantiate()
        .await
        .expect("Failed to instantiate consumer");

    assert_eq!(call_u32(&consumer, "test:fixture/runner", "run", 40, 2).await, 42);

    // Repeated calls go through the same provider instance.
    assert_eq!(call_u32(&consumer, "test:fixture/runner", "run", 1, 1).await, 2);
    assert_eq!(call_u32(&adder, "calc:demo/add", "add", 7, 3).await, 10);
}

#[tokio::test]
async fn missing_import_fails_instantiation() {
    let rt = Arc::new(Runtime::new().expect("Failed to create runtime"));
    let id = rt.register_component(CONSUMER_WAT.as_bytes()).expect("Failed to compile fixture");

    let err = InstanceBuilder::new(Arc::clone(&rt), id)
        .instantiate()
        .await
        .expect_err("Instantiation should fail without the adder import");

    assert!(matches!(err, calcrun::builder::Error::Instantiate(_)));
}

#[tokio::test]
async fn arity_mismatch_is_rejected_before_instantiation() {
    let rt = Arc::new(Runtime::new().expect("Failed to create runtime"));
    let bad_adder = instantiate(&rt, BAD_ADDER_WAT).await;

    let id = rt.register_component(CONSUMER_WAT.as_bytes()).expect("Failed to compile fixture");
    let err = InstanceBuilder::new(Arc::clone(&rt), id)
        .link_instance("calc:demo/add", bad_adder)
        .instantiate()
        .await
        .expect_err("Link validation should reject the one-argument adder");

    assert!(matches!(err, calcrun::builder::Error::Manifest(_)));
}

#[tokio::test]
async fn instance_registry_roundtrip() {
    let rt = Arc::new(Runtime::new().expect("Failed to create runtime"));
    let adder = instantiate(&rt, ADDER_WAT).await;

    let id = rt.add_instance(adder);
    let handle = rt.get_instance(id).expect("Instance should be registered");
    assert_eq!(call_u32(&handle, "calc:demo/add", "add", 2, 2).await, 4);

    rt.remove_instance(id).expect("Instance should be removable");
    assert!(rt.get_instance(id).is_err());
}
