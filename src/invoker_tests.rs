use super::*;
use serde_json::json;

#[test]
fn test_callable_source_wraps_body_as_async_function() {
    let source = callable_source("return 1");
    assert!(source.starts_with("(async function () {"));
    assert!(source.ends_with("})"));
    assert!(source.contains("return 1"));
}

#[test]
fn test_callable_source_survives_trailing_line_comment() {
    let source = callable_source("return 1 // done");
    // The wrapper's closing brace must land on its own line.
    assert!(source.contains("// done\n"));
}

#[tokio::test]
async fn test_adds_two_arguments() {
    let result = invoke_once("return arguments[0] + arguments[1]", &[json!(2), json!(3)])
        .await
        .expect("invocation succeeds");
    assert_eq!(result, json!(5));
}

#[tokio::test]
async fn test_synchronous_throw_settles_as_failure() {
    let error = invoke_once("throw new Error('boom')", &[])
        .await
        .expect_err("invocation fails");
    match error {
        InvokeError::Script { message, .. } => assert_eq!(message, "boom"),
        other => panic!("expected script failure, got {other:?}"),
    }
}

#[tokio::test]
async fn test_awaited_promise_resolves() {
    let result = invoke_once("return await Promise.resolve(42)", &[])
        .await
        .expect("invocation succeeds");
    assert_eq!(result, json!(42));
}

#[tokio::test]
async fn test_reference_error_settles_as_failure() {
    let error = invoke_once("return undefinedVariable", &[])
        .await
        .expect_err("invocation fails");
    assert!(error.is_script_failure());
    assert!(error.to_string().contains("not defined"));
}

#[tokio::test]
async fn test_argument_order_is_preserved() {
    let script = "return Array.prototype.join.call(arguments, '-')";
    let forward = invoke_once(script, &[json!("a"), json!("b"), json!("c")])
        .await
        .expect("invocation succeeds");
    assert_eq!(forward, json!("a-b-c"));

    let permuted = invoke_once(script, &[json!("c"), json!("a"), json!("b")])
        .await
        .expect("invocation succeeds");
    assert_eq!(permuted, json!("c-a-b"));
}

#[tokio::test]
async fn test_asynchronous_rejection_settles_as_failure() {
    let error = invoke_once("return Promise.reject(new Error('later'))", &[])
        .await
        .expect_err("invocation fails");
    match error {
        InvokeError::Script { message, .. } => assert_eq!(message, "later"),
        other => panic!("expected script failure, got {other:?}"),
    }
}

#[tokio::test]
async fn test_rejecting_await_settles_as_failure() {
    let error = invoke_once(
        "await new Promise(function (resolve, reject) { reject(new Error('nope')) })",
        &[],
    )
    .await
    .expect_err("invocation fails");
    assert!(error.is_script_failure());
}

#[tokio::test]
async fn test_thrown_plain_value_is_surfaced_verbatim() {
    let error = invoke_once("throw { code: 7 }", &[])
        .await
        .expect_err("invocation fails");
    match error {
        InvokeError::Script { thrown, .. } => assert_eq!(thrown, json!({ "code": 7 })),
        other => panic!("expected script failure, got {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_script_is_a_captured_failure() {
    let error = invoke_once("return )(", &[])
        .await
        .expect_err("invocation fails");
    assert!(error.is_script_failure());
}

#[tokio::test]
async fn test_no_return_settles_to_null() {
    let result = invoke_once("var x = 1;", &[])
        .await
        .expect("invocation succeeds");
    assert_eq!(result, json!(null));
}

#[tokio::test]
async fn test_structured_result_marshals_back() {
    let result = invoke_once(
        "return { a: [1, 'x', true], b: null, nested: { deep: arguments[0] } }",
        &[json!("value")],
    )
    .await
    .expect("invocation succeeds");
    assert_eq!(
        result,
        json!({ "a": [1, "x", true], "b": null, "nested": { "deep": "value" } })
    );
}

#[tokio::test]
async fn test_persistent_invoker_shares_its_hosting_environment() {
    let invoker = ScriptInvoker::new().await.expect("invoker");
    invoker
        .invoke("globalThis.counter = (globalThis.counter || 0) + 1", &[])
        .await
        .expect("first invocation");
    let result = invoker
        .invoke("return globalThis.counter", &[])
        .await
        .expect("second invocation");
    assert_eq!(result, json!(1));
}

#[tokio::test]
async fn test_one_shot_invocations_start_clean() {
    invoke_once("globalThis.counter = 99", &[])
        .await
        .expect("first invocation");
    let result = invoke_once("return globalThis.counter", &[])
        .await
        .expect("second invocation");
    assert_eq!(result, json!(null));
}

#[tokio::test]
async fn test_failure_does_not_poison_the_invoker() {
    let invoker = ScriptInvoker::new().await.expect("invoker");
    invoker
        .invoke("throw new Error('first')", &[])
        .await
        .expect_err("first invocation fails");
    let result = invoker
        .invoke("return 'still alive'", &[])
        .await
        .expect("second invocation succeeds");
    assert_eq!(result, json!("still alive"));
}

#[tokio::test]
async fn test_overlapping_invocations_settle_independently() {
    let invoker = ScriptInvoker::new().await.expect("invoker");
    let (left, right) = tokio::join!(
        invoker.invoke("return await Promise.resolve('left')", &[]),
        invoker.invoke("throw new Error('right')", &[]),
    );
    assert_eq!(left.expect("left succeeds"), json!("left"));
    assert!(right.expect_err("right fails").is_script_failure());
}

#[tokio::test]
async fn test_configured_invoker_still_invokes() {
    let config = InvokerConfig::default()
        .with_memory_limit(64 * 1024 * 1024)
        .with_max_stack_size(1024 * 1024);
    let invoker = ScriptInvoker::with_config(config).await.expect("invoker");
    let result = invoker
        .invoke("return arguments.length", &[json!(1), json!(2)])
        .await
        .expect("invocation succeeds");
    assert_eq!(result, json!(2));
}
