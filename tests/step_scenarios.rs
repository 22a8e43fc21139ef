//! End-to-end step scenarios against an in-process HTTP server.

mod helpers;

use anyhow::Result;
use serde_json::json;

use http_step::{
    ErrorType, HttpStep, MemoryLogSink, Properties, Renderable, StepContext, StepRequest,
    StepResult, CONTENT_STREAM, LOG_STREAM,
};

use helpers::{refused_url, start_test_server};

#[tokio::test]
async fn get_success() {
    let base = start_test_server().await;
    let url = format!("{base}/path");
    let ctx = StepContext::new();
    let mut sink = MemoryLogSink::new();

    let outcome = HttpStep::new(StepRequest::get(url.clone()))
        .run(&ctx, &Properties::new(), &mut sink)
        .await;

    assert_eq!(outcome.result(), StepResult::Success);
    assert_eq!(outcome.status(), "Status code: 200");
    assert_eq!(sink.stream(CONTENT_STREAM), Some("OK"));
    assert_eq!(
        sink.stream(LOG_STREAM),
        Some(format!("URL: {url}\nStatus: 200\n ------ Content ------\nOK").as_str())
    );
}

#[tokio::test]
async fn get_failure_status() {
    let base = start_test_server().await;
    let url = format!("{base}/404");
    let ctx = StepContext::new();
    let mut sink = MemoryLogSink::new();

    let outcome = HttpStep::new(StepRequest::get(url.clone()))
        .run(&ctx, &Properties::new(), &mut sink)
        .await;

    assert_eq!(outcome.result(), StepResult::Failure);
    assert_eq!(outcome.status(), "Status code: 404 (failure)");
    assert_eq!(sink.stream(CONTENT_STREAM), Some("404"));
    assert_eq!(
        sink.stream(LOG_STREAM),
        Some(format!("URL: {url}\nStatus: 404\n ------ Content ------\n404").as_str())
    );
    assert_eq!(ctx.stats.get_count(ErrorType::HttpFailureStatus), 1);
}

#[tokio::test]
async fn redirect_is_followed_and_captured() {
    let base = start_test_server().await;
    let ctx = StepContext::new();
    let mut sink = MemoryLogSink::new();

    let outcome = HttpStep::new(StepRequest::get(format!("{base}/redirect")))
        .run(&ctx, &Properties::new(), &mut sink)
        .await;

    assert_eq!(outcome.result(), StepResult::Success);
    assert_eq!(outcome.status(), "Status code: 200");
    assert_eq!(sink.stream(CONTENT_STREAM), Some("OK"));

    let separator = "=".repeat(60);
    let expected = format!(
        "Redirected 1 times:\n\n\
         URL: {base}/redirect\n \
         ------ Content ------\n\n{separator}\n\
         URL: {base}/redirected-path\nStatus: 200\n ------ Content ------\nOK"
    );
    assert_eq!(sink.stream(LOG_STREAM), Some(expected.as_str()));
}

#[tokio::test]
async fn connection_failure_reports_requested_failure() {
    let url = format!("{}/path", refused_url().await);
    let ctx = StepContext::new();
    let mut sink = MemoryLogSink::new();

    let outcome = HttpStep::new(StepRequest::get(url))
        .run(&ctx, &Properties::new(), &mut sink)
        .await;

    assert_eq!(outcome.result(), StepResult::Failure);
    assert_eq!(outcome.status(), "Requested (failure)");
    assert_eq!(sink.stream(LOG_STREAM), None);
    assert_eq!(sink.stream(CONTENT_STREAM), None);
    assert_eq!(ctx.stats.get_count(ErrorType::TransportConnect), 1);
}

#[tokio::test]
async fn post_without_body() -> Result<()> {
    let base = start_test_server().await;
    let url = format!("{base}/path");
    let ctx = StepContext::new();
    let mut sink = MemoryLogSink::new();

    let outcome = HttpStep::new(StepRequest::post(url.clone()))
        .run(&ctx, &Properties::new(), &mut sink)
        .await;

    assert_eq!(outcome.result(), StepResult::Success);
    assert_eq!(outcome.status(), "Status code: 200");
    assert_eq!(sink.stream(CONTENT_STREAM), Some("OK:"));
    assert_eq!(
        sink.stream(LOG_STREAM),
        Some(format!("URL: {url}\nStatus: 200\n ------ Content ------\nOK:").as_str())
    );
    Ok(())
}

#[tokio::test]
async fn post_raw_body_is_echoed() -> Result<()> {
    let base = start_test_server().await;
    let ctx = StepContext::new();
    let mut sink = MemoryLogSink::new();

    let outcome = HttpStep::new(StepRequest::post(format!("{base}/path")).body("mydata"))
        .run(&ctx, &Properties::new(), &mut sink)
        .await;

    assert_eq!(outcome.result(), StepResult::Success);
    assert_eq!(sink.stream(CONTENT_STREAM), Some("OK:mydata"));
    Ok(())
}

#[tokio::test]
async fn post_dynamic_mapping_body_is_form_encoded() -> Result<()> {
    let base = start_test_server().await;
    let ctx = StepContext::new();
    let mut sink = MemoryLogSink::new();
    let mut properties = Properties::new();
    properties.set("data", json!({"key1": "value1"}));

    let request = StepRequest::post(format!("{base}/path")).body(Renderable::property("data"));
    let outcome = HttpStep::new(request).run(&ctx, &properties, &mut sink).await;

    assert_eq!(outcome.result(), StepResult::Success);
    assert_eq!(outcome.status(), "Status code: 200");
    assert_eq!(sink.stream(CONTENT_STREAM), Some("OK:key1=value1"));
    Ok(())
}

#[tokio::test]
async fn header_value_reaches_the_wire() {
    let base = start_test_server().await;
    let url = format!("{base}/header");
    let ctx = StepContext::new();
    let mut sink = MemoryLogSink::new();

    let outcome = HttpStep::new(StepRequest::get(url.clone()).header("X-Test", "True"))
        .run(&ctx, &Properties::new(), &mut sink)
        .await;

    assert_eq!(outcome.result(), StepResult::Success);
    assert_eq!(
        sink.stream(LOG_STREAM),
        Some(format!("URL: {url}\nStatus: 200\n ------ Content ------\nTrue").as_str())
    );
}

#[tokio::test]
async fn dynamic_params_render_into_the_query_string() {
    let base = start_test_server().await;
    let url = format!("{base}/path");
    let ctx = StepContext::new();
    let mut sink = MemoryLogSink::new();
    let mut properties = Properties::new();
    properties.set("x", json!({"param_1": "param_1", "param_2": 2}));

    let request = StepRequest::get(url.clone()).params(Renderable::property("x"));
    let outcome = HttpStep::new(request).run(&ctx, &properties, &mut sink).await;

    assert_eq!(outcome.result(), StepResult::Success);
    assert_eq!(outcome.status(), "Status code: 200");
    assert_eq!(sink.stream(CONTENT_STREAM), Some("OK"));
    assert_eq!(
        sink.stream(LOG_STREAM),
        Some(
            format!(
                "URL: {url}?param_1=param_1&param_2=2\nStatus: 200\n ------ Content ------\nOK"
            )
            .as_str()
        )
    );
}

#[tokio::test]
async fn unsupported_server_method_is_a_normal_failure_status() {
    let base = start_test_server().await;
    let ctx = StepContext::new();
    let mut sink = MemoryLogSink::new();

    // The route only accepts GET and POST, so the server answers 405
    let outcome = HttpStep::new(StepRequest::put(format!("{base}/path")))
        .run(&ctx, &Properties::new(), &mut sink)
        .await;

    assert_eq!(outcome.result(), StepResult::Failure);
    assert_eq!(outcome.status(), "Status code: 405 (failure)");
}

#[tokio::test]
async fn request_timeout_is_a_transport_failure() {
    let base = start_test_server().await;
    let ctx = StepContext::new();
    let mut sink = MemoryLogSink::new();

    let request = StepRequest::get(format!("{base}/slow"))
        .timeout(std::time::Duration::from_millis(100));
    let outcome = HttpStep::new(request)
        .run(&ctx, &Properties::new(), &mut sink)
        .await;

    assert_eq!(outcome.result(), StepResult::Failure);
    assert_eq!(outcome.status(), "Requested (failure)");
    assert_eq!(sink.stream(LOG_STREAM), None);
    assert_eq!(ctx.stats.get_count(ErrorType::TransportTimeout), 1);
}

#[tokio::test]
async fn missing_property_aborts_before_any_request() {
    let url = format!("{}/path", refused_url().await);
    let ctx = StepContext::new();
    let mut sink = MemoryLogSink::new();

    // The URL is unreachable; rendering must fail first, so the outcome
    // carries the rendering message rather than the transport one
    let request = StepRequest::get(url).params(Renderable::property("x"));
    let outcome = HttpStep::new(request)
        .run(&ctx, &Properties::new(), &mut sink)
        .await;

    assert_eq!(outcome.result(), StepResult::Failure);
    assert_eq!(outcome.status(), "property 'x' is not defined");
    assert_eq!(sink.stream(LOG_STREAM), None);
    assert_eq!(sink.stream(CONTENT_STREAM), None);
    assert_eq!(ctx.stats.get_count(ErrorType::MissingProperty), 1);
}

#[tokio::test]
async fn conflicting_body_fields_fail_before_send() {
    let base = start_test_server().await;
    let ctx = StepContext::new();
    let mut sink = MemoryLogSink::new();

    let request = StepRequest::post(format!("{base}/path"))
        .body("raw")
        .json(json!({"k": 1}));
    let outcome = HttpStep::new(request)
        .run(&ctx, &Properties::new(), &mut sink)
        .await;

    assert_eq!(outcome.result(), StepResult::Failure);
    assert_eq!(outcome.status(), "at most one of body, form, and json may be set");
    assert_eq!(ctx.stats.get_count(ErrorType::Configuration), 1);
}
