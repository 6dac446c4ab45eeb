//! End-to-end scenarios: strict, repaired, offline, and server error.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;

use penwright::pipeline::{ArticlePipeline, FallbackReason, Generated, Tier, DEFAULT_TIMEOUT};
use penwright::providers::openai::OpenAiProvider;
use penwright::providers::LlmProvider;
use penwright::style;
use penwright::types::{GenerationRequest, Style};

use crate::http::serve_once;

fn request() -> GenerationRequest {
    GenerationRequest::new("效率", Style::Professional, 800, "职场新人").expect("valid request")
}

fn article_json() -> serde_json::Value {
    json!({
        "title": "高效工作的五个习惯",
        "introduction": "刚进入职场，效率决定了你的成长速度。",
        "sections": [
            {"title": "明确优先级", "content": "每天开始前列出三件最重要的事。"},
            {"title": "减少切换", "content": "集中处理同类任务。"},
            {"title": "善用工具", "content": "让日历和清单替你记忆。"},
            {"title": "总结", "content": "效率是一种可以练习的能力。"}
        ],
        "tags": ["效率", "职场", "成长"]
    })
}

fn completion(content: &str) -> String {
    json!({
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }]
    })
    .to_string()
}

async fn generate_against(status_line: &str, body: &str) -> Generated {
    let served = serve_once(status_line, "application/json", body).await;
    let provider: Arc<dyn LlmProvider> = Arc::new(OpenAiProvider::new(
        &served.url,
        "glm-4-flash".to_owned(),
        Some("test-key".to_owned()),
    ));
    ArticlePipeline::new(provider, DEFAULT_TIMEOUT)
        .generate(&request())
        .await
}

fn offline_pipeline() -> ArticlePipeline {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    let provider = OpenAiProvider::new(&format!("http://{addr}"), "glm-4-flash".to_owned(), None);
    ArticlePipeline::new(Arc::new(provider), DEFAULT_TIMEOUT)
}

/// Everything except `createdAt`.
fn content_of(generated: &Generated) -> serde_json::Value {
    let mut value = serde_json::to_value(&generated.document).expect("serializes");
    if let Some(map) = value.as_object_mut() {
        map.remove("createdAt");
    }
    value
}

#[tokio::test]
async fn valid_response_is_used_verbatim() {
    let before = Utc::now();
    let generated = generate_against("200 OK", &completion(&article_json().to_string())).await;
    let after = Utc::now();

    assert_eq!(generated.diagnostics.tier, Tier::Strict);
    assert!(generated.diagnostics.fallback.is_none());
    assert_eq!(content_of(&generated), article_json());
    assert!(generated.document.created_at >= before);
    assert!(generated.document.created_at <= after);
}

#[tokio::test]
async fn response_missing_closing_brace_is_repaired() {
    let mut raw = article_json().to_string();
    assert_eq!(raw.pop(), Some('}'));

    let generated = generate_against("200 OK", &completion(&raw)).await;

    assert_eq!(generated.diagnostics.tier, Tier::Repaired);
    assert_eq!(generated.document.sections.len(), 4);
    assert_eq!(content_of(&generated), article_json());
}

#[tokio::test]
async fn offline_transport_synthesizes_professional_article() {
    let generated = offline_pipeline().generate(&request()).await;
    let template = style::template(Style::Professional);

    assert_eq!(generated.diagnostics.tier, Tier::Synthesized);
    assert!(matches!(
        generated.diagnostics.fallback,
        Some(FallbackReason::Transport(_))
    ));
    assert_eq!(
        generated.diagnostics.fallback.as_ref().map(FallbackReason::kind),
        Some("network")
    );
    assert_eq!(generated.document.sections.len(), 4);
    assert_eq!(
        generated.document.conclusion().map(|s| s.title.as_str()),
        Some(template.conclusion_title)
    );
    assert!(generated
        .document
        .introduction
        .starts_with(template.intro_prefix));
}

#[tokio::test]
async fn server_error_matches_offline_fallback() {
    let offline = offline_pipeline().generate(&request()).await;
    let failed = generate_against("500 Internal Server Error", "upstream exploded").await;

    assert_eq!(failed.diagnostics.tier, Tier::Synthesized);
    assert_eq!(
        failed.diagnostics.fallback.as_ref().map(FallbackReason::kind),
        Some("http_status")
    );
    assert_eq!(content_of(&failed), content_of(&offline));
}

#[tokio::test]
async fn fenced_json_reply_is_repaired() {
    let reply = format!("```json\n{}\n```", article_json());
    let generated = generate_against("200 OK", &completion(&reply)).await;

    assert_eq!(generated.diagnostics.tier, Tier::Repaired);
    assert_eq!(content_of(&generated), article_json());
}

#[tokio::test]
async fn broken_envelope_falls_back() {
    let generated = generate_against("200 OK", "{\"error\":\"quota\"}").await;

    assert_eq!(
        generated.diagnostics.fallback.as_ref().map(FallbackReason::kind),
        Some("envelope")
    );
    assert!(generated.document.is_well_formed());
}
