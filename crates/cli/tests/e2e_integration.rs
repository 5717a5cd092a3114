//! End-to-end integration tests for WebScout.
//!
//! These tests run the full pipeline from query to outcome through the real
//! OpenAI-compatible provider, the real web search tool and the real agents.
//! A single in-process HTTP server plays the model, the search API and the
//! target web pages.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::http::StatusCode;
use axum::response::Html;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use webscout_agent::{ResearchLoop, RunStatus};
use webscout_config::AppConfig;
use webscout_core::error::{Error, ExtractionError};
use webscout_core::event::{DomainEvent, EventBus};
use webscout_providers::build_from_config;
use webscout_tools::WebSearchTool;

// ── Fake upstream ────────────────────────────────────────────────────────

const TOKYO_ANSWER: &str = "Tokyo's population is approximately 14 million [source].";

/// How the fake model behaves.
#[derive(Clone)]
struct Script {
    /// Verdict returned by the response checker.
    verdict: &'static str,
    /// Page path the model selects, relative to the server.
    page: &'static str,
    /// Reply to the query-generation call without a tool call.
    skip_tool_call: bool,
}

impl Default for Script {
    fn default() -> Self {
        Self {
            verdict: "yes",
            page: "/tokyo",
            skip_tool_call: false,
        }
    }
}

/// Call counters and the last prompts seen by the fake model.
#[derive(Default)]
struct Upstream {
    planning_calls: AtomicUsize,
    integration_calls: AtomicUsize,
    checker_calls: AtomicUsize,
    search_calls: AtomicUsize,
    planning_prompts: Mutex<Vec<String>>,
}

fn text_reply(content: &str) -> Value {
    json!({
        "id": "chatcmpl-test",
        "model": "gpt-test",
        "choices": [{ "index": 0, "message": { "role": "assistant", "content": content } }],
        "usage": { "prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15 }
    })
}

fn tool_reply(function: &str, field: &str, value: &str) -> Value {
    json!({
        "id": "chatcmpl-test",
        "model": "gpt-test",
        "choices": [{
            "index": 0,
            "message": {
                "role": "assistant",
                "content": null,
                "tool_calls": [{
                    "id": format!("call_{function}"),
                    "type": "function",
                    "function": {
                        "name": function,
                        "arguments": json!({ field: value }).to_string()
                    }
                }]
            }
        }]
    })
}

/// Answer a chat-completion request according to `script`.
fn complete(body: &Value, base: &str, script: &Script, upstream: &Upstream) -> Value {
    if let Some(function) = body["tools"][0]["function"]["name"].as_str() {
        assert_eq!(body["tool_choice"]["function"]["name"], function);
        assert_eq!(body["temperature"], 0.0);
        return match function {
            "fetch_search_results" if script.skip_tool_call => text_reply("I would search for it."),
            "fetch_search_results" => {
                tool_reply(function, "search_engine_queries", "Tokyo population 2024")
            }
            "decide_best_pages" => {
                tool_reply(function, "best_search_page", &format!("{base}{}", script.page))
            }
            "response_checker" => {
                upstream.checker_calls.fetch_add(1, Ordering::SeqCst);
                tool_reply(function, "meets_requirements", script.verdict)
            }
            other => panic!("unexpected function {other}"),
        };
    }

    let messages = body["messages"].as_array().expect("messages");
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["role"], "user");
    assert_eq!(messages[1]["role"], "system");
    let system = messages[1]["content"].as_str().unwrap_or_default();

    if system.starts_with("As an AI Planning Agent") {
        upstream.planning_prompts.lock().unwrap().push(system.to_string());
        let n = upstream.planning_calls.fetch_add(1, Ordering::SeqCst) + 1;
        text_reply(&format!("Plan {n}: search the web for Tokyo's current population."))
    } else {
        let n = upstream.integration_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if script.verdict == "yes" {
            text_reply(TOKYO_ANSWER)
        } else {
            text_reply(&format!("Draft {n}: the sources do not settle it yet."))
        }
    }
}

/// Start the fake model, search API and pages on one server.
async fn start_upstream(script: Script) -> (String, Arc<Upstream>) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let upstream = Arc::new(Upstream::default());

    let chat = {
        let base = base.clone();
        let upstream = upstream.clone();
        move |Json(body): Json<Value>| {
            let reply = complete(&body, &base, &script, &upstream);
            async move { Json(reply) }
        }
    };

    let search = {
        let base = base.clone();
        let upstream = upstream.clone();
        move |Json(body): Json<Value>| {
            upstream.search_calls.fetch_add(1, Ordering::SeqCst);
            assert_eq!(body["q"], "Tokyo population 2024");
            let link = format!("{base}/tokyo");
            async move {
                Json(json!({
                    "organic": [
                        { "title": "Tokyo - Wikipedia", "link": link, "snippet": "Tokyo is the capital of Japan." }
                    ]
                }))
            }
        }
    };

    let router = Router::new()
        .route("/v1/chat/completions", post(chat))
        .route("/search", post(search))
        .route(
            "/tokyo",
            get(|| async {
                Html(
                    "<html><head><script>track()</script></head>\
                     <body><h1>Tokyo</h1><p>Tokyo population is 14 million.</p></body></html>",
                )
            }),
        )
        .route("/gone", get(|| async { StatusCode::NOT_FOUND }));

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    (base, upstream)
}

fn config_for(base: &str) -> AppConfig {
    let mut config = AppConfig::default();
    config.api_key = Some("sk-test".into());
    config.api_url = Some(format!("{base}/v1"));
    config.search.api_key = Some("serper-test".into());
    config.search.endpoint = format!("{base}/search");
    config
}

fn research_loop(config: &AppConfig, bus: Arc<EventBus>) -> ResearchLoop {
    let provider = build_from_config(config);
    let tool = Arc::new(WebSearchTool::from_config(provider.clone(), config));
    ResearchLoop::from_config(provider, tool, config, bus)
}

// ── Scenarios ────────────────────────────────────────────────────────────

#[tokio::test]
async fn tokyo_query_converges_in_one_iteration() {
    let (base, upstream) = start_upstream(Script::default()).await;
    let config = config_for(&base);

    let outcome = research_loop(&config, Arc::new(EventBus::default()))
        .run("current population of Tokyo")
        .await
        .unwrap();

    assert_eq!(outcome.status, RunStatus::Converged);
    assert_eq!(outcome.iterations, 1);
    assert_eq!(outcome.answer, TOKYO_ANSWER);
    assert_eq!(outcome.links, vec![format!("{base}/tokyo")]);
    assert!(!outcome.degraded);

    assert_eq!(upstream.planning_calls.load(Ordering::SeqCst), 1);
    assert_eq!(upstream.search_calls.load(Ordering::SeqCst), 1);
    assert_eq!(upstream.checker_calls.load(Ordering::SeqCst), 1);

    let prompts = upstream.planning_prompts.lock().unwrap();
    assert!(prompts[0].contains("Feedback received:\nNone"));
}

#[tokio::test]
async fn always_no_runs_exactly_five_iterations() {
    let (base, upstream) = start_upstream(Script {
        verdict: "no",
        ..Script::default()
    })
    .await;
    let config = config_for(&base);

    let outcome = research_loop(&config, Arc::new(EventBus::default()))
        .run("current population of Tokyo")
        .await
        .unwrap();

    assert_eq!(outcome.status, RunStatus::Exhausted);
    assert_eq!(outcome.iterations, 5);
    assert_eq!(outcome.answer, "Draft 5: the sources do not settle it yet.");
    assert_eq!(outcome.links, vec![format!("{base}/tokyo")]);

    assert_eq!(upstream.planning_calls.load(Ordering::SeqCst), 5);
    assert_eq!(upstream.integration_calls.load(Ordering::SeqCst), 5);
    assert_eq!(upstream.checker_calls.load(Ordering::SeqCst), 5);

    // Each later plan sees the previous draft as feedback.
    let prompts = upstream.planning_prompts.lock().unwrap();
    assert!(prompts[1].contains("Feedback received:\nDraft 1:"));
    assert!(prompts[4].contains("Feedback received:\nDraft 4:"));
    assert!(prompts[4].contains("Here is your previous plan:\nPlan 4:"));
}

#[tokio::test]
async fn capitalised_yes_does_not_converge() {
    let (base, upstream) = start_upstream(Script {
        verdict: "Yes",
        ..Script::default()
    })
    .await;
    let mut config = config_for(&base);
    config.max_iterations = 2;

    let outcome = research_loop(&config, Arc::new(EventBus::default()))
        .run("current population of Tokyo")
        .await
        .unwrap();

    assert_eq!(outcome.status, RunStatus::Exhausted);
    assert_eq!(outcome.iterations, 2);
    assert_eq!(upstream.checker_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn unreachable_page_degrades_but_completes() {
    let (base, _upstream) = start_upstream(Script {
        page: "/gone",
        ..Script::default()
    })
    .await;
    let config = config_for(&base);
    let bus = Arc::new(EventBus::default());
    let mut rx = bus.subscribe();

    let outcome = research_loop(&config, bus)
        .run("current population of Tokyo")
        .await
        .unwrap();

    assert_eq!(outcome.iterations, 1);
    assert!(outcome.degraded);
    assert_eq!(outcome.links, vec![format!("{base}/gone")]);

    let mut saw_degraded_source = false;
    while let Ok(event) = rx.try_recv() {
        if let DomainEvent::SourceRetrieved { degraded, .. } = event.as_ref() {
            saw_degraded_source |= *degraded;
        }
    }
    assert!(saw_degraded_source);
}

#[tokio::test]
async fn missing_structured_call_aborts_the_run() {
    let (base, upstream) = start_upstream(Script {
        skip_tool_call: true,
        ..Script::default()
    })
    .await;
    let config = config_for(&base);

    let err = research_loop(&config, Arc::new(EventBus::default()))
        .run("current population of Tokyo")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Extraction(ExtractionError::NoToolCall { .. })
    ));
    assert_eq!(upstream.search_calls.load(Ordering::SeqCst), 0);
    assert_eq!(upstream.integration_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn missing_model_key_fails_on_first_call() {
    let (base, upstream) = start_upstream(Script::default()).await;
    let mut config = config_for(&base);
    config.api_key = None;

    let err = research_loop(&config, Arc::new(EventBus::default()))
        .run("current population of Tokyo")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Provider(webscout_core::error::ProviderError::NotConfigured(_))
    ));
    assert_eq!(upstream.planning_calls.load(Ordering::SeqCst), 0);
}
