use std::sync::Arc;
use std::time::Duration;

use prp_rank::gateway::openrouter::OpenRouterAdapter;
use prp_rank::gateway::{GatewayConfig, ProviderGateway};
use prp_rank::prompts::PromptTemplate;
use prp_rank::rerank::{rank, LlmOracle, Method, RankOptions, SwapComparator};
use prp_rank::{units_from_lines, RankError};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

/// Judges the rendered default prompt by a fixed preference over line
/// contents, like a well-behaved model would.
struct PreferenceJudge {
    best_first: Vec<&'static str>,
}

impl PreferenceJudge {
    fn rank_of(&self, doc: &str) -> usize {
        self.best_first
            .iter()
            .position(|d| *d == doc)
            .unwrap_or(usize::MAX)
    }
}

fn prompt_docs(prompt: &str) -> Option<(&str, &str)> {
    let (_, rest) = prompt.split_once("Line A:\n")?;
    let (doc_a, rest) = rest.split_once("\n\nLine B:\n")?;
    let (doc_b, _) = rest.split_once("\n\nWhich line")?;
    Some((doc_a, doc_b))
}

fn completion(content: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "choices": [{ "message": { "content": content }, "finish_reason": "stop" }],
        "usage": { "prompt_tokens": 40, "completion_tokens": 2 }
    }))
}

impl Respond for PreferenceJudge {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let body: serde_json::Value = match request.body_json() {
            Ok(body) => body,
            Err(_) => return ResponseTemplate::new(400),
        };
        let prompt = body["messages"][1]["content"].as_str().unwrap_or_default();
        match prompt_docs(prompt) {
            Some((a, b)) if self.rank_of(a) <= self.rank_of(b) => completion("Line A"),
            Some(_) => completion("Line B"),
            None => completion("I cannot tell."),
        }
    }
}

fn gateway(server: &MockServer) -> Arc<ProviderGateway> {
    let adapter =
        OpenRouterAdapter::with_config("sk-test", server.uri(), Duration::from_secs(5), None, None)
            .unwrap();
    Arc::new(ProviderGateway::with_config(
        adapter,
        GatewayConfig {
            max_retries: 0,
            retry_base_delay: Duration::from_millis(1),
        },
    ))
}

#[tokio::test]
async fn every_method_ranks_through_the_http_oracle() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(PreferenceJudge {
            best_first: vec!["Bubbles", "Rex", "Whiskers", "Spot"],
        })
        .mount(&server)
        .await;

    for method in Method::ALL {
        let oracle = LlmOracle::new(gateway(&server), "openai/gpt-4o-mini").with_max_in_flight(2);
        let comparator = SwapComparator::new(oracle);
        let ranked = rank(
            &comparator,
            "Which name suits a pet monkey?",
            units_from_lines(["Spot", "Whiskers", "", "Rex", "Bubbles"]),
            &RankOptions::new(method).top_k(3),
        )
        .await
        .unwrap();

        let contents: Vec<&str> = ranked.iter().map(|u| u.content()).collect();
        assert_eq!(contents, vec!["Bubbles", "Rex", "Whiskers"], "{method}");
        assert_eq!(comparator.unclear_answers(), 0, "{method}");
    }

    let received = server.received_requests().await.unwrap();
    let body: serde_json::Value = received[0].body_json().unwrap();
    assert_eq!(body["model"], "openai/gpt-4o-mini");
    assert!(body["messages"][1]["content"]
        .as_str()
        .unwrap()
        .starts_with("Given the query:\nWhich name suits a pet monkey?"));
}

#[tokio::test]
async fn unreadable_answers_become_ties() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(PreferenceJudge {
            best_first: vec!["b", "a"],
        })
        .mount(&server)
        .await;

    // Without the Line A/Line B scaffolding the judge cannot parse the
    // prompt and answers with prose.
    let oracle = LlmOracle::new(gateway(&server), "test/model")
        .with_template(PromptTemplate::new("{query}: {docA} or {docB}?"));
    let comparator = SwapComparator::new(oracle);
    let ranked = rank(
        &comparator,
        "q",
        units_from_lines(["a", "b"]),
        &RankOptions::new(Method::Allpair),
    )
    .await
    .unwrap();

    let contents: Vec<&str> = ranked.iter().map(|u| u.content()).collect();
    assert_eq!(contents, vec!["a", "b"]);
    assert_eq!(ranked[0].score(), Some(0.5));
    assert_eq!(comparator.unclear_answers(), 2);
}

#[tokio::test]
async fn provider_failure_is_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": { "message": "No auth credentials found", "code": 401 }
        })))
        .mount(&server)
        .await;

    let comparator = SwapComparator::new(LlmOracle::new(gateway(&server), "test/model"));
    let err = rank(
        &comparator,
        "q",
        units_from_lines(["a", "b", "c"]),
        &RankOptions::new(Method::Sorting),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, RankError::Comparison(_)));
    assert!(err.to_string().contains("No auth credentials found"));
}
