mod common;

use common::TestContext;
use mockito::Matcher;
use predicates::prelude::*;
use serde_json::json;

fn point_compiler_at(ctx: &TestContext, server: &mockito::Server) {
    let config = json!({
        "version": "1.0.0",
        "activeProject": "default",
        "defaults": { "outputMode": "prompt", "model": "configured-model" },
        "projects": [{ "id": "default", "name": "Default Project", "createdAt": "2024-01-01T00:00:00Z" }],
        "compiler": {
            "apiUrl": format!("{}/v1/responses", server.url()),
            "timeoutSecs": 5,
            "maxRetries": 2,
            "retryDelayMs": 1
        }
    });
    ctx.write("config.json", &serde_json::to_string_pretty(&config).unwrap());
}

#[test]
fn base_only_composes_prompt_without_api_key() {
    let ctx = TestContext::new();
    ctx.write_default_core("Ship the storefront", "- Small diffs", "Go mobile");
    ctx.create_agent("reviewer", "Reviewer", "- Reviews every diff");

    ctx.cli()
        .args(["generate", "--base-only", "-a", "reviewer", "-i", "Add a cart badge"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("# SYSTEM CONTEXT"))
        .stdout(predicate::str::contains("## Purpose\nShip the storefront"))
        .stdout(predicate::str::contains("## Agent: Reviewer\n"))
        .stdout(predicate::str::contains("# CHANGE REQUEST\nAdd a cart badge"));
}

#[test]
fn base_only_reads_change_request_from_stdin() {
    let ctx = TestContext::new();

    let output = ctx
        .cli()
        .args(["--format", "json", "generate", "--base-only"])
        .write_stdin("Rename the settings page\n")
        .output()
        .unwrap();
    assert!(output.status.success());

    let result: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(result["meta"]["model"], "none");
    assert!(result["generatedPrompt"].as_str().unwrap().contains("Rename the settings page"));
    assert!(result.get("generatedDoc").is_none());
}

#[test]
fn missing_api_key_fails_before_reading_data() {
    let ctx = TestContext::new();
    ctx.write("config.json", "{ not json");

    ctx.cli()
        .args(["generate", "-i", "Do something"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("OPENAI_API_KEY"));
}

#[test]
fn empty_change_request_is_rejected() {
    let ctx = TestContext::new();

    ctx.cli()
        .args(["generate", "--base-only", "-i", "   "])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("userInput is required."));
}

#[test]
fn agent_scope_requires_selected_agents() {
    let ctx = TestContext::new();

    ctx.cli()
        .args(["generate", "--base-only", "-s", "agent", "-i", "Do something"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("selectedAgents is required"));
}

#[test]
fn unknown_selected_agent_fails() {
    let ctx = TestContext::new();

    ctx.cli()
        .args(["generate", "--base-only", "-a", "ghost", "-i", "Do something"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Agent not found: ghost"));
}

#[test]
fn compiles_prompt_and_doc_through_api() {
    let ctx = TestContext::new();
    let mut server = mockito::Server::new();
    point_compiler_at(&ctx, &server);
    ctx.write_default_core("Ship the storefront", "- Small diffs", "Go mobile");

    let mock = server
        .mock("POST", "/v1/responses")
        .match_header("authorization", "Bearer test-key")
        .match_body(Matcher::PartialJson(json!({ "model": "configured-model" })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({ "output_text": "===PROMPT===\nAdd the badge.\n===DOC===\n# Cart badge" })
                .to_string(),
        )
        .create();

    let output = ctx
        .cli()
        .env("OPENAI_API_KEY", "test-key")
        .args(["--format", "json", "generate", "-m", "prompt+md", "-i", "Add a cart badge"])
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let result: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(result["generatedPrompt"], "Add the badge.");
    assert_eq!(result["generatedDoc"], "# Cart badge");
    assert_eq!(result["meta"]["model"], "configured-model");
    mock.assert();
}

#[test]
fn model_flag_overrides_environment() {
    let ctx = TestContext::new();
    let mut server = mockito::Server::new();
    point_compiler_at(&ctx, &server);

    let mock = server
        .mock("POST", "/v1/responses")
        .match_body(Matcher::PartialJson(json!({ "model": "flag-model" })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({ "output_text": "===PROMPT===\nDone" }).to_string())
        .create();

    ctx.cli()
        .env("OPENAI_API_KEY", "test-key")
        .env("OPENAI_MODEL", "env-model")
        .args(["generate", "--model", "flag-model", "-i", "Do it"])
        .assert()
        .success()
        .stdout(predicate::eq("Done\n"));
    mock.assert();
}

#[test]
fn api_errors_are_reported_after_retries() {
    let ctx = TestContext::new();
    let mut server = mockito::Server::new();
    point_compiler_at(&ctx, &server);

    let mock = server
        .mock("POST", "/v1/responses")
        .with_status(500)
        .with_body(r#"{"error": {"message": "upstream exploded"}}"#)
        .expect(2)
        .create();

    ctx.cli()
        .env("OPENAI_API_KEY", "test-key")
        .args(["generate", "-i", "Do it"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Compiler API error (500)"));
    mock.assert();
}
