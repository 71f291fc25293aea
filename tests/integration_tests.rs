use anyhow::Result;
use httpmock::prelude::*;
use std::time::Duration;
use steam_sorter::core::selector::TieBreak;
use steam_sorter::utils::error::ErrorCategory;
use steam_sorter::utils::retry::RetryPolicy;
use steam_sorter::{EtlEngine, RunConfig, SteamPipeline};
use tempfile::TempDir;

fn hltb_hit(server: &MockServer, terms: &str, games: serde_json::Value) {
    let needle = format!(r#""searchTerms":{}"#, terms);
    server.mock(move |when, then| {
        when.method(POST).path("/hltb").body_contains(needle);
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({ "data": games }));
    });
}

fn run_config(server: &MockServer, accounts: &[&str], output_path: &str) -> RunConfig {
    RunConfig::new(
        "TEST_KEY",
        accounts.iter().map(|a| a.to_string()).collect(),
        output_path,
    )
    .with_endpoints(server.url("/owned"), server.url("/hltb"))
}

#[tokio::test]
async fn test_end_to_end_degraded_account_is_skipped() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().join("report.txt");
    let server = MockServer::start();

    let broken = server.mock(|when, then| {
        when.method(GET).path("/owned").query_param("steamid", "111");
        then.status(500);
    });
    let healthy = server.mock(|when, then| {
        when.method(GET)
            .path("/owned")
            .query_param("steamid", "222")
            .query_param("key", "TEST_KEY");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({
                "response": {
                    "game_count": 2,
                    "games": [
                        {"appid": 1145360, "name": "Hades"},
                        {"appid": 504230, "name": "Celeste"}
                    ]
                }
            }));
    });
    hltb_hit(
        &server,
        r#"["Hades"]"#,
        serde_json::json!([{"game_id": 62941, "game_name": "Hades", "comp_main": 79200}]),
    );
    hltb_hit(
        &server,
        r#"["Celeste"]"#,
        serde_json::json!([{"game_id": 42818, "game_name": "Celeste", "comp_main": 30132}]),
    );

    let config = run_config(&server, &["111", "222"], output_path.to_str().unwrap());
    let engine = EtlEngine::new(SteamPipeline::from_config(config));

    let outcome = engine.run().await.unwrap();

    broken.assert();
    healthy.assert();
    assert_eq!(outcome.summary.accounts, 2);
    assert_eq!(outcome.summary.resolved, 2);

    let content = std::fs::read_to_string(&output_path).unwrap();
    assert_eq!(
        content,
        "Nombre del juego: Celeste\nMain Story: 8.37\n\n\
         Nombre del juego: Hades\nMain Story: 22.0\n\n"
    );
}

#[tokio::test]
async fn test_end_to_end_empty_library_writes_empty_report() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().join("nested").join("report.txt");
    let server = MockServer::start();

    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/owned");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({"response": {"game_count": 0}}));
    });
    let hltb_mock = server.mock(|when, then| {
        when.method(POST).path("/hltb");
        then.status(200).json_body(serde_json::json!({"data": []}));
    });

    let config = run_config(&server, &["333"], output_path.to_str().unwrap());
    let engine = EtlEngine::new(SteamPipeline::from_config(config));

    let outcome = engine.run().await.unwrap();

    api_mock.assert();
    hltb_mock.assert_hits(0);
    assert_eq!(outcome.summary.items_fetched, 0);
    assert!(output_path.exists());
    assert_eq!(std::fs::read_to_string(&output_path).unwrap(), "");
}

#[tokio::test]
async fn test_end_to_end_overwrites_previous_report() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let output_path = temp_dir.path().join("report.txt");
    std::fs::write(&output_path, "stale content from an earlier run\n")?;
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(GET).path("/owned");
        then.status(200).json_body(serde_json::json!({
            "response": {"games": [{"appid": 400, "name": "Portal"}, {"appid": 1, "name": "Obscure"}]}
        }));
    });
    hltb_hit(
        &server,
        r#"["Portal"]"#,
        serde_json::json!([{"game_id": 7231, "game_name": "Portal", "comp_main": 10800}]),
    );
    hltb_hit(&server, r#"["Obscure"]"#, serde_json::json!([]));

    let config = run_config(&server, &["444"], output_path.to_str().unwrap());
    EtlEngine::new(SteamPipeline::from_config(config)).run().await?;

    assert_eq!(
        std::fs::read_to_string(&output_path)?,
        "Nombre del juego: Portal\nMain Story: 3.0\n\n"
    );
    Ok(())
}

#[tokio::test]
async fn test_end_to_end_ambiguous_match_uses_tie_break() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().join("report.txt");
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(GET).path("/owned");
        then.status(200).json_body(serde_json::json!({
            "response": {"games": [{"appid": 4000, "name": "Doom"}]}
        }));
    });
    hltb_hit(
        &server,
        r#"["Doom"]"#,
        serde_json::json!([
            {"game_id": 1, "game_name": "Doom Eternal", "comp_main": 50400},
            {"game_id": 2, "game_name": "Doom", "comp_main": 25200}
        ]),
    );

    let config = run_config(&server, &["555"], output_path.to_str().unwrap())
        .with_tie_break(TieBreak::HighestSimilarity);
    EtlEngine::new(SteamPipeline::from_config(config))
        .run()
        .await
        .unwrap();

    assert_eq!(
        std::fs::read_to_string(&output_path).unwrap(),
        "Nombre del juego: Doom\nMain Story: 7.0\n\n"
    );
}

#[tokio::test]
async fn test_end_to_end_retry_exhaustion_degrades() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().join("report.txt");
    let server = MockServer::start();

    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/owned");
        then.status(503);
    });

    let config = run_config(&server, &["666"], output_path.to_str().unwrap())
        .with_retry(RetryPolicy::new(2, Duration::from_millis(5)));
    let outcome = EtlEngine::new(SteamPipeline::from_config(config))
        .run()
        .await
        .unwrap();

    api_mock.assert_hits(3);
    assert_eq!(outcome.summary.resolved, 0);
    assert_eq!(std::fs::read_to_string(&output_path).unwrap(), "");
}

#[tokio::test]
async fn test_end_to_end_output_failure_is_fatal() {
    let temp_dir = TempDir::new().unwrap();
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(GET).path("/owned");
        then.status(200).json_body(serde_json::json!({"response": {"games": []}}));
    });

    // The output path is an existing directory.
    let config = run_config(&server, &["777"], temp_dir.path().to_str().unwrap());
    let result = EtlEngine::new(SteamPipeline::from_config(config)).run().await;

    let err = result.unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Output);
}
