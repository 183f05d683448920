use llmo_monitor::{
    analyzer::Mentions,
    export::{export_results, report_file_name, write_csv},
    gemini::GeminiClient,
    monitor::Monitor,
    ContentGenerator, MonitorConfig, MonitorError, QueryResult,
};
use mockito::Matcher;
use serde_json::json;
use std::time::Duration;

const ENDPOINT: &str = "/models/gemini-test:generateContent";

fn config_for(server_url: &str, queries: &str) -> MonitorConfig {
    MonitorConfig::from_vars([
        ("GEMINI_API_KEY", "test-key"),
        ("GEMINI_API_MODEL", "gemini-test"),
        ("DOMAIN_NAME", "acme.example"),
        ("COMPANY_NAME", "Acme"),
        ("PRODUCT_NAMES", "Widget,Gadget"),
        ("TARGET_QUERIES", queries),
        ("GEMINI_API_BASE_URL", server_url),
    ])
    .unwrap()
}

fn text_response(text: &str) -> String {
    json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": text}]},
            "finishReason": "STOP"
        }]
    })
    .to_string()
}

fn read_rows(path: &std::path::Path) -> Vec<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(path)
        .unwrap();
    reader
        .records()
        .map(|r| r.unwrap().iter().map(String::from).collect())
        .collect()
}

#[tokio::test]
async fn test_ask_returns_first_text_part() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", ENDPOINT)
        .match_header("x-goog-api-key", "test-key")
        .match_body(Matcher::Json(json!({
            "contents": [{"role": "user", "parts": [{"text": "Which widget is best?"}]}]
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(text_response("We recommend Acme Widget."))
        .create_async()
        .await;

    let config = config_for(&server.url(), "Which widget is best?");
    let client = GeminiClient::new(&config).unwrap();

    let answer = client.ask("Which widget is best?").await.unwrap();
    assert_eq!(answer, "We recommend Acme Widget.");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_ask_zero_candidates_is_malformed() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", ENDPOINT)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"candidates": []}).to_string())
        .create_async()
        .await;

    let config = config_for(&server.url(), "q");
    let client = GeminiClient::new(&config).unwrap();

    let err = client.ask("q").await.unwrap_err();
    assert!(matches!(err, MonitorError::MalformedResponse(_)));
}

#[tokio::test]
async fn test_ask_http_error_is_transport() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", ENDPOINT)
        .with_status(429)
        .with_body("quota exceeded")
        .create_async()
        .await;

    let config = config_for(&server.url(), "q");
    let client = GeminiClient::new(&config).unwrap();

    let err = client.ask("q").await.unwrap_err();
    assert!(err.is_transport());
    match err {
        MonitorError::Api { status, body } => {
            assert_eq!(status.as_u16(), 429);
            assert_eq!(body, "quota exceeded");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_ask_unreachable_server_is_transport() {
    // Nothing listens on port 9 on a test machine.
    let config = config_for("http://127.0.0.1:9", "q");
    let client = GeminiClient::new(&config)
        .unwrap()
        .with_timeout(Duration::from_secs(5));

    let err = client.ask("q").await.unwrap_err();
    assert!(err.is_transport(), "unexpected error: {err}");
}

#[tokio::test]
async fn test_ask_times_out_on_silent_server() {
    // Accepts connections but never answers.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    let config = config_for(&format!("http://{addr}"), "q");
    let client = GeminiClient::new(&config)
        .unwrap()
        .with_timeout(Duration::from_millis(200));

    let err = client.ask("q").await.unwrap_err();
    assert!(err.is_transport());
    assert!(
        matches!(err, MonitorError::Timeout(t) if t == Duration::from_millis(200)),
        "unexpected error: {err}"
    );

    server.abort();
}

#[tokio::test]
async fn test_run_skips_failed_queries_and_exports() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", ENDPOINT)
        .match_body(Matcher::Json(json!({
            "contents": [{"role": "user", "parts": [{"text": "good"}]}]
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(text_response("Try our Gadget today, see acme.example"))
        .create_async()
        .await;
    server
        .mock("POST", ENDPOINT)
        .match_body(Matcher::Json(json!({
            "contents": [{"role": "user", "parts": [{"text": "bad"}]}]
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"candidates": []}).to_string())
        .create_async()
        .await;

    let config = config_for(&server.url(), "good|bad|good");
    let client = GeminiClient::new(&config).unwrap();

    let results = Monitor::new(client, &config)
        .with_delay(Duration::ZERO)
        .quiet()
        .run()
        .await;

    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r.query == "good"));
    // The domain contains the company name, so both count as mentioned.
    assert!(results[0].company_mentioned);
    assert_eq!(results[0].products_display(), "Gadget");
    assert!(results[0].url_mentioned);

    let dir = tempfile::tempdir().unwrap();
    let path = export_results(&results, dir.path()).unwrap();
    assert_eq!(
        path.file_name().unwrap().to_str().unwrap(),
        report_file_name(chrono::Local::now().date_naive())
    );
    assert_eq!(read_rows(&path).len(), results.len() + 1);
}

#[test]
fn test_export_empty_results_writes_header_only() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.csv");

    write_csv(&[], &path).unwrap();

    let rows = read_rows(&path);
    assert_eq!(
        rows,
        vec![vec![
            "query",
            "timestamp",
            "company_mentioned",
            "products_mentioned",
            "url_mentioned",
            "full_response"
        ]]
    );
}

#[test]
fn test_export_round_trips_awkward_text() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.csv");

    let results = vec![
        QueryResult::new(
            "best widgets, cheap?",
            "Line one\nLine \"two\", with comma\r\nend",
            Mentions {
                company: true,
                products: vec!["Widget".to_string(), "Gadget".to_string()],
                url: false,
            },
        ),
        QueryResult::new("plain", "nothing", Mentions::default()),
    ];

    write_csv(&results, &path).unwrap();

    let rows = read_rows(&path);
    assert_eq!(rows.len(), 3);

    for (row, result) in rows[1..].iter().zip(&results) {
        assert_eq!(row[0], result.query);
        assert_eq!(row[1], result.timestamp_rfc3339());
        assert_eq!(row[2], result.company_mentioned.to_string());
        assert_eq!(row[3], result.products_display());
        assert_eq!(row[4], result.url_mentioned.to_string());
        assert_eq!(row[5], result.full_response);
    }
    assert_eq!(rows[1][3], "Widget, Gadget");
    assert_eq!(rows[2][2], "false");
    assert_eq!(rows[2][3], "none");
}

#[test]
fn test_export_overwrites_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.csv");
    std::fs::write(&path, "stale\nstale\nstale\nstale\n").unwrap();

    write_csv(&[], &path).unwrap();

    assert_eq!(read_rows(&path).len(), 1);
}

#[test]
fn test_export_into_missing_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("does-not-exist");

    assert!(export_results(&[], &missing).is_err());
}
