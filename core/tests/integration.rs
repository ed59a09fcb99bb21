//! Fetch operations against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port with a fixture built from the
//! core's own record types, then fetches it back over real HTTP through the
//! default `UreqTransport`. Going core -> JSON -> server -> JSON -> core
//! checks that records survive the trip unchanged and catches schema drift
//! between the two crates.

use logkeeper_core::{ApiError, Build, CancellationToken, LogkeeperClient, LogkeeperClientOptions, Test};

fn sample_build() -> Build {
    Build {
        id: "build".to_string(),
        builder: "builder".to_string(),
        build_num: 1,
        task_id: "task".to_string(),
        task_execution: 2,
        tests: vec![
            Test {
                id: "test0".to_string(),
                name: "Test_0".to_string(),
                build_id: "build".to_string(),
                task_id: "task".to_string(),
                task_execution: 2,
                phase: "phase".to_string(),
                command: "cmd".to_string(),
            },
            Test {
                id: "test1".to_string(),
                name: "Test_1".to_string(),
                build_id: "build".to_string(),
                task_id: "task".to_string(),
                task_execution: 2,
                phase: "phase".to_string(),
                command: "cmd --verbose".to_string(),
            },
        ],
    }
}

/// Start the mock server serving `builds` and return a client pointed at it.
async fn start_server(builds: &[Build]) -> LogkeeperClient {
    let json = serde_json::to_string(builds).unwrap();
    let fixtures: Vec<mock_server::Build> = serde_json::from_str(&json).unwrap();

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(mock_server::run(listener, fixtures));

    LogkeeperClient::new(LogkeeperClientOptions {
        base_url: format!("http://{addr}"),
    })
}

#[tokio::test(flavor = "multi_thread")]
async fn fetch_build_metadata_round_trips() {
    let build = sample_build();
    let client = start_server(std::slice::from_ref(&build)).await;

    let fetched = client
        .fetch_build_metadata(&CancellationToken::new(), "build")
        .await
        .unwrap();

    assert_eq!(fetched, build);
}

#[tokio::test(flavor = "multi_thread")]
async fn fetch_test_metadata_round_trips() {
    let build = sample_build();
    let client = start_server(std::slice::from_ref(&build)).await;

    let fetched = client
        .fetch_test_metadata(&CancellationToken::new(), "build", "test1")
        .await
        .unwrap();

    assert_eq!(fetched, build.tests[1]);
    assert_eq!(fetched.build_id, build.id);
}

#[tokio::test(flavor = "multi_thread")]
async fn missing_records_return_404() {
    let client = start_server(&[sample_build()]).await;
    let cancel = CancellationToken::new();

    let err = client.fetch_build_metadata(&cancel, "missing").await.unwrap_err();
    assert!(matches!(err, ApiError::HttpStatus { status: 404, .. }));

    let err = client
        .fetch_test_metadata(&cancel, "build", "missing")
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(404));
}

#[tokio::test(flavor = "multi_thread")]
async fn cancelled_token_fails_without_response() {
    let client = start_server(&[sample_build()]).await;
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = client.fetch_build_metadata(&cancel, "build").await.unwrap_err();
    assert!(err.is_cancelled());

    let err = client
        .fetch_test_metadata(&cancel, "build", "test0")
        .await
        .unwrap_err();
    assert!(err.is_cancelled());
}

#[tokio::test(flavor = "multi_thread")]
async fn unreachable_server_is_a_transport_error() {
    // Bind then drop so the port is very likely closed.
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let client = LogkeeperClient::new(LogkeeperClientOptions {
        base_url: format!("http://{addr}"),
    });

    let err = client
        .fetch_build_metadata(&CancellationToken::new(), "build")
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Transport(_)));
    assert!(!err.is_cancelled());
}
