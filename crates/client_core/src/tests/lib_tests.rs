use super::*;
use crate::error::{SERVER_ERROR_MESSAGE, TRANSPORT_FALLBACK_MESSAGE};
use anyhow::Result;
use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::post, Json, Router};
use serde_json::{json, Value};
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use tokio::{
    net::TcpListener,
    sync::{oneshot, Mutex},
};

#[derive(Clone)]
struct ServerState {
    status: StatusCode,
    body: String,
    calls: Arc<AtomicUsize>,
    tx: Arc<Mutex<Option<oneshot::Sender<Value>>>>,
}

struct MockService {
    base_url: String,
    calls: Arc<AtomicUsize>,
    request_rx: oneshot::Receiver<Value>,
}

async fn handle_segment(
    State(state): State<ServerState>,
    Json(payload): Json<Value>,
) -> impl IntoResponse {
    state.calls.fetch_add(1, Ordering::SeqCst);
    if let Some(tx) = state.tx.lock().await.take() {
        let _ = tx.send(payload);
    }
    (
        state.status,
        [("content-type", "application/json")],
        state.body.clone(),
    )
}

async fn spawn_segment_service(status: StatusCode, body: impl Into<String>) -> Result<MockService> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let (tx, rx) = oneshot::channel();
    let calls = Arc::new(AtomicUsize::new(0));
    let state = ServerState {
        status,
        body: body.into(),
        calls: calls.clone(),
        tx: Arc::new(Mutex::new(Some(tx))),
    };
    let app = Router::new()
        .route("/api/segment", post(handle_segment))
        .with_state(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(MockService {
        base_url: format!("http://{addr}"),
        calls,
        request_rx: rx,
    })
}

fn campo_2_body() -> Value {
    json!({
        "success": true,
        "nuclei_count": 42,
        "image_name": "Campo 2",
        "statistics": {
            "mean_area": 10.5,
            "median_area": 9.75,
            "min_area": 3,
            "max_area": 27,
            "std_area": 4.125,
            "mean_diameter": 3.61,
            "mean_solidity": 0.93125
        },
        "result_image_url": "/r1.png",
        "histogram_url": "/h1.png"
    })
}

#[tokio::test]
async fn campo_2_scenario_succeeds_with_parsed_result() {
    let service = spawn_segment_service(StatusCode::OK, campo_2_body().to_string())
        .await
        .expect("spawn service");
    let client = SegmentationClient::new(service.base_url.clone());
    let mut controller = RequestController::new();
    controller.select_image("Campo 2").expect("select");

    let state = controller.submit_with(&client).await.clone();

    let result = match state {
        RequestState::Succeeded(result) => result,
        other => panic!("expected success, got {other:?}"),
    };
    assert_eq!(result.nuclei_count, 42);
    assert_eq!(result.image_name, "Campo 2");
    assert_eq!(result.statistics.mean_area, 10.5);
    assert_eq!(result.statistics.median_area, 9.75);
    assert_eq!(result.statistics.min_area, 3.0);
    assert_eq!(result.statistics.max_area, 27.0);
    assert_eq!(result.statistics.std_area, 4.125);
    assert_eq!(result.statistics.mean_diameter, 3.61);
    assert_eq!(result.statistics.mean_solidity, 0.93125);
    assert_eq!(result.result_image_url, "/r1.png");
    assert_eq!(result.histogram_url, "/h1.png");

    let request = service.request_rx.await.expect("request body");
    assert_eq!(request, json!({ "image_name": "Campo 2" }));
    assert_eq!(service.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn server_error_uses_generic_message_regardless_of_body() {
    let service = spawn_segment_service(
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({ "success": false, "error": "model crashed" }).to_string(),
    )
    .await
    .expect("spawn service");
    let client = SegmentationClient::new(service.base_url.clone());

    let err = client.segment("Campo 1").await.expect_err("must fail");
    assert_eq!(err, RequestError::Server { status: 500 });

    let mut controller = RequestController::new();
    controller.select_image("Campo 1").expect("select");
    let state = controller.submit_with(&client).await.clone();
    assert_eq!(state, RequestState::Failed(SERVER_ERROR_MESSAGE.to_string()));
    assert_eq!(service.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn unsuccessful_flag_on_ok_status_is_a_server_failure() {
    let service = spawn_segment_service(StatusCode::OK, json!({ "success": false }).to_string())
        .await
        .expect("spawn service");
    let client = SegmentationClient::new(service.base_url.clone());

    let err = client.segment("Campo 3").await.expect_err("must fail");
    assert_eq!(err, RequestError::Server { status: 200 });
    assert_eq!(err.to_string(), SERVER_ERROR_MESSAGE);
}

#[tokio::test]
async fn malformed_success_body_fails_with_decode_description() {
    let service = spawn_segment_service(StatusCode::OK, "<html>oops</html>")
        .await
        .expect("spawn service");
    let client = SegmentationClient::new(service.base_url.clone());

    let err = client.segment("Campo 3R").await.expect_err("must fail");
    assert!(matches!(err, RequestError::Decode(_)), "unexpected error: {err:?}");
    assert_ne!(err.to_string(), TRANSPORT_FALLBACK_MESSAGE);
}

#[tokio::test]
async fn connection_refused_surfaces_transport_description() {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let client = SegmentationClient::new(format!("http://{addr}"));
    let mut controller = RequestController::new();
    controller.select_image("Campo 1").expect("select");

    let state = controller.submit_with(&client).await.clone();

    let message = match state {
        RequestState::Failed(message) => message,
        other => panic!("expected failure, got {other:?}"),
    };
    assert!(!message.is_empty());
    assert_ne!(message, SERVER_ERROR_MESSAGE);
    assert_ne!(message, TRANSPORT_FALLBACK_MESSAGE);
}

#[test]
fn base_url_is_trimmed_and_paths_are_joined() {
    let client = SegmentationClient::new(" https://seg.example.com/ ");
    assert_eq!(client.base_url(), "https://seg.example.com");
    assert_eq!(
        client.resolve_url("/results/r1.png"),
        "https://seg.example.com/results/r1.png"
    );
    assert_eq!(
        client.resolve_url("h1.png"),
        "https://seg.example.com/h1.png"
    );
    assert_eq!(
        client.resolve_url("https://cdn.example.com/r.png"),
        "https://cdn.example.com/r.png"
    );
}

#[test]
fn resolution_keeps_base_path_prefix() {
    assert_eq!(
        resolve_against("http://host:8000/seg/", "/static/r.png"),
        "http://host:8000/seg/static/r.png"
    );
}

#[tokio::test]
async fn fetch_bytes_maps_missing_asset_to_server_error() {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let app = Router::new().route(
        "/r1.png",
        axum::routing::get(|| async { (StatusCode::OK, vec![1u8, 2, 3]) }),
    );
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    let client = SegmentationClient::new(format!("http://{addr}"));

    let bytes = client
        .fetch_bytes(&client.resolve_url("/r1.png"))
        .await
        .expect("asset");
    assert_eq!(bytes, vec![1, 2, 3]);

    let err = client
        .fetch_bytes(&client.resolve_url("/missing.png"))
        .await
        .expect_err("missing asset");
    assert_eq!(err, RequestError::Server { status: 404 });
}
