use super::*;
use axum::{
    extract::State,
    http::{header, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use shared::domain::{EmbarkPort, PassengerClass, Sex};
use tokio::{net::TcpListener, sync::Mutex};

use crate::error::BACKEND_UNAVAILABLE_NOTICE;

#[derive(Clone)]
struct ServerState {
    health_status: StatusCode,
    predict_status: StatusCode,
    predict_body: String,
    received: Arc<Mutex<Vec<Value>>>,
}

impl ServerState {
    fn new(predict_status: StatusCode, predict_body: Value) -> Self {
        Self {
            health_status: StatusCode::OK,
            predict_status,
            predict_body: predict_body.to_string(),
            received: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

async fn handle_health(State(state): State<ServerState>) -> (StatusCode, Json<Value>) {
    (
        state.health_status,
        Json(json!({"status": "connected", "model_loaded": true})),
    )
}

async fn handle_predict(
    State(state): State<ServerState>,
    Json(payload): Json<Value>,
) -> (StatusCode, [(header::HeaderName, &'static str); 1], String) {
    state.received.lock().await.push(payload);
    (
        state.predict_status,
        [(header::CONTENT_TYPE, "application/json")],
        state.predict_body.clone(),
    )
}

async fn spawn_predictor(state: ServerState) -> Result<Url, Box<dyn std::error::Error>> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let app = Router::new()
        .route("/health", get(handle_health))
        .route("/predict", post(handle_predict))
        .with_state(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(Url::parse(&format!("http://{addr}"))?)
}

async fn unreachable_url() -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    Url::parse(&format!("http://{addr}")).expect("url")
}

fn rose_input() -> PassengerInput {
    PassengerInput {
        class: PassengerClass::First,
        sex: Sex::Female,
        age: 17.0,
        siblings_spouses: 0,
        parents_children: 2,
        fare: 80.0,
        embark_port: EmbarkPort::Southampton,
    }
}

fn rose_response() -> Value {
    json!({
        "survived": true,
        "prediction": "Survived",
        "survival_probability": 0.91,
        "confidence": 0.95,
        "input_data": {
            "class": 1,
            "gender": "female",
            "age": 17,
            "family_size": 2,
            "fare": 80,
        },
    })
}

#[tokio::test]
async fn health_check_succeeds_on_success_status() {
    let url = spawn_predictor(ServerState::new(StatusCode::OK, rose_response()))
        .await
        .expect("spawn server");
    let client = HttpPredictionClient::new(url).expect("client");

    client.check_health().await.expect("healthy");
}

#[tokio::test]
async fn health_check_reports_service_error_on_non_success_status() {
    let mut state = ServerState::new(StatusCode::OK, rose_response());
    state.health_status = StatusCode::SERVICE_UNAVAILABLE;
    let url = spawn_predictor(state).await.expect("spawn server");
    let client = HttpPredictionClient::new(url).expect("client");

    let err = client.check_health().await.expect_err("must fail");
    assert_eq!(err.kind(), FailureKind::Service);
}

#[tokio::test]
async fn health_check_reports_transport_error_when_unreachable() {
    let client = HttpPredictionClient::new(unreachable_url().await).expect("client");

    let err = client.check_health().await.expect_err("must fail");
    assert_eq!(err.kind(), FailureKind::Transport);
    assert_eq!(err.user_notice(), BACKEND_UNAVAILABLE_NOTICE);
}

#[tokio::test]
async fn predict_sends_semantic_values_and_parses_result() {
    let state = ServerState::new(StatusCode::OK, rose_response());
    let received = Arc::clone(&state.received);
    let url = spawn_predictor(state).await.expect("spawn server");
    let client = HttpPredictionClient::new(url).expect("client");

    let result = client.predict(&rose_input()).await.expect("predict");

    assert!(result.survived);
    assert_eq!(result.label, "Survived");
    assert_eq!(result.survival_probability, 0.91);
    assert_eq!(result.echoed_input.family_size, 2);

    let received = received.lock().await;
    assert_eq!(received.len(), 1);
    assert_eq!(
        received[0],
        json!({
            "Pclass": 1,
            "Sex": "female",
            "Age": 17.0,
            "SibSp": 0,
            "Parch": 2,
            "Fare": 80.0,
            "Embarked": "S",
        })
    );
}

#[tokio::test]
async fn predict_keeps_service_error_detail_for_diagnostics() {
    let url = spawn_predictor(ServerState::new(
        StatusCode::SERVICE_UNAVAILABLE,
        json!({"error": "Model not loaded"}),
    ))
    .await
    .expect("spawn server");
    let client = HttpPredictionClient::new(url).expect("client");

    let err = client.predict(&rose_input()).await.expect_err("must fail");
    match &err {
        ClientError::Service { status, detail } => {
            assert_eq!(*status, StatusCode::SERVICE_UNAVAILABLE);
            assert_eq!(detail.as_deref(), Some("Model not loaded"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.user_notice(), BACKEND_UNAVAILABLE_NOTICE);
    assert!(err.to_string().contains("Model not loaded"));
}

#[tokio::test]
async fn predict_treats_incomplete_body_as_malformed() {
    let url = spawn_predictor(ServerState::new(
        StatusCode::OK,
        json!({"survived": true, "prediction": "Survived"}),
    ))
    .await
    .expect("spawn server");
    let client = HttpPredictionClient::new(url).expect("client");

    let err = client.predict(&rose_input()).await.expect_err("must fail");
    assert_eq!(err.kind(), FailureKind::MalformedResponse);
    assert!(err.affects_connectivity());
    assert_eq!(err.user_notice(), BACKEND_UNAVAILABLE_NOTICE);
}

#[tokio::test]
async fn predict_reports_transport_error_when_unreachable() {
    let client = HttpPredictionClient::new(unreachable_url().await).expect("client");

    let err = client.predict(&rose_input()).await.expect_err("must fail");
    assert_eq!(err.kind(), FailureKind::Transport);
}

#[test]
fn client_joins_endpoints_under_base_path() {
    let client =
        HttpPredictionClient::new(Url::parse("http://localhost:5000/api").expect("url"))
            .expect("client");
    assert_eq!(client.health_url.as_str(), "http://localhost:5000/api/health");
    assert_eq!(client.predict_url.as_str(), "http://localhost:5000/api/predict");
}

#[test]
fn client_builds_from_settings() {
    let settings = ClientSettings {
        server_url: "http://predictor:8000".into(),
        request_timeout_secs: Some(3),
        probe_on_startup: false,
    };
    let client = HttpPredictionClient::from_settings(&settings).expect("client");
    assert_eq!(client.predict_url.as_str(), "http://predictor:8000/predict");

    let bad = ClientSettings {
        server_url: "predictor".into(),
        ..ClientSettings::default()
    };
    assert!(HttpPredictionClient::from_settings(&bad).is_err());
}
