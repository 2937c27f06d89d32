use reqwest::StatusCode;
use sentiment_api::application::ml::trainer::save_pipeline;
use sentiment_api::application::ml::{ModelLoader, ModelState};
use sentiment_api::application::prediction::PredictionService;
use sentiment_api::config::{AllowedOrigins, CorsEnvConfig};
use sentiment_api::domain::ml::SentimentPipeline;
use sentiment_api::interfaces::http::{AppState, build_router};
use serde_json::{Value, json};
use std::sync::Arc;

fn fitted_pipeline() -> SentimentPipeline {
    let rows = [
        ("This app is amazing, love it", "Positive"),
        ("Great service and fast delivery", "Positive"),
        ("Amazing food, excellent rider", "Positive"),
        ("Terrible app, always crashes", "Negative"),
        ("Worst delivery ever, cold food", "Negative"),
        ("Awful support, refund never came", "Negative"),
        ("It is okay, nothing special", "Neutral"),
        ("Average experience, delivery was fine", "Neutral"),
    ];
    let texts: Vec<String> = rows.iter().map(|(t, _)| t.to_string()).collect();
    let labels: Vec<String> = rows.iter().map(|(_, l)| l.to_string()).collect();

    let mut pipeline = SentimentPipeline::default();
    pipeline.fit(&texts, &labels).unwrap();
    pipeline
}

async fn spawn_app(model: ModelState, cors: CorsEnvConfig) -> String {
    let state = AppState::new(PredictionService::new(Arc::new(model)), &cors);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    format!("http://{}", addr)
}

async fn post_predict(base: &str, body: Value) -> (StatusCode, Value) {
    let resp = reqwest::Client::new()
        .post(format!("{}/predict", base))
        .json(&body)
        .send()
        .await
        .unwrap();
    let status = resp.status();
    (status, resp.json().await.unwrap())
}

#[tokio::test]
async fn test_health_and_ping_without_model() {
    let base = spawn_app(
        ModelState::unavailable("model file not found"),
        CorsEnvConfig::default(),
    )
    .await;
    let client = reqwest::Client::new();

    let health = client.get(format!("{}/health", base)).send().await.unwrap();
    assert_eq!(health.status(), StatusCode::OK);
    let body: Value = health.json().await.unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "sentiment-analyzer");
    assert!(body["timestamp"].is_string());

    let ping = client.get(format!("{}/ping", base)).send().await.unwrap();
    assert_eq!(ping.status(), StatusCode::OK);
    assert_eq!(ping.json::<Value>().await.unwrap(), json!({"message": "pong"}));
}

#[tokio::test]
async fn test_root_reports_model_status() {
    let base = spawn_app(ModelState::ready(fitted_pipeline()), CorsEnvConfig::default()).await;
    let body: Value = reqwest::get(format!("{}/", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["message"], "Sentiment Analysis API is running");
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(body["endpoints"]["predict"], "POST /predict");
    assert_eq!(body["model"]["loaded"], true);
    assert_eq!(body["model"]["version"], "v1");
}

#[tokio::test]
async fn test_predict_amazing_text() {
    let base = spawn_app(ModelState::ready(fitted_pipeline()), CorsEnvConfig::default()).await;
    let (status, body) = post_predict(&base, json!({"text": "This app is amazing!"})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["text"], "This app is amazing!");
    assert_eq!(body["text_length"], 20);
    assert!(body["timestamp"].is_string());

    let sentiment = body["sentiment"].as_str().unwrap();
    assert!(["positive", "neutral", "negative"].contains(&sentiment));
    let confidence = body["confidence"].as_f64().unwrap();
    assert!((0.0..=1.0).contains(&confidence));

    let probabilities = body["probabilities"].as_object().unwrap();
    assert_eq!(probabilities.len(), 3);
    assert!(probabilities.contains_key("positive"));
}

#[tokio::test]
async fn test_predict_is_idempotent() {
    let base = spawn_app(ModelState::ready(fitted_pipeline()), CorsEnvConfig::default()).await;
    let payload = json!({"text": "Delivery was late but the food was great"});

    let (_, first) = post_predict(&base, payload.clone()).await;
    let (_, second) = post_predict(&base, payload).await;
    assert_eq!(first["sentiment"], second["sentiment"]);
    assert_eq!(first["confidence"], second["confidence"]);
    assert_eq!(first["probabilities"], second["probabilities"]);
}

#[tokio::test]
async fn test_predict_rejects_empty_and_whitespace() {
    let base = spawn_app(ModelState::ready(fitted_pipeline()), CorsEnvConfig::default()).await;

    for text in ["", "   \n\t "] {
        let (status, body) = post_predict(&base, json!({ "text": text })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["detail"].as_str().unwrap().contains("empty"));
    }
}

#[tokio::test]
async fn test_predict_rejects_long_text_before_model_check() {
    let base = spawn_app(
        ModelState::unavailable("model file not found"),
        CorsEnvConfig::default(),
    )
    .await;
    let (status, body) = post_predict(&base, json!({ "text": "a".repeat(10_001) })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().unwrap().contains("too long"));
}

#[tokio::test]
async fn test_predict_without_model_is_unavailable() {
    let base = spawn_app(
        ModelState::unavailable("model file not found"),
        CorsEnvConfig::default(),
    )
    .await;
    let (status, body) = post_predict(&base, json!({"text": "Great app"})).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["detail"], "Model not loaded: model file not found");
}

#[tokio::test]
async fn test_predict_malformed_body() {
    let base = spawn_app(ModelState::ready(fitted_pipeline()), CorsEnvConfig::default()).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{}/predict", base))
        .header(reqwest::header::CONTENT_TYPE, "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(resp.json::<Value>().await.unwrap()["detail"].is_string());

    let (status, _) = post_predict(&base, json!({"message": "no text field"})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_model_loaded_from_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("models/sentiment_pipeline.json");
    save_pipeline(&fitted_pipeline(), &path).unwrap();

    let model = ModelLoader::load(&path);
    assert!(model.is_ready());

    let base = spawn_app(model, CorsEnvConfig::default()).await;
    let (status, body) = post_predict(&base, json!({"text": "Worst delivery, cold food"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sentiment"], "negative");
}

#[tokio::test]
async fn test_cors_allow_list() {
    let cors = CorsEnvConfig {
        allowed_origins: AllowedOrigins::List(vec!["http://localhost:3000".to_string()]),
    };
    let base = spawn_app(ModelState::unavailable("n/a"), cors).await;
    let client = reqwest::Client::new();

    let allowed = client
        .get(format!("{}/health", base))
        .header(reqwest::header::ORIGIN, "http://localhost:3000")
        .send()
        .await
        .unwrap();
    assert_eq!(
        allowed.headers()["access-control-allow-origin"],
        "http://localhost:3000"
    );

    let denied = client
        .get(format!("{}/health", base))
        .header(reqwest::header::ORIGIN, "http://evil.example")
        .send()
        .await
        .unwrap();
    assert!(
        denied
            .headers()
            .get("access-control-allow-origin")
            .is_none()
    );
}

#[tokio::test]
async fn test_cors_permissive_preflight() {
    let base = spawn_app(ModelState::unavailable("n/a"), CorsEnvConfig::permissive()).await;

    let resp = reqwest::Client::new()
        .request(reqwest::Method::OPTIONS, format!("{}/predict", base))
        .header(reqwest::header::ORIGIN, "https://anywhere.example")
        .header("access-control-request-method", "POST")
        .header("access-control-request-headers", "content-type")
        .send()
        .await
        .unwrap();

    assert!(resp.status().is_success());
    assert_eq!(resp.headers()["access-control-allow-origin"], "*");
}

#[tokio::test]
async fn test_plain_options_reaches_router() {
    let base = spawn_app(ModelState::unavailable("n/a"), CorsEnvConfig::permissive()).await;
    let client = reqwest::Client::new();

    let plain = client
        .request(reqwest::Method::OPTIONS, format!("{}/predict", base))
        .header(reqwest::header::ORIGIN, "https://anywhere.example")
        .send()
        .await
        .unwrap();
    assert_eq!(plain.status(), StatusCode::METHOD_NOT_ALLOWED);

    let unknown = client
        .request(reqwest::Method::OPTIONS, format!("{}/does-not-exist", base))
        .send()
        .await
        .unwrap();
    assert_eq!(unknown.status(), StatusCode::NOT_FOUND);
}

