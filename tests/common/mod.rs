use serde::Deserialize;
use serde_json::json;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

use pizza_assistant::config::Config;

#[allow(dead_code)]
pub const REVIEWS: &str = r#"
- title: Soggy in the middle
  date: "2024-03-02"
  rating: 2
  review: The crust was soggy and the cheese slid right off.
- title: Worth the wait
  date: "2024-03-09"
  rating: 5
  review: Blistered crust with a bright tomato sauce.
- title: Cold on arrival
  date: "2024-04-11"
  rating: 1
  review: Delivery took ninety minutes and the driver was rude.
"#;

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}

/// Write `contents` as the review dataset in `dir`
#[allow(dead_code)]
pub fn write_reviews(dir: &TempDir, contents: &str) -> PathBuf {
    let path = dir.path().join("reviews.yaml");
    fs::write(&path, contents).expect("failed to write reviews");
    path
}

/// Config pointing every call at `server`, with data and cache under `dir`
#[allow(dead_code)]
pub fn config_for(server: &MockServer, dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.provider.host = server.uri();
    config.provider.model = "llama3.2:latest".to_string();
    config.provider.timeout_seconds = 5;
    config.retrieval.reviews_path = write_reviews(dir, REVIEWS);
    config.retrieval.cache_path = Some(dir.path().join("cache").join("index.json"));
    config.retrieval.top_k = 2;
    config
}

/// Serve `/api/tags` listing `models`
#[allow(dead_code)]
pub async fn mount_tags(server: &MockServer, models: &[&str]) {
    let models: Vec<_> = models
        .iter()
        .map(|name| json!({"name": name, "size": 2019393189u64}))
        .collect();
    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "models": models })))
        .mount(server)
        .await;
}

/// Serve `/api/generate` with a fixed answer
#[allow(dead_code)]
pub async fn mount_generate(server: &MockServer, answer: &str) {
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "model": "llama3.2:latest",
            "response": answer,
            "done": true,
            "prompt_eval_count": 120,
            "eval_count": 12
        })))
        .mount(server)
        .await;
}

/// Serve `/api/embed` with keyword-count embeddings
#[allow(dead_code)]
pub async fn mount_embed(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/embed"))
        .respond_with(KeywordEmbeddings)
        .mount(server)
        .await;
}

/// Requests received on `endpoint`
#[allow(dead_code)]
pub async fn requests_to(server: &MockServer, endpoint: &str) -> Vec<Request> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|request| request.url.path() == endpoint)
        .collect()
}

/// Prompt sent in an `/api/generate` request
#[allow(dead_code)]
pub fn prompt_of(request: &Request) -> String {
    let body: serde_json::Value =
        serde_json::from_slice(&request.body).expect("generate body is JSON");
    body["prompt"].as_str().unwrap_or_default().to_string()
}

#[allow(dead_code)]
const KEYWORDS: [&str; 5] = ["crust", "sauce", "cheese", "delivery", "driver"];

#[allow(dead_code)]
#[derive(Deserialize)]
struct EmbedBody {
    input: Vec<String>,
}

/// One dimension per keyword, counting occurrences
#[allow(dead_code)]
struct KeywordEmbeddings;

impl Respond for KeywordEmbeddings {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let body: EmbedBody = match serde_json::from_slice(&request.body) {
            Ok(body) => body,
            Err(_) => return ResponseTemplate::new(400),
        };
        let embeddings: Vec<Vec<f32>> = body
            .input
            .iter()
            .map(|text| {
                let text = text.to_lowercase();
                KEYWORDS
                    .iter()
                    .map(|keyword| text.matches(keyword).count() as f32)
                    .collect()
            })
            .collect();
        ResponseTemplate::new(200).set_body_json(json!({
            "model": "mxbai-embed-large",
            "embeddings": embeddings
        }))
    }
}
