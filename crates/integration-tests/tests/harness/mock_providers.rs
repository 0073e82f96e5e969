//! Mock upstream providers for integration tests
//!
//! A single axum server stands in for every upstream API. Each provider
//! lives under its own prefix so one mock can back a whole configuration.

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;

/// Job id handed out by the mock Horde
pub const HORDE_JOB_ID: &str = "abc123";

/// Script text returned by the mock chat completion
pub const MOCK_SCRIPT: &str = "Scene 1: A fox wakes up.\nScene 2: The fox finds a lantern.";

/// Bytes returned by the mock text-to-video model
pub const MOCK_VIDEO: &[u8] = b"mock-clip";

struct MockState {
    horde_submits: AtomicU32,
    horde_checks: AtomicU32,
    horde_fetches: AtomicU32,
    /// Checks answered as pending before the job reports done
    horde_pending_checks: AtomicU32,
    horde_faulted: AtomicBool,
    horde_generations: Mutex<Vec<String>>,
    chat_requests: AtomicU32,
    image_requests: AtomicU32,
    video_requests: AtomicU32,
    video_fails: AtomicBool,
    avatar_requests: AtomicU32,
}

/// A mock upstream server bound to a random port
pub struct MockProviders {
    addr: SocketAddr,
    state: Arc<MockState>,
    shutdown: CancellationToken,
}

impl MockProviders {
    /// Start the mock server
    ///
    /// The Horde job completes on the third status check and yields one
    /// generation, `BASE64DATA`.
    pub async fn start() -> anyhow::Result<Self> {
        let state = Arc::new(MockState {
            horde_submits: AtomicU32::new(0),
            horde_checks: AtomicU32::new(0),
            horde_fetches: AtomicU32::new(0),
            horde_pending_checks: AtomicU32::new(2),
            horde_faulted: AtomicBool::new(false),
            horde_generations: Mutex::new(vec!["BASE64DATA".to_string()]),
            chat_requests: AtomicU32::new(0),
            image_requests: AtomicU32::new(0),
            video_requests: AtomicU32::new(0),
            video_fails: AtomicBool::new(false),
            avatar_requests: AtomicU32::new(0),
        });

        let app = Router::new()
            .route("/horde/generate/async", post(horde_submit))
            .route("/horde/generate/check/{id}", get(horde_check))
            .route("/horde/generate/status/{id}", get(horde_status))
            .route("/openai/chat/completions", post(chat_completion))
            .route("/openai/images/generations", post(image_generation))
            .route("/hf/models/{*model}", post(text_to_video))
            .route("/heygen/videos", get(avatar_list_videos).post(avatar_create_video))
            .route("/heygen/videos/{id}", get(avatar_get_video).delete(avatar_delete_video))
            .route("/heygen/avatars", get(avatar_list_avatars))
            .route("/heygen/voices", get(avatar_list_voices))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let token = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move { token.cancelled().await })
                .await
                .ok();
        });

        Ok(Self { addr, state, shutdown })
    }

    fn url(&self, prefix: &str) -> String {
        format!("http://{}/{prefix}", self.addr)
    }

    pub fn horde_url(&self) -> String {
        self.url("horde")
    }

    pub fn openai_url(&self) -> String {
        self.url("openai")
    }

    pub fn hf_url(&self) -> String {
        self.url("hf")
    }

    pub fn heygen_url(&self) -> String {
        self.url("heygen")
    }

    /// Number of pending answers before the Horde job is done
    ///
    /// `u32::MAX` keeps the job pending forever.
    pub fn set_horde_pending_checks(&self, checks: u32) {
        self.state.horde_pending_checks.store(checks, Ordering::Relaxed);
    }

    /// Make every Horde status check report a faulted job
    pub fn fault_horde_jobs(&self) {
        self.state.horde_faulted.store(true, Ordering::Relaxed);
    }

    /// Replace the generations returned once the Horde job is done
    pub fn set_horde_generations(&self, generations: &[&str]) {
        if let Ok(mut stored) = self.state.horde_generations.lock() {
            *stored = generations.iter().map(|g| (*g).to_string()).collect();
        }
    }

    /// Make the text-to-video model answer with a server error
    pub fn fail_video(&self) {
        self.state.video_fails.store(true, Ordering::Relaxed);
    }

    pub fn horde_submit_count(&self) -> u32 {
        self.state.horde_submits.load(Ordering::Relaxed)
    }

    pub fn horde_check_count(&self) -> u32 {
        self.state.horde_checks.load(Ordering::Relaxed)
    }

    pub fn horde_fetch_count(&self) -> u32 {
        self.state.horde_fetches.load(Ordering::Relaxed)
    }

    pub fn chat_count(&self) -> u32 {
        self.state.chat_requests.load(Ordering::Relaxed)
    }

    pub fn image_count(&self) -> u32 {
        self.state.image_requests.load(Ordering::Relaxed)
    }

    pub fn video_count(&self) -> u32 {
        self.state.video_requests.load(Ordering::Relaxed)
    }

    pub fn avatar_count(&self) -> u32 {
        self.state.avatar_requests.load(Ordering::Relaxed)
    }

    /// Total upstream calls of any kind
    pub fn total_calls(&self) -> u32 {
        self.horde_submit_count()
            + self.horde_check_count()
            + self.horde_fetch_count()
            + self.chat_count()
            + self.image_count()
            + self.video_count()
            + self.avatar_count()
    }
}

impl Drop for MockProviders {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

// -- Horde --

async fn horde_submit(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Json<Value> {
    state.horde_submits.fetch_add(1, Ordering::Relaxed);
    assert!(body["prompt"].is_string(), "Horde submit without prompt: {body}");

    Json(json!({"id": HORDE_JOB_ID, "kudos": 10}))
}

async fn horde_check(State(state): State<Arc<MockState>>, Path(_id): Path<String>) -> Json<Value> {
    let seen = state.horde_checks.fetch_add(1, Ordering::Relaxed);

    if state.horde_faulted.load(Ordering::Relaxed) {
        return Json(json!({"done": false, "faulted": true, "is_possible": true}));
    }

    let done = seen >= state.horde_pending_checks.load(Ordering::Relaxed);
    Json(json!({"done": done, "faulted": false, "is_possible": true, "wait_time": 1}))
}

async fn horde_status(State(state): State<Arc<MockState>>, Path(_id): Path<String>) -> Json<Value> {
    state.horde_fetches.fetch_add(1, Ordering::Relaxed);

    let generations: Vec<Value> = state
        .horde_generations
        .lock()
        .map(|stored| stored.iter().map(|img| json!({"img": img})).collect())
        .unwrap_or_default();

    Json(json!({"done": true, "generations": generations}))
}

// -- OpenAI --

async fn chat_completion(State(state): State<Arc<MockState>>, Json(_body): Json<Value>) -> Json<Value> {
    state.chat_requests.fetch_add(1, Ordering::Relaxed);

    Json(json!({
        "id": "chatcmpl-mock",
        "object": "chat.completion",
        "choices": [{"index": 0, "message": {"role": "assistant", "content": MOCK_SCRIPT}, "finish_reason": "stop"}]
    }))
}

async fn image_generation(State(state): State<Arc<MockState>>, Json(_body): Json<Value>) -> Json<Value> {
    state.image_requests.fetch_add(1, Ordering::Relaxed);

    Json(json!({"created": 0, "data": [{"b64_json": "aW1hZ2U="}]}))
}

// -- Hugging Face --

async fn text_to_video(State(state): State<Arc<MockState>>, Path(_model): Path<String>) -> axum::response::Response {
    state.video_requests.fetch_add(1, Ordering::Relaxed);

    if state.video_fails.load(Ordering::Relaxed) {
        return (axum::http::StatusCode::SERVICE_UNAVAILABLE, "model is loading").into_response();
    }

    ([(header::CONTENT_TYPE, "video/mp4")], MOCK_VIDEO).into_response()
}

// -- HeyGen --

async fn avatar_create_video(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Json<Value> {
    state.avatar_requests.fetch_add(1, Ordering::Relaxed);

    Json(json!({"error": null, "data": {"video_id": "vid_1", "avatar_id": body["avatar_id"]}}))
}

async fn avatar_list_videos(State(state): State<Arc<MockState>>) -> Json<Value> {
    state.avatar_requests.fetch_add(1, Ordering::Relaxed);

    Json(json!({"data": {"videos": [{"video_id": "vid_1", "status": "completed"}]}}))
}

async fn avatar_get_video(State(state): State<Arc<MockState>>, Path(id): Path<String>) -> Json<Value> {
    state.avatar_requests.fetch_add(1, Ordering::Relaxed);

    Json(json!({"data": {"video_id": id, "status": "processing"}}))
}

async fn avatar_delete_video(State(state): State<Arc<MockState>>, Path(_id): Path<String>) -> Json<Value> {
    state.avatar_requests.fetch_add(1, Ordering::Relaxed);

    Json(json!({"code": 100, "data": null}))
}

async fn avatar_list_avatars(State(state): State<Arc<MockState>>) -> Json<Value> {
    state.avatar_requests.fetch_add(1, Ordering::Relaxed);

    Json(json!({"data": {"avatars": [{"avatar_id": "wayne-public"}]}}))
}

async fn avatar_list_voices(State(state): State<Arc<MockState>>) -> Json<Value> {
    state.avatar_requests.fetch_add(1, Ordering::Relaxed);

    Json(json!({"data": {"voices": [{"voice_id": "en_us_001"}]}}))
}
