//! In-process stand-in for the Health Plus backend, used by tests.
//!
//! Every request is recorded (method, path, `Authorization` header). Any
//! request carrying `Bearer expired` is rejected with 401 before reaching a
//! handler, whatever the endpoint.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Multipart, Path, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::task::JoinHandle;

use crate::models::UserIdentity;

#[derive(Debug, Clone)]
pub(crate) struct SeenRequest {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct Recorder(Arc<Mutex<Vec<SeenRequest>>>);

impl Recorder {
    pub fn requests(&self) -> Vec<SeenRequest> {
        self.0.lock().unwrap().clone()
    }
}

pub(crate) struct TestBackend {
    pub base_url: String,
    pub recorder: Recorder,
    handle: JoinHandle<()>,
}

impl Drop for TestBackend {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

pub(crate) fn test_user() -> UserIdentity {
    UserIdentity {
        id: "1".to_string(),
        name: "A".to_string(),
        email: "a@b.com".to_string(),
    }
}

/// Starts the fake backend on an ephemeral port.
pub(crate) async fn spawn_backend() -> TestBackend {
    let recorder = Recorder::default();

    let routes = Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .route("/dashboard", get(dashboard))
        .route("/family-members", get(list_members).post(create_member))
        .route("/family-members/{id}", get(get_member).put(update_member))
        .route(
            "/family-members/{id}/reports",
            get(list_reports).post(upload_report),
        )
        .route("/ai/health-query", post(health_query))
        .layer(middleware::from_fn(reject_expired));

    let app = Router::new()
        .nest("/api", routes)
        .layer(middleware::from_fn_with_state(recorder.clone(), record));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestBackend {
        base_url: format!("http://{}/api", addr),
        recorder,
        handle,
    }
}

async fn record(State(recorder): State<Recorder>, request: Request, next: Next) -> Response {
    let seen = {
        let header_value = |name: header::HeaderName| {
            request
                .headers()
                .get(name)
                .and_then(|h| h.to_str().ok())
                .map(str::to_string)
        };

        SeenRequest {
            method: request.method().to_string(),
            path: request.uri().path().to_string(),
            authorization: header_value(header::AUTHORIZATION),
            content_type: header_value(header::CONTENT_TYPE),
        }
    };
    recorder.0.lock().unwrap().push(seen);

    next.run(request).await
}

async fn reject_expired(request: Request, next: Next) -> Response {
    let expired = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        == Some("Bearer expired");

    if expired {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"message": "Token expired"})),
        )
            .into_response();
    }

    next.run(request).await
}

fn member_json(id: &str, name: &str) -> Value {
    json!({
        "_id": id,
        "name": name,
        "age": 42,
        "gender": "female",
        "relationship": "mother",
        "medications": [{"name": "Metformin", "dosage": "500mg", "frequency": "daily"}],
        "reports": [{"_id": "r1", "title": "Blood work", "cloudinaryUrl": "https://files.example/r1.pdf", "aiAnalysis": "Normal"}]
    })
}

#[derive(Deserialize)]
struct LoginBody {
    email: String,
    password: String,
}

async fn login(Json(body): Json<LoginBody>) -> Response {
    if body.password != "pw" {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"message": "Invalid email or password"})),
        )
            .into_response();
    }

    Json(json!({
        "token": "abc",
        "user": {"id": "1", "name": "A", "email": body.email}
    }))
    .into_response()
}

#[derive(Deserialize)]
struct RegisterBody {
    name: String,
    email: String,
    password: String,
}

async fn register(Json(body): Json<RegisterBody>) -> Response {
    if body.email == "taken@b.com" {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"message": "User already exists"})),
        )
            .into_response();
    }
    if body.password.is_empty() {
        return StatusCode::BAD_REQUEST.into_response();
    }

    (
        StatusCode::CREATED,
        Json(json!({
            "token": "new-token",
            "user": {"id": "2", "name": body.name, "email": body.email}
        })),
    )
        .into_response()
}

async fn dashboard() -> Json<Value> {
    Json(json!({
        "familyMembers": [member_json("m1", "Asha"), member_json("m2", "Ravi")]
    }))
}

async fn list_members() -> Json<Value> {
    Json(json!({"familyMembers": [member_json("m1", "Asha")]}))
}

async fn get_member(Path(id): Path<String>) -> Response {
    match id.as_str() {
        "missing" => (
            StatusCode::NOT_FOUND,
            Json(json!({"message": "Family member not found"})),
        )
            .into_response(),
        // Some deployments answer with the bare member
        "bare" => Json(member_json("bare", "Bare")).into_response(),
        _ => Json(json!({"familyMember": member_json(&id, "Asha")})).into_response(),
    }
}

async fn create_member(Json(body): Json<Value>) -> Response {
    let mut member = body;
    member["_id"] = json!("new-id");
    (
        StatusCode::CREATED,
        Json(json!({"message": "Family member added", "familyMember": member})),
    )
        .into_response()
}

async fn update_member(Path(id): Path<String>, Json(body): Json<Value>) -> Json<Value> {
    let mut member = member_json(&id, "Asha");
    if let (Some(target), Some(changes)) = (member.as_object_mut(), body.as_object()) {
        for (key, value) in changes {
            target.insert(key.clone(), value.clone());
        }
    }
    Json(member)
}

async fn list_reports(Path(id): Path<String>) -> Json<Value> {
    Json(json!([
        {"_id": "r1", "title": format!("Report for {}", id), "cloudinaryUrl": "https://files.example/r1.pdf", "aiAnalysis": "Normal", "uploadDate": "2024-05-01"}
    ]))
}

async fn upload_report(Path(id): Path<String>, mut multipart: Multipart) -> Response {
    let mut title = None;
    let mut file = None;

    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "title" => title = field.text().await.ok(),
            "report" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().unwrap_or_default().to_string();
                let bytes = field.bytes().await.map(|b| b.len()).unwrap_or(0);
                file = Some((file_name, content_type, bytes));
            }
            _ => {}
        }
    }

    let (Some(title), Some((file_name, content_type, bytes))) = (title, file) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"message": "No file uploaded"})),
        )
            .into_response();
    };

    (
        StatusCode::CREATED,
        Json(json!({
            "message": "Report uploaded",
            "report": {
                "_id": "r-new",
                "title": title,
                "cloudinaryUrl": format!("https://files.example/{}/{}", id, file_name),
                "aiAnalysis": format!("{} {} bytes", content_type, bytes)
            }
        })),
    )
        .into_response()
}

#[derive(Deserialize)]
struct QueryBody {
    question: String,
}

async fn health_query(Json(body): Json<QueryBody>) -> Response {
    match body.question.as_str() {
        "teapot" => StatusCode::IM_A_TEAPOT.into_response(),
        "boom" => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"message": "AI service unavailable"})),
        )
            .into_response(),
        "malformed" => (StatusCode::OK, "not json").into_response(),
        "slow" => {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(json!({"response": "late"})).into_response()
        }
        question => Json(json!({
            "response": format!("You asked: {}", question),
            "timestamp": "2024-05-01T10:00:00.000Z"
        }))
        .into_response(),
    }
}
