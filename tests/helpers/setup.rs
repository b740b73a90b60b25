use actix_web::http::StatusCode;
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
use clinic_queue_sdk::ClinicSDK;
use std::collections::VecDeque;
use std::net::TcpListener;
use std::sync::Mutex;

/// A request received by the stub api
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub query: String,
    pub api_key: Option<String>,
}

struct StubState {
    script: Mutex<VecDeque<(StatusCode, String)>>,
    fallback: Mutex<(StatusCode, String)>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl Default for StubState {
    fn default() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: Mutex::new((StatusCode::OK, r#"{"appointments":[]}"#.into())),
            requests: Mutex::new(Vec::new()),
        }
    }
}

/// Clinic REST api answering the appointment queue from a script
pub struct StubApi {
    pub address: String,
    state: web::Data<StubState>,
}

impl StubApi {
    /// Queue a response for the next appointment request
    pub fn push(&self, status: StatusCode, body: &str) {
        self.state
            .script
            .lock()
            .unwrap()
            .push_back((status, body.to_string()));
    }

    /// Response given once the script is exhausted
    pub fn respond_with(&self, status: StatusCode, body: &str) {
        *self.state.fallback.lock().unwrap() = (status, body.to_string());
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn sdk(&self, api_key: Option<&str>) -> ClinicSDK {
        ClinicSDK::new(self.address.clone(), api_key.map(String::from))
    }
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "message": "Yo! We are up!\r\n" }))
}

async fn doctor_appointments(state: web::Data<StubState>, req: HttpRequest) -> HttpResponse {
    state.requests.lock().unwrap().push(RecordedRequest {
        path: req.path().to_string(),
        query: req.query_string().to_string(),
        api_key: req
            .headers()
            .get("x-api-key")
            .and_then(|key| key.to_str().ok())
            .map(String::from),
    });

    let scripted = state.script.lock().unwrap().pop_front();
    let (status, body) = match scripted {
        Some(res) => res,
        None => state.fallback.lock().unwrap().clone(),
    };
    HttpResponse::build(status)
        .content_type("application/json")
        .body(body)
}

// Launch the stub api as a background task on a random port
pub fn spawn_stub_api() -> StubApi {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    let state = web::Data::new(StubState::default());
    let server_state = state.clone();
    let server = HttpServer::new(move || {
        App::new()
            .app_data(server_state.clone())
            .route("/api/v1/", web::get().to(health))
            .route(
                "/api/v1/appointments/doctor/{doctor_id}",
                web::get().to(doctor_appointments),
            )
    })
    .workers(1)
    .listen(listener)
    .expect("Failed to listen on the random port")
    .run();
    let _ = tokio::spawn(server);

    StubApi {
        address: format!("http://127.0.0.1:{}/api/v1", port),
        state,
    }
}
