#![allow(dead_code)]

use std::net::{SocketAddr, TcpListener};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{RawQuery, State};
use axum::http::header::{CONTENT_TYPE, COOKIE, SET_COOKIE, USER_AGENT};
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Router;
use serde_json::{json, Value};

pub const BATCHEXECUTE_PATH: &str = "/_/TranslateWebserverUi/data/batchexecute";

/// What the mock endpoint saw for one request
#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub query: Option<String>,
    pub user_agent: Option<String>,
    pub content_type: Option<String>,
    pub cookie: Option<String>,
    pub body: String,
}

impl RecordedRequest {
    // The decoded value of the f.req form field
    pub fn freq(&self) -> String {
        let encoded = self
            .body
            .strip_prefix("f.req=")
            .expect("Body should contain only the f.req field");

        urlencoding::decode(encoded)
            .expect("f.req should be percent-encoded UTF-8")
            .into_owned()
    }

    // The embedded instruction array, parsed out of its JSON string
    pub fn instruction(&self) -> Value {
        let outer: Value = serde_json::from_str(&self.freq()).expect("f.req should be JSON");
        let inner = outer[0][0][1]
            .as_str()
            .expect("Instruction should be an embedded JSON string");

        serde_json::from_str(inner).expect("Instruction should parse as JSON")
    }

    pub fn text(&self) -> String {
        self.instruction()[0][0].as_str().unwrap().to_string()
    }

    pub fn src_lang(&self) -> String {
        self.instruction()[0][1].as_str().unwrap().to_string()
    }

    pub fn dest_lang(&self) -> String {
        self.instruction()[0][2].as_str().unwrap().to_string()
    }
}

pub struct MockReply {
    pub status: StatusCode,
    pub body: String,
    pub set_cookie: Option<String>,
    pub delay: Option<Duration>,
}

impl MockReply {
    pub fn body(body: impl Into<String>) -> MockReply {
        MockReply {
            status: StatusCode::OK,
            body: body.into(),
            set_cookie: None,
            delay: None,
        }
    }

    pub fn translation(text: &str) -> MockReply {
        Self::body(response_body(text))
    }

    pub fn with_status(mut self, status: StatusCode) -> MockReply {
        self.status = status;
        self
    }

    pub fn with_cookie(mut self, cookie: &str) -> MockReply {
        self.set_cookie = Some(cookie.to_string());
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> MockReply {
        self.delay = Some(delay);
        self
    }
}

type Responder = dyn Fn(&RecordedRequest) -> MockReply + Send + Sync;

struct MockState {
    requests: Mutex<Vec<RecordedRequest>>,
    responder: Box<Responder>,
}

pub struct MockEndpoint {
    pub addr: SocketAddr,
    state: Arc<MockState>,
}

impl MockEndpoint {
    pub fn url(&self) -> String {
        format!("http://{}{}?rpcids=MkEWBc", self.addr, BATCHEXECUTE_PATH)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }
}

/// Builds a body shaped like a real batchexecute reply, with `text` at the
/// translated-text position of the embedded result.
pub fn response_body(text: &str) -> String {
    let inner = json!([
        [null, null, "en", [[[0, [[[null, 8]], [true]]]], 8]],
        [
            [[null, null, null, null, null, [[text, null, null, null, [[text, [5]]]]]]],
            "vi",
            1,
            "en",
            ["solution", "auto", "vi", true]
        ],
        "en",
        ["solution", null, null, null, null, [[["noun", [["giải pháp", null, null, 1]]]]]]
    ]);
    let envelope = json!([
        ["wrb.fr", "MkEWBc", inner.to_string(), null, null, null, "generic"],
        ["di", 52],
        ["af.httprm", 51, "-8241712305893046185", 14]
    ]);
    let envelope = envelope.to_string();

    format!(
        ")]}}'\n\n{}\n{}\n25\n[[\"e\",4,null,null,{}]]\n",
        envelope.len(),
        envelope,
        envelope.len() + 60
    )
}

async fn batchexecute(
    State(state): State<Arc<MockState>>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: String,
) -> Response {
    let header = |name: HeaderName| {
        headers
            .get(name)
            .and_then(|value: &HeaderValue| value.to_str().ok())
            .map(String::from)
    };

    let recorded = RecordedRequest {
        query,
        user_agent: header(USER_AGENT),
        content_type: header(CONTENT_TYPE),
        cookie: header(COOKIE),
        body,
    };

    let reply = (state.responder)(&recorded);
    state.requests.lock().unwrap().push(recorded);

    if let Some(delay) = reply.delay {
        tokio::time::sleep(delay).await;
    }

    let mut response = (reply.status, reply.body).into_response();
    if let Some(cookie) = reply.set_cookie {
        response
            .headers_mut()
            .insert(SET_COOKIE, HeaderValue::from_str(&cookie).unwrap());
    }

    response
}

// Spawns the mock endpoint on its own thread and tokio runtime, so blocking clients can call it
pub fn spawn_endpoint<F>(responder: F) -> MockEndpoint
where
    F: Fn(&RecordedRequest) -> MockReply + Send + Sync + 'static,
{
    let state = Arc::new(MockState {
        requests: Mutex::new(Vec::new()),
        responder: Box::new(responder),
    });

    let app = Router::new()
        .route(BATCHEXECUTE_PATH, post(batchexecute))
        .with_state(Arc::clone(&state));

    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind mock endpoint");
    let addr = listener.local_addr().unwrap();

    std::thread::spawn(move || {
        let runtime = tokio::runtime::Runtime::new().expect("Failed to build mock runtime");
        runtime.block_on(async move {
            axum::Server::from_tcp(listener)
                .expect("Failed to adopt mock listener")
                .serve(app.into_make_service())
                .await
                .expect("Mock endpoint stopped");
        });
    });

    MockEndpoint { addr, state }
}

// An address nothing listens on
pub fn closed_endpoint() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    format!("http://{}{}?rpcids=MkEWBc", addr, BATCHEXECUTE_PATH)
}
