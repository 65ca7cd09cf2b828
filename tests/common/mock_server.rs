//! Mock REST backend helpers
//!
//! Thin wrappers over `wiremock` for the endpoints the gateway calls.

use serde_json::Value;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub async fn start_backend() -> MockServer {
    MockServer::start().await
}

/// `GET /api/posts` answering `status` with `body`, at most `times` times
pub async fn mount_posts(server: &MockServer, status: u16, body: Value, times: Option<u64>) {
    let mock = Mock::given(method("GET"))
        .and(path("/api/posts"))
        .respond_with(ResponseTemplate::new(status).set_body_json(body));
    match times {
        Some(n) => mock.up_to_n_times(n).mount(server).await,
        None => mock.mount(server).await,
    }
}

/// `GET /api/reactions/user-reaction` answering with a raw label
pub async fn mount_user_reaction(server: &MockServer, status: u16, label: &str) {
    Mock::given(method("GET"))
        .and(path("/api/reactions/user-reaction"))
        .respond_with(ResponseTemplate::new(status).set_body_string(label))
        .mount(server)
        .await;
}
