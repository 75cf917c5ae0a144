//! Integration tests for the backend client
//!
//! Each test serves one canned HTTP response from a local axum router and
//! inspects the request the client sent.

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use freshair::api::{ApiClient, ApiError, ApiErrorKind, ChatBackend, ChatRequest, LoginRequest};
use freshair::config::AppConfig;
use freshair::types::{Language, MessageId, Sender, SessionId, UserRole};
use freshair::upload::SelectedFile;
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

struct Recorded {
    method: Method,
    path: String,
    headers: HeaderMap,
    body: Bytes,
}

impl Recorded {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("request body is json")
    }

    fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

#[derive(Clone)]
struct Canned {
    status: StatusCode,
    body: String,
    seen: Arc<Mutex<Option<oneshot::Sender<Recorded>>>>,
}

async fn answer(
    State(canned): State<Canned>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let recorded = Recorded {
        method,
        path: uri.path().to_string(),
        headers,
        body,
    };
    if let Some(tx) = canned.seen.lock().unwrap().take() {
        let _ = tx.send(recorded);
    }
    (
        canned.status,
        [(header::CONTENT_TYPE, "application/json")],
        canned.body,
    )
        .into_response()
}

/// Answers every request with `status` and `body`; the handle resolves to the
/// first request received.
async fn serve_once(status: u16, body: &str) -> (ApiClient, JoinHandle<Recorded>) {
    let (tx, rx) = oneshot::channel();
    let canned = Canned {
        status: StatusCode::from_u16(status).expect("valid status"),
        body: body.to_string(),
        seen: Arc::new(Mutex::new(Some(tx))),
    };
    let app = Router::new().fallback(answer).with_state(canned);

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });

    let recorded = tokio::spawn(async move { rx.await.expect("request recorded") });
    let client = ApiClient::new(&AppConfig::new(&format!("http://{addr}/")));
    (client, recorded)
}

fn login_request() -> LoginRequest {
    LoginRequest {
        email: "asha@example.com".into(),
        password: "secret".into(),
        role: UserRole::Farmer,
    }
}

mod chat_tests {
    use super::*;

    #[tokio::test]
    async fn test_send_chat_posts_camel_case_body() {
        let (client, server) = serve_once(200, r#"{"reply":"hi","sessionId":"sess_42"}"#).await;
        let request = ChatRequest {
            prompt: "hello".into(),
            session_id: SessionId::new("sess_1"),
            lang: Language::Ta,
        };

        let reply = client.send_chat(&request).await.expect("reply");

        assert_eq!(reply.reply, "hi");
        assert_eq!(reply.session_id, Some(SessionId::new("sess_42")));
        let recorded = server.await.unwrap();
        assert_eq!(recorded.method, Method::POST);
        assert_eq!(recorded.path, "/api/chat");
        assert_eq!(
            recorded.json(),
            json!({"prompt": "hello", "sessionId": "sess_1", "lang": "ta"})
        );
    }

    #[tokio::test]
    async fn test_blank_session_id_is_ignored() {
        let (client, server) = serve_once(200, r#"{"reply":"hi","sessionId":"  "}"#).await;
        let request = ChatRequest {
            prompt: "hello".into(),
            session_id: SessionId::new("sess_1"),
            lang: Language::En,
        };

        let reply = client.send_chat(&request).await.expect("reply");

        assert_eq!(reply.session_id, None);
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_missing_reply_is_malformed() {
        let (client, server) = serve_once(200, r#"{"sessionId":"sess_1"}"#).await;
        let request = ChatRequest {
            prompt: "hello".into(),
            session_id: SessionId::new("sess_1"),
            lang: Language::En,
        };

        let err = client.send_chat(&request).await.unwrap_err();

        assert_eq!(err.kind(), ApiErrorKind::Malformed);
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_list_chats_reads_summaries() {
        let (client, server) = serve_once(
            200,
            r#"[{"sessionId":"sess_1","title":"Paddy pests","updatedAt":1700000000000},{"sessionId":"sess_2","title":""}]"#,
        )
        .await;

        let chats = client.list_chats().await.expect("chats");

        assert_eq!(chats.len(), 2);
        assert_eq!(chats[0].title, "Paddy pests");
        assert_eq!(chats[0].updated_at, Some(1_700_000_000_000));
        assert_eq!(chats[1].display_title(), "New chat");
        let recorded = server.await.unwrap();
        assert_eq!(recorded.method, Method::GET);
        assert_eq!(recorded.path, "/api/chats");
    }

    #[tokio::test]
    async fn test_chat_history_encodes_session_id() {
        let (client, server) = serve_once(
            200,
            r#"[{"id":1,"from":"user","text":"hello"},{"id":"m2","from":"bot","text":"hi"},{"id":-1.5,"from":"bot","text":"imported"}]"#,
        )
        .await;

        let log = client
            .chat_history(&SessionId::new("sess 1/x"))
            .await
            .expect("history");

        assert_eq!(log.len(), 3);
        assert_eq!(log[0].id, MessageId::Number(1));
        assert_eq!(log[1].id, MessageId::Text("m2".into()));
        assert_eq!(log[1].from, Sender::Bot);
        assert_eq!(log[2].id.to_string(), "-1.5");
        let recorded = server.await.unwrap();
        assert_eq!(recorded.path, "/api/chat/sess%201%2Fx");
    }

    #[tokio::test]
    async fn test_server_error_uses_default_message() {
        let (client, server) = serve_once(500, "oops").await;

        let err = client.list_chats().await.unwrap_err();

        assert_eq!(
            err,
            ApiError::Status {
                status: 500,
                message: "Failed to load chats".into()
            }
        );
        server.await.unwrap();
    }
}

mod auth_tests {
    use super::*;

    #[tokio::test]
    async fn test_login_returns_token_and_user() {
        let (client, server) = serve_once(
            200,
            r#"{"token":"jwt","user":{"name":"Asha","role":"user","soilType":"Red loam"}}"#,
        )
        .await;

        let session = client.login(&login_request()).await.expect("session");

        assert_eq!(session.token, "jwt");
        assert_eq!(session.user.display_role(), "farmer");
        assert_eq!(session.user.soil_type.as_deref(), Some("Red loam"));
        let recorded = server.await.unwrap();
        assert_eq!(recorded.path, "/api/auth/login");
        assert_eq!(
            recorded.json(),
            json!({"email": "asha@example.com", "password": "secret", "role": "farmer"})
        );
    }

    #[tokio::test]
    async fn test_login_error_carries_server_message() {
        let (client, server) = serve_once(401, r#"{"message":"Invalid credentials"}"#).await;

        let err = client.login(&login_request()).await.unwrap_err();

        assert_eq!(err.kind(), ApiErrorKind::Status);
        assert_eq!(err.to_string(), "Invalid credentials");
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_login_error_without_message_uses_default() {
        let (client, server) = serve_once(400, "{}").await;

        let err = client.login(&login_request()).await.unwrap_err();

        assert_eq!(err.to_string(), "Login failed");
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_non_json_success_is_malformed() {
        let (client, server) = serve_once(200, "<html>").await;

        let err = client.login(&login_request()).await.unwrap_err();

        assert_eq!(err.kind(), ApiErrorKind::Malformed);
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_me_sends_bearer_token() {
        let (client, server) =
            serve_once(200, r#"{"user":{"name":"Ravi","role":"expert"}}"#).await;

        let user = client.me("jwt-123").await.expect("user");

        assert_eq!(user.name.as_deref(), Some("Ravi"));
        assert_eq!(user.display_role(), "expert");
        let recorded = server.await.unwrap();
        assert_eq!(recorded.path, "/api/users/me");
        assert_eq!(recorded.header("authorization"), Some("Bearer jwt-123"));
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");
        drop(listener);
        let client = ApiClient::new(&AppConfig::new(&format!("http://{addr}")));

        let err = client.me("jwt").await.unwrap_err();

        assert_eq!(err.kind(), ApiErrorKind::Transport);
    }
}

mod analyze_tests {
    use super::*;

    #[tokio::test]
    async fn test_analyze_sends_image_field() {
        let (client, server) = serve_once(200, r#"{"result":"Leaf blast detected"}"#).await;
        let file = SelectedFile::new("leaf.jpg", "image/jpeg", b"jpegbytes".to_vec());

        let result = client.analyze_image(&file).await.expect("result");

        assert_eq!(result, "Leaf blast detected");
        let recorded = server.await.unwrap();
        assert_eq!(recorded.path, "/api/analyze");
        assert!(
            recorded
                .header("content-type")
                .is_some_and(|value| value.starts_with("multipart/form-data"))
        );
        let body = recorded.body_text();
        assert!(body.contains(r#"name="image""#));
        assert!(body.contains(r#"filename="leaf.jpg""#));
        assert!(body.contains("jpegbytes"));
    }

    #[tokio::test]
    async fn test_analyze_error_field_becomes_message() {
        let (client, server) = serve_once(422, r#"{"error":"No leaf found"}"#).await;
        let file = SelectedFile::new("leaf.jpg", "image/jpeg", vec![1]);

        let err = client.analyze_image(&file).await.unwrap_err();

        assert_eq!(err.to_string(), "No leaf found");
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_structured_result_is_stringified() {
        let (client, server) = serve_once(200, r#"{"result":{"disease":"rust"}}"#).await;
        let file = SelectedFile::new("leaf.png", "image/png", vec![1]);

        let result = client.analyze_image(&file).await.expect("result");

        assert_eq!(result, r#"{"disease":"rust"}"#);
        server.await.unwrap();
    }
}
