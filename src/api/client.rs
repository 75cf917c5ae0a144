use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, multipart};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{ApiError, ApiResult};
use crate::config::AppConfig;
use crate::types::{Language, Message, SessionId, SessionSummary, UserProfile, UserRole};
use crate::upload::SelectedFile;

// ============================================
// Wire Types
// ============================================

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub prompt: String,
    pub session_id: SessionId,
    pub lang: Language,
}

/// A validated chat reply. `session_id` is the id the server filed the
/// exchange under, when it reported one.
#[derive(Clone, Debug, PartialEq)]
pub struct ChatReply {
    pub reply: String,
    pub session_id: Option<SessionId>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChatReplyBody {
    #[serde(default)]
    reply: Option<String>,
    #[serde(default)]
    session_id: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    pub role: UserRole,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub role: UserRole,
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub soil_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pincode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AuthSession {
    pub token: String,
    pub user: UserProfile,
}

#[derive(Deserialize)]
struct AuthBody {
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    user: Option<UserProfile>,
}

#[derive(Deserialize)]
struct MeBody {
    #[serde(default)]
    user: Option<UserProfile>,
}

#[derive(Deserialize)]
struct AnalyzeBody {
    #[serde(default)]
    result: Option<Value>,
}

// ============================================
// Chat Backend Seam
// ============================================

/// The chat endpoints the session manager depends on.
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait ChatBackend: Send + Sync {
    async fn send_chat(&self, request: &ChatRequest) -> ApiResult<ChatReply>;

    async fn list_chats(&self) -> ApiResult<Vec<SessionSummary>>;

    async fn chat_history(&self, session: &SessionId) -> ApiResult<Vec<Message>>;
}

// ============================================
// HTTP Client
// ============================================

/// Typed client for the FreshAir backend.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    config: AppConfig,
}

impl ApiClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            http: Client::new(),
            config: config.clone(),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        self.config.endpoint(path)
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        failure: &str,
    ) -> ApiResult<T> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ApiError::from_status(status.as_u16(), &body, failure));
        }
        serde_json::from_str(&body).map_err(|e| ApiError::malformed(e.to_string()))
    }

    pub async fn login(&self, request: &LoginRequest) -> ApiResult<AuthSession> {
        tracing::debug!(role = ?request.role, "login");
        let body: AuthBody = self
            .fetch(
                self.http.post(self.url("/api/auth/login")).json(request),
                "Login failed",
            )
            .await?;
        body.into_session()
    }

    pub async fn register(&self, request: &RegisterRequest) -> ApiResult<AuthSession> {
        tracing::debug!(role = ?request.role, "register");
        let body: AuthBody = self
            .fetch(
                self.http.post(self.url("/api/auth/register")).json(request),
                "Registration failed",
            )
            .await?;
        body.into_session()
    }

    pub async fn me(&self, token: &str) -> ApiResult<UserProfile> {
        let body: MeBody = self
            .fetch(
                self.http.get(self.url("/api/users/me")).bearer_auth(token),
                "Failed to load profile",
            )
            .await?;
        body.user
            .ok_or_else(|| ApiError::malformed("response has no user"))
    }

    /// Sends one image as the multipart field `image` and returns the
    /// analysis text.
    pub async fn analyze_image(&self, file: &SelectedFile) -> ApiResult<String> {
        tracing::debug!(name = %file.name, size = file.size(), "analyze image");
        let part = multipart::Part::bytes(file.bytes.clone())
            .file_name(file.name.clone())
            .mime_str(&file.content_type)?;
        let form = multipart::Form::new().part("image", part);
        let body: AnalyzeBody = self
            .fetch(
                self.http.post(self.url("/api/analyze")).multipart(form),
                "Failed to analyze",
            )
            .await?;
        match body.result {
            Some(Value::String(text)) => Ok(text),
            Some(Value::Null) | None => Err(ApiError::malformed("response has no result")),
            Some(other) => Ok(other.to_string()),
        }
    }
}

impl AuthBody {
    fn into_session(self) -> ApiResult<AuthSession> {
        match (self.token, self.user) {
            (Some(token), Some(user)) if !token.is_empty() => Ok(AuthSession { token, user }),
            _ => Err(ApiError::malformed("response has no token or user")),
        }
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl ChatBackend for ApiClient {
    async fn send_chat(&self, request: &ChatRequest) -> ApiResult<ChatReply> {
        tracing::debug!(session = %request.session_id, lang = request.lang.code(), "send chat");
        let body: ChatReplyBody = self
            .fetch(self.http.post(self.url("/api/chat")).json(request), "Chat failed")
            .await?;
        let reply = body
            .reply
            .filter(|text| !text.is_empty())
            .ok_or_else(|| ApiError::malformed("response has no reply"))?;
        let session_id = body
            .session_id
            .filter(|id| !id.trim().is_empty())
            .map(SessionId::new);
        Ok(ChatReply { reply, session_id })
    }

    async fn list_chats(&self) -> ApiResult<Vec<SessionSummary>> {
        self.fetch(self.http.get(self.url("/api/chats")), "Failed to load chats")
            .await
    }

    async fn chat_history(&self, session: &SessionId) -> ApiResult<Vec<Message>> {
        let path = format!("/api/chat/{}", urlencoding::encode(session.as_str()));
        self.fetch(self.http.get(self.url(&path)), "Failed to load chat")
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn chat_request_uses_camel_case() {
        let request = ChatRequest {
            prompt: "hello".into(),
            session_id: SessionId::new("sess_1"),
            lang: Language::Hi,
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"prompt": "hello", "sessionId": "sess_1", "lang": "hi"})
        );
    }

    #[test]
    fn register_request_omits_blank_optionals() {
        let request = RegisterRequest {
            role: UserRole::Farmer,
            name: "Asha".into(),
            email: "asha@example.com".into(),
            password: "secret1".into(),
            soil_type: Some("Red loam".into()),
            ..RegisterRequest::default()
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "role": "farmer",
                "name": "Asha",
                "email": "asha@example.com",
                "password": "secret1",
                "soilType": "Red loam"
            })
        );
    }

    #[test]
    fn auth_body_requires_token_and_user() {
        let body = AuthBody {
            token: Some("t".into()),
            user: None,
        };
        assert_eq!(
            body.into_session().unwrap_err().kind(),
            crate::api::ApiErrorKind::Malformed
        );
    }
}
