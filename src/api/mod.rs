/// Network boundary for the FreshAir backend
///
/// Every response is validated here before the rest of the app sees it: a call
/// yields either its typed payload or an [`ApiError`] carrying a kind and a
/// user-presentable message.
///
/// # Architecture
///
/// - `client` - `ApiClient` over one shared `reqwest::Client`, plus the
///   `ChatBackend` seam used by the session manager
/// - `error` - `ApiError` and its discriminant
///
/// # Usage
///
/// ```rust,no_run
/// use freshair::api::{ApiClient, ChatBackend};
/// use freshair::config::AppConfig;
///
/// # async fn example() -> anyhow::Result<()> {
/// let client = ApiClient::new(&AppConfig::from_env());
/// let sessions = client.list_chats().await?;
/// # Ok(())
/// # }
/// ```
mod client;
mod error;

pub use client::{
    ApiClient, AuthSession, ChatBackend, ChatReply, ChatRequest, LoginRequest, RegisterRequest,
};
pub use error::{ApiError, ApiErrorKind, ApiResult};
